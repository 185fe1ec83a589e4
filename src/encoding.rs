//! Categorical encoders fitted over a reference population.
//!
//! All encoders follow the same contract: `fit` is called exactly once over
//! the reference population, after which `transform` is a pure function of
//! the learned parameters. Unseen values never error; each encoder has a
//! defined out-of-vocabulary behavior (reserved code, zero frequency, or
//! silent term drop).

use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Reserved code for categories unseen during fitting.
pub const OOV_CODE: f64 = -1.0;

/// Ordinal encoder: one stable integer code per distinct category.
///
/// Categories are assigned codes in lexicographic order, so refitting over
/// the same population always reproduces the same mapping. Unseen values at
/// transform time receive [`OOV_CODE`].
///
/// # Examples
///
/// ```
/// use viabilidad::encoding::OrdinalEncoder;
///
/// let mut enc = OrdinalEncoder::new();
/// enc.fit(&["Seed".into(), "Series A".into(), "Seed".into()]);
/// assert_eq!(enc.transform("Seed"), 0.0);
/// assert_eq!(enc.transform("Series A"), 1.0);
/// assert_eq!(enc.transform("Series Z"), -1.0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdinalEncoder {
    codes: HashMap<String, f64>,
}

impl OrdinalEncoder {
    /// Creates an unfitted encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Learns one code per distinct value, in lexicographic order.
    pub fn fit(&mut self, values: &[String]) {
        let mut distinct: Vec<&String> = values.iter().collect::<HashSet<_>>().into_iter().collect();
        distinct.sort();
        self.codes = distinct
            .into_iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i as f64))
            .collect();
    }

    /// Maps a value to its fitted code, or [`OOV_CODE`] if unseen.
    #[must_use]
    pub fn transform(&self, value: &str) -> f64 {
        self.codes.get(value).copied().unwrap_or(OOV_CODE)
    }

    /// Number of fitted categories.
    #[must_use]
    pub fn n_categories(&self) -> usize {
        self.codes.len()
    }
}

/// Frequency encoder: relative occurrence frequency per distinct value.
///
/// Unseen values at transform time map to 0.0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrequencyEncoder {
    frequencies: HashMap<String, f64>,
}

impl FrequencyEncoder {
    /// Creates an unfitted encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Learns the relative frequency of each distinct value.
    pub fn fit(&mut self, values: &[String]) {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for v in values {
            *counts.entry(v.clone()).or_insert(0) += 1;
        }
        let n = values.len().max(1) as f64;
        self.frequencies = counts
            .into_iter()
            .map(|(k, c)| (k, c as f64 / n))
            .collect();
    }

    /// Maps a value to its fitted frequency, or 0.0 if unseen.
    #[must_use]
    pub fn transform(&self, value: &str) -> f64 {
        self.frequencies.get(value).copied().unwrap_or(0.0)
    }
}

/// Label encoder for the target classes, with inverse lookup.
///
/// Classes are sorted lexicographically at fit time. [`LabelEncoder::inverse`]
/// returns `None` for an out-of-vocabulary index; the caller decides the
/// fallback (the outcome adapter substitutes its positional default).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Creates an unfitted encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Learns the sorted class vocabulary and returns each label's index.
    pub fn fit_transform(&mut self, labels: &[String]) -> Vec<usize> {
        let mut distinct: Vec<String> = labels
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .cloned()
            .collect();
        distinct.sort();
        self.classes = distinct;
        labels
            .iter()
            .map(|l| {
                self.classes
                    .iter()
                    .position(|c| c == l)
                    .unwrap_or(usize::MAX)
            })
            .collect()
    }

    /// Index of a class label, if fitted.
    #[must_use]
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }

    /// Class label for an index, if in vocabulary.
    #[must_use]
    pub fn inverse(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    /// Fitted class labels in index order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// Common English stop words, filtered out of industry-tag text before
/// vocabulary construction.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as",
    "at", "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
    "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most", "my", "no",
    "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "out",
    "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their",
    "theirs", "them", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "you", "your", "yours",
];

/// Sparse text-similarity encoder over a multi-valued tag field.
///
/// Builds a bounded tf-idf vocabulary from the reference population and
/// projects new text into that fixed term space. Terms outside the fitted
/// vocabulary are silently dropped; a population with no usable terms yields
/// a zero-width output matrix, which downstream code must tolerate.
///
/// # Examples
///
/// ```
/// use viabilidad::encoding::TfidfEncoder;
///
/// let docs = vec!["fintech payments".to_string(), "fintech lending".to_string()];
/// let mut enc = TfidfEncoder::new().with_max_features(50);
/// let matrix = enc.fit_transform(&docs);
/// assert_eq!(matrix.n_rows(), 2);
/// assert!(matrix.n_cols() >= 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfEncoder {
    /// Bounded vocabulary size (None = unbounded).
    max_features: Option<usize>,
    /// Term → column index.
    vocabulary: HashMap<String, usize>,
    /// Column index → term, for feature naming.
    terms: Vec<String>,
    /// Smoothed inverse document frequency per term.
    idf: Vec<f64>,
}

impl Default for TfidfEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfEncoder {
    /// Creates an unfitted encoder with an unbounded vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_features: None,
            vocabulary: HashMap::new(),
            terms: Vec::new(),
            idf: Vec::new(),
        }
    }

    /// Bounds the vocabulary to the most frequent `max_features` terms.
    #[must_use]
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    /// Number of terms in the fitted vocabulary.
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    /// Fitted terms in column order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.terms
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.chars().count() >= 2)
            .filter(|t| !ENGLISH_STOP_WORDS.contains(t))
            .map(ToString::to_string)
            .collect()
    }

    /// Learns the vocabulary and document frequencies.
    pub fn fit(&mut self, documents: &[String]) {
        let n_docs = documents.len();
        let mut term_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let tokens = Self::tokenize(doc);
            let mut seen: HashSet<&String> = HashSet::new();
            for token in &tokens {
                *term_freq.entry(token.clone()).or_insert(0) += 1;
                seen.insert(token);
            }
            for token in seen {
                *doc_freq.entry(token.clone()).or_insert(0) += 1;
            }
        }

        // Most frequent first, alphabetical tie-break, then truncate.
        let mut sorted: Vec<(String, usize)> = term_freq.into_iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        if let Some(max) = self.max_features {
            sorted.truncate(max);
        }

        self.terms = sorted.into_iter().map(|(t, _)| t).collect();
        self.vocabulary = self
            .terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        self.idf = self
            .terms
            .iter()
            .map(|t| {
                let df = doc_freq.get(t).copied().unwrap_or(0);
                ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0
            })
            .collect();
    }

    /// Projects documents into the fitted term space (l2-normalized rows).
    #[must_use]
    pub fn transform(&self, documents: &[String]) -> Matrix<f64> {
        let n_cols = self.terms.len();
        let mut result = Matrix::zeros(documents.len(), n_cols);
        for (row, doc) in documents.iter().enumerate() {
            let mut counts = vec![0.0; n_cols];
            for token in Self::tokenize(doc) {
                if let Some(&col) = self.vocabulary.get(&token) {
                    counts[col] += 1.0;
                }
            }
            let weighted: Vec<f64> = counts
                .iter()
                .zip(self.idf.iter())
                .map(|(c, idf)| c * idf)
                .collect();
            let norm = weighted.iter().map(|v| v * v).sum::<f64>().sqrt();
            for (col, w) in weighted.iter().enumerate() {
                let v = if norm > 0.0 { w / norm } else { 0.0 };
                result.set(row, col, v);
            }
        }
        result
    }

    /// Fits the vocabulary and transforms in one step.
    pub fn fit_transform(&mut self, documents: &[String]) -> Matrix<f64> {
        self.fit(documents);
        self.transform(documents)
    }
}
