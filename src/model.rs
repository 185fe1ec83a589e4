//! Outcome classification seam.
//!
//! The pipeline is agnostic about the classifier behind it: anything that
//! can fit on a feature matrix and emit per-class probabilities plugs in
//! through [`OutcomeClassifier`]. [`PriorClassifier`] is the reference
//! implementation, predicting the class priors of the training labels.

use crate::encoding::LabelEncoder;
use crate::error::{Result, ViabilidadError};
use crate::primitives::Matrix;

/// Probabilistic classifier over assembled feature rows.
pub trait OutcomeClassifier {
    /// Fits the classifier on encoded class indices.
    ///
    /// # Errors
    ///
    /// Returns an error when the training data is unusable.
    fn fit(&mut self, x: &Matrix<f64>, y: &[usize]) -> Result<()>;

    /// Per-class probabilities, one row per input row, columns in class
    /// index order. Rows sum to 1.
    ///
    /// # Errors
    ///
    /// Returns an error when called before fitting.
    fn predict_proba(&self, x: &Matrix<f64>) -> Result<Matrix<f64>>;

    /// Number of classes seen at fit time.
    fn n_classes(&self) -> usize;
}

/// Index of the largest entry (first wins on ties).
#[must_use]
pub fn argmax(row: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in row.iter().enumerate() {
        if *v > row[best] {
            best = i;
        }
    }
    best
}

/// Baseline classifier: predicts the empirical class priors for every row.
#[derive(Debug, Clone, Default)]
pub struct PriorClassifier {
    priors: Vec<f64>,
}

impl PriorClassifier {
    /// Creates an unfitted baseline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutcomeClassifier for PriorClassifier {
    fn fit(&mut self, _x: &Matrix<f64>, y: &[usize]) -> Result<()> {
        if y.is_empty() {
            return Err(ViabilidadError::validation("no training labels"));
        }
        let n_classes = y.iter().max().map_or(0, |m| m + 1);
        let mut counts = vec![0.0; n_classes];
        for &label in y {
            counts[label] += 1.0;
        }
        let total = y.len() as f64;
        self.priors = counts.into_iter().map(|c| c / total).collect();
        Ok(())
    }

    fn predict_proba(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        if self.priors.is_empty() {
            return Err(ViabilidadError::inference("classifier has not been fitted"));
        }
        let n_classes = self.priors.len();
        let mut result = Matrix::zeros(x.n_rows(), n_classes);
        for row in 0..x.n_rows() {
            for (col, p) in self.priors.iter().enumerate() {
                result.set(row, col, *p);
            }
        }
        Ok(result)
    }

    fn n_classes(&self) -> usize {
        self.priors.len()
    }
}

/// A fitted classifier paired with its target-label vocabulary.
pub struct OutcomeModel {
    classifier: Box<dyn OutcomeClassifier>,
    labels: LabelEncoder,
}

impl std::fmt::Debug for OutcomeModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutcomeModel")
            .field("classifier", &"<dyn OutcomeClassifier>")
            .field("labels", &self.labels)
            .finish()
    }
}

impl OutcomeModel {
    /// Wraps an unfitted classifier.
    #[must_use]
    pub fn new(classifier: Box<dyn OutcomeClassifier>) -> Self {
        Self {
            classifier,
            labels: LabelEncoder::new(),
        }
    }

    /// Encodes the string labels and fits the classifier.
    ///
    /// # Errors
    ///
    /// Propagates classifier fit errors.
    pub fn fit(&mut self, x: &Matrix<f64>, labels: &[String]) -> Result<()> {
        let encoded = self.labels.fit_transform(labels);
        self.classifier.fit(x, &encoded)
    }

    /// Per-class probabilities for a batch.
    ///
    /// # Errors
    ///
    /// Propagates classifier prediction errors.
    pub fn predict_proba(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        self.classifier.predict_proba(x)
    }

    /// Class label for a probability column, with a positional fallback for
    /// vocabularies missing the conventional names.
    #[must_use]
    pub fn label_for(&self, index: usize) -> String {
        match self.labels.inverse(index) {
            Some(label) => label.to_string(),
            None if index == 1 => "Active".to_string(),
            None => "Closed".to_string(),
        }
    }

    /// Probability column of the "Active" class (positional fallback 1).
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.labels.encode("Active").unwrap_or(1)
    }

    /// Fitted target vocabulary.
    #[must_use]
    pub fn labels(&self) -> &LabelEncoder {
        &self.labels
    }
}
