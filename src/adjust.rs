//! Prediction adjustment heuristic.
//!
//! Post-processes classifier probabilities with a capital-efficiency nudge
//! plus a small reproducible random factor. The generator is request-local
//! and seeded from the capital-efficiency metric itself, so identical inputs
//! always produce the identical practical prediction.

use crate::error::{Result, ViabilidadError};
use crate::model::{argmax, OutcomeModel};
use crate::stats;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Cap on the capital-efficiency nudge applied to the active-class
/// probability.
const MAX_HARDWORK_ADJUSTMENT: f64 = 0.2;
/// Standard deviation of the reproducible random factor.
const RANDOM_FACTOR_STD: f64 = 0.15;

/// How far the practical active probability sits from the 0.5 decision
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    fn from_active_probability(p: f64) -> Self {
        let distance = (p - 0.5).abs();
        if distance >= 0.2 {
            Self::High
        } else if distance >= 0.1 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// One labeled prediction with its class probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Caller-facing rendering of the label ("Successful"/"Struggling").
    pub display_label: String,
    /// None when the underlying value is NaN or infinite.
    pub probability: Option<f64>,
}

impl Prediction {
    fn new(label: String, probability: f64) -> Self {
        let display_label = if label == "Active" {
            "Successful".to_string()
        } else {
            "Struggling".to_string()
        };
        Self {
            label,
            display_label,
            probability: finite_or_none(probability),
        }
    }
}

/// Audit trail of what the heuristic actually did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentComparison {
    /// Did the practical label differ from the original one?
    pub practical_label_changed: bool,
    /// Did the argmax label differ from the original one?
    pub no_adjustment_label_changed: bool,
    /// Batch-standardized capital efficiency fed into the nudge.
    pub hardwork_factor: f64,
    /// Clamped nudge added to the active probability.
    pub adjustment: f64,
    /// The normal(0, 0.15) draw actually applied.
    pub random_factor: f64,
}

/// Full output bundle of one inference call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub original: Prediction,
    /// Plain argmax over the raw distribution, kept for audit.
    pub no_adjustment: Prediction,
    /// The heuristically adjusted final prediction.
    pub practical: Prediction,
    pub comparison: AdjustmentComparison,
    pub raw_probabilities: Vec<f64>,
    pub adjusted_probabilities: Vec<f64>,
    pub confidence_tier: ConfidenceTier,
}

/// Maps non-finite floats to None before they cross the API boundary.
#[must_use]
pub fn finite_or_none(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Deterministic per-request seed derived from the capital-efficiency
/// metric. NaN collapses to seed 0.
fn efficiency_seed(capital_efficiency: f64) -> u64 {
    let floored = (capital_efficiency * 1000.0).floor();
    let floored = if floored.is_finite() { floored as i64 } else { 0 };
    floored.rem_euclid(10_000) as u64
}

fn renormalize(probabilities: &mut [f64]) {
    let sum: f64 = probabilities.iter().sum();
    if sum > 0.0 {
        for p in probabilities.iter_mut() {
            *p /= sum;
        }
    } else {
        let uniform = 1.0 / probabilities.len() as f64;
        probabilities.fill(uniform);
    }
}

/// Applies the adjustment heuristic to one classifier output row.
///
/// `capital_efficiency_batch` holds the derived metric for the whole batch
/// being predicted (a single-row batch standardizes to zero, so only the
/// random factor moves the probability); `row` indexes the subject within
/// it.
///
/// # Errors
///
/// Returns an inference error for an empty distribution or a row outside
/// the batch.
pub fn adjusted_prediction(
    model: &OutcomeModel,
    raw_probabilities: &[f64],
    capital_efficiency_batch: &[f64],
    row: usize,
) -> Result<PredictionResult> {
    if raw_probabilities.is_empty() {
        return Err(ViabilidadError::inference("empty probability distribution"));
    }
    let Some(&capital_efficiency) = capital_efficiency_batch.get(row) else {
        return Err(ViabilidadError::inference(format!(
            "row {row} outside capital-efficiency batch of {}",
            capital_efficiency_batch.len()
        )));
    };

    let original_index = argmax(raw_probabilities);
    let original = Prediction::new(
        model.label_for(original_index),
        raw_probabilities[original_index],
    );
    let no_adjustment = original.clone();

    let active = model.active_index().min(raw_probabilities.len() - 1);

    let hardwork_factor = stats::standardize(capital_efficiency_batch)[row];
    let adjustment = (hardwork_factor * MAX_HARDWORK_ADJUSTMENT)
        .clamp(-MAX_HARDWORK_ADJUSTMENT, MAX_HARDWORK_ADJUSTMENT);

    let mut adjusted = raw_probabilities.to_vec();
    adjusted[active] += adjustment;
    renormalize(&mut adjusted);

    // Box-Muller transform, one draw from the per-request generator.
    let mut rng = StdRng::seed_from_u64(efficiency_seed(capital_efficiency));
    let u1: f64 = rng.gen_range(0.0001_f64..1.0_f64);
    let u2: f64 = rng.gen_range(0.0_f64..1.0_f64);
    let random_factor =
        RANDOM_FACTOR_STD * (-2.0_f64 * u1.ln()).sqrt() * (2.0_f64 * std::f64::consts::PI * u2).cos();

    adjusted[active] = (adjusted[active] + random_factor).clamp(0.0, 1.0);
    renormalize(&mut adjusted);

    let practical_index = argmax(&adjusted);
    let practical = Prediction::new(model.label_for(practical_index), adjusted[practical_index]);

    let comparison = AdjustmentComparison {
        practical_label_changed: practical.label != original.label,
        no_adjustment_label_changed: no_adjustment.label != original.label,
        hardwork_factor,
        adjustment,
        random_factor,
    };
    let confidence_tier = ConfidenceTier::from_active_probability(adjusted[active]);

    Ok(PredictionResult {
        original,
        no_adjustment,
        practical,
        comparison,
        raw_probabilities: raw_probabilities.to_vec(),
        adjusted_probabilities: adjusted,
        confidence_tier,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OutcomeModel, PriorClassifier};
    use crate::primitives::Matrix;

    fn model() -> OutcomeModel {
        let mut model = OutcomeModel::new(Box::new(PriorClassifier::new()));
        let labels: Vec<String> = vec!["Active".into(), "Closed".into()];
        model.fit(&Matrix::zeros(2, 1), &labels).expect("fit");
        model
    }

    #[test]
    fn test_deterministic_per_input() {
        let model = model();
        let a = adjusted_prediction(&model, &[0.6, 0.4], &[3.7], 0).expect("predict");
        let b = adjusted_prediction(&model, &[0.6, 0.4], &[3.7], 0).expect("predict");
        assert_eq!(a.comparison.random_factor, b.comparison.random_factor);
        assert_eq!(a.practical.label, b.practical.label);
        assert_eq!(a.adjusted_probabilities, b.adjusted_probabilities);
    }

    #[test]
    fn test_single_row_batch_has_zero_nudge() {
        let model = model();
        let result = adjusted_prediction(&model, &[0.6, 0.4], &[42.0], 0).expect("predict");
        assert_eq!(result.comparison.hardwork_factor, 0.0);
        assert_eq!(result.comparison.adjustment, 0.0);
    }

    #[test]
    fn test_nudge_clamped() {
        let model = model();
        // An extreme outlier standardizes far past 1; the nudge stays capped.
        let batch = vec![1000.0, 0.0, 0.0, 0.0, 0.0];
        let result = adjusted_prediction(&model, &[0.5, 0.5], &batch, 0).expect("predict");
        assert!(result.comparison.adjustment.abs() <= MAX_HARDWORK_ADJUSTMENT + 1e-12);
        assert!(result.comparison.hardwork_factor > 1.0);
    }

    #[test]
    fn test_negative_efficiency_seeds_cleanly() {
        let model = model();
        let result = adjusted_prediction(&model, &[0.5, 0.5], &[-7.3], 0).expect("predict");
        assert!(result.comparison.random_factor.is_finite());
    }

    #[test]
    fn test_probabilities_stay_normalized() {
        let model = model();
        let result = adjusted_prediction(&model, &[0.9, 0.1], &[2.0, 5.0], 0).expect("predict");
        let sum: f64 = result.adjusted_probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(result
            .adjusted_probabilities
            .iter()
            .all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_confidence_tiers() {
        assert_eq!(
            ConfidenceTier::from_active_probability(0.75),
            ConfidenceTier::High
        );
        assert_eq!(
            ConfidenceTier::from_active_probability(0.62),
            ConfidenceTier::Medium
        );
        assert_eq!(
            ConfidenceTier::from_active_probability(0.55),
            ConfidenceTier::Low
        );
        assert_eq!(
            ConfidenceTier::from_active_probability(0.25),
            ConfidenceTier::High
        );
    }

    #[test]
    fn test_display_labels() {
        let model = model();
        let result = adjusted_prediction(&model, &[1.0, 0.0], &[0.0], 0).expect("predict");
        assert_eq!(result.original.label, "Active");
        assert_eq!(result.original.display_label, "Successful");
    }

    #[test]
    fn test_row_out_of_bounds() {
        let model = model();
        assert!(adjusted_prediction(&model, &[0.5, 0.5], &[1.0], 3).is_err());
    }

    #[test]
    fn test_finite_or_none() {
        assert_eq!(finite_or_none(1.5), Some(1.5));
        assert_eq!(finite_or_none(f64::NAN), None);
        assert_eq!(finite_or_none(f64::INFINITY), None);
    }
}
