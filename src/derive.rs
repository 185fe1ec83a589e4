//! Derived viability metrics appended after feature assembly.
//!
//! All three metrics are computed from already-scaled columns, looked up
//! through the fitted [`FeatureSchema`] rather than by searching names per
//! request.

use crate::assemble::{FeatureRole, FeatureSchema};
use crate::data::FeatureFrame;
use crate::error::Result;
use crate::stats;

/// Weight of the capital-efficiency component in the composite score.
pub const WEIGHT_EFFICIENCY: f64 = 0.7;
/// Weight of the growth-outlook component in the composite score.
pub const WEIGHT_OUTLOOK: f64 = 0.3;

/// Column name of the funding-velocity metric.
pub const FUNDING_PER_YEAR: &str = "funding_per_year";
/// Column name of the revenue-per-employee metric.
pub const CAPITAL_EFFICIENCY: &str = "capital_efficiency";
/// Column name of the blended non-financial score.
pub const COMPOSITE_SCORE: &str = "composite_score";

/// Appends the derived metric columns to an assembled frame.
///
/// Ratios guard against division by an exact zero denominator by
/// substituting 1.0; the capital-efficiency z-scores feeding the composite
/// are batch-relative like every other scaled column.
///
/// # Errors
///
/// Returns an inference error when a required role is not bound in the
/// schema, or if a bound column is absent from the frame.
pub fn augment(frame: &mut FeatureFrame, schema: &FeatureSchema) -> Result<()> {
    let funding = schema_column(frame, schema, FeatureRole::Funding)?;
    let years = schema_column(frame, schema, FeatureRole::YearsActive)?;
    let revenue = schema_column(frame, schema, FeatureRole::Revenue)?;
    let employees = schema_column(frame, schema, FeatureRole::Employees)?;
    let confidence = schema_column(frame, schema, FeatureRole::GrowthConfidence)?;

    let funding_per_year: Vec<f64> = funding
        .iter()
        .zip(years.iter())
        .map(|(f, y)| f / guard_zero(*y))
        .collect();

    let capital_efficiency: Vec<f64> = revenue
        .iter()
        .zip(employees.iter())
        .map(|(r, e)| r / guard_zero(*e))
        .collect();

    let efficiency_z = stats::standardize(&capital_efficiency);
    let composite: Vec<f64> = efficiency_z
        .iter()
        .zip(confidence.iter())
        .map(|(h, o)| {
            let outlook = if o.is_nan() { 0.0 } else { *o };
            WEIGHT_EFFICIENCY * h + WEIGHT_OUTLOOK * outlook
        })
        .collect();

    frame.push_column(FUNDING_PER_YEAR, funding_per_year)?;
    frame.push_column(CAPITAL_EFFICIENCY, capital_efficiency)?;
    frame.push_column(COMPOSITE_SCORE, composite)?;
    Ok(())
}

fn schema_column(
    frame: &FeatureFrame,
    schema: &FeatureSchema,
    role: FeatureRole,
) -> Result<Vec<f64>> {
    let name = schema.column(role)?;
    frame
        .column(name)
        .map(<[f64]>::to_vec)
        .ok_or_else(|| crate::error::ViabilidadError::inference(format!("column '{name}' missing")))
}

fn guard_zero(v: f64) -> f64 {
    if v == 0.0 {
        1.0
    } else {
        v
    }
}
