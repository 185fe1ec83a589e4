//! Pairwise comparison against one named organization.
//!
//! The lighter-weight sibling of the peer report: the peer is chosen by
//! exact name instead of similarity, the z-scores are computed over just
//! the two-row pair, and no chart series are produced.

use crate::assemble::FeatureAssembler;
use crate::derive;
use crate::error::{Result, ViabilidadError};
use crate::peers::{display_feature_name, SELECTED_FEATURES};
use crate::profile::OrganizationProfile;
use crate::stats;
use serde::{Deserialize, Serialize};

/// Output of a direct two-organization comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectComparisonReport {
    pub subject_name: String,
    pub compared_to: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Compares the subject against one organization selected by exact name.
///
/// Name collisions in the population are distinct rows; the first match in
/// row order wins.
///
/// # Errors
///
/// Returns a not-found error when no population row carries `peer_name`,
/// and propagates assembly errors.
pub fn compare_to_named(
    assembler: &FeatureAssembler,
    subject: &OrganizationProfile,
    population: &[OrganizationProfile],
    peer_name: &str,
) -> Result<DirectComparisonReport> {
    let subject_name = subject.display_name().to_string();

    let mut combined: Vec<OrganizationProfile> = population.to_vec();
    combined.push(subject.clone());
    let subject_index = combined.len() - 1;

    let peer_index = combined
        .iter()
        .position(|p| p.organization_name.as_deref() == Some(peer_name))
        .ok_or_else(|| ViabilidadError::NotFound {
            name: peer_name.to_string(),
        })?;

    let mut frame = assembler.transform(&combined)?;
    derive::augment(&mut frame, assembler.schema()?)?;

    let mut pros = Vec::new();
    let mut cons = Vec::new();
    for name in SELECTED_FEATURES {
        let Some(column) = frame.column(name) else {
            continue;
        };
        // Two-row standardization: the pair is its own batch.
        let pair = [column[subject_index], column[peer_index]];
        let z = stats::standardize_lenient(&pair);
        let z_diff = z[0] - z[1];
        if z_diff > 0.0 {
            pros.push(display_feature_name(name).to_string());
        } else {
            cons.push(display_feature_name(name).to_string());
        }
    }
    if pros.is_empty() {
        pros.push("No strengths identified compared to selected organization.".to_string());
    }
    if cons.is_empty() {
        cons.push("No weaknesses identified compared to selected organization.".to_string());
    }

    Ok(DirectComparisonReport {
        subject_name,
        compared_to: peer_name.to_string(),
        pros,
        cons,
    })
}
