//! Peer similarity engine and comparison report.
//!
//! Similarity is always population-relative: the industry-text vocabulary
//! and the stage encoding are refit per request over the combined
//! population-plus-subject batch, never reused from the assembler's fitted
//! artifacts. z-scores in the report follow the same batch-relative rule.

use crate::assemble::FeatureAssembler;
use crate::data::FeatureFrame;
use crate::derive;
use crate::encoding::{LabelEncoder, TfidfEncoder};
use crate::error::{Result, ViabilidadError};
use crate::primitives::{Matrix, Vector};
use crate::profile::OrganizationProfile;
use crate::stats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default number of peers retrieved.
pub const DEFAULT_TOP_N: usize = 5;

/// Feature columns surfaced in comparison reports, in presentation order.
pub const SELECTED_FEATURES: &[&str] = &[
    "revenue_mapped",
    "num__number_of_founders",
    "employees_converted",
    "num__number_of_funding_rounds",
    "funding_amount_converted",
    "growth_confidence_converted",
    "num__monthly_visit",
    "num__visit_duration_growth",
    "num__patents_granted",
    "num__visit_duration",
    "years_active",
    "cat__investment_stage",
    "cat__funding_status",
    "cat__growth_category",
    "cat__industry_groups",
    "cat__founders",
    "freq__headquarters_location",
    derive::FUNDING_PER_YEAR,
    derive::CAPITAL_EFFICIENCY,
    derive::COMPOSITE_SCORE,
];

/// Human-readable name for a feature column.
#[must_use]
pub fn display_feature_name(column: &str) -> &str {
    match column {
        "revenue_mapped" => "Estimated Revenue",
        "num__number_of_founders" => "Number of Founders",
        "employees_converted" => "Number of Employees",
        "num__number_of_funding_rounds" => "Number of Funding Rounds",
        "funding_amount_converted" => "Total Funding Amount",
        "growth_confidence_converted" => "Growth Confidence",
        "num__monthly_visit" => "Monthly Visit",
        "num__visit_duration_growth" => "Visit Duration Growth",
        "num__patents_granted" => "Patents Granted",
        "num__visit_duration" => "Visit Duration",
        "years_active" => "Years Active",
        "cat__investment_stage" => "Investment Stage",
        "cat__funding_status" => "Funding Status",
        "cat__growth_category" => "Growth Category",
        "cat__industry_groups" => "Industry Groups",
        "cat__founders" => "Founders",
        "freq__headquarters_location" => "Headquarters Location",
        "funding_per_year" => "Funding Per Year",
        "capital_efficiency" => "Capital Efficiency",
        "composite_score" => "Composite Score",
        other => other,
    }
}

/// One feature's raw value against the peer average, in original
/// (pre-z-score) pipeline units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureComparison {
    pub feature: String,
    pub subject_value: Option<f64>,
    pub peer_average: Option<f64>,
}

/// One bar of the sorted z-difference chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarChartPoint {
    pub feature: String,
    pub z_score: f64,
    pub fill: String,
}

/// One radar spoke: subject offset against a zero-centered peer baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarChartPoint {
    pub feature: String,
    pub subject_z_score: f64,
    pub peer_average: f64,
}

/// Raw metric values of one organization in the comparison set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerMetrics {
    pub name: String,
    pub metrics: BTreeMap<String, Option<f64>>,
}

/// Full peer comparison output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerComparisonReport {
    pub subject_name: String,
    pub peer_names: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub raw_comparison: Vec<FeatureComparison>,
    pub bar_chart: Vec<BarChartPoint>,
    pub radar_chart: Vec<RadarChartPoint>,
    /// Metrics for every peer plus the subject itself (last entry).
    pub peer_data: Vec<PeerMetrics>,
}

fn cosine(a: &Vector<f64>, b: &Vector<f64>) -> f64 {
    let norms = a.norm() * b.norm();
    if norms > 0.0 {
        a.dot(b) / norms
    } else {
        0.0
    }
}

/// Similarity matrix row for the subject: industry tf-idf columns refit on
/// the combined batch, with the ordinal stage code appended.
fn subject_similarities(combined: &[OrganizationProfile], subject_index: usize) -> Result<Vec<f64>> {
    let docs: Vec<String> = combined
        .iter()
        .map(OrganizationProfile::industries_text)
        .collect();
    let mut vectorizer = TfidfEncoder::new();
    let industry_matrix = vectorizer.fit_transform(&docs);

    let stages: Vec<String> = combined
        .iter()
        .map(|p| {
            p.investment_stage
                .clone()
                .unwrap_or_else(|| "Unknown".to_string())
        })
        .collect();
    let mut stage_encoder = LabelEncoder::new();
    let codes: Vec<f64> = stage_encoder
        .fit_transform(&stages)
        .into_iter()
        .map(|c| c as f64)
        .collect();
    let stage_column = Matrix::from_vec(combined.len(), 1, codes)?;

    let joined = industry_matrix.hstack(&stage_column)?;
    let subject_row = joined.row(subject_index);
    Ok((0..joined.n_rows())
        .map(|i| cosine(&subject_row, &joined.row(i)))
        .collect())
}

/// Indices sorted by descending similarity with the subject's own row
/// excluded, truncated to `top_n`. Ties keep original row order, so a peer
/// identical to the subject still ranks first.
fn top_peer_indices(similarities: &[f64], subject_index: usize, top_n: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..similarities.len())
        .filter(|i| *i != subject_index)
        .collect();
    order.sort_by(|a, b| {
        similarities[*b]
            .partial_cmp(&similarities[*a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.truncate(top_n);
    order
}

fn assembled_with_derived(
    assembler: &FeatureAssembler,
    combined: &[OrganizationProfile],
) -> Result<FeatureFrame> {
    let mut frame = assembler.transform(combined)?;
    derive::augment(&mut frame, assembler.schema()?)?;
    Ok(frame)
}

fn selected_columns(frame: &FeatureFrame) -> Vec<&'static str> {
    SELECTED_FEATURES
        .iter()
        .copied()
        .filter(|name| frame.has_column(name))
        .collect()
}

/// Compares a subject against its most similar peers in the reference
/// population.
///
/// # Errors
///
/// Returns a validation error for an empty population, and propagates
/// assembly errors.
pub fn peer_comparison(
    assembler: &FeatureAssembler,
    subject: &OrganizationProfile,
    population: &[OrganizationProfile],
    top_n: usize,
) -> Result<PeerComparisonReport> {
    if population.is_empty() {
        return Err(ViabilidadError::validation(
            "reference population is empty",
        ));
    }
    let subject_name = subject.display_name().to_string();

    let mut combined: Vec<OrganizationProfile> = population.to_vec();
    combined.push(subject.clone());
    let subject_index = combined.len() - 1;

    let frame = assembled_with_derived(assembler, &combined)?;
    let selected = selected_columns(&frame);

    let similarities = subject_similarities(&combined, subject_index)?;
    let peer_indices = top_peer_indices(&similarities, subject_index, top_n);

    // z-score each selected column over the whole combined batch, then
    // compare the subject against the peer average.
    let mut z_diffs: Vec<(&str, f64)> = Vec::with_capacity(selected.len());
    let mut raw_comparison = Vec::with_capacity(selected.len());
    let mut radar_chart = Vec::with_capacity(selected.len());
    for &name in &selected {
        let raw = frame
            .column(name)
            .ok_or_else(|| ViabilidadError::inference(format!("column '{name}' missing")))?;
        let z = stats::standardize_lenient(raw);
        let peer_z: Vec<f64> = peer_indices.iter().map(|&i| z[i]).collect();
        let peer_avg_z = stats::nan_mean(&peer_z);
        let z_diff = z[subject_index] - peer_avg_z;
        z_diffs.push((name, z_diff));

        let peer_raw: Vec<f64> = peer_indices.iter().map(|&i| raw[i]).collect();
        raw_comparison.push(FeatureComparison {
            feature: display_feature_name(name).to_string(),
            subject_value: crate::adjust::finite_or_none(raw[subject_index]),
            peer_average: crate::adjust::finite_or_none(stats::nan_mean(&peer_raw)),
        });
        radar_chart.push(RadarChartPoint {
            feature: display_feature_name(name).to_string(),
            subject_z_score: if z_diff.is_finite() { z_diff } else { 0.0 },
            peer_average: 0.0,
        });
    }

    let mut pros = Vec::new();
    let mut cons = Vec::new();
    for (name, z_diff) in &z_diffs {
        if *z_diff > 0.0 {
            pros.push(display_feature_name(name).to_string());
        } else {
            cons.push(display_feature_name(name).to_string());
        }
    }
    if pros.is_empty() {
        pros.push("No strengths identified compared to peers.".to_string());
    }
    if cons.is_empty() {
        cons.push("No weaknesses identified compared to peers.".to_string());
    }

    let mut bar_points: Vec<(&str, f64)> = z_diffs
        .iter()
        .map(|(name, z)| (*name, if z.is_finite() { *z } else { 0.0 }))
        .collect();
    bar_points.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let bar_chart = bar_points
        .into_iter()
        .map(|(name, z)| BarChartPoint {
            feature: display_feature_name(name).to_string(),
            z_score: z,
            fill: if z > 0.0 { "green" } else { "red" }.to_string(),
        })
        .collect();

    let mut peer_data: Vec<PeerMetrics> = peer_indices
        .iter()
        .map(|&i| PeerMetrics {
            name: combined[i].display_name().to_string(),
            metrics: metrics_row(&frame, &selected, i),
        })
        .collect();
    peer_data.push(PeerMetrics {
        name: subject_name.clone(),
        metrics: metrics_row(&frame, &selected, subject_index),
    });

    let peer_names = peer_indices
        .iter()
        .map(|&i| combined[i].display_name().to_string())
        .collect();

    Ok(PeerComparisonReport {
        subject_name,
        peer_names,
        pros,
        cons,
        raw_comparison,
        bar_chart,
        radar_chart,
        peer_data,
    })
}

fn metrics_row(
    frame: &FeatureFrame,
    selected: &[&str],
    row: usize,
) -> BTreeMap<String, Option<f64>> {
    selected
        .iter()
        .map(|name| {
            let value = frame.value(name, row).and_then(crate::adjust::finite_or_none);
            (display_feature_name(name).to_string(), value)
        })
        .collect()
}
