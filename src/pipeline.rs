//! End-to-end viability pipeline.
//!
//! Ties the assembler, derived metrics, classifier and adjustment heuristic
//! together behind the three caller-facing operations: predict, peer
//! comparison, and direct comparison. The fitted pipeline is read-only
//! after training; every request-scoped computation is independent.

use crate::adjust::{adjusted_prediction, PredictionResult};
use crate::assemble::FeatureAssembler;
use crate::data::FeatureFrame;
use crate::derive;
use crate::error::{Result, ViabilidadError};
use crate::model::{OutcomeClassifier, OutcomeModel};
use crate::peers::{peer_comparison, PeerComparisonReport};
use crate::population::ReferencePopulation;
use crate::profile::OrganizationProfile;
use crate::report::{compare_to_named, DirectComparisonReport};

/// A trained scoring pipeline.
///
/// Prediction batches are always the subject concatenated onto the training
/// population, so batch-relative scaling and the capital-efficiency seed see
/// a full population context rather than a degenerate single row.
#[derive(Debug)]
pub struct ViabilityPipeline {
    assembler: FeatureAssembler,
    model: OutcomeModel,
    population: Vec<OrganizationProfile>,
}

impl ViabilityPipeline {
    /// Fits the assembler and classifier on a labeled reference population.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty population or a label/row
    /// count mismatch, and propagates assembly and fit errors.
    pub fn train(
        population: ReferencePopulation,
        statuses: &[String],
        classifier: Box<dyn OutcomeClassifier>,
        current_year: f64,
    ) -> Result<Self> {
        let profiles = population.profiles();
        if profiles.is_empty() {
            return Err(ViabilidadError::validation(
                "reference population is empty",
            ));
        }
        if profiles.len() != statuses.len() {
            return Err(ViabilidadError::validation(format!(
                "{} profiles but {} operating statuses",
                profiles.len(),
                statuses.len()
            )));
        }

        let mut assembler = FeatureAssembler::new(current_year);
        assembler.fit(profiles)?;
        let frame = Self::assemble(&assembler, profiles)?;
        tracing::info!(
            rows = frame.n_rows(),
            columns = frame.n_cols(),
            "training features assembled"
        );

        let mut model = OutcomeModel::new(classifier);
        model.fit(&frame.to_matrix(), statuses)?;
        tracing::info!(classes = ?model.labels().classes(), "classifier fitted");

        Ok(Self {
            assembler,
            model,
            population: profiles.to_vec(),
        })
    }

    fn assemble(
        assembler: &FeatureAssembler,
        profiles: &[OrganizationProfile],
    ) -> Result<FeatureFrame> {
        let mut frame = assembler.transform(profiles)?;
        derive::augment(&mut frame, assembler.schema()?)?;
        Ok(frame)
    }

    /// The fitted feature assembler.
    #[must_use]
    pub fn assembler(&self) -> &FeatureAssembler {
        &self.assembler
    }

    /// Scores one profile.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a profile with no attributes at all,
    /// and an inference error if the feature contract is broken.
    pub fn predict(&self, profile: &OrganizationProfile) -> Result<PredictionResult> {
        if profile.is_empty() {
            return Err(ViabilidadError::validation("profile has no attributes"));
        }

        let mut batch = self.population.clone();
        batch.push(profile.clone());
        let subject_index = batch.len() - 1;

        let frame = Self::assemble(&self.assembler, &batch)?;
        let probabilities = self.model.predict_proba(&frame.to_matrix())?;
        let subject_row = probabilities.row(subject_index);

        let efficiency = frame
            .column(derive::CAPITAL_EFFICIENCY)
            .ok_or_else(|| ViabilidadError::inference("capital efficiency column missing"))?;

        let result = adjusted_prediction(
            &self.model,
            subject_row.as_slice(),
            efficiency,
            subject_index,
        )?;
        tracing::debug!(
            subject = profile.display_name(),
            label = %result.practical.label,
            tier = %result.confidence_tier,
            "prediction complete"
        );
        Ok(result)
    }

    /// Situates a profile against its most similar peers.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty population, and propagates
    /// assembly errors.
    pub fn peer_comparison(
        &self,
        profile: &OrganizationProfile,
        population: &ReferencePopulation,
        top_n: usize,
    ) -> Result<PeerComparisonReport> {
        let report = peer_comparison(&self.assembler, profile, population.profiles(), top_n)?;
        tracing::debug!(
            subject = %report.subject_name,
            peers = report.peer_names.len(),
            "peer comparison complete"
        );
        Ok(report)
    }

    /// Compares a profile against one organization by exact name.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the name has no match.
    pub fn compare_to_named(
        &self,
        profile: &OrganizationProfile,
        population: &ReferencePopulation,
        peer_name: &str,
    ) -> Result<DirectComparisonReport> {
        compare_to_named(&self.assembler, profile, population.profiles(), peer_name)
    }
}
