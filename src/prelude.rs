//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use viabilidad::prelude::*;
//! ```

pub use crate::adjust::{ConfidenceTier, Prediction, PredictionResult};
pub use crate::assemble::{FeatureAssembler, FeatureRole, FeatureSchema};
pub use crate::data::FeatureFrame;
pub use crate::error::{Result, ViabilidadError};
pub use crate::model::{OutcomeClassifier, OutcomeModel, PriorClassifier};
pub use crate::peers::PeerComparisonReport;
pub use crate::pipeline::ViabilityPipeline;
pub use crate::population::ReferencePopulation;
pub use crate::primitives::{Matrix, Vector};
pub use crate::profile::OrganizationProfile;
pub use crate::report::DirectComparisonReport;
