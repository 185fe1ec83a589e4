//! Viabilidad: organization viability scoring and peer comparison.
//!
//! Viabilidad turns self-reported organization profiles into normalized
//! feature vectors, scores their operating viability through a pluggable
//! classifier with a reproducible adjustment heuristic, and situates them
//! against the most similar peers in a reference population.
//!
//! # Quick Start
//!
//! ```
//! use viabilidad::prelude::*;
//!
//! let population = ReferencePopulation::from_profiles(vec![
//!     serde_json::from_str(r#"{"Organization_Name": "A", "Industries": "Fintech",
//!         "Estimated_Revenue": "$1M to $10M", "Founded_Date": 2018,
//!         "Number_of_Employees": "11-50", "Total_Funding_Amount": "$5M",
//!         "Growth_Confidence": "High"}"#).unwrap(),
//!     serde_json::from_str(r#"{"Organization_Name": "B", "Industries": "Robotics",
//!         "Estimated_Revenue": "Less than $1M", "Founded_Date": 2021,
//!         "Number_of_Employees": "1-10", "Total_Funding_Amount": "$1M",
//!         "Growth_Confidence": "Low"}"#).unwrap(),
//! ]);
//! let statuses: Vec<String> = vec!["Active".into(), "Closed".into()];
//!
//! let pipeline = ViabilityPipeline::train(
//!     population,
//!     &statuses,
//!     Box::new(PriorClassifier::new()),
//!     2025.0,
//! ).unwrap();
//!
//! let subject: OrganizationProfile = serde_json::from_str(
//!     r#"{"Organization_Name": "X", "Estimated_Revenue": "$2M", "Founded_Date": 2020}"#,
//! ).unwrap();
//! let result = pipeline.predict(&subject).unwrap();
//! assert!(["Active", "Closed"].contains(&result.practical.label.as_str()));
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`data`]: Named feature-column frame
//! - [`profile`]: Raw organization profile record
//! - [`normalize`]: Free-text field normalizers (money ranges, tenure, ...)
//! - [`encoding`]: Fitted categorical/text encoders
//! - [`stats`]: Batch-relative standardization helpers
//! - [`assemble`]: Feature assembly over a profile batch
//! - [`derive`]: Derived viability metrics
//! - [`model`]: Outcome classifier seam and label adapter
//! - [`adjust`]: Prediction adjustment heuristic
//! - [`peers`]: Peer similarity engine and comparison report
//! - [`report`]: Direct comparison against one named organization
//! - [`population`]: Reference population loading
//! - [`pipeline`]: End-to-end trained pipeline

pub mod adjust;
pub mod assemble;
pub mod data;
pub mod derive;
pub mod encoding;
pub mod error;
pub mod model;
pub mod normalize;
pub mod peers;
pub mod pipeline;
pub mod population;
pub mod prelude;
pub mod primitives;
pub mod profile;
pub mod report;
pub mod stats;

pub use error::{Result, ViabilidadError};
pub use primitives::{Matrix, Vector};
