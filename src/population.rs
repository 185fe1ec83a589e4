//! Reference population loading.
//!
//! The population is a JSON array of profiles on disk, loaded fresh per
//! training or comparison run. Load failures surface as data-source errors;
//! malformed individual field values inside a profile do not (they degrade
//! to "unknown" during normalization).

use crate::error::{Result, ViabilidadError};
use crate::profile::OrganizationProfile;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// An in-memory reference population of organization profiles.
#[derive(Debug, Clone, Default)]
pub struct ReferencePopulation {
    profiles: Vec<OrganizationProfile>,
}

impl ReferencePopulation {
    /// Wraps an already-loaded profile list.
    #[must_use]
    pub fn from_profiles(profiles: Vec<OrganizationProfile>) -> Self {
        Self { profiles }
    }

    /// Loads a population from a JSON array file.
    ///
    /// # Errors
    ///
    /// Returns a data-source error when the file cannot be read or is not a
    /// JSON array of profiles.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ViabilidadError::data_source(format!("cannot open {}: {e}", path.display()))
        })?;
        let profiles: Vec<OrganizationProfile> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| {
                ViabilidadError::data_source(format!("cannot parse {}: {e}", path.display()))
            })?;
        Ok(Self { profiles })
    }

    /// Profiles in load order.
    #[must_use]
    pub fn profiles(&self) -> &[OrganizationProfile] {
        &self.profiles
    }

    /// Organization names in load order ("Unknown" for anonymous rows).
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.profiles
            .iter()
            .map(OrganizationProfile::display_name)
            .collect()
    }

    /// Number of profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// True when no profiles are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_json_array() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[{{"Organization_Name": "A", "Founded_Date": 2020}},
                {{"Organization Name": "B"}}]"#
        )
        .expect("write");
        let population = ReferencePopulation::from_json_path(file.path()).expect("load");
        assert_eq!(population.len(), 2);
        assert_eq!(population.names(), vec!["A", "B"]);
    }

    #[test]
    fn test_missing_file_is_data_source_error() {
        let err = ReferencePopulation::from_json_path("/nonexistent/pop.json")
            .expect_err("missing file");
        assert!(matches!(err, ViabilidadError::DataSource { .. }));
    }

    #[test]
    fn test_malformed_json_is_data_source_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{not json").expect("write");
        let err = ReferencePopulation::from_json_path(file.path()).expect_err("bad json");
        assert!(matches!(err, ViabilidadError::DataSource { .. }));
    }
}
