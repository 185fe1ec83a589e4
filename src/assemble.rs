//! Feature assembly: profiles in, named numeric feature frame out.
//!
//! The assembler owns the full column layout. Fitting learns the categorical
//! vocabularies from the reference population; transforming parses, imputes,
//! scales and encodes a batch into a [`FeatureFrame`] with stable column
//! names. Scaling is batch-relative (see [`crate::stats`]), so only the
//! encoders carry fitted state.

use crate::data::FeatureFrame;
use crate::encoding::{FrequencyEncoder, OrdinalEncoder, TfidfEncoder};
use crate::error::{Result, ViabilidadError};
use crate::normalize;
use crate::profile::OrganizationProfile;
use crate::stats;
use serde::{Deserialize, Serialize};

/// Vocabulary bound for the industry-tag encoder.
const INDUSTRY_MAX_FEATURES: usize = 50;

type NumericGetter = fn(&OrganizationProfile) -> Option<f64>;
type TextGetter = fn(&OrganizationProfile) -> Option<&str>;

/// Numeric attributes passed straight through (median impute + scale).
const NUMERIC_FIELDS: &[(&str, NumericGetter)] = &[
    ("number_of_founders", |p| p.number_of_founders),
    ("number_of_funding_rounds", |p| p.number_of_funding_rounds),
    ("monthly_visit", |p| p.monthly_visit),
    ("visit_duration_growth", |p| p.visit_duration_growth),
    ("patents_granted", |p| p.patents_granted),
    ("visit_duration", |p| p.visit_duration),
];

/// Text attributes encoded ordinally, one fitted vocabulary each.
const CATEGORICAL_FIELDS: &[(&str, TextGetter)] = &[
    ("investment_stage", |p| p.investment_stage.as_deref()),
    ("funding_status", |p| p.funding_status.as_deref()),
    ("growth_category", |p| p.growth_category.as_deref()),
    ("industry_groups", |p| p.industry_groups.as_deref()),
    ("founders", |p| p.founders.as_deref()),
];

/// Semantic role a column plays for the derived metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureRole {
    Revenue,
    Employees,
    Funding,
    YearsActive,
    GrowthConfidence,
}

impl FeatureRole {
    fn marker(self) -> &'static str {
        match self {
            Self::Revenue => "revenue_mapped",
            Self::Employees => "employees_converted",
            Self::Funding => "funding_amount_converted",
            Self::YearsActive => "years_active",
            Self::GrowthConfidence => "growth_confidence_converted",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Employees => "employees",
            Self::Funding => "funding",
            Self::YearsActive => "years",
            Self::GrowthConfidence => "growth_confidence",
        }
    }

    const ALL: [Self; 5] = [
        Self::Revenue,
        Self::Employees,
        Self::Funding,
        Self::YearsActive,
        Self::GrowthConfidence,
    ];
}

/// Role → column-name bindings, resolved once at fit time.
///
/// Downstream stages look columns up through this schema instead of
/// re-searching the column list on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    bindings: Vec<(FeatureRole, String)>,
}

impl FeatureSchema {
    /// Binds each role to the first column whose name contains the role's
    /// marker (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an inference error naming every role with no matching column.
    pub fn resolve(column_names: &[&str]) -> Result<Self> {
        let mut bindings = Vec::with_capacity(FeatureRole::ALL.len());
        let mut missing = Vec::new();
        for role in FeatureRole::ALL {
            let found = column_names
                .iter()
                .find(|name| name.to_lowercase().contains(role.marker()));
            match found {
                Some(name) => bindings.push((role, (*name).to_string())),
                None => missing.push(role.label()),
            }
        }
        if missing.is_empty() {
            Ok(Self { bindings })
        } else {
            Err(ViabilidadError::inference(format!(
                "required columns not found: {}",
                missing.join(", ")
            )))
        }
    }

    /// Column bound to a role.
    ///
    /// # Errors
    ///
    /// Returns an inference error for an unbound role (cannot happen for a
    /// schema built by [`FeatureSchema::resolve`]).
    pub fn column(&self, role: FeatureRole) -> Result<&str> {
        self.bindings
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, name)| name.as_str())
            .ok_or_else(|| {
                ViabilidadError::inference(format!("no column bound for {}", role.label()))
            })
    }
}

/// Fitted feature assembler.
///
/// # Examples
///
/// ```
/// use viabilidad::assemble::FeatureAssembler;
/// use viabilidad::profile::OrganizationProfile;
///
/// let population: Vec<OrganizationProfile> = vec![
///     serde_json::from_str(r#"{"Estimated_Revenue": "$1M to $10M", "Founded_Date": 2018}"#).unwrap(),
///     serde_json::from_str(r#"{"Estimated_Revenue": "Less than $1M", "Founded_Date": 2022}"#).unwrap(),
/// ];
/// let mut assembler = FeatureAssembler::new(2025.0);
/// assembler.fit(&population).unwrap();
/// let frame = assembler.transform(&population).unwrap();
/// assert!(frame.has_column("revenue_mapped"));
/// assert!(frame.has_column("years_active"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureAssembler {
    current_year: f64,
    ordinal: Vec<(String, OrdinalEncoder)>,
    location: FrequencyEncoder,
    industries: TfidfEncoder,
    schema: Option<FeatureSchema>,
}

impl FeatureAssembler {
    /// Creates an unfitted assembler.
    ///
    /// The reference year is fixed at construction so that tenure
    /// computation is deterministic across requests.
    #[must_use]
    pub fn new(current_year: f64) -> Self {
        Self {
            current_year,
            ordinal: Vec::new(),
            location: FrequencyEncoder::new(),
            industries: TfidfEncoder::new().with_max_features(INDUSTRY_MAX_FEATURES),
            schema: None,
        }
    }

    /// Reference year used for tenure computation.
    #[must_use]
    pub fn current_year(&self) -> f64 {
        self.current_year
    }

    /// Role → column schema, available after fitting.
    ///
    /// # Errors
    ///
    /// Returns an inference error if the assembler has not been fitted.
    pub fn schema(&self) -> Result<&FeatureSchema> {
        self.schema
            .as_ref()
            .ok_or_else(|| ViabilidadError::inference("assembler has not been fitted"))
    }

    /// Learns the categorical vocabularies from the reference population and
    /// resolves the role schema.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty population, or an inference
    /// error if a required column cannot be produced.
    pub fn fit(&mut self, population: &[OrganizationProfile]) -> Result<()> {
        if population.is_empty() {
            return Err(ViabilidadError::validation(
                "reference population is empty",
            ));
        }

        self.ordinal = CATEGORICAL_FIELDS
            .iter()
            .map(|(field, getter)| {
                let values: Vec<String> = population
                    .iter()
                    .map(|p| categorical_value(getter(p)))
                    .collect();
                let mut enc = OrdinalEncoder::new();
                enc.fit(&values);
                ((*field).to_string(), enc)
            })
            .collect();

        let locations: Vec<String> = population
            .iter()
            .map(|p| categorical_value(p.headquarters_location.as_deref()))
            .collect();
        self.location.fit(&locations);

        let industry_docs: Vec<String> =
            population.iter().map(OrganizationProfile::industries_text).collect();
        self.industries.fit(&industry_docs);

        let names = self.column_names();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        self.schema = Some(FeatureSchema::resolve(&name_refs)?);
        Ok(())
    }

    /// Column names the fitted assembler produces, in output order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = NUMERIC_FIELDS
            .iter()
            .map(|(field, _)| format!("num__{field}"))
            .collect();
        names.push("revenue_mapped".to_string());
        names.push("employees_converted".to_string());
        names.push("funding_amount_converted".to_string());
        names.push("years_active".to_string());
        for (field, _) in CATEGORICAL_FIELDS {
            names.push(format!("cat__{field}"));
        }
        names.push("freq__headquarters_location".to_string());
        for term in self.industries.feature_names() {
            names.push(format!("industries__{term}"));
        }
        names.push("growth_confidence_converted".to_string());
        names
    }

    /// Assembles a batch of profiles into a numeric feature frame.
    ///
    /// # Errors
    ///
    /// Returns an inference error if the assembler has not been fitted.
    pub fn transform(&self, profiles: &[OrganizationProfile]) -> Result<FeatureFrame> {
        if self.schema.is_none() {
            return Err(ViabilidadError::inference("assembler has not been fitted"));
        }
        let n = profiles.len();
        let mut frame = FeatureFrame::with_rows(n);

        for (field, getter) in NUMERIC_FIELDS {
            let raw: Vec<f64> = profiles.iter().map(|p| getter(p).unwrap_or(f64::NAN)).collect();
            let imputed = impute(&raw, stats::nan_median(&raw));
            frame.push_column(format!("num__{field}"), stats::standardize(&imputed))?;
        }

        let revenue: Vec<f64> = profiles
            .iter()
            .map(|p| p.estimated_revenue.as_deref().map_or(f64::NAN, normalize::parse_money))
            .collect();
        frame.push_column("revenue_mapped", stats::standardize(&impute(&revenue, 0.0)))?;

        let employees: Vec<f64> = profiles
            .iter()
            .map(|p| {
                p.number_of_employees
                    .as_deref()
                    .map_or(f64::NAN, normalize::parse_employee_range)
            })
            .collect();
        frame.push_column(
            "employees_converted",
            stats::standardize(&impute(&employees, 0.0)),
        )?;

        let funding: Vec<f64> = profiles
            .iter()
            .map(|p| {
                p.total_funding_amount
                    .as_deref()
                    .map_or(f64::NAN, normalize::parse_money)
            })
            .collect();
        let funding_imputed = impute(&funding, stats::nan_mean(&funding));
        frame.push_column(
            "funding_amount_converted",
            stats::standardize(&funding_imputed),
        )?;

        let tenure: Vec<f64> = profiles
            .iter()
            .map(|p| {
                normalize::years_active(p.founded_date.unwrap_or(f64::NAN), self.current_year)
            })
            .collect();
        let tenure_imputed = impute(&tenure, stats::nan_median(&tenure));
        frame.push_column("years_active", stats::standardize(&tenure_imputed))?;

        for (field, enc) in &self.ordinal {
            let getter = CATEGORICAL_FIELDS
                .iter()
                .find(|(f, _)| f == field)
                .map(|(_, g)| g);
            let Some(getter) = getter else { continue };
            let codes: Vec<f64> = profiles
                .iter()
                .map(|p| enc.transform(&categorical_value(getter(p))))
                .collect();
            frame.push_column(format!("cat__{field}"), codes)?;
        }

        let freqs: Vec<f64> = profiles
            .iter()
            .map(|p| {
                self.location
                    .transform(&categorical_value(p.headquarters_location.as_deref()))
            })
            .collect();
        frame.push_column("freq__headquarters_location", freqs)?;

        let industry_docs: Vec<String> =
            profiles.iter().map(OrganizationProfile::industries_text).collect();
        let projected = self.industries.transform(&industry_docs);
        for (col, term) in self.industries.feature_names().iter().enumerate() {
            let values: Vec<f64> = (0..n).map(|row| projected.get(row, col)).collect();
            frame.push_column(format!("industries__{term}"), values)?;
        }

        let confidence: Vec<f64> = profiles
            .iter()
            .map(|p| {
                p.growth_confidence
                    .as_deref()
                    .map_or(0.5, normalize::confidence_score)
            })
            .collect();
        frame.push_column(
            "growth_confidence_converted",
            stats::standardize(&confidence),
        )?;

        Ok(frame)
    }
}

/// Missing values become the "Unknown" category.
fn categorical_value(raw: Option<&str>) -> String {
    match raw {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "Unknown".to_string(),
    }
}

/// Replaces NaN entries with a fill value. A NaN fill leaves entries NaN,
/// deferring recovery to the scaler's zero-fill.
fn impute(values: &[f64], fill: f64) -> Vec<f64> {
    values
        .iter()
        .map(|v| if v.is_nan() { fill } else { *v })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(json: &str) -> OrganizationProfile {
        serde_json::from_str(json).expect("valid profile json")
    }

    fn population() -> Vec<OrganizationProfile> {
        vec![
            profile(
                r#"{"Organization_Name": "Alpha", "Industries": "Fintech, Payments",
                    "Headquarters_Location": "SF", "Estimated_Revenue": "$1M to $10M",
                    "Founded_Date": 2018, "Investment_Stage": "Seed",
                    "Number_of_Founders": 2, "Number_of_Employees": "11-50",
                    "Total_Funding_Amount": "$5M", "Growth_Confidence": "High"}"#,
            ),
            profile(
                r#"{"Organization_Name": "Beta", "Industries": "Fintech, Lending",
                    "Headquarters_Location": "SF", "Estimated_Revenue": "Less than $1M",
                    "Founded_Date": 2022, "Investment_Stage": "Series A",
                    "Number_of_Founders": 3, "Number_of_Employees": "1-10",
                    "Total_Funding_Amount": "$1M", "Growth_Confidence": "Low"}"#,
            ),
            profile(
                r#"{"Organization_Name": "Gamma", "Industries": "Robotics",
                    "Headquarters_Location": "NYC", "Estimated_Revenue": "$10M to $50M",
                    "Founded_Date": 2015, "Investment_Stage": "Series B",
                    "Number_of_Founders": 1, "Number_of_Employees": "51-100",
                    "Total_Funding_Amount": "$20M", "Growth_Confidence": "Medium"}"#,
            ),
        ]
    }

    fn fitted() -> FeatureAssembler {
        let mut assembler = FeatureAssembler::new(2025.0);
        assembler.fit(&population()).expect("fit succeeds");
        assembler
    }

    #[test]
    fn test_fit_empty_population_rejected() {
        let mut assembler = FeatureAssembler::new(2025.0);
        assert!(assembler.fit(&[]).is_err());
    }

    #[test]
    fn test_transform_before_fit_rejected() {
        let assembler = FeatureAssembler::new(2025.0);
        assert!(assembler.transform(&population()).is_err());
    }

    #[test]
    fn test_column_layout() {
        let assembler = fitted();
        let frame = assembler.transform(&population()).expect("transform");
        for name in [
            "num__number_of_founders",
            "revenue_mapped",
            "employees_converted",
            "funding_amount_converted",
            "years_active",
            "cat__investment_stage",
            "freq__headquarters_location",
            "growth_confidence_converted",
        ] {
            assert!(frame.has_column(name), "missing column {name}");
        }
        assert!(frame
            .column_names()
            .iter()
            .any(|n| n.starts_with("industries__")));
        assert_eq!(frame.n_rows(), 3);
    }

    #[test]
    fn test_scaled_columns_are_batch_relative() {
        let assembler = fitted();
        let frame = assembler.transform(&population()).expect("transform");
        let revenue = frame.column("revenue_mapped").expect("present");
        assert!((revenue.iter().sum::<f64>()).abs() < 1e-9);
        // A single-row batch always degenerates to zero.
        let single = assembler.transform(&population()[..1]).expect("transform");
        assert_eq!(single.value("revenue_mapped", 0), Some(0.0));
    }

    #[test]
    fn test_location_frequency_encoding() {
        let assembler = fitted();
        let frame = assembler.transform(&population()).expect("transform");
        let freq = frame.column("freq__headquarters_location").expect("present");
        assert!((freq[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((freq[2] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_unseen_categories_get_reserved_code() {
        let assembler = fitted();
        let stranger = profile(r#"{"Investment_Stage": "Series Z"}"#);
        let frame = assembler.transform(&[stranger]).expect("transform");
        assert_eq!(frame.value("cat__investment_stage", 0), Some(-1.0));
        assert_eq!(frame.value("freq__headquarters_location", 0), Some(0.0));
    }

    #[test]
    fn test_all_fields_missing_still_transforms() {
        let assembler = fitted();
        let empty = OrganizationProfile::default();
        let frame = assembler.transform(&[empty]).expect("transform");
        for (name, values) in frame.iter_columns() {
            assert!(
                values.iter().all(|v| v.is_finite()),
                "column {name} not finite"
            );
        }
    }

    #[test]
    fn test_schema_resolution() {
        let assembler = fitted();
        let schema = assembler.schema().expect("schema after fit");
        assert_eq!(
            schema.column(FeatureRole::Revenue).expect("bound"),
            "revenue_mapped"
        );
        assert_eq!(
            schema.column(FeatureRole::YearsActive).expect("bound"),
            "years_active"
        );
    }

    #[test]
    fn test_schema_missing_roles_listed() {
        let err = FeatureSchema::resolve(&["revenue_mapped", "years_active"])
            .expect_err("incomplete layout");
        let text = err.to_string();
        assert!(text.contains("employees"));
        assert!(text.contains("funding"));
        assert!(text.contains("growth_confidence"));
        assert!(!text.contains("revenue,"));
    }

    #[test]
    fn test_future_founding_year_recovers_via_imputation() {
        let assembler = fitted();
        let time_traveler = profile(r#"{"Founded_Date": 2030}"#);
        let mut batch = population();
        batch.push(time_traveler);
        let frame = assembler.transform(&batch).expect("transform");
        let years = frame.column("years_active").expect("present");
        assert!(years.iter().all(|v| v.is_finite()));
    }
}
