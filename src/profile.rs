//! Raw organization profile as supplied by the caller.
//!
//! Every attribute is optional: missing fields propagate as "unknown"
//! through the normalizers rather than failing. Attribute names are
//! accepted in both underscore and space-separated forms.

use serde::{Deserialize, Serialize};

/// Mapping between the space-separated and underscore attribute-name
/// conventions. Both forms are accepted on input; this table is the public
/// contract for callers that need to canonicalize keys themselves.
pub const FIELD_NAME_FORMS: &[(&str, &str)] = &[
    ("Organization Name", "Organization_Name"),
    ("Industries", "Industries"),
    ("Headquarters Location", "Headquarters_Location"),
    ("Estimated Revenue", "Estimated_Revenue"),
    ("Founded Date", "Founded_Date"),
    ("Investment Stage", "Investment_Stage"),
    ("Industry Groups", "Industry_Groups"),
    ("Number of Founders", "Number_of_Founders"),
    ("Founders", "Founders"),
    ("Number of Employees", "Number_of_Employees"),
    ("Number of Funding Rounds", "Number_of_Funding_Rounds"),
    ("Funding Status", "Funding_Status"),
    ("Total Funding Amount", "Total_Funding_Amount"),
    ("Growth Category", "Growth_Category"),
    ("Growth Confidence", "Growth_Confidence"),
    ("Monthly visit", "Monthly_visit"),
    ("Visit Duration Growth", "Visit_Duration_Growth"),
    ("Patents Granted", "Patents_Granted"),
    ("Visit Duration", "Visit_Duration"),
];

/// Returns the underscore form of an attribute name, if it is part of the
/// public contract (either form is accepted as input).
#[must_use]
pub fn canonical_field_name(name: &str) -> Option<&'static str> {
    FIELD_NAME_FORMS
        .iter()
        .find(|(spaced, underscored)| *spaced == name || *underscored == name)
        .map(|(_, underscored)| *underscored)
}

/// Self-reported organization attributes.
///
/// # Examples
///
/// ```
/// use viabilidad::profile::OrganizationProfile;
///
/// let json = r#"{
///     "Organization_Name": "StartupX",
///     "Estimated Revenue": "$1M to $10M",
///     "Founded_Date": 2020
/// }"#;
/// let profile: OrganizationProfile = serde_json::from_str(json).expect("both name forms parse");
/// assert_eq!(profile.estimated_revenue.as_deref(), Some("$1M to $10M"));
/// assert!(!profile.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct OrganizationProfile {
    /// Identity key. Not guaranteed unique across the reference population;
    /// collisions are distinct rows, never merged.
    #[serde(rename = "Organization_Name", alias = "Organization Name", default)]
    pub organization_name: Option<String>,

    /// Comma-separated industry tags.
    #[serde(rename = "Industries", default)]
    pub industries: Option<String>,

    #[serde(
        rename = "Headquarters_Location",
        alias = "Headquarters Location",
        default
    )]
    pub headquarters_location: Option<String>,

    /// Free-text revenue range, e.g. `"$1M to $10M"`.
    #[serde(rename = "Estimated_Revenue", alias = "Estimated Revenue", default)]
    pub estimated_revenue: Option<String>,

    /// Founding year.
    #[serde(rename = "Founded_Date", alias = "Founded Date", default)]
    pub founded_date: Option<f64>,

    #[serde(rename = "Investment_Stage", alias = "Investment Stage", default)]
    pub investment_stage: Option<String>,

    #[serde(rename = "Industry_Groups", alias = "Industry Groups", default)]
    pub industry_groups: Option<String>,

    #[serde(rename = "Number_of_Founders", alias = "Number of Founders", default)]
    pub number_of_founders: Option<f64>,

    #[serde(rename = "Founders", default)]
    pub founders: Option<String>,

    /// Free-text employee range, e.g. `"11-50"` or `"1000+"`.
    #[serde(rename = "Number_of_Employees", alias = "Number of Employees", default)]
    pub number_of_employees: Option<String>,

    #[serde(
        rename = "Number_of_Funding_Rounds",
        alias = "Number of Funding Rounds",
        default
    )]
    pub number_of_funding_rounds: Option<f64>,

    #[serde(rename = "Funding_Status", alias = "Funding Status", default)]
    pub funding_status: Option<String>,

    /// Free-text funding range, same grammar as revenue.
    #[serde(
        rename = "Total_Funding_Amount",
        alias = "Total Funding Amount",
        default
    )]
    pub total_funding_amount: Option<String>,

    #[serde(rename = "Growth_Category", alias = "Growth Category", default)]
    pub growth_category: Option<String>,

    /// Qualitative label: low / medium / high.
    #[serde(rename = "Growth_Confidence", alias = "Growth Confidence", default)]
    pub growth_confidence: Option<String>,

    #[serde(rename = "Monthly_visit", alias = "Monthly visit", default)]
    pub monthly_visit: Option<f64>,

    #[serde(
        rename = "Visit_Duration_Growth",
        alias = "Visit Duration Growth",
        default
    )]
    pub visit_duration_growth: Option<f64>,

    #[serde(rename = "Patents_Granted", alias = "Patents Granted", default)]
    pub patents_granted: Option<f64>,

    #[serde(rename = "Visit_Duration", alias = "Visit Duration", default)]
    pub visit_duration: Option<f64>,
}

impl OrganizationProfile {
    /// True when no attribute at all was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.organization_name.is_none()
            && self.industries.is_none()
            && self.headquarters_location.is_none()
            && self.estimated_revenue.is_none()
            && self.founded_date.is_none()
            && self.investment_stage.is_none()
            && self.industry_groups.is_none()
            && self.number_of_founders.is_none()
            && self.founders.is_none()
            && self.number_of_employees.is_none()
            && self.number_of_funding_rounds.is_none()
            && self.funding_status.is_none()
            && self.total_funding_amount.is_none()
            && self.growth_category.is_none()
            && self.growth_confidence.is_none()
            && self.monthly_visit.is_none()
            && self.visit_duration_growth.is_none()
            && self.patents_granted.is_none()
            && self.visit_duration.is_none()
    }

    /// Display name, falling back to "Unknown" for anonymous rows.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.organization_name.as_deref().unwrap_or("Unknown")
    }

    /// Industry tags normalized for text encoding: comma separators become
    /// spaces, missing values become the "Unknown" category.
    #[must_use]
    pub fn industries_text(&self) -> String {
        match &self.industries {
            Some(text) if !crate::normalize::is_placeholder(text) => text
                .split(',')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(" "),
            _ => "Unknown".to_string(),
        }
    }
}
