//! Canonical security-alert model.
//!
//! Every upstream alert shape normalizes into [`SecurityAlert`], so the
//! aggregation and KPI layers never see provider-specific records.

use serde::{Deserialize, Serialize};

/// The supported alert categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    /// Static-analysis findings (code scanning).
    CodeScanning,
    /// Leaked-credential detections (secret scanning).
    SecretScanning,
    /// Dependency vulnerabilities (Dependabot).
    Dependabot,
}

impl AlertCategory {
    /// All categories, in fetch order.
    pub const ALL: [Self; 3] = [Self::CodeScanning, Self::SecretScanning, Self::Dependabot];

    /// The wire spelling of this category.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CodeScanning => "code_scanning",
            Self::SecretScanning => "secret_scanning",
            Self::Dependabot => "dependabot",
        }
    }
}

impl std::fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized alert severity.
///
/// Unrecognized or missing upstream severities normalize to [`Severity::Low`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Normalized alert lifecycle state.
///
/// Unrecognized or missing upstream states normalize to [`AlertState::Open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertState {
    Open,
    Fixed,
    Dismissed,
}

impl std::fmt::Display for AlertState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Fixed => write!(f, "fixed"),
            Self::Dismissed => write!(f, "dismissed"),
        }
    }
}

/// One normalized security finding.
///
/// Constructed once during mapping and immutable thereafter; a later fetch
/// cycle supersedes the whole record rather than mutating it. Timestamps
/// stay as the upstream ISO-8601 strings (empty when absent) so sparse
/// payloads never fail to map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAlert {
    /// Stable identifier: `<provider>:<repository>:<category>:<number>`.
    pub id: String,
    /// Alert category.
    #[serde(rename = "type")]
    pub category: AlertCategory,
    /// Source provider tag (e.g. `github`).
    pub provider: String,
    /// Repository the alert belongs to, as `owner/name`.
    pub repository: String,
    /// Human-readable title.
    pub title: String,
    /// Longer description; empty when upstream provides none.
    pub description: String,
    /// Normalized severity.
    pub severity: Severity,
    /// Normalized lifecycle state.
    pub state: AlertState,
    /// Upstream web link.
    pub html_url: String,
    /// Creation timestamp (ISO-8601; empty when absent).
    pub created_at: String,
    /// Last-update timestamp (falls back to creation; empty when absent).
    pub updated_at: String,
    /// Fix timestamp, when the finding has been resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_at: Option<String>,
    /// Originating tool name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// Affected file path or package name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Category-specific fields, flattened on the wire.
    #[serde(flatten)]
    pub details: AlertDetails,
}

/// Category-specific alert fields.
///
/// Serialized untagged and flattened into the parent alert, so the wire
/// shape stays a flat record with optional fields per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AlertDetails {
    CodeScanning(CodeScanningDetails),
    SecretScanning(SecretScanningDetails),
    Dependabot(DependabotDetails),
}

/// Rule and source-location metadata for code-scanning alerts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeScanningDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_help: Option<String>,
    /// Rule tags; omitted when upstream reports none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_start_line: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_end_line: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_start_column: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_end_column: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifications: Option<Vec<String>>,
    /// Git ref of the most recent instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_ref: Option<String>,
}

/// Secret-type and push-protection metadata for secret-scanning alerts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretScanningDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_type_display_name: Option<String>,
    /// Whether push protection was bypassed; `false` is meaningful and kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_protection_bypassed: Option<bool>,
    /// Login of the bypassing actor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_protection_bypassed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_protection_bypassed_at: Option<String>,
}

/// Advisory and vulnerable-package metadata for Dependabot alerts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependabotDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cve_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ghsa_id: Option<String>,
    /// CVSS base score; zero is a real score and kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvss_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvss_vector: Option<String>,
    /// CWE identifiers; omitted when upstream reports none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwes: Option<Vec<String>>,
    /// Advisory reference URLs; omitted when upstream reports none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory_references: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patched_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vulnerable_version_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_ecosystem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_path: Option<String>,
}
