//! Raw GitHub security-alert payloads.
//!
//! Every field is optional: the exact shape varies by repository feature
//! flags and API version, and mapping must tolerate sparse records.

use serde::Deserialize;

/// One code-scanning alert as returned by the GitHub API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCodeScanningAlert {
    /// Upstream alert number.
    pub number: Option<u64>,
    /// Upstream lifecycle state (e.g. "open", "fixed", "dismissed").
    pub state: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub fixed_at: Option<String>,
    pub html_url: Option<String>,
    /// The rule that produced the finding.
    pub rule: Option<RawRule>,
    /// The analysis tool.
    pub tool: Option<RawTool>,
    /// The most recent occurrence of the finding.
    pub most_recent_instance: Option<RawInstance>,
}

/// Code-scanning rule metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRule {
    pub id: Option<String>,
    pub description: Option<String>,
    /// Tool-assigned severity (e.g. "warning").
    pub severity: Option<String>,
    /// Security severity (e.g. "high"); preferred over `severity`.
    pub security_severity_level: Option<String>,
    pub help: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Analysis tool metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTool {
    pub name: Option<String>,
}

/// One occurrence of a code-scanning finding.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInstance {
    pub message: Option<RawMessage>,
    pub location: Option<RawLocation>,
    pub classifications: Option<Vec<String>>,
    /// Git ref the instance was found on.
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
}

/// Finding message text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    pub text: Option<String>,
}

/// Source location of a finding.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLocation {
    pub path: Option<String>,
    pub start_line: Option<u64>,
    pub end_line: Option<u64>,
    pub start_column: Option<u64>,
    pub end_column: Option<u64>,
}

/// One secret-scanning alert as returned by the GitHub API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSecretScanningAlert {
    pub number: Option<u64>,
    pub state: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Resolution timestamp; secret alerts use this instead of `fixed_at`.
    pub resolved_at: Option<String>,
    pub html_url: Option<String>,
    pub secret_type: Option<String>,
    pub secret_type_display_name: Option<String>,
    pub push_protection_bypassed: Option<bool>,
    pub push_protection_bypassed_by: Option<RawActor>,
    pub push_protection_bypassed_at: Option<String>,
}

/// A GitHub user reference.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawActor {
    pub login: Option<String>,
}

/// One Dependabot alert as returned by the GitHub API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDependabotAlert {
    pub number: Option<u64>,
    pub state: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub fixed_at: Option<String>,
    pub auto_dismissed_at: Option<String>,
    pub html_url: Option<String>,
    /// The vulnerable dependency as declared in the repository.
    pub dependency: Option<RawDependency>,
    pub security_advisory: Option<RawAdvisory>,
    pub security_vulnerability: Option<RawVulnerability>,
}

/// Vulnerable dependency details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDependency {
    pub package: Option<RawPackage>,
    pub manifest_path: Option<String>,
}

/// Package identity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPackage {
    pub name: Option<String>,
    pub ecosystem: Option<String>,
}

/// Security advisory attached to a Dependabot alert.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAdvisory {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub cve_id: Option<String>,
    pub ghsa_id: Option<String>,
    pub cvss: Option<RawCvss>,
    pub cwes: Option<Vec<RawCwe>>,
    pub references: Option<Vec<RawReference>>,
}

/// CVSS score details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCvss {
    pub score: Option<f64>,
    pub vector_string: Option<String>,
}

/// One CWE classification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCwe {
    pub cwe_id: Option<String>,
}

/// One advisory reference.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReference {
    pub url: Option<String>,
}

/// Vulnerability details for the specific affected package.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVulnerability {
    pub severity: Option<String>,
    pub package: Option<RawPackage>,
    pub first_patched_version: Option<RawPatchedVersion>,
    pub vulnerable_version_range: Option<String>,
}

/// First patched version of a vulnerable package.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPatchedVersion {
    pub identifier: Option<String>,
}
