//! Mapping from raw GitHub alert payloads to the canonical model.
//!
//! Mapping is total: any raw record produces a canonical alert, with
//! fallback titles and defaulted fields where the payload is sparse.
//! Fields GitHub reports as empty strings are treated as absent, while
//! meaningful zero values (a CVSS score of `0.0`, a bypass flag of
//! `false`) are kept.

use super::models::{RawCodeScanningAlert, RawDependabotAlert, RawSecretScanningAlert};
use super::PROVIDER;
use crate::model::{
    AlertCategory, AlertDetails, AlertState, CodeScanningDetails, DependabotDetails,
    SecretScanningDetails, SecurityAlert, Severity,
};

fn normalize_severity(raw: Option<&str>) -> Severity {
    match raw.unwrap_or_default().to_lowercase().as_str() {
        "critical" => Severity::Critical,
        "high" => Severity::High,
        "medium" | "warning" => Severity::Medium,
        _ => Severity::Low,
    }
}

fn normalize_state(raw: Option<&str>) -> AlertState {
    match raw.unwrap_or_default().to_lowercase().as_str() {
        "fixed" | "resolved" | "auto_dismissed" => AlertState::Fixed,
        "dismissed" => AlertState::Dismissed,
        _ => AlertState::Open,
    }
}

/// Stable alert identity, derived from provider, repository, category, and
/// the upstream alert number.
fn alert_id(repository: &str, category: AlertCategory, number: Option<u64>) -> String {
    format!(
        "{PROVIDER}:{repository}:{}:{}",
        category.as_str(),
        number.unwrap_or(0)
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn non_empty_list<T>(values: Option<Vec<T>>) -> Option<Vec<T>> {
    values.filter(|list| !list.is_empty())
}

/// Map a raw code-scanning alert into the canonical model.
///
/// The title prefers the rule description over the rule id; severity
/// prefers `security_severity_level` over the tool-assigned severity.
pub fn map_code_scanning_alert(repository: &str, raw: RawCodeScanningAlert) -> SecurityAlert {
    let rule = raw.rule.unwrap_or_default();
    let instance = raw.most_recent_instance.unwrap_or_default();
    let location = instance.location.unwrap_or_default();

    let rule_id = non_empty(rule.id);
    let title = non_empty(rule.description)
        .or_else(|| rule_id.clone())
        .unwrap_or_else(|| "Code scanning alert".to_string());
    let severity = normalize_severity(
        non_empty(rule.security_severity_level)
            .or_else(|| non_empty(rule.severity))
            .as_deref(),
    );

    let created_at = raw.created_at.unwrap_or_default();
    let updated_at = non_empty(raw.updated_at).unwrap_or_else(|| created_at.clone());

    SecurityAlert {
        id: alert_id(repository, AlertCategory::CodeScanning, raw.number),
        category: AlertCategory::CodeScanning,
        provider: PROVIDER.to_string(),
        repository: repository.to_string(),
        title,
        description: instance.message.and_then(|message| message.text).unwrap_or_default(),
        severity,
        state: normalize_state(raw.state.as_deref()),
        html_url: raw.html_url.unwrap_or_default(),
        created_at,
        updated_at,
        fixed_at: non_empty(raw.fixed_at),
        tool: raw.tool.and_then(|tool| non_empty(tool.name)),
        target: non_empty(location.path),
        details: AlertDetails::CodeScanning(CodeScanningDetails {
            rule_id,
            rule_help: non_empty(rule.help),
            rule_tags: non_empty_list(rule.tags),
            location_start_line: location.start_line,
            location_end_line: location.end_line,
            location_start_column: location.start_column,
            location_end_column: location.end_column,
            classifications: non_empty_list(instance.classifications),
            instance_ref: non_empty(instance.git_ref),
        }),
    }
}

/// Map a raw secret-scanning alert into the canonical model.
///
/// Every exposed secret is critical regardless of upstream metadata.
pub fn map_secret_scanning_alert(repository: &str, raw: RawSecretScanningAlert) -> SecurityAlert {
    let secret_type = non_empty(raw.secret_type);
    let secret_type_display_name = non_empty(raw.secret_type_display_name);

    let title = format!(
        "Exposed secret: {}",
        secret_type_display_name
            .clone()
            .or_else(|| secret_type.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    );
    let description = format!(
        "Secret of type \"{}\" detected",
        secret_type.clone().unwrap_or_else(|| "unknown".to_string())
    );

    let created_at = raw.created_at.unwrap_or_default();
    let updated_at = non_empty(raw.updated_at).unwrap_or_else(|| created_at.clone());

    SecurityAlert {
        id: alert_id(repository, AlertCategory::SecretScanning, raw.number),
        category: AlertCategory::SecretScanning,
        provider: PROVIDER.to_string(),
        repository: repository.to_string(),
        title,
        description,
        severity: Severity::Critical,
        state: normalize_state(raw.state.as_deref()),
        html_url: raw.html_url.unwrap_or_default(),
        created_at,
        updated_at,
        fixed_at: non_empty(raw.resolved_at),
        tool: Some(AlertCategory::SecretScanning.as_str().to_string()),
        target: None,
        details: AlertDetails::SecretScanning(SecretScanningDetails {
            secret_type,
            secret_type_display_name,
            push_protection_bypassed: raw.push_protection_bypassed,
            push_protection_bypassed_by: raw
                .push_protection_bypassed_by
                .and_then(|actor| non_empty(actor.login)),
            push_protection_bypassed_at: non_empty(raw.push_protection_bypassed_at),
        }),
    }
}

/// Map a raw Dependabot alert into the canonical model.
///
/// Severity prefers the per-package vulnerability severity over the
/// advisory-wide severity; the target package likewise prefers the
/// vulnerability's package over the declared dependency's.
pub fn map_dependabot_alert(repository: &str, raw: RawDependabotAlert) -> SecurityAlert {
    let advisory = raw.security_advisory.unwrap_or_default();
    let vulnerability = raw.security_vulnerability.unwrap_or_default();
    let dependency = raw.dependency.unwrap_or_default();

    let vulnerability_package = vulnerability.package.unwrap_or_default();
    let dependency_package = dependency.package.unwrap_or_default();

    let package_name =
        non_empty(vulnerability_package.name).or_else(|| non_empty(dependency_package.name));
    let package_ecosystem = non_empty(vulnerability_package.ecosystem)
        .or_else(|| non_empty(dependency_package.ecosystem));

    let severity = normalize_severity(
        non_empty(vulnerability.severity)
            .or_else(|| non_empty(advisory.severity))
            .as_deref(),
    );
    let cvss = advisory.cvss.unwrap_or_default();

    let created_at = raw.created_at.unwrap_or_default();
    let updated_at = non_empty(raw.updated_at).unwrap_or_else(|| created_at.clone());

    SecurityAlert {
        id: alert_id(repository, AlertCategory::Dependabot, raw.number),
        category: AlertCategory::Dependabot,
        provider: PROVIDER.to_string(),
        repository: repository.to_string(),
        title: non_empty(advisory.summary).unwrap_or_else(|| "Dependabot alert".to_string()),
        description: advisory.description.unwrap_or_default(),
        severity,
        state: normalize_state(raw.state.as_deref()),
        html_url: raw.html_url.unwrap_or_default(),
        created_at,
        updated_at,
        fixed_at: non_empty(raw.fixed_at).or_else(|| non_empty(raw.auto_dismissed_at)),
        tool: Some(AlertCategory::Dependabot.as_str().to_string()),
        target: package_name.clone(),
        details: AlertDetails::Dependabot(DependabotDetails {
            cve_id: non_empty(advisory.cve_id),
            ghsa_id: non_empty(advisory.ghsa_id),
            cvss_score: cvss.score,
            cvss_vector: non_empty(cvss.vector_string),
            cwes: non_empty_list(
                advisory
                    .cwes
                    .map(|cwes| cwes.into_iter().filter_map(|cwe| cwe.cwe_id).collect()),
            ),
            advisory_references: non_empty_list(
                advisory
                    .references
                    .map(|refs| refs.into_iter().filter_map(|r| r.url).collect()),
            ),
            patched_version: vulnerability
                .first_patched_version
                .and_then(|version| non_empty(version.identifier)),
            vulnerable_version_range: non_empty(vulnerability.vulnerable_version_range),
            package_name,
            package_ecosystem,
            manifest_path: non_empty(dependency.manifest_path),
        }),
    }
}
