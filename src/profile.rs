//! Organization profile extraction
//!
//! Derives a normalized, read-only profile from the raw intake record:
//! industry, size band, infrastructure components, data-sensitivity
//! classification and regulatory flags. Built fresh per analysis run; every
//! derivation defaults conservatively when the intake omits a field.

use crate::intake::IntakeRecord;
use crate::{DataSensitivity, OrganizationSize};
use serde::Serialize;
use std::collections::BTreeSet;

/// Normalized organization profile for one analysis run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationProfile {
    pub industry: String,
    pub size: OrganizationSize,
    pub infrastructure_components: BTreeSet<String>,
    pub data_sensitivity: DataSensitivity,
    pub regulatory_requirements: BTreeSet<String>,
}

impl OrganizationProfile {
    /// Whether the profile reports the given infrastructure component
    pub fn has_infra_component(&self, component: &str) -> bool {
        self.infrastructure_components
            .iter()
            .any(|c| c.eq_ignore_ascii_case(component))
    }
}

/// Build the normalized profile from a raw intake record. Never fails;
/// missing answers leave the corresponding attribute at its conservative
/// default.
pub fn extract_profile(record: &IntakeRecord) -> OrganizationProfile {
    OrganizationProfile {
        industry: record.industry().to_string(),
        size: classify_size(record.employee_count.as_deref()),
        infrastructure_components: derive_infrastructure(record),
        data_sensitivity: derive_sensitivity(record),
        regulatory_requirements: collect_regulatory(record),
    }
}

/// Data-sensitivity classification, first matching rule wins
fn derive_sensitivity(record: &IntakeRecord) -> DataSensitivity {
    let industry = record.industry();
    if industry.eq_ignore_ascii_case("Healthcare") || record.has_healthcare_flags() {
        return DataSensitivity::High;
    }
    if industry.eq_ignore_ascii_case("Financial") || record.has_financial_flags() {
        return DataSensitivity::High;
    }
    if record.compliance_mentions("PCI-DSS")
        || record.compliance_mentions("PCI DSS")
        || record.compliance_mentions("GDPR")
    {
        return DataSensitivity::Medium;
    }
    DataSensitivity::Medium
}

/// Size band from the reported employee-count range string
///
/// The questionnaire offers fixed bands ("1-50", "51-250", "251-1000",
/// "1000+"). Classification keys off the largest number in the string so
/// free-form variants still land in a sensible band; anything unparseable
/// defaults to Small.
fn classify_size(employee_count: Option<&str>) -> OrganizationSize {
    let Some(raw) = employee_count else {
        return OrganizationSize::Small;
    };
    let mut max: u64 = 0;
    let mut current: u64 = 0;
    let mut in_number = false;
    for ch in raw.chars() {
        if let Some(digit) = ch.to_digit(10) {
            current = current.saturating_mul(10).saturating_add(u64::from(digit));
            in_number = true;
        } else {
            if in_number && current > max {
                max = current;
            }
            current = 0;
            in_number = false;
        }
    }
    if in_number && current > max {
        max = current;
    }
    let open_ended = raw.contains('+') || raw.contains('>');
    match max {
        0 => OrganizationSize::Small,
        _ if open_ended && max >= 1000 => OrganizationSize::Enterprise,
        1..=50 => OrganizationSize::Small,
        51..=250 => OrganizationSize::Medium,
        251..=1000 => OrganizationSize::Large,
        _ => OrganizationSize::Enterprise,
    }
}

/// Infrastructure components: normalized operation modes plus tags implied
/// by answered questionnaire sections
fn derive_infrastructure(record: &IntakeRecord) -> BTreeSet<String> {
    let mut components = BTreeSet::new();
    for mode in &record.operation_mode {
        let normalized = normalize_component(mode);
        if !normalized.is_empty() {
            components.insert(normalized);
        }
    }
    if let Some(devices) = &record.device_inventory_tracking {
        components.insert("endpoints".to_string());
        if devices
            .device_types
            .iter()
            .any(|t| t.to_ascii_lowercase().contains("mobile"))
        {
            components.insert("mobile".to_string());
        }
    }
    components
}

fn normalize_component(raw: &str) -> String {
    let lower = raw.trim().to_ascii_lowercase();
    match lower.as_str() {
        "on-premise" | "onpremise" | "on premises" | "on-prem" => "on-premises".to_string(),
        other => other.to_string(),
    }
}

fn collect_regulatory(record: &IntakeRecord) -> BTreeSet<String> {
    let c = &record.compliance_requirements;
    record
        .regulatory_requirements
        .iter()
        .chain(&c.frameworks)
        .chain(&c.standards)
        .chain(&c.compliance)
        .chain(&c.regulations)
        .chain(&c.healthcare)
        .chain(&c.financial)
        .chain(&c.industry_specific)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
