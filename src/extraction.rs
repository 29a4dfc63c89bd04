//! Reported-implementation extraction
//!
//! A fixed, declarative rule table maps questionnaire answers to reported
//! implementation levels. Each rule inspects the intake record and either
//! emits a level for one control or stays silent; levels are determined by
//! the rule, not copied from user-entered numbers. One interpreter loop
//! evaluates every rule, so adding a rule is a data change.

use crate::catalogue::ControlCatalogue;
use crate::intake::IntakeRecord;
use crate::SecurityDomain;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// One self-reported implementation level for a control
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedImplementation {
    pub control_id: String,
    /// 0-5 maturity level
    pub implementation_level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One extraction rule: a predicate-and-level function over the intake
/// record for a single control
pub struct ExtractionRule {
    pub domain: SecurityDomain,
    pub control_id: &'static str,
    /// Attached to the emitted implementation as its notes text
    pub basis: &'static str,
    /// Returns the rule-determined level, or `None` when the rule does not
    /// trigger for this record
    pub level: fn(&IntakeRecord) -> Option<u8>,
}

/// The extraction rule table, grouped by domain
pub fn extraction_rules() -> &'static [ExtractionRule] {
    use SecurityDomain::*;
    static RULES: &[ExtractionRule] = &[
        // Access Control
        ExtractionRule {
            domain: AccessControl,
            control_id: "AC-1",
            basis: "access control policy document reported",
            level: |r| r.has_policy("access-control").then_some(3),
        },
        ExtractionRule {
            domain: AccessControl,
            control_id: "AC-2",
            basis: "access control model reported",
            level: |r| match r.access_control_model() {
                Some(model)
                    if model.eq_ignore_ascii_case("rbac")
                        || model.eq_ignore_ascii_case("abac") =>
                {
                    Some(4)
                }
                Some(_) => Some(2),
                None => None,
            },
        },
        ExtractionRule {
            domain: AccessControl,
            control_id: "AC-3",
            basis: "access review cadence reported",
            level: |r| match r.access_review_frequency() {
                Some(freq)
                    if freq.eq_ignore_ascii_case("quarterly")
                        || freq.eq_ignore_ascii_case("monthly") =>
                {
                    Some(4)
                }
                Some(_) => Some(3),
                None => None,
            },
        },
        ExtractionRule {
            domain: AccessControl,
            control_id: "AC-4",
            basis: "privileged account inventory answer",
            level: |r| r.privileged_account_inventory().map(|has| if has { 4 } else { 1 }),
        },
        ExtractionRule {
            domain: AccessControl,
            control_id: "AC-5",
            basis: "physical security policy reported",
            level: |r| r.has_policy("physical-security").then_some(3),
        },
        // Data Protection
        ExtractionRule {
            domain: DataProtection,
            control_id: "DP-1",
            basis: "encryption listed as a security measure",
            level: |r| r.has_security_measure("encryption").then_some(3),
        },
        ExtractionRule {
            domain: DataProtection,
            control_id: "DP-2",
            basis: "device encryption status",
            level: |r| {
                if r.device_encryption_contains("full-disk-encryption") {
                    Some(4)
                } else if r.has_device_inventory() {
                    Some(2)
                } else {
                    None
                }
            },
        },
        ExtractionRule {
            domain: DataProtection,
            control_id: "DP-3",
            basis: "data classification policy reported",
            level: |r| r.has_policy("data-classification").then_some(3),
        },
        ExtractionRule {
            domain: DataProtection,
            control_id: "DP-4",
            basis: "PCI-DSS listed among compliance requirements",
            level: |r| {
                (r.compliance_mentions("PCI-DSS") || r.compliance_mentions("PCI DSS"))
                    .then_some(3)
            },
        },
        ExtractionRule {
            domain: DataProtection,
            control_id: "DP-5",
            basis: "healthcare compliance program reported",
            level: |r| r.has_healthcare_flags().then_some(3),
        },
        // Identity & Access Management
        ExtractionRule {
            domain: IdentityAndAccess,
            control_id: "IAM-1",
            basis: "MFA status answer",
            level: |r| r.mfa_status().map(|on| if on { 4 } else { 1 }),
        },
        ExtractionRule {
            domain: IdentityAndAccess,
            control_id: "IAM-2",
            basis: "identity lifecycle implied by access model answer",
            level: |r| r.access_control_model().map(|_| 3),
        },
        ExtractionRule {
            domain: IdentityAndAccess,
            control_id: "IAM-3",
            basis: "SSO status answer",
            level: |r| {
                if r.sso_in_use() == Some(true) || r.has_security_measure("single-sign-on") {
                    Some(4)
                } else if r.sso_in_use() == Some(false) {
                    Some(1)
                } else {
                    None
                }
            },
        },
        ExtractionRule {
            domain: IdentityAndAccess,
            control_id: "IAM-4",
            basis: "password policy document reported",
            level: |r| r.has_policy("password-policy").then_some(3),
        },
        // Network Security
        ExtractionRule {
            domain: NetworkSecurity,
            control_id: "NS-1",
            basis: "firewall reported active or listed as a measure",
            level: |r| {
                if r.device_firewall_active() || r.has_security_measure("firewall") {
                    Some(3)
                } else if r.has_device_inventory() {
                    // Section answered, firewall not active
                    Some(1)
                } else {
                    None
                }
            },
        },
        ExtractionRule {
            domain: NetworkSecurity,
            control_id: "NS-2",
            basis: "network segmentation listed as a measure",
            level: |r| r.has_security_measure("network-segmentation").then_some(4),
        },
        ExtractionRule {
            domain: NetworkSecurity,
            control_id: "NS-3",
            basis: "intrusion detection listed as a measure",
            level: |r| r.has_security_measure("intrusion-detection").then_some(4),
        },
        ExtractionRule {
            domain: NetworkSecurity,
            control_id: "NS-4",
            basis: "cloud security controls listed as a measure",
            level: |r| r.has_security_measure("cloud-security").then_some(3),
        },
        ExtractionRule {
            domain: NetworkSecurity,
            control_id: "NS-5",
            basis: "VPN listed as a measure",
            level: |r| r.has_security_measure("vpn").then_some(3),
        },
        // Endpoint Security
        ExtractionRule {
            domain: EndpointSecurity,
            control_id: "ES-1",
            basis: "endpoint protection tooling listed as a measure",
            level: |r| {
                if r.has_security_measure("edr") {
                    Some(4)
                } else if r.has_security_measure("antivirus") {
                    Some(2)
                } else {
                    None
                }
            },
        },
        ExtractionRule {
            domain: EndpointSecurity,
            control_id: "ES-2",
            basis: "device inventory section answered",
            level: |r| r.has_device_inventory().then_some(3),
        },
        ExtractionRule {
            domain: EndpointSecurity,
            control_id: "ES-3",
            basis: "patch management listed as a measure",
            level: |r| r.has_security_measure("patch-management").then_some(3),
        },
        ExtractionRule {
            domain: EndpointSecurity,
            control_id: "ES-4",
            basis: "mobile device management listed as a measure",
            level: |r| r.has_security_measure("mobile-device-management").then_some(3),
        },
        // Application Security
        ExtractionRule {
            domain: ApplicationSecurity,
            control_id: "AS-1",
            basis: "secure development process reported",
            level: |r| r.has_isms_process("secure-development").then_some(3),
        },
        ExtractionRule {
            domain: ApplicationSecurity,
            control_id: "AS-2",
            basis: "vulnerability scanning assessment reported",
            level: |r| r.has_assessment("vulnerability-scan").then_some(3),
        },
        ExtractionRule {
            domain: ApplicationSecurity,
            control_id: "AS-3",
            basis: "penetration test reported",
            level: |r| r.has_assessment("penetration-test").then_some(3),
        },
        ExtractionRule {
            domain: ApplicationSecurity,
            control_id: "AS-4",
            basis: "web application firewall listed as a measure",
            level: |r| r.has_security_measure("web-application-firewall").then_some(4),
        },
        // Incident Response
        ExtractionRule {
            domain: IncidentResponse,
            control_id: "IR-1",
            basis: "incident response plan document reported",
            level: |r| {
                (r.has_procedure("incident-response") || r.has_policy("incident-response"))
                    .then_some(3)
            },
        },
        ExtractionRule {
            domain: IncidentResponse,
            control_id: "IR-2",
            basis: "security monitoring tooling listed as a measure",
            level: |r| {
                if r.has_security_measure("siem") {
                    Some(4)
                } else if r.has_security_measure("log-monitoring") {
                    Some(3)
                } else {
                    None
                }
            },
        },
        ExtractionRule {
            domain: IncidentResponse,
            control_id: "IR-3",
            basis: "incident drills process reported",
            level: |r| r.has_isms_process("incident-drills").then_some(3),
        },
        // Business Continuity
        ExtractionRule {
            domain: BusinessContinuity,
            control_id: "BC-1",
            basis: "backups listed as a measure",
            level: |r| {
                (r.has_security_measure("backups") || r.has_security_measure("backup"))
                    .then_some(3)
            },
        },
        ExtractionRule {
            domain: BusinessContinuity,
            control_id: "BC-2",
            basis: "disaster recovery procedure reported",
            level: |r| r.has_procedure("disaster-recovery").then_some(3),
        },
        ExtractionRule {
            domain: BusinessContinuity,
            control_id: "BC-3",
            basis: "recovery testing process reported",
            level: |r| r.has_isms_process("recovery-testing").then_some(3),
        },
        // Security Awareness
        ExtractionRule {
            domain: SecurityAwareness,
            control_id: "SA-1",
            basis: "awareness training process reported",
            level: |r| r.has_isms_process("awareness-training").then_some(3),
        },
        ExtractionRule {
            domain: SecurityAwareness,
            control_id: "SA-2",
            basis: "phishing simulation listed as a measure",
            level: |r| r.has_security_measure("phishing-simulation").then_some(3),
        },
        ExtractionRule {
            domain: SecurityAwareness,
            control_id: "SA-3",
            basis: "role-specific training process reported",
            level: |r| r.has_isms_process("role-specific-training").then_some(2),
        },
        // Vendor Risk
        ExtractionRule {
            domain: VendorRisk,
            control_id: "VR-1",
            basis: "vendor assessment procedure reported",
            level: |r| r.has_procedure("vendor-assessment").then_some(3),
        },
        ExtractionRule {
            domain: VendorRisk,
            control_id: "VR-2",
            basis: "vendor management policy reported",
            level: |r| r.has_policy("vendor-management").then_some(2),
        },
        ExtractionRule {
            domain: VendorRisk,
            control_id: "VR-3",
            basis: "vendor inventory procedure reported",
            level: |r| r.has_procedure("vendor-inventory").then_some(3),
        },
        // Governance
        ExtractionRule {
            domain: Governance,
            control_id: "GOV-1",
            basis: "executive support answer",
            level: |r| {
                if r.executive_support() {
                    Some(4)
                } else if r.isms_leadership.is_some() {
                    Some(2)
                } else {
                    None
                }
            },
        },
        ExtractionRule {
            domain: Governance,
            control_id: "GOV-2",
            basis: "ISMS processes reported",
            level: |r| (!r.isms_processes.is_empty()).then_some(3),
        },
        ExtractionRule {
            domain: Governance,
            control_id: "GOV-3",
            basis: "risk assessment reported",
            level: |r| r.has_assessment("risk-assessment").then_some(3),
        },
        ExtractionRule {
            domain: Governance,
            control_id: "GOV-4",
            basis: "regulatory obligations identified",
            level: |r| {
                (!r.regulatory_requirements.is_empty()
                    || !r.compliance_requirements.frameworks.is_empty()
                    || !r.compliance_requirements.regulations.is_empty())
                .then_some(3)
            },
        },
        ExtractionRule {
            domain: Governance,
            control_id: "GOV-5",
            basis: "policy documents reported",
            level: |r| (!r.policy_documents.policies.is_empty()).then_some(3),
        },
    ];
    RULES
}

/// Evaluate every extraction rule against one intake record
///
/// Emits at most one implementation per control; a control whose rules stay
/// silent is simply absent (scored as level 0 downstream).
pub fn extract_implementations(record: &IntakeRecord) -> Vec<ReportedImplementation> {
    let mut seen = HashSet::new();
    let mut implementations = Vec::new();
    for rule in extraction_rules() {
        if let Some(level) = (rule.level)(record) {
            if seen.insert(rule.control_id) {
                implementations.push(ReportedImplementation {
                    control_id: rule.control_id.to_string(),
                    implementation_level: level.min(5),
                    notes: Some(rule.basis.to_string()),
                });
            }
        }
    }
    implementations
}

/// Catalogue domains with no extraction rule at all
///
/// Such domains still score (all their controls become gaps); they are
/// reported here so the caller can log them rather than silently produce a
/// zero section.
pub fn unmapped_domains(catalogue: &ControlCatalogue) -> Vec<SecurityDomain> {
    let covered: HashSet<SecurityDomain> =
        extraction_rules().iter().map(|rule| rule.domain).collect();
    catalogue
        .domains()
        .filter(|domain| !covered.contains(domain))
        .collect()
}

/// Log unmapped domains; absorbed, never an error
pub fn warn_unmapped(catalogue: &ControlCatalogue) {
    for domain in unmapped_domains(catalogue) {
        warn!(%domain, "no extraction rule for catalogue domain, scoring as all gaps");
    }
}
