//! Expert control catalogue
//!
//! A static, versioned table of control requirements. Each entry states the
//! maturity level an organization is expected to reach for one control,
//! optionally scoped to specific industries or infrastructure components.
//! The catalogue is pure data: it is loaded and validated once, then read
//! concurrently by analysis runs without mutation.

use crate::{EngineError, EngineResult, SecurityDomain};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A single expert-defined control requirement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlRequirement {
    pub control_id: String,
    pub name: String,
    pub description: String,
    pub domain: SecurityDomain,
    /// Target maturity level, 0-5
    pub expected_level: u8,
    /// Industries this control applies to; empty = applies to all
    #[serde(default)]
    pub applicable_industries: Vec<String>,
    /// Infrastructure components this control applies to; empty = applies to all
    #[serde(default)]
    pub applicable_infra_components: Vec<String>,
}

impl ControlRequirement {
    fn new(
        control_id: &str,
        name: &str,
        description: &str,
        domain: SecurityDomain,
        expected_level: u8,
    ) -> Self {
        Self {
            control_id: control_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            domain,
            expected_level,
            applicable_industries: Vec::new(),
            applicable_infra_components: Vec::new(),
        }
    }

    fn industries(mut self, industries: &[&str]) -> Self {
        self.applicable_industries = industries.iter().map(|s| s.to_string()).collect();
        self
    }

    fn infra(mut self, components: &[&str]) -> Self {
        self.applicable_infra_components = components.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// Shape of one catalogue entry in configuration JSON, where the domain is
/// carried by the enclosing map key rather than the entry itself
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequirement {
    control_id: String,
    name: String,
    description: String,
    expected_level: u8,
    #[serde(default)]
    applicable_industries: Vec<String>,
    #[serde(default)]
    applicable_infra_components: Vec<String>,
}

/// The validated control catalogue, keyed by domain
#[derive(Debug, Clone)]
pub struct ControlCatalogue {
    by_domain: BTreeMap<SecurityDomain, Vec<ControlRequirement>>,
}

impl ControlCatalogue {
    /// Build a catalogue from per-domain requirement lists, validating that
    /// control ids are unique within each domain and expected levels are in
    /// range. Fails fast on configuration defects.
    pub fn new(
        by_domain: BTreeMap<SecurityDomain, Vec<ControlRequirement>>,
    ) -> EngineResult<Self> {
        for (domain, requirements) in &by_domain {
            let mut seen = HashSet::new();
            for req in requirements {
                if req.expected_level > 5 {
                    return Err(EngineError::InvalidExpectedLevel {
                        control_id: req.control_id.clone(),
                        level: req.expected_level,
                    });
                }
                if !seen.insert(req.control_id.as_str()) {
                    return Err(EngineError::DuplicateControl {
                        domain: *domain,
                        control_id: req.control_id.clone(),
                    });
                }
            }
        }
        Ok(Self { by_domain })
    }

    /// Load a catalogue from configuration JSON: a mapping from domain name
    /// to an array of requirement entries.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let raw: BTreeMap<String, Vec<RawRequirement>> = serde_json::from_str(json)?;
        let mut by_domain = BTreeMap::new();
        for (key, entries) in raw {
            let domain =
                SecurityDomain::parse(&key).ok_or_else(|| EngineError::UnknownDomain {
                    table: "control catalogue".to_string(),
                    domain: key.clone(),
                })?;
            let requirements = entries
                .into_iter()
                .map(|e| ControlRequirement {
                    control_id: e.control_id,
                    name: e.name,
                    description: e.description,
                    domain,
                    expected_level: e.expected_level,
                    applicable_industries: e.applicable_industries,
                    applicable_infra_components: e.applicable_infra_components,
                })
                .collect();
            by_domain.insert(domain, requirements);
        }
        Self::new(by_domain)
    }

    /// Requirements defined for one domain (empty slice if none)
    pub fn controls_for(&self, domain: SecurityDomain) -> &[ControlRequirement] {
        self.by_domain.get(&domain).map_or(&[], Vec::as_slice)
    }

    /// Domains present in the catalogue, in scoring order
    pub fn domains(&self) -> impl Iterator<Item = SecurityDomain> + '_ {
        self.by_domain.keys().copied()
    }

    /// Total number of controls across all domains
    pub fn total_controls(&self) -> usize {
        self.by_domain.values().map(Vec::len).sum()
    }

    /// The built-in expert catalogue
    ///
    /// One entry per control the assessment questionnaire can speak to.
    /// Infallible: the table below satisfies the `new` invariants and a
    /// debug assertion in tests keeps it that way.
    pub fn expert_defaults() -> Self {
        let mut by_domain = BTreeMap::new();
        by_domain.insert(SecurityDomain::AccessControl, access_control_requirements());
        by_domain.insert(SecurityDomain::DataProtection, data_protection_requirements());
        by_domain.insert(
            SecurityDomain::IdentityAndAccess,
            identity_and_access_requirements(),
        );
        by_domain.insert(
            SecurityDomain::NetworkSecurity,
            network_security_requirements(),
        );
        by_domain.insert(
            SecurityDomain::EndpointSecurity,
            endpoint_security_requirements(),
        );
        by_domain.insert(
            SecurityDomain::ApplicationSecurity,
            application_security_requirements(),
        );
        by_domain.insert(
            SecurityDomain::IncidentResponse,
            incident_response_requirements(),
        );
        by_domain.insert(
            SecurityDomain::BusinessContinuity,
            business_continuity_requirements(),
        );
        by_domain.insert(
            SecurityDomain::SecurityAwareness,
            security_awareness_requirements(),
        );
        by_domain.insert(SecurityDomain::VendorRisk, vendor_risk_requirements());
        by_domain.insert(SecurityDomain::Governance, governance_requirements());
        Self { by_domain }
    }
}

fn access_control_requirements() -> Vec<ControlRequirement> {
    use SecurityDomain::AccessControl;
    vec![
        ControlRequirement::new(
            "AC-1",
            "Access Control Policy",
            "A documented access control policy defines who may access which systems and data, and is reviewed at least annually.",
            AccessControl,
            3,
        ),
        ControlRequirement::new(
            "AC-2",
            "Role-Based Access",
            "Access is granted through defined roles following least privilege; standing broad grants are not used.",
            AccessControl,
            4,
        ),
        ControlRequirement::new(
            "AC-3",
            "Periodic Access Reviews",
            "User entitlements are reviewed on a recurring schedule and stale access is revoked.",
            AccessControl,
            4,
        ),
        ControlRequirement::new(
            "AC-4",
            "Privileged Account Management",
            "Privileged accounts are inventoried, separated from daily-use accounts, and monitored.",
            AccessControl,
            4,
        ),
        ControlRequirement::new(
            "AC-5",
            "Physical Access Control",
            "Physical access to offices and server rooms is restricted and logged.",
            AccessControl,
            3,
        )
        .infra(&["on-premises", "hybrid"]),
    ]
}

fn data_protection_requirements() -> Vec<ControlRequirement> {
    use SecurityDomain::DataProtection;
    vec![
        ControlRequirement::new(
            "DP-1",
            "Encryption at Rest",
            "Sensitive data stores are encrypted at rest with managed keys.",
            DataProtection,
            3,
        ),
        ControlRequirement::new(
            "DP-2",
            "Device Encryption",
            "Managed laptops and workstations use full-disk encryption.",
            DataProtection,
            4,
        ),
        ControlRequirement::new(
            "DP-3",
            "Data Classification",
            "Data is classified by sensitivity and handling rules are defined per class.",
            DataProtection,
            3,
        ),
        ControlRequirement::new(
            "DP-4",
            "Cardholder Data Isolation",
            "Payment card data is segmented from the rest of the environment and access to it is tightly scoped.",
            DataProtection,
            4,
        )
        .industries(&["Financial", "Retail"]),
        ControlRequirement::new(
            "DP-5",
            "Health Data Safeguards",
            "Protected health information is safeguarded with technical controls meeting HIPAA Security Rule expectations.",
            DataProtection,
            5,
        )
        .industries(&["Healthcare"]),
    ]
}

fn identity_and_access_requirements() -> Vec<ControlRequirement> {
    use SecurityDomain::IdentityAndAccess;
    vec![
        ControlRequirement::new(
            "IAM-1",
            "Multi-Factor Authentication",
            "MFA is enforced for all user and administrator authentication.",
            IdentityAndAccess,
            4,
        ),
        ControlRequirement::new(
            "IAM-2",
            "Identity Lifecycle Management",
            "Joiner, mover and leaver events provision and deprovision access promptly.",
            IdentityAndAccess,
            3,
        ),
        ControlRequirement::new(
            "IAM-3",
            "Single Sign-On",
            "Applications authenticate through a central identity provider rather than local credentials.",
            IdentityAndAccess,
            3,
        ),
        ControlRequirement::new(
            "IAM-4",
            "Credential Hygiene",
            "Password policy, secret rotation and leaked-credential monitoring are in place.",
            IdentityAndAccess,
            3,
        ),
    ]
}

fn network_security_requirements() -> Vec<ControlRequirement> {
    use SecurityDomain::NetworkSecurity;
    vec![
        ControlRequirement::new(
            "NS-1",
            "Perimeter Firewall",
            "Ingress and egress traffic passes through maintained firewall rules.",
            NetworkSecurity,
            3,
        ),
        ControlRequirement::new(
            "NS-2",
            "Network Segmentation",
            "The network is segmented so that a compromise in one zone does not expose others.",
            NetworkSecurity,
            4,
        ),
        ControlRequirement::new(
            "NS-3",
            "Intrusion Detection",
            "Network traffic is monitored for intrusion attempts with alerting.",
            NetworkSecurity,
            4,
        ),
        ControlRequirement::new(
            "NS-4",
            "Cloud Network Controls",
            "Cloud workloads are protected by security groups and private networking by default.",
            NetworkSecurity,
            4,
        )
        .infra(&["cloud", "hybrid"]),
        ControlRequirement::new(
            "NS-5",
            "Secure Remote Access",
            "Remote access uses authenticated, encrypted channels; no direct exposure of internal services.",
            NetworkSecurity,
            4,
        )
        .infra(&["remote", "hybrid"]),
    ]
}

fn endpoint_security_requirements() -> Vec<ControlRequirement> {
    use SecurityDomain::EndpointSecurity;
    vec![
        ControlRequirement::new(
            "ES-1",
            "Endpoint Protection",
            "Endpoints run managed anti-malware or EDR tooling with central visibility.",
            EndpointSecurity,
            4,
        ),
        ControlRequirement::new(
            "ES-2",
            "Device Inventory",
            "All devices that touch company data are inventoried and attributable to an owner.",
            EndpointSecurity,
            3,
        ),
        ControlRequirement::new(
            "ES-3",
            "Patch Management",
            "Operating systems and applications are patched on a defined cadence with exception tracking.",
            EndpointSecurity,
            4,
        ),
        ControlRequirement::new(
            "ES-4",
            "Mobile Device Management",
            "Mobile and remote devices are enrolled in management tooling enforcing baseline policy.",
            EndpointSecurity,
            3,
        )
        .infra(&["mobile", "remote"]),
    ]
}

fn application_security_requirements() -> Vec<ControlRequirement> {
    use SecurityDomain::ApplicationSecurity;
    vec![
        ControlRequirement::new(
            "AS-1",
            "Secure Development Lifecycle",
            "Security activities (review, testing, dependency checks) are built into the development process.",
            ApplicationSecurity,
            3,
        ),
        ControlRequirement::new(
            "AS-2",
            "Vulnerability Management",
            "Vulnerabilities are discovered by scanning, triaged by severity, and remediated within defined SLAs.",
            ApplicationSecurity,
            4,
        ),
        ControlRequirement::new(
            "AS-3",
            "Penetration Testing",
            "Independent penetration tests exercise externally reachable systems at least annually.",
            ApplicationSecurity,
            3,
        ),
        ControlRequirement::new(
            "AS-4",
            "Web Application Protection",
            "Public web applications are protected against common attack classes (OWASP Top 10).",
            ApplicationSecurity,
            4,
        )
        .infra(&["web", "cloud"]),
    ]
}

fn incident_response_requirements() -> Vec<ControlRequirement> {
    use SecurityDomain::IncidentResponse;
    vec![
        ControlRequirement::new(
            "IR-1",
            "Incident Response Plan",
            "A documented plan assigns roles, escalation paths and communication steps for security incidents.",
            IncidentResponse,
            3,
        ),
        ControlRequirement::new(
            "IR-2",
            "Security Monitoring",
            "Security-relevant logs are collected centrally and reviewed for anomalies.",
            IncidentResponse,
            4,
        ),
        ControlRequirement::new(
            "IR-3",
            "Incident Response Exercises",
            "The response plan is exercised through tabletop or live drills.",
            IncidentResponse,
            3,
        ),
    ]
}

fn business_continuity_requirements() -> Vec<ControlRequirement> {
    use SecurityDomain::BusinessContinuity;
    vec![
        ControlRequirement::new(
            "BC-1",
            "Data Backups",
            "Critical data is backed up on a schedule, with at least one copy isolated from production credentials.",
            BusinessContinuity,
            4,
        ),
        ControlRequirement::new(
            "BC-2",
            "Disaster Recovery Plan",
            "Recovery objectives and procedures are documented for critical systems.",
            BusinessContinuity,
            3,
        ),
        ControlRequirement::new(
            "BC-3",
            "Recovery Testing",
            "Backups and recovery procedures are tested by restoring for real.",
            BusinessContinuity,
            3,
        ),
    ]
}

fn security_awareness_requirements() -> Vec<ControlRequirement> {
    use SecurityDomain::SecurityAwareness;
    vec![
        ControlRequirement::new(
            "SA-1",
            "Awareness Training",
            "All staff complete security awareness training at onboarding and annually thereafter.",
            SecurityAwareness,
            3,
        ),
        ControlRequirement::new(
            "SA-2",
            "Phishing Simulation",
            "Simulated phishing campaigns measure and improve staff resilience.",
            SecurityAwareness,
            3,
        ),
        ControlRequirement::new(
            "SA-3",
            "Role-Specific Training",
            "Staff in high-risk roles (engineering, finance, support) receive targeted training.",
            SecurityAwareness,
            2,
        ),
    ]
}

fn vendor_risk_requirements() -> Vec<ControlRequirement> {
    use SecurityDomain::VendorRisk;
    vec![
        ControlRequirement::new(
            "VR-1",
            "Vendor Security Assessment",
            "Vendors handling company data are assessed for security posture before onboarding.",
            VendorRisk,
            3,
        ),
        ControlRequirement::new(
            "VR-2",
            "Vendor Contract Clauses",
            "Contracts with data-handling vendors include security and breach-notification obligations.",
            VendorRisk,
            2,
        ),
        ControlRequirement::new(
            "VR-3",
            "Vendor Inventory",
            "Third parties with access to systems or data are inventoried with their access scope.",
            VendorRisk,
            3,
        ),
    ]
}

fn governance_requirements() -> Vec<ControlRequirement> {
    use SecurityDomain::Governance;
    vec![
        ControlRequirement::new(
            "GOV-1",
            "Executive Sponsorship",
            "Security has a named executive owner and standing leadership visibility.",
            Governance,
            3,
        ),
        ControlRequirement::new(
            "GOV-2",
            "ISMS Processes",
            "Information security management processes run on a defined cycle (plan, operate, review, improve).",
            Governance,
            3,
        ),
        ControlRequirement::new(
            "GOV-3",
            "Risk Assessment Program",
            "Security risks are formally identified, rated and tracked to treatment.",
            Governance,
            4,
        ),
        ControlRequirement::new(
            "GOV-4",
            "Compliance Obligation Mapping",
            "Applicable regulatory and contractual obligations are identified and mapped to controls.",
            Governance,
            3,
        ),
        ControlRequirement::new(
            "GOV-5",
            "Security Policy Framework",
            "A maintained set of security policies and procedures covers the organization's operations.",
            Governance,
            3,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expert_defaults_are_valid() {
        let catalogue = ControlCatalogue::expert_defaults();
        // Re-run the constructor validation over the built-in table
        assert!(ControlCatalogue::new(catalogue.by_domain.clone()).is_ok());
        assert!(catalogue.total_controls() > 40);
    }

    #[test]
    fn test_every_domain_has_controls() {
        let catalogue = ControlCatalogue::expert_defaults();
        for domain in SecurityDomain::all() {
            assert!(
                !catalogue.controls_for(*domain).is_empty(),
                "domain {domain:?} has no controls"
            );
        }
    }

    #[test]
    fn test_duplicate_control_id_rejected() {
        let mut by_domain = BTreeMap::new();
        by_domain.insert(
            SecurityDomain::AccessControl,
            vec![
                ControlRequirement::new("AC-1", "A", "a", SecurityDomain::AccessControl, 3),
                ControlRequirement::new("AC-1", "B", "b", SecurityDomain::AccessControl, 4),
            ],
        );
        let err = ControlCatalogue::new(by_domain).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateControl { .. }));
    }

    #[test]
    fn test_expected_level_out_of_range_rejected() {
        let mut by_domain = BTreeMap::new();
        by_domain.insert(
            SecurityDomain::Governance,
            vec![ControlRequirement::new(
                "GOV-9",
                "Bad",
                "bad",
                SecurityDomain::Governance,
                6,
            )],
        );
        let err = ControlCatalogue::new(by_domain).unwrap_err();
        assert!(matches!(err, EngineError::InvalidExpectedLevel { level: 6, .. }));
    }

    #[test]
    fn test_from_json_parses_domain_keys() {
        let json = r#"{
            "AccessControl": [
                {
                    "controlId": "AC-100",
                    "name": "Custom Control",
                    "description": "custom",
                    "expectedLevel": 3
                }
            ]
        }"#;
        let catalogue = ControlCatalogue::from_json(json).unwrap();
        let controls = catalogue.controls_for(SecurityDomain::AccessControl);
        assert_eq!(controls.len(), 1);
        assert_eq!(controls[0].control_id, "AC-100");
        assert_eq!(controls[0].domain, SecurityDomain::AccessControl);
        assert!(controls[0].applicable_industries.is_empty());
    }

    #[test]
    fn test_from_json_rejects_unknown_domain() {
        let json = r#"{ "QuantumSecurity": [] }"#;
        let err = ControlCatalogue::from_json(json).unwrap_err();
        assert!(matches!(err, EngineError::UnknownDomain { .. }));
    }
}
