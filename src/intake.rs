//! Raw organization intake record
//!
//! The questionnaire UI supplies a loosely structured record: every field is
//! optional and the overall shape varies by how much of the questionnaire was
//! answered. This module models that record as one immutable value with
//! safe-access helpers, so the "missing means worst case" policy lives in one
//! place instead of null-checks scattered through the extraction rules.

use serde::{Deserialize, Serialize};

/// One organization's raw questionnaire answers
///
/// Deserializes from the intake JSON contract. Unknown fields are ignored;
/// absent fields deserialize to empty collections or `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeRecord {
    pub industry: Option<String>,
    pub employee_count: Option<String>,
    pub operation_mode: Vec<String>,
    pub security_measures: Vec<String>,
    pub compliance_requirements: ComplianceRequirements,
    pub regulatory_requirements: Vec<String>,
    pub device_inventory_tracking: Option<DeviceInventoryTracking>,
    pub identity_behavior_hygiene: Option<IdentityBehaviorHygiene>,
    pub policy_documents: PolicyDocuments,
    pub isms_processes: Vec<String>,
    pub isms_leadership: Option<IsmsLeadership>,
    #[serde(rename = "relevantACQTools")]
    pub relevant_acq_tools: Option<RelevantAcqTools>,
}

/// Compliance frameworks and regulations the organization claims
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplianceRequirements {
    pub frameworks: Vec<String>,
    pub standards: Vec<String>,
    pub compliance: Vec<String>,
    pub regulations: Vec<String>,
    pub healthcare: Vec<String>,
    pub financial: Vec<String>,
    pub industry_specific: Vec<String>,
}

/// Device inventory section of the questionnaire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceInventoryTracking {
    pub encryption_status: Vec<String>,
    pub firewall_active: Option<bool>,
    pub device_types: Vec<String>,
}

/// Identity and access behavior section of the questionnaire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityBehaviorHygiene {
    pub mfa_status: Option<bool>,
    pub access_control_model: Option<String>,
    pub privileged_account_inventory: Option<bool>,
    pub access_review_frequency: Option<String>,
    pub sso_in_use: Option<bool>,
}

/// Policy and procedure documents the organization reports having
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyDocuments {
    pub policies: Vec<String>,
    pub procedures: Vec<String>,
}

/// Security leadership section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IsmsLeadership {
    pub executive_support: Option<bool>,
}

/// Assessment and tooling section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelevantAcqTools {
    pub assessments: Vec<String>,
}

fn list_contains(list: &[String], needle: &str) -> bool {
    list.iter().any(|item| item.eq_ignore_ascii_case(needle))
}

impl IntakeRecord {
    /// Reported industry, or "Unknown" when absent
    pub fn industry(&self) -> &str {
        self.industry.as_deref().unwrap_or("Unknown")
    }

    /// Whether the named security measure was selected (case-insensitive)
    pub fn has_security_measure(&self, name: &str) -> bool {
        list_contains(&self.security_measures, name)
    }

    /// Whether any compliance or regulatory list mentions the given entry
    pub fn compliance_mentions(&self, name: &str) -> bool {
        let c = &self.compliance_requirements;
        list_contains(&c.frameworks, name)
            || list_contains(&c.standards, name)
            || list_contains(&c.compliance, name)
            || list_contains(&c.regulations, name)
            || list_contains(&c.healthcare, name)
            || list_contains(&c.financial, name)
            || list_contains(&c.industry_specific, name)
            || list_contains(&self.regulatory_requirements, name)
    }

    /// Healthcare-specific compliance flags (HIPAA or a populated healthcare list)
    pub fn has_healthcare_flags(&self) -> bool {
        !self.compliance_requirements.healthcare.is_empty() || self.compliance_mentions("HIPAA")
    }

    /// Financial-specific compliance flags (SOX/GLBA or a populated financial list)
    pub fn has_financial_flags(&self) -> bool {
        !self.compliance_requirements.financial.is_empty()
            || self.compliance_mentions("SOX")
            || self.compliance_mentions("GLBA")
    }

    /// Whether the device inventory section was answered at all
    pub fn has_device_inventory(&self) -> bool {
        self.device_inventory_tracking.is_some()
    }

    /// Whether device encryption status includes the given entry
    pub fn device_encryption_contains(&self, status: &str) -> bool {
        self.device_inventory_tracking
            .as_ref()
            .map(|d| list_contains(&d.encryption_status, status))
            .unwrap_or(false)
    }

    /// Device firewall flag; absent means not active
    pub fn device_firewall_active(&self) -> bool {
        self.device_inventory_tracking
            .as_ref()
            .and_then(|d| d.firewall_active)
            .unwrap_or(false)
    }

    /// MFA flag from the identity section, `None` when unanswered
    pub fn mfa_status(&self) -> Option<bool> {
        self.identity_behavior_hygiene.as_ref().and_then(|i| i.mfa_status)
    }

    /// Access control model name, `None` when unanswered
    pub fn access_control_model(&self) -> Option<&str> {
        self.identity_behavior_hygiene
            .as_ref()
            .and_then(|i| i.access_control_model.as_deref())
    }

    /// Privileged account inventory flag, `None` when unanswered
    pub fn privileged_account_inventory(&self) -> Option<bool> {
        self.identity_behavior_hygiene
            .as_ref()
            .and_then(|i| i.privileged_account_inventory)
    }

    /// Access review cadence, `None` when unanswered
    pub fn access_review_frequency(&self) -> Option<&str> {
        self.identity_behavior_hygiene
            .as_ref()
            .and_then(|i| i.access_review_frequency.as_deref())
    }

    /// SSO flag from the identity section, `None` when unanswered
    pub fn sso_in_use(&self) -> Option<bool> {
        self.identity_behavior_hygiene.as_ref().and_then(|i| i.sso_in_use)
    }

    /// Whether the named policy document is reported
    pub fn has_policy(&self, name: &str) -> bool {
        list_contains(&self.policy_documents.policies, name)
    }

    /// Whether the named procedure document is reported
    pub fn has_procedure(&self, name: &str) -> bool {
        list_contains(&self.policy_documents.procedures, name)
    }

    /// Whether the named ISMS process is reported
    pub fn has_isms_process(&self, name: &str) -> bool {
        list_contains(&self.isms_processes, name)
    }

    /// Executive support flag; absent means no
    pub fn executive_support(&self) -> bool {
        self.isms_leadership
            .as_ref()
            .and_then(|l| l.executive_support)
            .unwrap_or(false)
    }

    /// Whether the named assessment type has been performed
    pub fn has_assessment(&self, name: &str) -> bool {
        self.relevant_acq_tools
            .as_ref()
            .map(|t| list_contains(&t.assessments, name))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_defaults_conservatively() {
        let record = IntakeRecord::default();
        assert_eq!(record.industry(), "Unknown");
        assert!(!record.has_security_measure("encryption"));
        assert!(!record.device_firewall_active());
        assert!(!record.executive_support());
        assert_eq!(record.mfa_status(), None);
    }

    #[test]
    fn test_deserializes_partial_json() {
        let json = r#"{
            "industry": "Healthcare",
            "securityMeasures": ["Encryption", "firewall"],
            "identityBehaviorHygiene": { "mfaStatus": true },
            "unknownFutureField": 42
        }"#;
        let record: IntakeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.industry(), "Healthcare");
        assert!(record.has_security_measure("encryption"));
        assert!(record.has_security_measure("Firewall"));
        assert_eq!(record.mfa_status(), Some(true));
        assert_eq!(record.access_review_frequency(), None);
    }

    #[test]
    fn test_compliance_mentions_searches_all_lists() {
        let json = r#"{
            "complianceRequirements": {
                "frameworks": ["ISO 27001"],
                "healthcare": ["HIPAA"]
            },
            "regulatoryRequirements": ["GDPR"]
        }"#;
        let record: IntakeRecord = serde_json::from_str(json).unwrap();
        assert!(record.compliance_mentions("ISO 27001"));
        assert!(record.compliance_mentions("hipaa"));
        assert!(record.compliance_mentions("GDPR"));
        assert!(!record.compliance_mentions("PCI-DSS"));
        assert!(record.has_healthcare_flags());
        assert!(!record.has_financial_flags());
    }

    #[test]
    fn test_relevant_acq_tools_field_name() {
        let json = r#"{ "relevantACQTools": { "assessments": ["penetration-test"] } }"#;
        let record: IntakeRecord = serde_json::from_str(json).unwrap();
        assert!(record.has_assessment("penetration-test"));
    }
}
