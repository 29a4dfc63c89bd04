//! Cybersecurity maturity gap analysis and scoring engine
//!
//! This library compares an expert-defined catalogue of security control
//! requirements against an organization's self-reported implementation
//! levels, producing per-domain and overall maturity scores plus a ranked
//! list of remediation recommendations.
//!
//! The engine is a pure, deterministic computation: one analysis run is a
//! function of one intake record plus two static configuration tables (the
//! control catalogue and the industry weight table). Configuration is
//! validated once at construction; analysis itself never fails — missing
//! questionnaire data degrades to "not implemented", never to an error.

pub mod catalogue;
pub mod engine;
pub mod extraction;
pub mod intake;
pub mod prioritizer;
pub mod profile;
pub mod scoring;
pub mod weights;

pub use catalogue::{ControlCatalogue, ControlRequirement};
pub use engine::{GapAnalysisEngine, GapAnalysisResult, OverallScore, WeightingMode};
pub use extraction::{extract_implementations, ReportedImplementation};
pub use intake::IntakeRecord;
pub use prioritizer::PrioritizedRecommendation;
pub use profile::{extract_profile, OrganizationProfile};
pub use scoring::{DomainResult, GapRecord};
pub use weights::{EvenSplit, IndustryWeightTable, IndustryWeighted, WeightingStrategy};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors for the gap analysis engine
///
/// Only caller-provided configuration defects surface as errors, and only at
/// load/construction time. Missing or partial questionnaire data is absorbed
/// into the score, never raised.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("duplicate control id '{control_id}' in domain {domain}")]
    DuplicateControl {
        domain: SecurityDomain,
        control_id: String,
    },

    #[error("control '{control_id}' has expected level {level}, must be 0-5")]
    InvalidExpectedLevel { control_id: String, level: u8 },

    #[error("industry '{industry}' weights sum to {sum}, must sum to 100")]
    WeightSum { industry: String, sum: f64 },

    #[error("{table} references unknown domain '{domain}'")]
    UnknownDomain { table: String, domain: String },

    #[error("industry weight table has no 'Default' fallback row")]
    MissingDefaultRow,

    #[error("configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for engine configuration operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Security domains assessed by the engine
///
/// The set is fixed: every catalogue entry and every weight table row keys
/// off one of these. Ordering is used for deterministic result iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SecurityDomain {
    AccessControl,
    DataProtection,
    IdentityAndAccess,
    NetworkSecurity,
    EndpointSecurity,
    ApplicationSecurity,
    IncidentResponse,
    BusinessContinuity,
    SecurityAwareness,
    VendorRisk,
    Governance,
}

impl SecurityDomain {
    /// All domains, in scoring order
    pub fn all() -> &'static [SecurityDomain] {
        &[
            Self::AccessControl,
            Self::DataProtection,
            Self::IdentityAndAccess,
            Self::NetworkSecurity,
            Self::EndpointSecurity,
            Self::ApplicationSecurity,
            Self::IncidentResponse,
            Self::BusinessContinuity,
            Self::SecurityAwareness,
            Self::VendorRisk,
            Self::Governance,
        ]
    }

    /// Human-readable name used in recommendation text
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::AccessControl => "Access Control",
            Self::DataProtection => "Data Protection",
            Self::IdentityAndAccess => "Identity & Access Management",
            Self::NetworkSecurity => "Network Security",
            Self::EndpointSecurity => "Endpoint Security",
            Self::ApplicationSecurity => "Application Security",
            Self::IncidentResponse => "Incident Response",
            Self::BusinessContinuity => "Business Continuity",
            Self::SecurityAwareness => "Security Awareness",
            Self::VendorRisk => "Vendor Risk",
            Self::Governance => "Governance",
        }
    }

    /// Parse a domain from its serialized name (configuration loading)
    pub fn parse(name: &str) -> Option<SecurityDomain> {
        Self::all().iter().copied().find(|d| format!("{d:?}") == name)
    }
}

impl std::fmt::Display for SecurityDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Remediation priority classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// Estimated remediation effort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffortLevel {
    Low,
    Medium,
    High,
}

/// Recommended remediation timeframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    Immediate,
    #[serde(rename = "Short-term")]
    ShortTerm,
    #[serde(rename = "Long-term")]
    LongTerm,
}

/// Letter grade for the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

/// Data sensitivity classification derived from industry and regulatory flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataSensitivity {
    Low,
    Medium,
    High,
    Critical,
}

/// Organization size band derived from the reported employee count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrganizationSize {
    Small,
    Medium,
    Large,
    Enterprise,
}
