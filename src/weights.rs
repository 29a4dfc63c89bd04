//! Industry weight table and weighting strategies
//!
//! Two mutually exclusive weighting modes exist per analysis run: an even
//! split of 100 across the fixed domain set, or industry-specific weights
//! looked up from a validated table. The mode is selected once at the engine
//! level, never per domain.

use crate::{EngineError, EngineResult, SecurityDomain};
use std::collections::BTreeMap;
use tracing::warn;

/// Weight closure tolerance: each industry row must sum to 100 within this
const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Per-industry domain weights, validated to sum to 100 per row
///
/// Lookup is case-insensitive by industry name and falls back to the
/// mandatory `Default` row for industries without a dedicated one.
#[derive(Debug, Clone)]
pub struct IndustryWeightTable {
    rows: BTreeMap<String, BTreeMap<SecurityDomain, f64>>,
}

impl IndustryWeightTable {
    /// Validate and wrap a weight table. Every row must sum to 100 within
    /// tolerance and a `Default` fallback row must be present.
    pub fn new(
        rows: BTreeMap<String, BTreeMap<SecurityDomain, f64>>,
    ) -> EngineResult<Self> {
        if !rows.contains_key("Default") {
            return Err(EngineError::MissingDefaultRow);
        }
        for (industry, weights) in &rows {
            let sum: f64 = weights.values().sum();
            if (sum - 100.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(EngineError::WeightSum {
                    industry: industry.clone(),
                    sum,
                });
            }
        }
        Ok(Self { rows })
    }

    /// Load a weight table from configuration JSON: a mapping from industry
    /// name to a mapping of domain name to weight.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let raw: BTreeMap<String, BTreeMap<String, f64>> = serde_json::from_str(json)?;
        let mut rows = BTreeMap::new();
        for (industry, weights) in raw {
            let mut row = BTreeMap::new();
            for (name, weight) in weights {
                let domain =
                    SecurityDomain::parse(&name).ok_or_else(|| EngineError::UnknownDomain {
                        table: format!("weight table row '{industry}'"),
                        domain: name.clone(),
                    })?;
                row.insert(domain, weight);
            }
            rows.insert(industry, row);
        }
        Self::new(rows)
    }

    /// Weights for an industry, falling back to the `Default` row
    ///
    /// The fallback is logged once per lookup so unexpected industries stay
    /// visible without failing the run.
    pub fn weights_for(&self, industry: &str) -> &BTreeMap<SecurityDomain, f64> {
        let found = self
            .rows
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(industry))
            .map(|(_, row)| row);
        match found {
            Some(row) => row,
            None => {
                warn!(industry, "no industry weight row, using Default");
                // Presence of "Default" is guaranteed by `new`
                &self.rows["Default"]
            }
        }
    }

    /// The built-in weight table covering the industries the questionnaire
    /// recognizes, plus the mandatory `Default` row.
    pub fn builtin() -> Self {
        use SecurityDomain::*;
        let mut rows = BTreeMap::new();
        rows.insert(
            "Default".to_string(),
            row(&[
                (AccessControl, 10.0),
                (DataProtection, 10.0),
                (IdentityAndAccess, 10.0),
                (NetworkSecurity, 10.0),
                (EndpointSecurity, 9.0),
                (ApplicationSecurity, 9.0),
                (IncidentResponse, 9.0),
                (BusinessContinuity, 8.0),
                (SecurityAwareness, 9.0),
                (VendorRisk, 8.0),
                (Governance, 8.0),
            ]),
        );
        rows.insert(
            "Healthcare".to_string(),
            row(&[
                (AccessControl, 12.0),
                (DataProtection, 15.0),
                (IdentityAndAccess, 11.0),
                (NetworkSecurity, 8.0),
                (EndpointSecurity, 8.0),
                (ApplicationSecurity, 7.0),
                (IncidentResponse, 9.0),
                (BusinessContinuity, 8.0),
                (SecurityAwareness, 7.0),
                (VendorRisk, 5.0),
                (Governance, 10.0),
            ]),
        );
        rows.insert(
            "Financial".to_string(),
            row(&[
                (AccessControl, 12.0),
                (DataProtection, 14.0),
                (IdentityAndAccess, 12.0),
                (NetworkSecurity, 9.0),
                (EndpointSecurity, 7.0),
                (ApplicationSecurity, 9.0),
                (IncidentResponse, 9.0),
                (BusinessContinuity, 8.0),
                (SecurityAwareness, 4.0),
                (VendorRisk, 6.0),
                (Governance, 10.0),
            ]),
        );
        rows.insert(
            "Retail".to_string(),
            row(&[
                (AccessControl, 10.0),
                (DataProtection, 13.0),
                (IdentityAndAccess, 9.0),
                (NetworkSecurity, 11.0),
                (EndpointSecurity, 9.0),
                (ApplicationSecurity, 11.0),
                (IncidentResponse, 8.0),
                (BusinessContinuity, 7.0),
                (SecurityAwareness, 8.0),
                (VendorRisk, 8.0),
                (Governance, 6.0),
            ]),
        );
        rows.insert(
            "Technology".to_string(),
            row(&[
                (AccessControl, 10.0),
                (DataProtection, 10.0),
                (IdentityAndAccess, 11.0),
                (NetworkSecurity, 9.0),
                (EndpointSecurity, 8.0),
                (ApplicationSecurity, 14.0),
                (IncidentResponse, 9.0),
                (BusinessContinuity, 7.0),
                (SecurityAwareness, 7.0),
                (VendorRisk, 8.0),
                (Governance, 7.0),
            ]),
        );
        rows.insert(
            "Manufacturing".to_string(),
            row(&[
                (AccessControl, 10.0),
                (DataProtection, 9.0),
                (IdentityAndAccess, 8.0),
                (NetworkSecurity, 13.0),
                (EndpointSecurity, 12.0),
                (ApplicationSecurity, 7.0),
                (IncidentResponse, 9.0),
                (BusinessContinuity, 11.0),
                (SecurityAwareness, 7.0),
                (VendorRisk, 8.0),
                (Governance, 6.0),
            ]),
        );
        rows.insert(
            "Government".to_string(),
            row(&[
                (AccessControl, 12.0),
                (DataProtection, 12.0),
                (IdentityAndAccess, 10.0),
                (NetworkSecurity, 9.0),
                (EndpointSecurity, 8.0),
                (ApplicationSecurity, 6.0),
                (IncidentResponse, 9.0),
                (BusinessContinuity, 7.0),
                (SecurityAwareness, 8.0),
                (VendorRisk, 6.0),
                (Governance, 13.0),
            ]),
        );
        rows.insert(
            "Education".to_string(),
            row(&[
                (AccessControl, 11.0),
                (DataProtection, 11.0),
                (IdentityAndAccess, 10.0),
                (NetworkSecurity, 9.0),
                (EndpointSecurity, 9.0),
                (ApplicationSecurity, 8.0),
                (IncidentResponse, 8.0),
                (BusinessContinuity, 7.0),
                (SecurityAwareness, 12.0),
                (VendorRisk, 7.0),
                (Governance, 8.0),
            ]),
        );
        Self { rows }
    }
}

fn row(pairs: &[(SecurityDomain, f64)]) -> BTreeMap<SecurityDomain, f64> {
    pairs.iter().copied().collect()
}

/// Strategy choosing how much of the overall 100% one domain is worth
///
/// Selected once per analysis run; implementations are pure lookups.
pub trait WeightingStrategy {
    fn domain_weight(&self, domain: SecurityDomain, industry: &str) -> f64;
}

/// Even split: every domain in the fixed set carries the same weight
#[derive(Debug, Clone, Copy, Default)]
pub struct EvenSplit;

impl WeightingStrategy for EvenSplit {
    fn domain_weight(&self, _domain: SecurityDomain, _industry: &str) -> f64 {
        100.0 / SecurityDomain::all().len() as f64
    }
}

/// Industry-specific weights looked up from a validated table
#[derive(Debug, Clone)]
pub struct IndustryWeighted<'a> {
    table: &'a IndustryWeightTable,
}

impl<'a> IndustryWeighted<'a> {
    pub fn new(table: &'a IndustryWeightTable) -> Self {
        Self { table }
    }
}

impl WeightingStrategy for IndustryWeighted<'_> {
    fn domain_weight(&self, domain: SecurityDomain, industry: &str) -> f64 {
        self.table
            .weights_for(industry)
            .get(&domain)
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rows_sum_to_100() {
        let table = IndustryWeightTable::builtin();
        // Re-run constructor validation over the built-in table
        assert!(IndustryWeightTable::new(table.rows.clone()).is_ok());
    }

    #[test]
    fn test_even_split_closure() {
        let strategy = EvenSplit;
        let total: f64 = SecurityDomain::all()
            .iter()
            .map(|d| strategy.domain_weight(*d, "Technology"))
            .sum();
        assert!((total - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_industry_weighted_closure_per_industry() {
        let table = IndustryWeightTable::builtin();
        let strategy = IndustryWeighted::new(&table);
        for industry in ["Healthcare", "Financial", "Retail", "SomethingElse"] {
            let total: f64 = SecurityDomain::all()
                .iter()
                .map(|d| strategy.domain_weight(*d, industry))
                .sum();
            assert!((total - 100.0).abs() < 0.01, "industry {industry}");
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = IndustryWeightTable::builtin();
        assert_eq!(
            table.weights_for("healthcare"),
            table.weights_for("Healthcare")
        );
    }

    #[test]
    fn test_unknown_industry_falls_back_to_default() {
        let table = IndustryWeightTable::builtin();
        assert_eq!(table.weights_for("Agriculture"), table.weights_for("Default"));
    }

    #[test]
    fn test_bad_sum_rejected() {
        let mut rows = BTreeMap::new();
        rows.insert("Default".to_string(), row(&[(SecurityDomain::Governance, 99.0)]));
        let err = IndustryWeightTable::new(rows).unwrap_err();
        assert!(matches!(err, EngineError::WeightSum { .. }));
    }

    #[test]
    fn test_missing_default_rejected() {
        let mut rows = BTreeMap::new();
        rows.insert("Retail".to_string(), row(&[(SecurityDomain::Governance, 100.0)]));
        let err = IndustryWeightTable::new(rows).unwrap_err();
        assert!(matches!(err, EngineError::MissingDefaultRow));
    }

    #[test]
    fn test_from_json_rejects_unknown_domain() {
        let json = r#"{ "Default": { "Blockchain": 100.0 } }"#;
        let err = IndustryWeightTable::from_json(json).unwrap_err();
        assert!(matches!(err, EngineError::UnknownDomain { .. }));
    }
}
