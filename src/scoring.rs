//! Applicability filtering and per-domain gap scoring
//!
//! The scorer compares expected against reported maturity for every
//! applicable control in one domain, splitting the domain's weight equally
//! across its controls. Missing information always degrades to a gap, never
//! to an error.

use crate::catalogue::ControlRequirement;
use crate::extraction::ReportedImplementation;
use crate::profile::OrganizationProfile;
use crate::SecurityDomain;
use serde::Serialize;
use tracing::debug;

/// The shortfall on one control
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapRecord {
    pub control_id: String,
    pub control_name: String,
    pub expert_level: u8,
    pub reported_level: u8,
    /// Portion of the domain's weight this gap costs; always > 0
    pub percentage_impact: f64,
    pub next_steps: String,
}

/// Scoring outcome for one domain
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainResult {
    pub domain: SecurityDomain,
    pub earned_percentage: f64,
    pub max_percentage: f64,
    pub gaps: Vec<GapRecord>,
    pub recommendations: Vec<String>,
}

/// Requirements from one domain that apply to this organization
///
/// A requirement applies unless it names industries that exclude the
/// profile's industry, or it names infrastructure components none of which
/// the profile reports. Empty restriction lists mean "applies to all".
pub fn applicable_requirements<'a>(
    requirements: &'a [ControlRequirement],
    profile: &OrganizationProfile,
) -> Vec<&'a ControlRequirement> {
    requirements
        .iter()
        .filter(|req| {
            let industry_ok = req.applicable_industries.is_empty()
                || req
                    .applicable_industries
                    .iter()
                    .any(|i| i.eq_ignore_ascii_case(&profile.industry));
            let infra_ok = req.applicable_infra_components.is_empty()
                || req
                    .applicable_infra_components
                    .iter()
                    .any(|c| profile.has_infra_component(c));
            industry_ok && infra_ok
        })
        .collect()
}

/// Score one domain against its applicable requirements
///
/// `domain_weight` is this domain's share of the overall 100%, chosen by the
/// run's weighting strategy. Each requirement receives an equal share of it.
pub fn score_domain(
    domain: SecurityDomain,
    requirements: &[&ControlRequirement],
    implementations: &[ReportedImplementation],
    domain_weight: f64,
) -> DomainResult {
    // Zero applicable requirements: the weight stays in the denominator but
    // nothing can be earned.
    if requirements.is_empty() {
        return DomainResult {
            domain,
            earned_percentage: 0.0,
            max_percentage: domain_weight,
            gaps: Vec::new(),
            recommendations: vec![format!(
                "No applicable {} controls for this organization profile.",
                domain.display_name()
            )],
        };
    }

    let share = domain_weight / requirements.len() as f64;
    let mut earned = 0.0;
    let mut gaps = Vec::new();

    for req in requirements {
        let reported = implementations
            .iter()
            .find(|imp| imp.control_id == req.control_id)
            .map(|imp| imp.implementation_level);

        match reported {
            None => {
                gaps.push(GapRecord {
                    control_id: req.control_id.clone(),
                    control_name: req.name.clone(),
                    expert_level: req.expected_level,
                    reported_level: 0,
                    percentage_impact: share,
                    next_steps: format!("Implement {}: {}", req.name, req.description),
                });
            }
            Some(level) => {
                // expected_level 0 should not occur in a sane catalogue;
                // treat as fully aligned rather than dividing by zero
                let alignment = if req.expected_level == 0 {
                    1.0
                } else {
                    (f64::from(level) / f64::from(req.expected_level)).min(1.0)
                };
                earned += share * alignment;
                if alignment < 1.0 {
                    gaps.push(GapRecord {
                        control_id: req.control_id.clone(),
                        control_name: req.name.clone(),
                        expert_level: req.expected_level,
                        reported_level: level,
                        percentage_impact: share * (1.0 - alignment),
                        next_steps: format!(
                            "Raise {} from maturity level {} to level {}.",
                            req.name, level, req.expected_level
                        ),
                    });
                }
            }
        }
    }

    debug!(
        %domain,
        requirements = requirements.len(),
        gaps = gaps.len(),
        earned,
        max = domain_weight,
        "domain scored"
    );

    let recommendations = domain_recommendations(domain, &gaps, requirements.len());
    DomainResult {
        domain,
        earned_percentage: earned,
        max_percentage: domain_weight,
        gaps,
        recommendations,
    }
}

/// Domain recommendation text: a compliance confirmation when gap-free,
/// otherwise a lead sentence plus the next steps of the three highest-impact
/// gaps.
fn domain_recommendations(
    domain: SecurityDomain,
    gaps: &[GapRecord],
    assessed: usize,
) -> Vec<String> {
    if gaps.is_empty() {
        return vec![format!(
            "{} controls fully meet the expected maturity levels.",
            domain.display_name()
        )];
    }
    let mut ordered: Vec<&GapRecord> = gaps.iter().collect();
    ordered.sort_by(|a, b| {
        b.percentage_impact
            .partial_cmp(&a.percentage_impact)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut recommendations = vec![format!(
        "Strengthen {}: {} of {} assessed controls fall short of the expected maturity.",
        domain.display_name(),
        gaps.len(),
        assessed
    )];
    recommendations.extend(ordered.iter().take(3).map(|gap| gap.next_steps.clone()));
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::ControlCatalogue;
    use crate::profile::extract_profile;
    use crate::IntakeRecord;

    fn profile_for(industry: &str) -> OrganizationProfile {
        let record: IntakeRecord =
            serde_json::from_str(&format!(r#"{{ "industry": "{industry}" }}"#)).unwrap();
        extract_profile(&record)
    }

    fn requirement(id: &str, expected: u8) -> ControlRequirement {
        let json = format!(
            r#"{{ "controlId": "{id}", "name": "Control {id}", "description": "desc",
                 "domain": "AccessControl", "expectedLevel": {expected} }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    fn implementation(id: &str, level: u8) -> ReportedImplementation {
        ReportedImplementation {
            control_id: id.to_string(),
            implementation_level: level,
            notes: None,
        }
    }

    #[test]
    fn test_unrestricted_requirements_always_apply() {
        let catalogue = ControlCatalogue::expert_defaults();
        let profile = profile_for("Unknown");
        let reqs = applicable_requirements(
            catalogue.controls_for(SecurityDomain::IncidentResponse),
            &profile,
        );
        assert_eq!(reqs.len(), 3);
    }

    #[test]
    fn test_industry_restriction_excludes() {
        // DP-4 is Financial/Retail only, DP-5 Healthcare only
        let catalogue = ControlCatalogue::expert_defaults();
        let healthcare = profile_for("Healthcare");
        let ids: Vec<_> = applicable_requirements(
            catalogue.controls_for(SecurityDomain::DataProtection),
            &healthcare,
        )
        .iter()
        .map(|r| r.control_id.as_str())
        .collect();
        assert!(ids.contains(&"DP-5"));
        assert!(!ids.contains(&"DP-4"));
    }

    #[test]
    fn test_infra_restriction_requires_one_component() {
        let catalogue = ControlCatalogue::expert_defaults();
        let record: IntakeRecord =
            serde_json::from_str(r#"{ "operationMode": ["cloud"] }"#).unwrap();
        let profile = extract_profile(&record);
        let ids: Vec<_> = applicable_requirements(
            catalogue.controls_for(SecurityDomain::NetworkSecurity),
            &profile,
        )
        .iter()
        .map(|r| r.control_id.as_str())
        .collect();
        assert!(ids.contains(&"NS-4"));
        // NS-5 needs remote or hybrid, neither present
        assert!(!ids.contains(&"NS-5"));
    }

    #[test]
    fn test_missing_implementation_is_full_weight_gap() {
        let req = requirement("AC-1", 4);
        let result = score_domain(SecurityDomain::AccessControl, &[&req], &[], 10.0);
        assert_eq!(result.earned_percentage, 0.0);
        assert_eq!(result.gaps.len(), 1);
        assert_eq!(result.gaps[0].reported_level, 0);
        assert!((result.gaps[0].percentage_impact - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_alignment_scores_proportionally() {
        // Scenario B: expected 5, reported 3 => alignment 0.6
        let req = requirement("DP-1", 5);
        let imps = [implementation("DP-1", 3)];
        let result = score_domain(SecurityDomain::DataProtection, &[&req], &imps, 10.0);
        assert!((result.earned_percentage - 6.0).abs() < 1e-9);
        assert_eq!(result.gaps.len(), 1);
        assert!((result.gaps[0].percentage_impact - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_over_achievement_is_clamped() {
        // Scenario C: expected 4, reported 5 => full credit, no gap
        let req = requirement("IAM-1", 4);
        let imps = [implementation("IAM-1", 5)];
        let result = score_domain(SecurityDomain::IdentityAndAccess, &[&req], &imps, 10.0);
        assert!((result.earned_percentage - 10.0).abs() < 1e-9);
        assert!(result.gaps.is_empty());
    }

    #[test]
    fn test_expected_level_zero_is_absorbed() {
        let req = requirement("AC-9", 0);
        let imps = [implementation("AC-9", 0)];
        let result = score_domain(SecurityDomain::AccessControl, &[&req], &imps, 10.0);
        assert!((result.earned_percentage - 10.0).abs() < 1e-9);
        assert!(result.gaps.is_empty());
    }

    #[test]
    fn test_zero_applicable_requirements_earn_nothing() {
        let result = score_domain(SecurityDomain::VendorRisk, &[], &[], 8.0);
        assert_eq!(result.earned_percentage, 0.0);
        assert_eq!(result.max_percentage, 8.0);
        assert!(result.gaps.is_empty());
    }

    #[test]
    fn test_gap_free_domain_gets_compliance_message() {
        let req = requirement("AC-1", 3);
        let imps = [implementation("AC-1", 3)];
        let result = score_domain(SecurityDomain::AccessControl, &[&req], &imps, 10.0);
        assert_eq!(result.recommendations.len(), 1);
        assert!(result.recommendations[0].contains("fully meet"));
    }

    #[test]
    fn test_recommendations_take_top_three_gaps_by_impact() {
        let reqs: Vec<ControlRequirement> = (1..=5)
            .map(|n| requirement(&format!("AC-{n}"), 4))
            .collect();
        let refs: Vec<&ControlRequirement> = reqs.iter().collect();
        // AC-3 partially implemented, the rest missing entirely
        let imps = [implementation("AC-3", 2)];
        let result = score_domain(SecurityDomain::AccessControl, &refs, &imps, 10.0);
        // lead sentence + top 3
        assert_eq!(result.recommendations.len(), 4);
        // the partially-met control has the smallest impact and is not listed
        assert!(!result.recommendations.iter().any(|r| r.contains("Control AC-3")));
    }

    #[test]
    fn test_every_gap_has_positive_impact() {
        let reqs: Vec<ControlRequirement> =
            (1..=4).map(|n| requirement(&format!("AC-{n}"), 4)).collect();
        let refs: Vec<&ControlRequirement> = reqs.iter().collect();
        let imps = [implementation("AC-1", 4), implementation("AC-2", 1)];
        let result = score_domain(SecurityDomain::AccessControl, &refs, &imps, 10.0);
        for gap in &result.gaps {
            assert!(gap.percentage_impact > 0.0);
        }
        assert!(result.earned_percentage <= result.max_percentage);
    }
}
