//! Remediation recommendation prioritization
//!
//! Flattens every domain's gap list, ranks by percentage impact and emits a
//! bounded list of actionable recommendations with priority, timeframe and
//! effort classification.

use crate::scoring::{DomainResult, GapRecord};
use crate::{EffortLevel, Priority, SecurityDomain, Timeframe};
use serde::Serialize;
use std::collections::BTreeMap;

/// Default cap on the emitted recommendation list
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 10;

/// One ranked, actionable remediation recommendation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizedRecommendation {
    pub priority: Priority,
    pub impact: String,
    pub recommendation: String,
    pub control_ids: Vec<String>,
    pub estimated_effort: EffortLevel,
    pub timeframe: Timeframe,
}

/// Rank all gaps across domains and emit the top `max_entries`
///
/// Sorting is descending by `percentage_impact` using a stable sort, so
/// equal-impact gaps keep their input order (domain scoring order, then
/// catalogue order within a domain). That stability is part of the output
/// contract, not an accident.
pub fn prioritize(
    domain_results: &BTreeMap<SecurityDomain, DomainResult>,
    max_entries: usize,
) -> Vec<PrioritizedRecommendation> {
    let mut gaps: Vec<(SecurityDomain, &GapRecord)> = domain_results
        .iter()
        .flat_map(|(domain, result)| result.gaps.iter().map(move |gap| (*domain, gap)))
        .collect();

    gaps.sort_by(|(_, a), (_, b)| {
        b.percentage_impact
            .partial_cmp(&a.percentage_impact)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    gaps.into_iter()
        .take(max_entries)
        .map(|(domain, gap)| classify(domain, gap))
        .collect()
}

fn classify(domain: SecurityDomain, gap: &GapRecord) -> PrioritizedRecommendation {
    let (priority, timeframe) = if gap.percentage_impact >= 5.0 {
        (Priority::Critical, Timeframe::Immediate)
    } else if gap.percentage_impact >= 3.0 {
        (Priority::High, Timeframe::ShortTerm)
    } else if gap.percentage_impact >= 1.0 {
        (Priority::Medium, Timeframe::LongTerm)
    } else {
        (Priority::Low, Timeframe::LongTerm)
    };

    let estimated_effort = if gap.expert_level > 3 {
        EffortLevel::High
    } else if gap.expert_level > 1 {
        EffortLevel::Medium
    } else {
        EffortLevel::Low
    };

    PrioritizedRecommendation {
        priority,
        impact: format!(
            "{:.2}% of the overall score at risk in {}",
            gap.percentage_impact,
            domain.display_name()
        ),
        recommendation: gap.next_steps.clone(),
        control_ids: vec![gap.control_id.clone()],
        estimated_effort,
        timeframe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gap(id: &str, expert: u8, impact: f64) -> GapRecord {
        GapRecord {
            control_id: id.to_string(),
            control_name: format!("Control {id}"),
            expert_level: expert,
            reported_level: 0,
            percentage_impact: impact,
            next_steps: format!("Implement control {id}"),
        }
    }

    fn results_with_gaps(gaps: Vec<GapRecord>) -> BTreeMap<SecurityDomain, DomainResult> {
        let mut map = BTreeMap::new();
        map.insert(
            SecurityDomain::AccessControl,
            DomainResult {
                domain: SecurityDomain::AccessControl,
                earned_percentage: 0.0,
                max_percentage: 10.0,
                gaps,
                recommendations: Vec::new(),
            },
        );
        map
    }

    #[test]
    fn test_sorted_descending_by_impact() {
        let results = results_with_gaps(vec![
            gap("AC-1", 3, 1.5),
            gap("AC-2", 3, 6.0),
            gap("AC-3", 3, 3.5),
        ]);
        let ranked = prioritize(&results, DEFAULT_MAX_RECOMMENDATIONS);
        let ids: Vec<_> = ranked
            .iter()
            .map(|r| r.control_ids[0].as_str())
            .collect();
        assert_eq!(ids, vec!["AC-2", "AC-3", "AC-1"]);
    }

    #[test]
    fn test_equal_impact_keeps_input_order() {
        let results = results_with_gaps(vec![
            gap("AC-1", 3, 2.0),
            gap("AC-2", 3, 2.0),
            gap("AC-3", 3, 2.0),
        ]);
        let ranked = prioritize(&results, DEFAULT_MAX_RECOMMENDATIONS);
        let ids: Vec<_> = ranked
            .iter()
            .map(|r| r.control_ids[0].as_str())
            .collect();
        assert_eq!(ids, vec!["AC-1", "AC-2", "AC-3"]);
    }

    #[test]
    fn test_priority_and_timeframe_thresholds() {
        let cases = [
            (5.0, Priority::Critical, Timeframe::Immediate),
            (4.99, Priority::High, Timeframe::ShortTerm),
            (3.0, Priority::High, Timeframe::ShortTerm),
            (2.5, Priority::Medium, Timeframe::LongTerm),
            (1.0, Priority::Medium, Timeframe::LongTerm),
            (0.5, Priority::Low, Timeframe::LongTerm),
        ];
        for (impact, priority, timeframe) in cases {
            let ranked = prioritize(&results_with_gaps(vec![gap("AC-1", 3, impact)]), 10);
            assert_eq!(ranked[0].priority, priority, "impact {impact}");
            assert_eq!(ranked[0].timeframe, timeframe, "impact {impact}");
        }
    }

    #[test]
    fn test_effort_from_expert_level() {
        let cases = [
            (5, EffortLevel::High),
            (4, EffortLevel::High),
            (3, EffortLevel::Medium),
            (2, EffortLevel::Medium),
            (1, EffortLevel::Low),
        ];
        for (expert, effort) in cases {
            let ranked = prioritize(&results_with_gaps(vec![gap("AC-1", expert, 2.0)]), 10);
            assert_eq!(ranked[0].estimated_effort, effort, "expert {expert}");
        }
    }

    #[test]
    fn test_truncated_to_cap() {
        let gaps: Vec<GapRecord> = (0..25)
            .map(|n| gap(&format!("AC-{n}"), 3, 25.0 - n as f64))
            .collect();
        let ranked = prioritize(&results_with_gaps(gaps), DEFAULT_MAX_RECOMMENDATIONS);
        assert_eq!(ranked.len(), 10);
    }
}
