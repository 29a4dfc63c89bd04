//! Gap analysis engine
//!
//! Ties the components together: profile extraction, implementation
//! extraction, applicability filtering, per-domain scoring, aggregation and
//! recommendation prioritization. The engine holds only immutable, validated
//! configuration, so one instance can serve concurrent analysis runs.

use crate::catalogue::ControlCatalogue;
use crate::extraction::{extract_implementations, warn_unmapped};
use crate::intake::IntakeRecord;
use crate::prioritizer::{prioritize, PrioritizedRecommendation, DEFAULT_MAX_RECOMMENDATIONS};
use crate::profile::extract_profile;
use crate::scoring::{applicable_requirements, score_domain, DomainResult};
use crate::weights::{EvenSplit, IndustryWeightTable, IndustryWeighted, WeightingStrategy};
use crate::{Grade, SecurityDomain};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// How domain weights are chosen for a run; selected once at the engine
/// level, the two modes are mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightingMode {
    /// 100 split evenly across the fixed domain set
    #[default]
    EvenSplit,
    /// Per-domain weights from the industry weight table
    IndustrySpecific,
}

/// Overall score: summed earned percentages and the letter grade
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallScore {
    pub percentage: f64,
    pub grade: Grade,
}

/// The complete result of one analysis run
///
/// Field names and nesting are a stable contract: the reporting layer keys
/// off `overallScore.percentage`, `domainResults[domain].earnedPercentage`,
/// `prioritizedRecommendations[].priority` and friends directly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapAnalysisResult {
    pub overall_score: OverallScore,
    pub domain_results: BTreeMap<SecurityDomain, DomainResult>,
    pub prioritized_recommendations: Vec<PrioritizedRecommendation>,
}

/// The gap analysis scoring engine
///
/// Construction validates configuration (the only failure point in the
/// system); `analyze` is pure and infallible.
#[derive(Debug, Clone)]
pub struct GapAnalysisEngine {
    catalogue: ControlCatalogue,
    weight_table: IndustryWeightTable,
    weighting_mode: WeightingMode,
    max_recommendations: usize,
}

impl GapAnalysisEngine {
    /// Engine with the built-in expert catalogue and weight table
    pub fn new() -> Self {
        Self::with_config(
            ControlCatalogue::expert_defaults(),
            IndustryWeightTable::builtin(),
        )
    }

    /// Engine with caller-supplied configuration
    ///
    /// Both tables validate their invariants at their own construction, so
    /// by the time they reach here they are known-good.
    pub fn with_config(catalogue: ControlCatalogue, weight_table: IndustryWeightTable) -> Self {
        Self {
            catalogue,
            weight_table,
            weighting_mode: WeightingMode::default(),
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }

    /// Select the weighting mode for analysis runs
    pub fn weighting_mode(mut self, mode: WeightingMode) -> Self {
        self.weighting_mode = mode;
        self
    }

    /// Cap on the prioritized recommendation list (default 10)
    pub fn max_recommendations(mut self, cap: usize) -> Self {
        self.max_recommendations = cap;
        self
    }

    /// Run one gap analysis over an intake record
    ///
    /// Deterministic and infallible: missing questionnaire data scores as
    /// "not implemented"; unmapped catalogue domains are logged and scored
    /// as all-gaps.
    pub fn analyze(&self, record: &IntakeRecord) -> GapAnalysisResult {
        let profile = extract_profile(record);
        let implementations = extract_implementations(record);
        warn_unmapped(&self.catalogue);

        let even = EvenSplit;
        let industry_weighted = IndustryWeighted::new(&self.weight_table);
        let strategy: &dyn WeightingStrategy = match self.weighting_mode {
            WeightingMode::EvenSplit => &even,
            WeightingMode::IndustrySpecific => &industry_weighted,
        };

        let mut domain_results = BTreeMap::new();
        for domain in SecurityDomain::all() {
            let requirements =
                applicable_requirements(self.catalogue.controls_for(*domain), &profile);
            let weight = strategy.domain_weight(*domain, &profile.industry);
            let result = score_domain(*domain, &requirements, &implementations, weight);
            domain_results.insert(*domain, result);
        }

        let percentage: f64 = domain_results.values().map(|r| r.earned_percentage).sum();
        let total_gaps: usize = domain_results.values().map(|r| r.gaps.len()).sum();
        let prioritized_recommendations = prioritize(&domain_results, self.max_recommendations);

        let grade = grade_for(percentage);
        info!(
            industry = %profile.industry,
            score = percentage,
            ?grade,
            gaps = total_gaps,
            "gap analysis complete"
        );

        GapAnalysisResult {
            overall_score: OverallScore { percentage, grade },
            domain_results,
            prioritized_recommendations,
        }
    }
}

impl Default for GapAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Letter grade bands; monotonic and non-overlapping
fn grade_for(percentage: f64) -> Grade {
    if percentage >= 90.0 {
        Grade::A
    } else if percentage >= 80.0 {
        Grade::B
    } else if percentage >= 70.0 {
        Grade::C
    } else if percentage >= 60.0 {
        Grade::D
    } else {
        Grade::F
    }
}
