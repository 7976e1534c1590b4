use crate::core::filters::{in_base_pool, FilterClause, FilterKey, FilterValue, PredicateEvaluator};
use crate::models::{ClauseSource, DiagnosticIssue, DiagnosticReport, Profile};

pub const DEFAULT_RESTRICTIVE_AGE_RATIO: f64 = 0.3;
pub const DEFAULT_MAX_ISSUES: usize = 5;

/// Explains an empty result by testing each active clause in isolation
/// against the base pool.
///
/// Costs O(clauses × pool); only run it when the filtered set is empty.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticAnalyzer {
    restrictive_age_ratio: f64,
    max_issues: usize,
}

impl DiagnosticAnalyzer {
    pub fn new(restrictive_age_ratio: f64, max_issues: usize) -> Self {
        Self {
            restrictive_age_ratio,
            max_issues,
        }
    }

    pub fn analyze(&self, profiles: &[Profile], evaluator: &PredicateEvaluator<'_>) -> DiagnosticReport {
        let viewer = evaluator.viewer();
        let pool: Vec<&Profile> = profiles.iter().filter(|p| in_base_pool(p, viewer)).collect();

        if pool.is_empty() {
            tracing::debug!(viewer = %viewer.profile_id, "Base pool is empty");
            return DiagnosticReport::NoEligibleCandidates;
        }

        let ctx = evaluator.context();
        let issues: Vec<DiagnosticIssue> = evaluator
            .preference_clauses()
            .iter()
            .chain(evaluator.manual_clauses())
            .filter_map(|clause| {
                let match_count = pool.iter().filter(|p| clause.admits(p, ctx)).count();
                self.is_restrictive(clause, match_count, pool.len())
                    .then(|| issue(clause, match_count, pool.len()))
            })
            .take(self.max_issues)
            .collect();

        tracing::debug!(
            base_pool = pool.len(),
            issues = issues.len(),
            "Diagnosed empty result"
        );

        if issues.is_empty() {
            DiagnosticReport::CombinedFilters {
                base_pool_size: pool.len(),
            }
        } else {
            DiagnosticReport::RestrictiveFilters {
                base_pool_size: pool.len(),
                issues,
            }
        }
    }

    fn is_restrictive(&self, clause: &FilterClause<'_>, match_count: usize, pool_size: usize) -> bool {
        if match_count == 0 {
            return true;
        }
        clause.key == FilterKey::Age
            && (match_count as f64) < pool_size as f64 * self.restrictive_age_ratio
    }
}

impl Default for DiagnosticAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_RESTRICTIVE_AGE_RATIO, DEFAULT_MAX_ISSUES)
    }
}

fn issue(clause: &FilterClause<'_>, match_count: usize, pool_size: usize) -> DiagnosticIssue {
    DiagnosticIssue {
        filter_key: clause.key.control_id().to_string(),
        label: clause.key.label().to_string(),
        match_count,
        suggestion: suggestion(clause, match_count, pool_size),
        source: clause.source,
    }
}

fn suggestion(clause: &FilterClause<'_>, match_count: usize, pool_size: usize) -> String {
    let label = clause.key.label().to_lowercase();
    let advice = match (&clause.value, clause.key) {
        (FilterValue::Range(bounds), FilterKey::Age) if match_count > 0 => {
            return format!(
                "Only {match_count} of {pool_size} profiles are aged {}; try widening the age range",
                describe_bounds(bounds.min, bounds.max)
            );
        }
        (FilterValue::Range(bounds), _) => format!(
            "No profiles have {label} {}; try widening the range",
            describe_bounds(bounds.min, bounds.max)
        ),
        (FilterValue::Set(_) | FilterValue::Scalar(_), _) => {
            format!("No profiles match your {label} selection; add more options or choose Any")
        }
        (FilterValue::Flag, _) => format!("No profiles match \"{label}\"; try switching it off"),
        (FilterValue::Threshold(min), _) => {
            format!("No profiles are at least {min}% complete; try lowering the threshold")
        }
        (FilterValue::Text(query), _) => {
            format!("No profiles match \"{query}\"; check the spelling or clear the search")
        }
    };

    match clause.source {
        ClauseSource::Preference => {
            format!("{advice} in your partner preferences, or turn off Smart Matching")
        }
        ClauseSource::Manual => advice,
    }
}

fn describe_bounds(min: Option<u32>, max: Option<u32>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("between {min} and {max}"),
        (Some(min), None) => format!("of at least {min}"),
        (None, Some(max)) => format!("of at most {max}"),
        (None, None) => "in any range".to_string(),
    }
}
