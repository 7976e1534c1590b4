use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};

use crate::core::diagnostics::{DiagnosticAnalyzer, DEFAULT_MAX_ISSUES, DEFAULT_RESTRICTIVE_AGE_RATIO};
use crate::core::filters::{active_filter_count, ClauseContext, FilterState, PredicateEvaluator};
use crate::core::pagination::{Paginator, DEFAULT_PAGE_SIZE};
use crate::core::relations::build_status_map;
use crate::core::scoring::compatibility_score;
use crate::core::sorting::sort_profiles;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CompatibilityWeights, ExtendedFilters, MatchOutcome, MatchSnapshot, MatchedProfile, Profile,
    RelationLogs, SortStrategy,
};

/// Tunables of the matching pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherOptions {
    pub page_size: usize,
    pub weights: CompatibilityWeights,
    pub restrictive_age_ratio: f64,
    pub max_issues: usize,
    pub recently_joined_days: u32,
    pub recently_active_days: u32,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            weights: CompatibilityWeights::default(),
            restrictive_age_ratio: DEFAULT_RESTRICTIVE_AGE_RATIO,
            max_issues: DEFAULT_MAX_ISSUES,
            recently_joined_days: 30,
            recently_active_days: 7,
        }
    }
}

/// Everything one pipeline run reads
#[derive(Debug, Clone, Copy)]
pub struct MatchInputs<'a> {
    pub viewer: &'a Profile,
    pub profiles: &'a [Profile],
    pub relations: &'a RelationLogs,
    pub filters: &'a ExtendedFilters,
    pub use_preferences: bool,
    /// Committed (debounced) search text
    pub search: &'a str,
    pub sort: SortStrategy,
    /// Reference time for the recency quick filters
    pub now: DateTime<Utc>,
}

impl<'a> MatchInputs<'a> {
    /// Borrow the inputs of a snapshot, resolving the viewer by id.
    ///
    /// `fallback_now` is used when the snapshot carries no reference time.
    pub fn from_snapshot(snapshot: &'a MatchSnapshot, fallback_now: DateTime<Utc>) -> EngineResult<Self> {
        let viewer = snapshot
            .profiles
            .iter()
            .find(|p| p.profile_id == snapshot.viewer_profile_id)
            .ok_or_else(|| EngineError::ViewerNotFound(snapshot.viewer_profile_id.clone()))?;

        Ok(Self {
            viewer,
            profiles: &snapshot.profiles,
            relations: &snapshot.relations,
            filters: &snapshot.filters,
            use_preferences: snapshot.use_preferences,
            search: &snapshot.search,
            sort: snapshot.sort,
            now: snapshot.now.unwrap_or(fallback_now),
        })
    }

    /// Hash of the query the user controls (filters, sort and search).
    ///
    /// Paging state resets whenever this changes.
    pub fn query_fingerprint(&self) -> u64 {
        query_fingerprint(self.filters, self.sort, self.search, self.use_preferences)
    }
}

pub fn query_fingerprint(
    filters: &ExtendedFilters,
    sort: SortStrategy,
    search: &str,
    use_preferences: bool,
) -> u64 {
    let mut hasher = DefaultHasher::new();
    filters.hash(&mut hasher);
    sort.hash(&mut hasher);
    search.trim().to_lowercase().hash(&mut hasher);
    use_preferences.hash(&mut hasher);
    hasher.finish()
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Relation index over the interaction logs
/// 2. Eligibility, relationship, preference and manual filtering
/// 3. Diagnostics (only when nothing survives stage 2)
/// 4. Sorting
/// 5. Pagination
#[derive(Debug, Clone)]
pub struct Matcher {
    options: MatcherOptions,
    paginator: Paginator,
    analyzer: DiagnosticAnalyzer,
}

impl Matcher {
    pub fn new(options: MatcherOptions) -> Self {
        Self {
            paginator: Paginator::new(options.page_size),
            analyzer: DiagnosticAnalyzer::new(options.restrictive_age_ratio, options.max_issues),
            options,
        }
    }

    pub fn with_default_options() -> Self {
        Self::new(MatcherOptions::default())
    }

    pub fn options(&self) -> &MatcherOptions {
        &self.options
    }

    /// Run the full pipeline and return page `page_number` of the results.
    ///
    /// Pure: the same inputs always give the same outcome. An empty result
    /// is not an error; it comes back with a diagnostic report instead.
    pub fn compute(&self, inputs: &MatchInputs<'_>, page_number: usize) -> EngineResult<MatchOutcome> {
        inputs.filters.check()?;

        let viewer = inputs.viewer;
        let statuses = build_status_map(&viewer.profile_id, inputs.relations, inputs.profiles);

        let context = ClauseContext {
            now: inputs.now,
            recently_joined_days: self.options.recently_joined_days,
            recently_active_days: self.options.recently_active_days,
        };
        let state = FilterState {
            filters: inputs.filters,
            use_preferences: inputs.use_preferences,
            search: inputs.search,
            context,
        };
        let prefs = viewer.partner_preferences.as_ref();
        let evaluator = PredicateEvaluator::new(viewer, prefs, state, &statuses);

        let matched: Vec<&Profile> = inputs
            .profiles
            .iter()
            .filter(|profile| evaluator.evaluate(profile))
            .collect();

        tracing::debug!(
            viewer = %viewer.profile_id,
            candidates = inputs.profiles.len(),
            preference_clauses = evaluator.preference_clauses().len(),
            manual_clauses = evaluator.manual_clauses().len(),
            matched = matched.len(),
            "Filtered candidates"
        );

        let diagnostics = matched
            .is_empty()
            .then(|| self.analyzer.analyze(inputs.profiles, &evaluator));

        let total_results = matched.len();
        let sorted = sort_profiles(matched, inputs.sort, prefs, &self.options.weights);
        let page = self
            .paginator
            .page(&sorted, page_number)?
            .iter()
            .map(|profile| MatchedProfile {
                profile: (*profile).clone(),
                status: statuses.get(&profile.profile_id).copied().unwrap_or_default(),
                compatibility: compatibility_score(profile, prefs, &self.options.weights),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            sort = ?inputs.sort,
            page = page_number,
            page_len = page.len(),
            total = total_results,
            "Paged results"
        );

        Ok(MatchOutcome {
            page,
            page_number,
            total_results,
            total_pages: self.paginator.total_pages(total_results),
            active_filter_count: active_filter_count(inputs.filters),
            diagnostics,
        })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_options()
    }
}
