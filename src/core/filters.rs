use chrono::{DateTime, Duration, Utc};

use crate::core::normalize::{height_to_cm, income_to_units};
use crate::core::relations::StatusMap;
use crate::models::filters::{holds_sentinel, DEFAULT_AGE_RANGE, DEFAULT_HEIGHT_RANGE, DEFAULT_INCOME_RANGE};
use crate::models::{
    is_wildcard, Bounds, ClauseSource, ExtendedFilters, PartnerPreferences, Profile, RangeFilter,
    RelationStatus,
};

/// Attribute a filter clause constrains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Age,
    Height,
    Income,
    Religion,
    Caste,
    MotherTongue,
    MaritalStatus,
    Education,
    EmploymentStatus,
    Occupation,
    Country,
    State,
    City,
    Diet,
    Drinking,
    Smoking,
    Disability,
    HasPhoto,
    VerifiedOnly,
    RecentlyJoined,
    RecentlyActive,
    ProfileCompleteness,
    Search,
}

impl FilterKey {
    /// Id of the filter-panel control for this attribute
    pub fn control_id(self) -> &'static str {
        match self {
            FilterKey::Age => "age-filter",
            FilterKey::Height => "height-filter",
            FilterKey::Income => "income-filter",
            FilterKey::Religion => "religion-filter",
            FilterKey::Caste => "caste-filter",
            FilterKey::MotherTongue => "mother-tongue-filter",
            FilterKey::MaritalStatus => "marital-status-filter",
            FilterKey::Education => "education-filter",
            FilterKey::EmploymentStatus => "employment-filter",
            FilterKey::Occupation => "occupation-filter",
            FilterKey::Country => "country-filter",
            FilterKey::State => "state-filter",
            FilterKey::City => "city-filter",
            FilterKey::Diet => "diet-filter",
            FilterKey::Drinking => "drinking-filter",
            FilterKey::Smoking => "smoking-filter",
            FilterKey::Disability => "disability-filter",
            FilterKey::HasPhoto => "photo-filter",
            FilterKey::VerifiedOnly => "verified-filter",
            FilterKey::RecentlyJoined => "recently-joined-filter",
            FilterKey::RecentlyActive => "recently-active-filter",
            FilterKey::ProfileCompleteness => "completeness-filter",
            FilterKey::Search => "search-input",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterKey::Age => "Age",
            FilterKey::Height => "Height",
            FilterKey::Income => "Income",
            FilterKey::Religion => "Religion",
            FilterKey::Caste => "Caste",
            FilterKey::MotherTongue => "Mother tongue",
            FilterKey::MaritalStatus => "Marital status",
            FilterKey::Education => "Education",
            FilterKey::EmploymentStatus => "Employment",
            FilterKey::Occupation => "Occupation",
            FilterKey::Country => "Country",
            FilterKey::State => "State",
            FilterKey::City => "City",
            FilterKey::Diet => "Diet",
            FilterKey::Drinking => "Drinking",
            FilterKey::Smoking => "Smoking",
            FilterKey::Disability => "Disability",
            FilterKey::HasPhoto => "With photo",
            FilterKey::VerifiedOnly => "Verified only",
            FilterKey::RecentlyJoined => "Recently joined",
            FilterKey::RecentlyActive => "Recently active",
            FilterKey::ProfileCompleteness => "Profile completeness",
            FilterKey::Search => "Search",
        }
    }

    /// Candidate field read by text clauses
    fn field(self, profile: &Profile) -> Option<&str> {
        let value = match self {
            FilterKey::Religion => &profile.religion,
            FilterKey::Caste => &profile.caste,
            FilterKey::MotherTongue => &profile.mother_tongue,
            FilterKey::MaritalStatus => &profile.marital_status,
            FilterKey::Education => &profile.education,
            FilterKey::EmploymentStatus => &profile.employment_status,
            FilterKey::Occupation => &profile.occupation,
            FilterKey::Country => &profile.country,
            FilterKey::State => &profile.state,
            FilterKey::City => &profile.city,
            FilterKey::Diet => &profile.diet,
            FilterKey::Drinking => &profile.drinking,
            FilterKey::Smoking => &profile.smoking,
            FilterKey::Disability => &profile.disability,
            _ => return None,
        };
        value.as_deref()
    }
}

/// Value of one clause, tagged by attribute kind
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue<'a> {
    /// Single-select control
    Scalar(&'a str),
    /// Multi-select control or preference list
    Set(&'a [String]),
    Range(Bounds),
    /// Boolean quick filter; only present when switched on
    Flag,
    /// Minimum profile completeness percentage
    Threshold(u8),
    /// Lowercased search query
    Text(String),
}

/// One active constraint
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause<'a> {
    pub key: FilterKey,
    pub source: ClauseSource,
    pub value: FilterValue<'a>,
}

/// Time inputs of the recency quick filters
#[derive(Debug, Clone, Copy)]
pub struct ClauseContext {
    pub now: DateTime<Utc>,
    pub recently_joined_days: u32,
    pub recently_active_days: u32,
}

impl ClauseContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            recently_joined_days: 30,
            recently_active_days: 7,
        }
    }

    #[inline]
    fn within(&self, at: Option<DateTime<Utc>>, days: u32) -> bool {
        at.is_some_and(|at| at >= self.now - Duration::days(days as i64))
    }
}

/// Case-insensitive set membership with substring tolerance
/// ("Bachelor" accepts "Bachelor of Engineering").
#[inline]
pub fn matches_text<S: AsRef<str>>(field: Option<&str>, accepted: &[S]) -> bool {
    if is_wildcard(accepted) {
        return true;
    }
    let Some(field) = field.map(|f| f.trim().to_lowercase()).filter(|f| !f.is_empty()) else {
        return false;
    };
    accepted
        .iter()
        .map(|a| a.as_ref().trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .any(|a| field == a || field.contains(&a))
}

impl FilterClause<'_> {
    /// Whether `profile` satisfies this clause on its own
    pub fn admits(&self, profile: &Profile, ctx: &ClauseContext) -> bool {
        match &self.value {
            FilterValue::Scalar(value) => self.admits_text(profile, &[*value]),
            FilterValue::Set(values) => self.admits_text(profile, values),
            FilterValue::Range(bounds) => admits_range(self.key, bounds, profile),
            FilterValue::Flag => match self.key {
                FilterKey::HasPhoto => profile.has_photo(),
                FilterKey::VerifiedOnly => profile.is_verified(),
                FilterKey::RecentlyJoined => ctx.within(profile.created_at, ctx.recently_joined_days),
                FilterKey::RecentlyActive => ctx.within(profile.last_seen_at(), ctx.recently_active_days),
                _ => true,
            },
            FilterValue::Threshold(min) => profile.completeness() >= *min,
            FilterValue::Text(query) => {
                profile.full_name().to_lowercase().contains(query.as_str())
                    || profile.location().to_lowercase().contains(query.as_str())
                    || profile.profile_id.to_lowercase().contains(query.as_str())
            }
        }
    }

    fn admits_text<S: AsRef<str>>(&self, profile: &Profile, accepted: &[S]) -> bool {
        if self.key == FilterKey::Occupation {
            return matches_text(profile.occupation.as_deref(), accepted)
                || matches_text(profile.position.as_deref(), accepted);
        }
        matches_text(self.key.field(profile), accepted)
    }
}

fn admits_range(key: FilterKey, bounds: &Bounds, profile: &Profile) -> bool {
    match key {
        FilterKey::Age => profile.age.is_some_and(|age| bounds.contains(age as u32)),
        // Unparseable heights are never excluded
        FilterKey::Height => {
            let cm = height_to_cm(profile.height.as_deref());
            cm == 0 || bounds.contains(cm)
        }
        // Missing income only fails a range with a positive floor
        FilterKey::Income => match income_to_units(profile.salary.as_deref()) {
            Some(units) => bounds.contains(units),
            None => bounds.min.map_or(true, |min| min == 0),
        },
        _ => true,
    }
}

/// Current manual selection for a text attribute, or an empty slice
fn manual_selection(filters: &ExtendedFilters, key: FilterKey) -> &[String] {
    match key {
        FilterKey::Religion => &filters.religions,
        FilterKey::Caste => &filters.castes,
        FilterKey::MotherTongue => &filters.mother_tongues,
        FilterKey::MaritalStatus => std::slice::from_ref(&filters.marital_status),
        FilterKey::Education => &filters.educations,
        FilterKey::EmploymentStatus => std::slice::from_ref(&filters.employment_status),
        FilterKey::Occupation => &filters.occupations,
        FilterKey::Country => &filters.countries,
        FilterKey::State => &filters.states,
        FilterKey::City => &filters.cities,
        FilterKey::Diet => &filters.diets,
        FilterKey::Drinking => std::slice::from_ref(&filters.drinking),
        FilterKey::Smoking => std::slice::from_ref(&filters.smoking),
        FilterKey::Disability => std::slice::from_ref(&filters.disability),
        _ => &[],
    }
}

fn range_bounds(key: FilterKey, range: RangeFilter) -> Bounds {
    match key {
        // The income slider's top stop means "and above"
        FilterKey::Income if range.max >= DEFAULT_INCOME_RANGE.max => Bounds {
            min: Some(range.min),
            max: None,
        },
        _ => Bounds {
            min: Some(range.min),
            max: Some(range.max),
        },
    }
}

/// Clauses derived from the viewer's partner preferences, in diagnostic order.
///
/// A preference is dropped when its list is a wildcard, or when the user
/// explicitly chose "any" for the same attribute in the filter panel.
pub fn preference_clauses<'a>(
    prefs: &'a PartnerPreferences,
    filters: &ExtendedFilters,
) -> Vec<FilterClause<'a>> {
    let mut clauses = Vec::new();
    let push_range = |clauses: &mut Vec<FilterClause<'a>>, key, bounds: Bounds| {
        if !bounds.is_open() {
            clauses.push(FilterClause {
                key,
                source: ClauseSource::Preference,
                value: FilterValue::Range(bounds),
            });
        }
    };

    push_range(
        &mut clauses,
        FilterKey::Age,
        Bounds {
            min: prefs.min_age.map(u32::from),
            max: prefs.max_age.map(u32::from),
        },
    );

    let lists: [(FilterKey, &'a [String]); 12] = [
        (FilterKey::Religion, &prefs.religions),
        (FilterKey::Education, &prefs.educations),
        (FilterKey::MotherTongue, &prefs.mother_tongues),
        (FilterKey::Country, &prefs.countries),
        (FilterKey::Diet, &prefs.diets),
        (FilterKey::Occupation, &prefs.occupations),
        (FilterKey::Caste, &prefs.castes),
        (FilterKey::MaritalStatus, &prefs.marital_statuses),
        (FilterKey::State, &prefs.states),
        (FilterKey::City, &prefs.cities),
        (FilterKey::Drinking, &prefs.drinking),
        (FilterKey::Smoking, &prefs.smoking),
    ];
    for (key, values) in lists {
        if is_wildcard(values) || holds_sentinel(manual_selection(filters, key)) {
            continue;
        }
        clauses.push(FilterClause {
            key,
            source: ClauseSource::Preference,
            value: FilterValue::Set(values),
        });
    }

    push_range(
        &mut clauses,
        FilterKey::Height,
        Bounds {
            min: prefs.min_height_cm,
            max: prefs.max_height_cm,
        },
    );
    push_range(
        &mut clauses,
        FilterKey::Income,
        Bounds {
            min: prefs.min_income,
            max: prefs.max_income,
        },
    );

    clauses
}

/// Active filter-panel clauses in panel order, followed by the search query
pub fn manual_clauses<'a>(filters: &'a ExtendedFilters, search: &str) -> Vec<FilterClause<'a>> {
    let mut clauses = Vec::new();
    let manual = |key, value| FilterClause {
        key,
        source: ClauseSource::Manual,
        value,
    };

    for (key, range, default) in [
        (FilterKey::Age, filters.age_range, DEFAULT_AGE_RANGE),
        (FilterKey::Height, filters.height_range, DEFAULT_HEIGHT_RANGE),
        (FilterKey::Income, filters.income_range, DEFAULT_INCOME_RANGE),
    ] {
        if range != default {
            clauses.push(manual(key, FilterValue::Range(range_bounds(key, range))));
        }
    }

    let sets: [(FilterKey, &'a [String]); 4] = [
        (FilterKey::Religion, &filters.religions),
        (FilterKey::Caste, &filters.castes),
        (FilterKey::MotherTongue, &filters.mother_tongues),
        (FilterKey::Education, &filters.educations),
    ];
    let scalars_mid: [(FilterKey, &'a str); 2] = [
        (FilterKey::MaritalStatus, &filters.marital_status),
        (FilterKey::EmploymentStatus, &filters.employment_status),
    ];
    let sets_tail: [(FilterKey, &'a [String]); 5] = [
        (FilterKey::Occupation, &filters.occupations),
        (FilterKey::Country, &filters.countries),
        (FilterKey::State, &filters.states),
        (FilterKey::City, &filters.cities),
        (FilterKey::Diet, &filters.diets),
    ];
    let scalars_tail: [(FilterKey, &'a str); 3] = [
        (FilterKey::Drinking, &filters.drinking),
        (FilterKey::Smoking, &filters.smoking),
        (FilterKey::Disability, &filters.disability),
    ];

    for (key, values) in sets {
        if !is_wildcard(values) {
            clauses.push(manual(key, FilterValue::Set(values)));
        }
    }
    for (key, value) in scalars_mid {
        if !is_wildcard(&[value]) {
            clauses.push(manual(key, FilterValue::Scalar(value)));
        }
    }
    for (key, values) in sets_tail {
        if !is_wildcard(values) {
            clauses.push(manual(key, FilterValue::Set(values)));
        }
    }
    for (key, value) in scalars_tail {
        if !is_wildcard(&[value]) {
            clauses.push(manual(key, FilterValue::Scalar(value)));
        }
    }

    for (key, on) in [
        (FilterKey::HasPhoto, filters.has_photo),
        (FilterKey::VerifiedOnly, filters.verified_only),
        (FilterKey::RecentlyJoined, filters.recently_joined),
        (FilterKey::RecentlyActive, filters.recently_active),
    ] {
        if on {
            clauses.push(manual(key, FilterValue::Flag));
        }
    }

    if filters.profile_completeness > 0 {
        clauses.push(manual(
            FilterKey::ProfileCompleteness,
            FilterValue::Threshold(filters.profile_completeness),
        ));
    }

    let query = search.trim().to_lowercase();
    if !query.is_empty() {
        clauses.push(manual(FilterKey::Search, FilterValue::Text(query)));
    }

    clauses
}

/// Number of filter-panel clauses currently constraining results
pub fn active_filter_count(filters: &ExtendedFilters) -> usize {
    manual_clauses(filters, "").len()
}

/// Identity, verification, deletion and gender checks.
///
/// Profiles passing this form the base pool that diagnostics count against.
#[inline]
pub fn in_base_pool(profile: &Profile, viewer: &Profile) -> bool {
    passes_identity(profile, viewer) && passes_gender(profile, viewer)
}

#[inline]
fn passes_identity(profile: &Profile, viewer: &Profile) -> bool {
    profile.profile_id != viewer.profile_id && profile.is_verified() && !profile.is_deleted
}

/// Strict male <-> female complementarity
#[inline]
fn passes_gender(profile: &Profile, viewer: &Profile) -> bool {
    match (viewer.gender, profile.gender) {
        (Some(mine), Some(theirs)) => theirs == mine.opposite(),
        _ => false,
    }
}

#[inline]
fn passes_blocks(status: Option<&RelationStatus>) -> bool {
    status.map_or(true, |s| !s.is_blocked && !s.is_blocked_by_them)
}

/// Hidden when I declined them, or when they declined my interest
#[inline]
fn passes_declines(status: Option<&RelationStatus>) -> bool {
    status.map_or(true, |s| !s.is_declined_by_me && !s.interaction_status.interest_declined)
}

/// Inputs the predicate reads besides the candidate itself
#[derive(Debug, Clone, Copy)]
pub struct FilterState<'a> {
    pub filters: &'a ExtendedFilters,
    pub use_preferences: bool,
    pub search: &'a str,
    pub context: ClauseContext,
}

/// Per-profile match predicate with its clauses compiled once per run
#[derive(Debug)]
pub struct PredicateEvaluator<'a> {
    viewer: &'a Profile,
    statuses: &'a StatusMap,
    preference_clauses: Vec<FilterClause<'a>>,
    manual_clauses: Vec<FilterClause<'a>>,
    context: ClauseContext,
}

impl<'a> PredicateEvaluator<'a> {
    pub fn new(
        viewer: &'a Profile,
        prefs: Option<&'a PartnerPreferences>,
        state: FilterState<'a>,
        statuses: &'a StatusMap,
    ) -> Self {
        let preference_clauses = match prefs {
            Some(prefs) if state.use_preferences => preference_clauses(prefs, state.filters),
            _ => Vec::new(),
        };

        Self {
            viewer,
            statuses,
            preference_clauses,
            manual_clauses: manual_clauses(state.filters, state.search),
            context: state.context,
        }
    }

    pub fn preference_clauses(&self) -> &[FilterClause<'a>] {
        &self.preference_clauses
    }

    pub fn manual_clauses(&self) -> &[FilterClause<'a>] {
        &self.manual_clauses
    }

    pub fn context(&self) -> &ClauseContext {
        &self.context
    }

    pub fn viewer(&self) -> &'a Profile {
        self.viewer
    }

    /// Whether `profile` belongs in the viewer's results
    pub fn evaluate(&self, profile: &Profile) -> bool {
        let status = self.statuses.get(&profile.profile_id);

        passes_identity(profile, self.viewer)
            && passes_blocks(status)
            && passes_declines(status)
            && passes_gender(profile, self.viewer)
            && self
                .preference_clauses
                .iter()
                .all(|clause| clause.admits(profile, &self.context))
            && self
                .manual_clauses
                .iter()
                .all(|clause| clause.admits(profile, &self.context))
    }
}

/// One-shot form of [`PredicateEvaluator::evaluate`]
pub fn evaluate(
    profile: &Profile,
    viewer: &Profile,
    state: FilterState<'_>,
    prefs: Option<&PartnerPreferences>,
    statuses: &StatusMap,
) -> bool {
    PredicateEvaluator::new(viewer, prefs, state, statuses).evaluate(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, ProfileStatus};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn create_viewer() -> Profile {
        Profile {
            profile_id: "viewer".to_string(),
            first_name: "Ravi".to_string(),
            age: Some(30),
            gender: Some(Gender::Male),
            status: ProfileStatus::Verified,
            ..Default::default()
        }
    }

    fn create_test_profile(id: &str, age: u8, religion: &str) -> Profile {
        Profile {
            profile_id: id.to_string(),
            first_name: "Priya".to_string(),
            last_name: "Sharma".to_string(),
            age: Some(age),
            gender: Some(Gender::Female),
            religion: Some(religion.to_string()),
            city: Some("Pune".to_string()),
            country: Some("India".to_string()),
            height: Some("5'4\"".to_string()),
            salary: Some("12 LPA".to_string()),
            status: ProfileStatus::Verified,
            ..Default::default()
        }
    }

    fn state(filters: &ExtendedFilters) -> FilterState<'_> {
        FilterState {
            filters,
            use_preferences: false,
            search: "",
            context: ClauseContext::new(now()),
        }
    }

    fn passes(profile: &Profile, filters: &ExtendedFilters) -> bool {
        let statuses = StatusMap::new();
        evaluate(profile, &create_viewer(), state(filters), None, &statuses)
    }

    #[test]
    fn test_eligibility_checks() {
        let filters = ExtendedFilters::default();
        let profile = create_test_profile("p1", 27, "Hindu");
        assert!(passes(&profile, &filters));

        let mut pending = profile.clone();
        pending.status = ProfileStatus::Pending;
        assert!(!passes(&pending, &filters));

        let mut deleted = profile.clone();
        deleted.is_deleted = true;
        assert!(!passes(&deleted, &filters));

        let mut same_gender = profile.clone();
        same_gender.gender = Some(Gender::Male);
        assert!(!passes(&same_gender, &filters));

        let mut no_gender = profile.clone();
        no_gender.gender = None;
        assert!(!passes(&no_gender, &filters));

        let myself = create_viewer();
        assert!(!passes(&myself, &filters));
    }

    #[test]
    fn test_text_match_is_case_insensitive_substring() {
        let accepted = vec!["bachelor".to_string()];
        assert!(matches_text(Some("Bachelor of Engineering"), &accepted));
        assert!(!matches_text(Some("Masters"), &accepted));
        assert!(!matches_text(None, &accepted));
        assert!(matches_text(None, &["any".to_string()]));
    }

    #[test]
    fn test_manual_religion_filter() {
        let filters = ExtendedFilters {
            religions: vec!["sikh".to_string()],
            ..Default::default()
        };
        assert!(!passes(&create_test_profile("p1", 27, "Hindu"), &filters));
        assert!(passes(&create_test_profile("p2", 27, "Sikh"), &filters));
    }

    #[test]
    fn test_any_sentinel_equals_absent_filter() {
        let any = ExtendedFilters {
            religions: vec!["any".to_string()],
            disability: "any".to_string(),
            ..Default::default()
        };
        let profile = create_test_profile("p1", 27, "Hindu");
        assert_eq!(passes(&profile, &any), passes(&profile, &ExtendedFilters::default()));
        assert_eq!(active_filter_count(&any), 0);
    }

    #[test]
    fn test_income_edges() {
        let mut profile = create_test_profile("p1", 27, "Hindu");
        profile.salary = Some("not disclosed".to_string());

        let from_zero = ExtendedFilters {
            income_range: RangeFilter::new(0, 50),
            ..Default::default()
        };
        assert!(passes(&profile, &from_zero), "missing income passes a zero floor");

        let from_ten = ExtendedFilters {
            income_range: RangeFilter::new(10, 100),
            ..Default::default()
        };
        assert!(!passes(&profile, &from_ten));

        profile.salary = Some("150 LPA".to_string());
        assert!(passes(&profile, &from_ten), "top stop of the slider is open-ended");
    }

    #[test]
    fn test_height_filter_ignores_unparseable_heights() {
        let filters = ExtendedFilters {
            height_range: RangeFilter::new(170, 190),
            ..Default::default()
        };
        let mut profile = create_test_profile("p1", 27, "Hindu");
        assert!(!passes(&profile, &filters), "5'4\" is 163 cm");

        profile.height = Some("average".to_string());
        assert!(passes(&profile, &filters));
    }

    #[test]
    fn test_quick_filters() {
        let mut profile = create_test_profile("p1", 27, "Hindu");
        let filters = ExtendedFilters {
            has_photo: true,
            recently_joined: true,
            ..Default::default()
        };
        assert!(!passes(&profile, &filters));

        profile.photos = vec!["https://cdn/p1.jpg".to_string()];
        profile.created_at = Some(now() - Duration::days(3));
        assert!(passes(&profile, &filters));

        profile.created_at = Some(now() - Duration::days(45));
        assert!(!passes(&profile, &filters));
    }

    #[test]
    fn test_search_matches_name_location_and_id() {
        let profile = create_test_profile("MAT-1042", 27, "Hindu");
        let filters = ExtendedFilters::default();
        let statuses = StatusMap::new();
        let viewer = create_viewer();

        for query in ["priya", "SHARMA", "pune", "mat-10", "  india "] {
            let st = FilterState { search: query, ..state(&filters) };
            assert!(evaluate(&profile, &viewer, st, None, &statuses), "query {query:?}");
        }
        let st = FilterState { search: "delhi", ..state(&filters) };
        assert!(!evaluate(&profile, &viewer, st, None, &statuses));
    }

    #[test]
    fn test_preferences_apply_only_with_smart_matching() {
        let mut viewer = create_viewer();
        viewer.partner_preferences = Some(PartnerPreferences {
            religions: vec!["Sikh".to_string()],
            ..Default::default()
        });
        let profile = create_test_profile("p1", 27, "Hindu");
        let filters = ExtendedFilters::default();
        let statuses = StatusMap::new();
        let prefs = viewer.partner_preferences.as_ref();

        let off = state(&filters);
        assert!(evaluate(&profile, &viewer, off, prefs, &statuses));

        let on = FilterState { use_preferences: true, ..off };
        assert!(!evaluate(&profile, &viewer, on, prefs, &statuses));
    }

    #[test]
    fn test_manual_any_overrides_preference() {
        let prefs = PartnerPreferences {
            religions: vec!["Sikh".to_string()],
            min_age: Some(25),
            max_age: Some(30),
            ..Default::default()
        };
        let untouched = ExtendedFilters::default();
        let keys: Vec<_> = preference_clauses(&prefs, &untouched).iter().map(|c| c.key).collect();
        assert_eq!(keys, vec![FilterKey::Age, FilterKey::Religion]);

        let any = ExtendedFilters {
            religions: vec!["any".to_string()],
            ..Default::default()
        };
        let keys: Vec<_> = preference_clauses(&prefs, &any).iter().map(|c| c.key).collect();
        assert_eq!(keys, vec![FilterKey::Age]);
    }

    #[test]
    fn test_preference_height_range_open_ended() {
        let prefs = PartnerPreferences {
            min_height_cm: Some(160),
            ..Default::default()
        };
        let filters = ExtendedFilters::default();
        let clauses = preference_clauses(&prefs, &filters);
        assert_eq!(clauses.len(), 1);

        let ctx = ClauseContext::new(now());
        let mut profile = create_test_profile("p1", 27, "Hindu");
        assert!(clauses[0].admits(&profile, &ctx));
        profile.height = Some("150 cm".to_string());
        assert!(!clauses[0].admits(&profile, &ctx));
    }

    #[test]
    fn test_blocked_and_declined_are_hidden() {
        let viewer = create_viewer();
        let profile = create_test_profile("p1", 27, "Hindu");
        let filters = ExtendedFilters::default();

        let mut statuses = StatusMap::new();
        statuses.insert(
            "p1".to_string(),
            RelationStatus {
                is_blocked_by_them: true,
                ..Default::default()
            },
        );
        assert!(!evaluate(&profile, &viewer, state(&filters), None, &statuses));

        statuses.insert(
            "p1".to_string(),
            RelationStatus {
                is_declined_by_them: true,
                ..Default::default()
            },
        );
        assert!(
            evaluate(&profile, &viewer, state(&filters), None, &statuses),
            "being declined does not hide the decliner"
        );

        statuses.insert(
            "p1".to_string(),
            RelationStatus {
                is_declined_by_me: true,
                ..Default::default()
            },
        );
        assert!(!evaluate(&profile, &viewer, state(&filters), None, &statuses));
    }

    #[test]
    fn test_active_filter_count() {
        let filters = ExtendedFilters {
            age_range: RangeFilter::new(25, 30),
            religions: vec!["Hindu".to_string()],
            smoking: "no".to_string(),
            has_photo: true,
            profile_completeness: 60,
            ..Default::default()
        };
        assert_eq!(active_filter_count(&filters), 5);
        assert_eq!(active_filter_count(&ExtendedFilters::default()), 0);
    }
}
