use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{EngineError, EngineResult};

/// Sentinel selection meaning "no constraint"
pub const ANY: &str = "any";

pub const MIN_AGE: u8 = 18;
pub const MAX_AGE: u8 = 100;

pub const DEFAULT_AGE_RANGE: RangeFilter = RangeFilter { min: 18, max: 70 };
pub const DEFAULT_INCOME_RANGE: RangeFilter = RangeFilter { min: 0, max: 100 };
pub const DEFAULT_HEIGHT_RANGE: RangeFilter = RangeFilter { min: 120, max: 220 };

/// True when `value` is the "any" sentinel
#[inline]
pub fn is_any(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(ANY)
}

/// True when a selection places no constraint: nothing selected, only
/// blanks, or the "any" sentinel.
///
/// Every reader of an array or scalar clause goes through this check.
pub fn is_wildcard<S: AsRef<str>>(values: &[S]) -> bool {
    values.iter().all(|v| v.as_ref().trim().is_empty())
        || values.iter().any(|v| is_any(v.as_ref()))
}

/// True when the user explicitly picked "any" (as opposed to leaving the
/// clause untouched). An explicit "any" overrides the matching partner
/// preference for the session.
pub fn holds_sentinel<S: AsRef<str>>(values: &[S]) -> bool {
    values.iter().any(|v| is_any(v.as_ref()))
}

/// Inclusive numeric range from a slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeFilter {
    pub min: u32,
    pub max: u32,
}

impl RangeFilter {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Bounds of a numeric clause; `None` is open-ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl Bounds {
    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    #[inline]
    pub fn contains(&self, value: u32) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Viewer's filter-panel selection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtendedFilters {
    pub age_range: RangeFilter,
    pub height_range: RangeFilter,
    pub income_range: RangeFilter,
    pub religions: Vec<String>,
    pub castes: Vec<String>,
    pub mother_tongues: Vec<String>,
    pub marital_status: String,
    pub educations: Vec<String>,
    pub employment_status: String,
    pub occupations: Vec<String>,
    pub countries: Vec<String>,
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub diets: Vec<String>,
    pub drinking: String,
    pub smoking: String,
    pub disability: String,
    pub has_photo: bool,
    pub verified_only: bool,
    pub recently_joined: bool,
    pub recently_active: bool,
    #[validate(range(max = 100))]
    pub profile_completeness: u8,
}

impl Default for ExtendedFilters {
    fn default() -> Self {
        Self {
            age_range: DEFAULT_AGE_RANGE,
            height_range: DEFAULT_HEIGHT_RANGE,
            income_range: DEFAULT_INCOME_RANGE,
            religions: Vec::new(),
            castes: Vec::new(),
            mother_tongues: Vec::new(),
            marital_status: String::new(),
            educations: Vec::new(),
            employment_status: String::new(),
            occupations: Vec::new(),
            countries: Vec::new(),
            states: Vec::new(),
            cities: Vec::new(),
            diets: Vec::new(),
            drinking: String::new(),
            smoking: String::new(),
            disability: String::new(),
            has_photo: false,
            verified_only: false,
            recently_joined: false,
            recently_active: false,
            profile_completeness: 0,
        }
    }
}

impl ExtendedFilters {
    /// Check the selection before it is committed
    pub fn check(&self) -> EngineResult<()> {
        self.validate()?;

        for (field, range) in [
            ("Age", self.age_range),
            ("Height", self.height_range),
            ("Income", self.income_range),
        ] {
            if range.min > range.max {
                return Err(EngineError::InvertedRange {
                    field,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        for bound in [self.age_range.min, self.age_range.max] {
            if bound < MIN_AGE as u32 || bound > MAX_AGE as u32 {
                return Err(EngineError::AgeBoundOutOfRange {
                    value: bound,
                    min: MIN_AGE,
                    max: MAX_AGE,
                });
            }
        }

        Ok(())
    }
}

/// Parse an age bound typed into the filter panel.
///
/// Rejects anything that is not a whole number inside the allowed ages so the
/// field can stay uncommitted while the user is still typing.
pub fn parse_age_bound(raw: &str) -> EngineResult<u8> {
    let trimmed = raw.trim();
    let value: u32 = trimmed
        .parse()
        .map_err(|_| EngineError::InvalidAgeBound(raw.to_string()))?;

    if value < MIN_AGE as u32 || value > MAX_AGE as u32 {
        return Err(EngineError::AgeBoundOutOfRange {
            value,
            min: MIN_AGE,
            max: MAX_AGE,
        });
    }

    Ok(value as u8)
}

/// Commit an age bound when the field loses focus: out-of-range numbers are
/// clamped, non-numeric input falls back to the previous value.
pub fn clamp_age_bound(raw: &str, previous: u8) -> u8 {
    match raw.trim().parse::<u32>() {
        Ok(value) => value.clamp(MIN_AGE as u32, MAX_AGE as u32) as u8,
        Err(_) => previous,
    }
}

/// Ordering applied to the filtered set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortStrategy {
    #[default]
    Newest,
    AgeAsc,
    AgeDesc,
    NameAsc,
    Compatibility,
}
