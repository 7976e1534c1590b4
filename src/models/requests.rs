use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{skip_malformed, Profile, RelationLogs};
use crate::models::filters::{ExtendedFilters, SortStrategy};

/// Every input of one pipeline run, as a single JSON document
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    #[validate(length(min = 1))]
    pub viewer_profile_id: String,
    /// Profiles that fail to deserialize are dropped from the pool
    #[serde(deserialize_with = "skip_malformed")]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub relations: RelationLogs,
    #[serde(default)]
    #[validate(nested)]
    pub filters: ExtendedFilters,
    #[serde(default = "default_use_preferences")]
    pub use_preferences: bool,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub search: String,
    #[serde(default)]
    pub sort: SortStrategy,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: usize,
    /// Reference time for recency windows; defaults to the load time
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

fn default_use_preferences() -> bool {
    true
}

fn default_page() -> usize {
    1
}
