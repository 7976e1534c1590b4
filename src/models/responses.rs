use serde::{Deserialize, Serialize};

use crate::models::domain::Profile;

/// Interaction history between the viewer and one candidate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionStatus {
    pub is_new: bool,
    pub is_viewed: bool,
    pub interest_sent: bool,
    pub interest_received: bool,
    pub interest_accepted: bool,
    pub interest_declined: bool,
    pub interest_expired: bool,
    pub contact_request_sent: bool,
    pub contact_request_received: bool,
    pub contact_request_accepted: bool,
    pub can_chat: bool,
}

/// Relationship state of one candidate as seen by the viewer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationStatus {
    pub is_declined_by_me: bool,
    pub is_declined_by_them: bool,
    pub is_blocked: bool,
    pub is_blocked_by_them: bool,
    pub interaction_status: InteractionStatus,
}

/// Where a filter clause came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseSource {
    Preference,
    Manual,
}

/// One clause that empties (or nearly empties) the result on its own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticIssue {
    /// Id of the filter control to focus
    pub filter_key: String,
    pub label: String,
    pub match_count: usize,
    pub suggestion: String,
    pub source: ClauseSource,
}

/// Why the filtered set came back empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum DiagnosticReport {
    /// Nobody passes identity, gender and verification checks; loosening
    /// filters would not help.
    NoEligibleCandidates,
    /// Individual clauses that are too strict, in evaluation order
    RestrictiveFilters {
        #[serde(rename = "basePoolSize")]
        base_pool_size: usize,
        issues: Vec<DiagnosticIssue>,
    },
    /// Every clause admits someone alone; only their combination (or
    /// blocks and declines) leaves nobody.
    CombinedFilters {
        #[serde(rename = "basePoolSize")]
        base_pool_size: usize,
    },
}

impl DiagnosticReport {
    pub fn issues(&self) -> &[DiagnosticIssue] {
        match self {
            DiagnosticReport::RestrictiveFilters { issues, .. } => issues,
            _ => &[],
        }
    }
}

/// A candidate on the current page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedProfile {
    pub profile: Profile,
    pub status: RelationStatus,
    pub compatibility: u32,
}

/// Result of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub page: Vec<MatchedProfile>,
    pub page_number: usize,
    pub total_results: usize,
    pub total_pages: usize,
    pub active_filter_count: usize,
    pub diagnostics: Option<DiagnosticReport>,
}
