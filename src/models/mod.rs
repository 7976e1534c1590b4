// Model exports
pub mod domain;
pub mod filters;
pub mod requests;
pub mod responses;

pub use domain::{
    BlockedProfile, CompatibilityWeights, ContactRequest, ContactStatus, DeclinedProfile, Gender, Interest,
    InterestStatus, PartnerPreferences, Profile, ProfileStatus, ProfileView, RelationLogs,
};
pub use filters::{is_wildcard, Bounds, ExtendedFilters, RangeFilter, SortStrategy, ANY};
pub use requests::MatchSnapshot;
pub use responses::{
    ClauseSource, DiagnosticIssue, DiagnosticReport, InteractionStatus, MatchOutcome,
    MatchedProfile, RelationStatus,
};
