use std::collections::{HashMap, HashSet};

use crate::models::{
    ContactStatus, InteractionStatus, InterestStatus, Profile, RelationLogs, RelationStatus,
};

/// Per-candidate relationship state, keyed by profile id
pub type StatusMap = HashMap<String, RelationStatus>;

/// O(1) lookup view over the relationship logs of one viewer.
///
/// Every log is scanned once and folded into sets and maps keyed by the
/// counterpart's profile id, so deriving the status of N candidates costs
/// O(N + E) instead of rescanning E edges per candidate.
#[derive(Debug, Default)]
pub struct RelationIndex<'a> {
    declined_by_me: HashSet<&'a str>,
    declined_by_them: HashSet<&'a str>,
    blocked_by_me: HashSet<&'a str>,
    blocked_by_them: HashSet<&'a str>,
    viewed: HashSet<&'a str>,
    interest_sent: HashMap<&'a str, InterestStatus>,
    interest_received: HashMap<&'a str, InterestStatus>,
    interest_accepted: HashSet<&'a str>,
    interest_expired: HashSet<&'a str>,
    contact_sent: HashSet<&'a str>,
    contact_received: HashSet<&'a str>,
    contact_accepted: HashSet<&'a str>,
}

/// Both ids of a directed edge, or `None` when either is missing or blank
#[inline]
fn edge<'a>(from: &'a Option<String>, to: &'a Option<String>) -> Option<(&'a str, &'a str)> {
    let from = from.as_deref().filter(|id| !id.is_empty())?;
    let to = to.as_deref().filter(|id| !id.is_empty())?;
    Some((from, to))
}

impl<'a> RelationIndex<'a> {
    /// Index every log relative to `viewer_id`
    pub fn build(viewer_id: &str, logs: &'a RelationLogs) -> Self {
        let mut index = Self::default();
        let mut skipped = 0usize;

        for decline in &logs.declines {
            let Some((decliner, declined)) =
                edge(&decline.decliner_profile_id, &decline.declined_profile_id)
            else {
                skipped += 1;
                continue;
            };
            if decline.is_reconsidered {
                continue;
            }
            if decliner == viewer_id {
                index.declined_by_me.insert(declined);
            } else if declined == viewer_id {
                index.declined_by_them.insert(decliner);
            }
        }

        for block in &logs.blocks {
            let Some((blocker, blocked)) = edge(&block.blocker_profile_id, &block.blocked_profile_id)
            else {
                skipped += 1;
                continue;
            };
            if block.is_unblocked {
                continue;
            }
            if blocker == viewer_id {
                index.blocked_by_me.insert(blocked);
            } else if blocked == viewer_id {
                index.blocked_by_them.insert(blocker);
            }
        }

        for view in &logs.views {
            let Some((viewer, viewed)) = edge(&view.viewer_profile_id, &view.viewed_profile_id) else {
                skipped += 1;
                continue;
            };
            if viewer == viewer_id {
                index.viewed.insert(viewed);
            }
        }

        for interest in &logs.interests {
            let Some((from, to)) = edge(&interest.from_profile_id, &interest.to_profile_id) else {
                skipped += 1;
                continue;
            };
            let counterpart = if from == viewer_id {
                index.interest_sent.insert(to, interest.status);
                to
            } else if to == viewer_id {
                index.interest_received.insert(from, interest.status);
                from
            } else {
                continue;
            };
            match interest.status {
                InterestStatus::Accepted => {
                    index.interest_accepted.insert(counterpart);
                }
                InterestStatus::Expired => {
                    index.interest_expired.insert(counterpart);
                }
                InterestStatus::Pending | InterestStatus::Declined => {}
            }
        }

        for request in &logs.contact_requests {
            let Some((from, to)) = edge(&request.from_profile_id, &request.to_profile_id) else {
                skipped += 1;
                continue;
            };
            let counterpart = if from == viewer_id {
                index.contact_sent.insert(to);
                to
            } else if to == viewer_id {
                index.contact_received.insert(from);
                from
            } else {
                continue;
            };
            if request.status == ContactStatus::Approved {
                index.contact_accepted.insert(counterpart);
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, "Skipped relationship log entries without ids");
        }

        index
    }

    /// Status of one counterpart, O(1)
    pub fn status_for(&self, profile_id: &str) -> RelationStatus {
        let sent = self.interest_sent.get(profile_id).copied();
        let received = self.interest_received.get(profile_id).copied();
        let is_live = |status: Option<InterestStatus>| {
            matches!(status, Some(InterestStatus::Pending | InterestStatus::Accepted))
        };

        let is_declined_by_me = self.declined_by_me.contains(profile_id);
        let is_declined_by_them = self.declined_by_them.contains(profile_id);
        let is_viewed = self.viewed.contains(profile_id);
        let interest_sent = is_live(sent);
        let interest_received = is_live(received);
        let interest_accepted = self.interest_accepted.contains(profile_id);
        let interest_declined = sent == Some(InterestStatus::Declined);
        let interest_expired = self.interest_expired.contains(profile_id);
        let contact_request_sent = self.contact_sent.contains(profile_id);
        let contact_request_received = self.contact_received.contains(profile_id);
        let contact_request_accepted = self.contact_accepted.contains(profile_id);

        let has_history = is_viewed
            || sent.is_some()
            || received.is_some()
            || contact_request_sent
            || contact_request_received
            || is_declined_by_me
            || is_declined_by_them
            || interest_declined
            || interest_expired;

        RelationStatus {
            is_declined_by_me,
            is_declined_by_them,
            is_blocked: self.blocked_by_me.contains(profile_id),
            is_blocked_by_them: self.blocked_by_them.contains(profile_id),
            interaction_status: InteractionStatus {
                is_new: !has_history,
                is_viewed,
                interest_sent,
                interest_received,
                interest_accepted,
                interest_declined,
                interest_expired,
                contact_request_sent,
                contact_request_received,
                contact_request_accepted,
                can_chat: interest_accepted,
            },
        }
    }

    /// Status of every profile in the pool
    pub fn status_map(&self, profiles: &[Profile]) -> StatusMap {
        profiles
            .iter()
            .map(|p| (p.profile_id.clone(), self.status_for(&p.profile_id)))
            .collect()
    }
}

/// Build the status map for `profiles` in one pass over logs and pool
pub fn build_status_map(viewer_id: &str, logs: &RelationLogs, profiles: &[Profile]) -> StatusMap {
    RelationIndex::build(viewer_id, logs).status_map(profiles)
}
