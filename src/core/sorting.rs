use std::cmp::Ordering;

use deunicode::deunicode;

use crate::core::scoring::compatibility_score;
use crate::models::{CompatibilityWeights, PartnerPreferences, Profile, SortStrategy};

/// Profile with its original position and precomputed sort keys
struct Decorated<'p> {
    index: usize,
    profile: &'p Profile,
    score: u32,
    name_key: String,
}

/// Orders `Some` values with `cmp` and puts `None` after all of them
#[inline]
fn missing_last<T: Ord>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Accent-folded, case-insensitive collation key
fn collation_key(profile: &Profile) -> String {
    deunicode(&profile.full_name()).to_lowercase()
}

/// Sort profiles by `strategy`.
///
/// Ties keep their input order: every comparison falls back to the original
/// index, so profiles sharing a timestamp never swap places between runs.
/// Profiles missing the sort key go last.
pub fn sort_profiles<'p>(
    profiles: Vec<&'p Profile>,
    strategy: SortStrategy,
    viewer_preferences: Option<&PartnerPreferences>,
    weights: &CompatibilityWeights,
) -> Vec<&'p Profile> {
    let mut decorated: Vec<Decorated<'p>> = profiles
        .into_iter()
        .enumerate()
        .map(|(index, profile)| Decorated {
            index,
            profile,
            score: match strategy {
                SortStrategy::Compatibility => {
                    compatibility_score(profile, viewer_preferences, weights)
                }
                _ => 0,
            },
            name_key: match strategy {
                SortStrategy::NameAsc => collation_key(profile),
                _ => String::new(),
            },
        })
        .collect();

    decorated.sort_unstable_by(|a, b| {
        let primary = match strategy {
            SortStrategy::Newest => {
                missing_last(a.profile.created_at, b.profile.created_at, |x, y| y.cmp(x))
            }
            SortStrategy::AgeAsc => missing_last(a.profile.age, b.profile.age, |x, y| x.cmp(y)),
            SortStrategy::AgeDesc => missing_last(a.profile.age, b.profile.age, |x, y| y.cmp(x)),
            SortStrategy::NameAsc => missing_last(
                Some(a.name_key.as_str()).filter(|k| !k.is_empty()),
                Some(b.name_key.as_str()).filter(|k| !k.is_empty()),
                |x, y| x.cmp(y),
            ),
            SortStrategy::Compatibility => b.score.cmp(&a.score),
        };
        primary.then(a.index.cmp(&b.index))
    });

    decorated.into_iter().map(|d| d.profile).collect()
}
