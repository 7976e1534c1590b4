use crate::core::filters::matches_text;
use crate::models::{is_wildcard, CompatibilityWeights, PartnerPreferences, Profile};

/// Compatibility of a candidate with the viewer's partner preferences
///
/// Scoring formula (default weights):
/// score = (
///     2 * religion match +
///     2 * mother tongue match +
///     1 * education match +          # substring, "Bachelor" ~ "Bachelor of Arts"
///     1 * living country match +
///     1 * diet match +
///     1 * has readiness badge +
///     1 * has at least one photo
/// )
///
/// A preference list left empty or set to "any" awards nothing.
pub fn compatibility_score(
    profile: &Profile,
    preferences: Option<&PartnerPreferences>,
    weights: &CompatibilityWeights,
) -> u32 {
    let mut score = 0;

    if let Some(prefs) = preferences {
        let attributes: [(&[String], Option<&str>, u32); 5] = [
            (&prefs.religions, profile.religion.as_deref(), weights.religion),
            (&prefs.mother_tongues, profile.mother_tongue.as_deref(), weights.mother_tongue),
            (&prefs.educations, profile.education.as_deref(), weights.education),
            (&prefs.countries, profile.country.as_deref(), weights.country),
            (&prefs.diets, profile.diet.as_deref(), weights.diet),
        ];

        for (accepted, field, points) in attributes {
            if !is_wildcard(accepted) && matches_text(field, accepted) {
                score += points;
            }
        }
    }

    if profile.has_readiness_badge() {
        score += weights.readiness_badge;
    }
    if profile.has_photo() {
        score += weights.photo;
    }

    score
}
