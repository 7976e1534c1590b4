use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Gender of a profile. Matching is strictly male <-> female.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "Male", alias = "MALE")]
    Male,
    #[serde(alias = "Female", alias = "FEMALE")]
    Female,
}

impl Gender {
    /// The only gender a profile of this gender is matched against
    pub fn opposite(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

/// Verification state of a profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    #[default]
    Pending,
    Verified,
}

/// Candidate profile as supplied by the profile store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub profile_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<u8>,
    #[serde(default, deserialize_with = "lenient_gender")]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub marital_status: Option<String>,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub caste: Option<String>,
    #[serde(default)]
    pub mother_tongue: Option<String>,
    #[serde(default)]
    pub disability: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub employment_status: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    /// Free text, e.g. "10 LPA"
    #[serde(default)]
    pub salary: Option<String>,
    /// Free text, e.g. `5'8"` or "172 cm"
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub diet: Option<String>,
    #[serde(default)]
    pub drinking: Option<String>,
    #[serde(default)]
    pub smoking: Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: ProfileStatus,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub last_activity_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub readiness_badge: Option<String>,
    #[serde(default)]
    pub partner_preferences: Option<PartnerPreferences>,
}

/// Attributes counted by [`Profile::completeness`]
const COMPLETENESS_FIELDS: usize = 16;

impl Profile {
    pub fn is_verified(&self) -> bool {
        self.status == ProfileStatus::Verified
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// City, state and country joined for display and search
    pub fn location(&self) -> String {
        [&self.city, &self.state, &self.country]
            .iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn has_photo(&self) -> bool {
        self.photos.iter().any(|uri| !uri.trim().is_empty())
    }

    pub fn has_readiness_badge(&self) -> bool {
        filled(&self.readiness_badge)
    }

    /// Most recent of `lastActivityAt` and `lastLoginAt`
    pub fn last_seen_at(&self) -> Option<DateTime<Utc>> {
        match (self.last_activity_at, self.last_login_at) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    /// Percentage (0-100) of core attributes that are filled in
    pub fn completeness(&self) -> u8 {
        let filled_count = [
            !self.first_name.trim().is_empty(),
            self.age.is_some(),
            self.gender.is_some(),
            filled(&self.marital_status),
            filled(&self.religion),
            filled(&self.caste),
            filled(&self.mother_tongue),
            filled(&self.city),
            filled(&self.country),
            filled(&self.education),
            filled(&self.occupation),
            filled(&self.salary),
            filled(&self.height),
            filled(&self.diet),
            self.has_photo(),
            self.partner_preferences.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();

        ((filled_count * 100) / COMPLETENESS_FIELDS) as u8
    }
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// What a profile owner is looking for in a partner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartnerPreferences {
    pub religions: Vec<String>,
    pub castes: Vec<String>,
    pub mother_tongues: Vec<String>,
    pub educations: Vec<String>,
    pub countries: Vec<String>,
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub marital_statuses: Vec<String>,
    pub occupations: Vec<String>,
    pub diets: Vec<String>,
    pub drinking: Vec<String>,
    pub smoking: Vec<String>,
    pub min_age: Option<u8>,
    pub max_age: Option<u8>,
    pub min_height_cm: Option<u32>,
    pub max_height_cm: Option<u32>,
    pub min_income: Option<u32>,
    pub max_income: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
}

/// Directed expression of interest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interest {
    #[serde(default)]
    pub from_profile_id: Option<String>,
    #[serde(default)]
    pub to_profile_id: Option<String>,
    pub status: InterestStatus,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Pending,
    Approved,
}

/// Directed request to reveal contact details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub from_profile_id: Option<String>,
    #[serde(default)]
    pub to_profile_id: Option<String>,
    pub status: ContactStatus,
}

/// Block edge. Hides both profiles from each other until unblocked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedProfile {
    #[serde(default)]
    pub blocker_profile_id: Option<String>,
    #[serde(default)]
    pub blocked_profile_id: Option<String>,
    #[serde(default)]
    pub is_unblocked: bool,
}

/// Decline edge. Hides the declined profile from the decliner only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclinedProfile {
    #[serde(default)]
    pub decliner_profile_id: Option<String>,
    #[serde(default)]
    pub declined_profile_id: Option<String>,
    #[serde(default)]
    pub is_reconsidered: bool,
}

/// Record of one profile having opened another
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(default)]
    pub viewer_profile_id: Option<String>,
    #[serde(default)]
    pub viewed_profile_id: Option<String>,
}

/// All relationship logs relevant to one viewer.
///
/// Entries that fail to deserialize (an unknown or missing status, a
/// mistyped field) are dropped one by one instead of failing the whole log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelationLogs {
    #[serde(deserialize_with = "skip_malformed")]
    pub interests: Vec<Interest>,
    #[serde(deserialize_with = "skip_malformed")]
    pub contact_requests: Vec<ContactRequest>,
    #[serde(deserialize_with = "skip_malformed")]
    pub blocks: Vec<BlockedProfile>,
    #[serde(deserialize_with = "skip_malformed")]
    pub declines: Vec<DeclinedProfile>,
    #[serde(deserialize_with = "skip_malformed")]
    pub views: Vec<ProfileView>,
}

/// Points awarded per matching attribute by the compatibility sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityWeights {
    pub religion: u32,
    pub mother_tongue: u32,
    pub education: u32,
    pub country: u32,
    pub diet: u32,
    pub readiness_badge: u32,
    pub photo: u32,
}

impl Default for CompatibilityWeights {
    fn default() -> Self {
        Self {
            religion: 2,
            mother_tongue: 2,
            education: 1,
            country: 1,
            diet: 1,
            readiness_badge: 1,
            photo: 1,
        }
    }
}

/// Accepts RFC 3339 strings or epoch milliseconds; anything else becomes `None`.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|millis| DateTime::<Utc>::from_timestamp_millis(millis)),
        _ => None,
    }))
}

/// Unknown gender strings are treated as absent rather than rejected.
fn lenient_gender<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| match s.trim().to_lowercase().as_str() {
        "male" => Some(Gender::Male),
        "female" => Some(Gender::Female),
        _ => None,
    }))
}

/// Ages as numbers or numeric strings; out-of-range or non-numeric values become `None`.
fn lenient_age<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|age| u8::try_from(age).ok()),
        serde_json::Value::String(s) => s.trim().parse::<u8>().ok(),
        _ => None,
    }))
}

/// Anything other than "verified" keeps the profile pending.
fn lenient_status<'de, D>(deserializer: D) -> Result<ProfileStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) if s.trim().eq_ignore_ascii_case("verified") => {
            ProfileStatus::Verified
        }
        _ => ProfileStatus::Pending,
    })
}

/// Deserialize a list element by element, dropping the elements that fail.
pub(crate) fn skip_malformed<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    let raw = raw.unwrap_or_default();
    let total = raw.len();
    let kept: Vec<T> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();

    if kept.len() < total {
        tracing::debug!(skipped = total - kept.len(), "Skipped malformed records");
    }
    Ok(kept)
}
