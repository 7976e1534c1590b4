use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use validator::Validate;

use crate::core::{MatchInputs, Matcher};
use crate::error::EngineError;
use crate::models::{MatchOutcome, MatchSnapshot};
use crate::services::cache::{CacheKey, ResultCache};

/// Errors that can occur while loading or evaluating a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Parse and validate a snapshot document
pub fn parse_snapshot(json: &str) -> Result<MatchSnapshot, SnapshotError> {
    let snapshot: MatchSnapshot = serde_json::from_str(json)?;
    snapshot.validate().map_err(EngineError::from)?;
    Ok(snapshot)
}

/// Read a snapshot file from disk
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<MatchSnapshot, SnapshotError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = parse_snapshot(&json)?;

    tracing::debug!(
        path = %path.display(),
        profiles = snapshot.profiles.len(),
        viewer = %snapshot.viewer_profile_id,
        "Loaded snapshot"
    );
    Ok(snapshot)
}

/// Run the pipeline over a snapshot at the page it requests
pub fn evaluate_snapshot(
    matcher: &Matcher,
    snapshot: &MatchSnapshot,
    fallback_now: DateTime<Utc>,
) -> Result<MatchOutcome, SnapshotError> {
    let inputs = MatchInputs::from_snapshot(snapshot, fallback_now)?;
    Ok(matcher.compute(&inputs, snapshot.page)?)
}

/// Same as [`evaluate_snapshot`], memoized in `cache`.
///
/// `data_version` identifies the snapshot contents; the caller changes it
/// whenever the profiles or logs change.
pub fn evaluate_snapshot_cached(
    matcher: &Matcher,
    cache: &mut ResultCache,
    snapshot: &MatchSnapshot,
    data_version: u64,
    fallback_now: DateTime<Utc>,
) -> Result<MatchOutcome, SnapshotError> {
    let inputs = MatchInputs::from_snapshot(snapshot, fallback_now)?;
    let key = CacheKey::outcome(
        &snapshot.viewer_profile_id,
        data_version,
        inputs.query_fingerprint(),
        snapshot.page,
    );
    Ok(cache.get_or_compute(key, || matcher.compute(&inputs, snapshot.page))?)
}
