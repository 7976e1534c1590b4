use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use chrono::Utc;
use matrimonial_match::config::Settings;
use matrimonial_match::services::{evaluate_snapshot_cached, load_snapshot};
use matrimonial_match::Matcher;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&log_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    let settings = Settings::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");

    let mut paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        let configured = settings
            .snapshot
            .path
            .clone()
            .ok_or("no snapshot given: pass a path or set snapshot.path")?;
        paths.push(configured);
    }

    let matcher = Matcher::new(settings.matcher_options());
    info!("Matcher initialized with options: {:?}", matcher.options());

    let mut cache = settings.result_cache();
    let mut outcomes = Vec::with_capacity(paths.len());

    for path in &paths {
        let snapshot = load_snapshot(path)?;
        let outcome =
            evaluate_snapshot_cached(&matcher, &mut cache, &snapshot, data_version(path), Utc::now())
                .map_err(|e| {
                    error!("Failed to evaluate {}: {}", path.display(), e);
                    e
                })?;

        info!(
            "{}: page {}/{} with {} of {} matches",
            path.display(),
            outcome.page_number,
            outcome.total_pages,
            outcome.page.len(),
            outcome.total_results
        );
        outcomes.push(outcome);
    }

    let stats = cache.stats();
    info!("Cache: {} hits, {} misses", stats.hit_count, stats.miss_count);

    if let [outcome] = outcomes.as_slice() {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    }
    Ok(())
}

/// Modification time of the snapshot file; an unchanged file hits the cache
fn data_version(path: &Path) -> u64 {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |age| age.as_secs())
}
