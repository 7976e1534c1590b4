use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::MatcherOptions;
use crate::models::CompatibilityWeights;
use crate::services::{ResultCache, SearchDebouncer};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub snapshot: SnapshotSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_recently_joined_days")]
    pub recently_joined_days: u32,
    #[serde(default = "default_recently_active_days")]
    pub recently_active_days: u32,
    /// Age clauses admitting less than this share of the base pool are
    /// reported as too restrictive
    #[serde(default = "default_restrictive_age_ratio")]
    pub restrictive_age_ratio: f64,
    #[serde(default = "default_max_diagnostics")]
    pub max_diagnostics: usize,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            recently_joined_days: default_recently_joined_days(),
            recently_active_days: default_recently_active_days(),
            restrictive_age_ratio: default_restrictive_age_ratio(),
            max_diagnostics: default_max_diagnostics(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

impl EngineSettings {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn default_page_size() -> usize { 20 }
fn default_recently_joined_days() -> u32 { 30 }
fn default_recently_active_days() -> u32 { 7 }
fn default_restrictive_age_ratio() -> f64 { 0.3 }
fn default_max_diagnostics() -> usize { 5 }
fn default_search_debounce_ms() -> u64 { 300 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: CompatibilityWeights,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_capacity() -> usize { 256 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotSettings {
    /// Snapshot evaluated by the binary when no path is given on the
    /// command line
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MATCH__ENGINE__PAGE_SIZE -> engine.page_size
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Pipeline options derived from the engine and scoring sections
    pub fn matcher_options(&self) -> MatcherOptions {
        MatcherOptions {
            page_size: self.engine.page_size,
            weights: self.scoring.weights,
            restrictive_age_ratio: self.engine.restrictive_age_ratio,
            max_issues: self.engine.max_diagnostics,
            recently_joined_days: self.engine.recently_joined_days,
            recently_active_days: self.engine.recently_active_days,
        }
    }

    /// Result cache sized by `cache.capacity`
    pub fn result_cache(&self) -> ResultCache {
        ResultCache::new(self.cache.capacity)
    }

    /// Search box debouncer using `engine.search_debounce_ms`.
    /// Interactive hosts own the clock and drive it themselves.
    pub fn search_debouncer(&self) -> SearchDebouncer {
        SearchDebouncer::new(self.engine.search_debounce())
    }
}

fn environment() -> Environment {
    Environment::with_prefix("MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoringSettings::default().weights;
        assert_eq!(weights.religion, 2);
        assert_eq!(weights.mother_tongue, 2);
        assert_eq!(weights.education, 1);
        assert_eq!(weights.country, 1);
        assert_eq!(weights.diet, 1);
        assert_eq!(weights.readiness_badge, 1);
        assert_eq!(weights.photo, 1);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_default_engine_matches_matcher_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.matcher_options(), MatcherOptions::default());
        assert_eq!(settings.engine.search_debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_cache_and_debouncer_follow_settings() {
        let mut settings = Settings::default();
        settings.cache.capacity = 3;
        settings.engine.search_debounce_ms = 50;

        assert_eq!(settings.result_cache().stats().capacity, 3);

        let mut debouncer = settings.search_debouncer();
        let start = std::time::Instant::now();
        debouncer.input("pune", start);
        assert_eq!(debouncer.poll(start + Duration::from_millis(49)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(50)), Some("pune"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = std::env::temp_dir().join(format!("match-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(
            &path,
            "[engine]\npage_size = 10\n\n[scoring.weights]\nreligion = 5\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.engine.page_size, 10);
        assert_eq!(settings.engine.recently_active_days, 7);
        assert_eq!(settings.scoring.weights.religion, 5);
        assert_eq!(settings.scoring.weights.photo, 1);
        assert_eq!(settings.cache.capacity, 256);

        std::fs::remove_dir_all(&dir).ok();
    }
}
