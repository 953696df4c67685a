use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use scout_core::query::DEFAULT_SUGGEST_MIN_CHARS;
use scout_engine::{ClientSettings, EngineSettings, DEFAULT_API_BASE_URL};
use scout_logging::{scout_info, scout_warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "scout.ron";

/// User settings read from `scout.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    /// `None` disables the per-call watchdog.
    pub watchdog_ms: Option<u64>,
    pub max_body_bytes: u64,
    pub suggest_delay_ms: u64,
    pub suggest_min_chars: usize,
    pub suggest_limit: u32,
    pub follower_stagger_ms: u64,
    pub health_interval_ms: u64,
    pub health_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
            watchdog_ms: Some(120_000),
            max_body_bytes: 5 * 1024 * 1024,
            suggest_delay_ms: 300,
            suggest_min_chars: DEFAULT_SUGGEST_MIN_CHARS,
            suggest_limit: 5,
            follower_stagger_ms: 200,
            health_interval_ms: 30_000,
            health_timeout_ms: 10_000,
        }
    }
}

impl AppConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            client: ClientSettings {
                base_url: self.api_base_url.clone(),
                connect_timeout: Duration::from_millis(self.connect_timeout_ms),
                request_timeout: Duration::from_millis(self.request_timeout_ms),
                max_body_bytes: self.max_body_bytes,
            },
            watchdog: self.watchdog_ms.map(Duration::from_millis),
            suggest_delay: Duration::from_millis(self.suggest_delay_ms),
            suggest_limit: self.suggest_limit.max(1),
            follower_stagger: Duration::from_millis(self.follower_stagger_ms),
            health_interval: Duration::from_millis(self.health_interval_ms.max(1)),
            health_timeout: Duration::from_millis(self.health_timeout_ms),
        }
    }
}

/// Pretty RON text for `--print-config`.
pub fn to_ron(config: &AppConfig) -> Result<String, ron::Error> {
    ron::ser::to_string_pretty(config, ron::ser::PrettyConfig::new())
}

/// Loads the config file, falling back to defaults when it is missing or
/// cannot be parsed.
pub fn load_config(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            scout_info!("No config at {:?}, using defaults", path);
            return AppConfig::default();
        }
        Err(err) => {
            scout_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            scout_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            scout_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}
