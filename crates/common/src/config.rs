//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Parameter defaults used when a transform is invoked without them.
    pub defaults: TransformDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default transform parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformDefaults {
    /// Temporal smoothing factor in `[0.0, 1.0]`.
    pub smoothing_factor: f64,

    /// Whether temporal smoothing touches hand keypoints.
    pub smooth_hands: bool,

    /// Whether temporal smoothing touches face keypoints.
    pub smooth_face: bool,

    /// Canvas width written by pose merges.
    pub canvas_width: u32,

    /// Canvas height written by pose merges.
    pub canvas_height: u32,

    /// How animated offsets are fitted to the frame count
    /// (`truncate`, `loop` or `repeat`).
    pub mismatch_policy: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "posecraft=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for TransformDefaults {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.3,
            smooth_hands: true,
            smooth_face: false,
            canvas_width: 512,
            canvas_height: 768,
            mismatch_policy: "loop".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("posecraft").join("config.json")
}
