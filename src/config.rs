use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::MeasureResult;
use crate::mapper::RatioPolicy;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "measure_image.toml";

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "MEASURE_IMAGE_CONFIG";

const MARKER_SIZE: f32 = 10.0;
const WINDOW_WIDTH: f32 = 1024.0;
const WINDOW_HEIGHT: f32 = 640.0;
const LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasureConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Locale tag for percentages, e.g. `de-DE`. Unset means the environment's.
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub ratio_policy: RatioPolicy,
    /// Size in screen pixels of the cross drawn on committed points.
    #[serde(default = "default_marker_size")]
    pub marker_size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: f32,
    #[serde(default = "default_window_height")]
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_marker_size() -> f32 {
    MARKER_SIZE
}

fn default_window_width() -> f32 {
    WINDOW_WIDTH
}

fn default_window_height() -> f32 {
    WINDOW_HEIGHT
}

fn default_log_filter() -> String {
    LOG_FILTER.to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            locale: None,
            ratio_policy: RatioPolicy::default(),
            marker_size: MARKER_SIZE,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl MeasureConfig {
    pub fn from_toml_str(text: &str) -> MeasureResult<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Load the configuration.
///
/// A path given on the command line or in `MEASURE_IMAGE_CONFIG` must exist.
/// Otherwise `measure_image.toml` in the working directory is tried, and a
/// missing file means defaults.
pub fn load_config(explicit: Option<&Path>) -> MeasureResult<MeasureConfig> {
    let from_env = std::env::var_os(CONFIG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    load_config_from(explicit, from_env)
}

fn load_config_from(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
) -> MeasureResult<MeasureConfig> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    if let Some(path) = from_env {
        return read_config(&path);
    }

    let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
    if candidate.is_file() {
        read_config(&candidate)
    } else {
        debug!(path = %candidate.display(), "no config file, using defaults");
        Ok(MeasureConfig::default())
    }
}

fn read_config(path: &Path) -> MeasureResult<MeasureConfig> {
    let text = std::fs::read_to_string(path)?;
    let config = MeasureConfig::from_toml_str(&text).inspect_err(|err| {
        warn!(path = %path.display(), %err, "invalid config file");
    })?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeasureError;

    #[test]
    fn empty_file_gives_defaults() {
        let config = MeasureConfig::from_toml_str("").expect("parse");
        assert_eq!(config, MeasureConfig::default());
        assert_eq!(config.display.ratio_policy, RatioPolicy::OnResize);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = MeasureConfig::from_toml_str(
            r#"
            [display]
            locale = "de-DE"
            ratio_policy = "per_event"

            [window]
            width = 800.0
            "#,
        )
        .expect("parse");

        assert_eq!(config.display.locale.as_deref(), Some("de-DE"));
        assert_eq!(config.display.ratio_policy, RatioPolicy::PerEvent);
        assert_eq!(config.display.marker_size, 10.0);
        assert_eq!(config.window.width, 800.0);
        assert_eq!(config.window.height, 640.0);
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = MeasureConfig::from_toml_str("[display]\nratio_policy = \"sometimes\"");
        assert!(err.is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("measure_image_missing_config_test.toml");
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn missing_env_file_is_an_error() {
        let path = std::env::temp_dir().join("measure_image_missing_env_config_test.toml");
        let err = load_config_from(None, Some(path)).expect_err("missing file");
        assert!(matches!(err, MeasureError::Io(_)));
    }

    #[test]
    fn env_file_is_read() {
        let path = std::env::temp_dir().join(format!(
            "measure_image_env_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[logging]\nfilter = \"debug\"\n").expect("write config");
        let config = load_config_from(None, Some(path.clone())).expect("load");
        assert_eq!(config.logging.filter, "debug");
        let _ = std::fs::remove_file(path);
    }
}
