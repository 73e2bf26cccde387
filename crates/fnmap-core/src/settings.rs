// Fnmap Settings Module
// User-configurable correlation policy, window, and enabled default

use std::path::{Path, PathBuf};

use crate::transform::engine::CorrelationPolicy;

/// Default correlation window in milliseconds.
///
/// Device-signal-to-keystroke latency is single-digit milliseconds in
/// practice; 100 ms is a safe ceiling that still expires quickly.
pub const DEFAULT_WINDOW_MS: u64 = 100;

/// Settings for fnmap loaded from a TOML file
/// (default: ~/.config/fnmap/settings.toml).
#[derive(Debug, Clone)]
pub struct Settings {
    /// Correlation policy (time-window or device-tracked)
    policy: CorrelationPolicy,

    /// Correlation window in milliseconds (time-window policy)
    window_ms: u64,

    /// Whether the engine starts enabled
    enabled: bool,

    /// Path to the settings file (for reload)
    source_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
struct SettingsToml {
    #[serde(default)]
    correlation: Option<CorrelationToml>,

    #[serde(default)]
    engine: Option<EngineToml>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct CorrelationToml {
    #[serde(default)]
    policy: Option<String>,

    #[serde(default)]
    window_ms: Option<u64>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct EngineToml {
    #[serde(default)]
    enabled: Option<bool>,
}

impl Settings {
    /// Create settings with the documented defaults
    pub fn new() -> Self {
        Self {
            policy: CorrelationPolicy::default(),
            window_ms: DEFAULT_WINDOW_MS,
            enabled: true,
            source_path: None,
        }
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let toml_settings: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(correlation) = toml_settings.correlation {
            if let Some(policy) = correlation.policy {
                settings.policy = policy
                    .parse()
                    .map_err(|e| SettingsError::InvalidValue(format!("{}", e)))?;
            }
            if let Some(window_ms) = correlation.window_ms {
                if window_ms == 0 {
                    return Err(SettingsError::InvalidValue(
                        "window_ms must be greater than zero".to_string(),
                    ));
                }
                settings.window_ms = window_ms;
            }
        }

        if let Some(engine) = toml_settings.engine {
            if let Some(enabled) = engine.enabled {
                settings.enabled = enabled;
            }
        }

        Ok(settings)
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("fnmap").join("settings.toml"))
    }

    /// Load from the default location, falling back to defaults if the
    /// file does not exist
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        Ok(Self::new())
    }

    /// The configured correlation policy
    pub fn policy(&self) -> CorrelationPolicy {
        self.policy
    }

    /// The configured correlation window in milliseconds
    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Whether the engine starts enabled
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Override the correlation policy
    pub fn set_policy(&mut self, policy: CorrelationPolicy) {
        self.policy = policy;
    }

    /// Override the correlation window
    pub fn set_window_ms(&mut self, window_ms: u64) {
        self.window_ms = window_ms;
    }

    /// Reload settings from the original file
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        if let Some(ref path) = self.source_path {
            let new_settings = Self::from_file(path)?;
            *self = new_settings;
            Ok(())
        } else {
            Err(SettingsError::InvalidValue("No source path set".to_string()))
        }
    }
}

/// Create default settings content for a new installation
pub fn default_settings_content() -> &'static str {
    r#"# Fnmap Settings
# Place this file at: ~/.config/fnmap/settings.toml

[correlation]
# Correlation policy: "time-window" or "device-tracked"
#   time-window    - a device press authorizes a rewrite only within
#                    window_ms of the system keystroke
#   device-tracked - a device press authorizes rewrites until the device
#                    reports the release
policy = "time-window"

# Correlation window in milliseconds (time-window policy)
window_ms = 100

[engine]
# Whether remapping starts enabled
enabled = true
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::new();
        assert_eq!(settings.policy(), CorrelationPolicy::TimeWindow);
        assert_eq!(settings.window_ms(), DEFAULT_WINDOW_MS);
        assert!(settings.enabled());
    }

    #[test]
    fn test_settings_from_toml() {
        let toml = r#"
[correlation]
policy = "device-tracked"
window_ms = 75

[engine]
enabled = false
"#;

        let settings = Settings::from_toml(toml).unwrap();
        assert_eq!(settings.policy(), CorrelationPolicy::DeviceTracked);
        assert_eq!(settings.window_ms(), 75);
        assert!(!settings.enabled());
    }

    #[test]
    fn test_settings_partial_toml_keeps_defaults() {
        let toml = r#"
[correlation]
window_ms = 200
"#;

        let settings = Settings::from_toml(toml).unwrap();
        assert_eq!(settings.policy(), CorrelationPolicy::TimeWindow);
        assert_eq!(settings.window_ms(), 200);
        assert!(settings.enabled());
    }

    #[test]
    fn test_settings_invalid_policy() {
        let toml = r#"
[correlation]
policy = "heuristic"
"#;

        assert!(matches!(
            Settings::from_toml(toml),
            Err(SettingsError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_settings_zero_window_rejected() {
        let toml = r#"
[correlation]
window_ms = 0
"#;

        assert!(matches!(
            Settings::from_toml(toml),
            Err(SettingsError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_settings_malformed_toml() {
        assert!(matches!(
            Settings::from_toml("[correlation"),
            Err(SettingsError::TomlParse(_))
        ));
    }

    #[test]
    fn test_default_content_parses() {
        let settings = Settings::from_toml(default_settings_content()).unwrap();
        assert_eq!(settings.policy(), CorrelationPolicy::TimeWindow);
        assert_eq!(settings.window_ms(), 100);
        assert!(settings.enabled());
    }
}
