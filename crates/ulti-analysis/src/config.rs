//! Configuration loading for the analyzer.
//!
//! All analysis thresholds are loaded from a TOML configuration file. Every
//! section is optional and falls back to league defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use ulti_events::FALLBACK_POINT_SECS;

/// Complete analyzer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Throw classification thresholds
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Field landmarks
    #[serde(default)]
    pub field: FieldConfig,
    /// Point timing settings
    #[serde(default)]
    pub points: PointConfig,
}

impl AnalysisConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, TomlSerializeError> {
        toml::to_string_pretty(self).map_err(TomlSerializeError)
    }
}

/// Throw classification thresholds, in yards.
///
/// Classification checks huck, swing, gainer, dump in that order and falls
/// through to dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum downfield gain for a huck
    pub huck_min_vertical: f64,
    /// Minimum sideways movement for a swing
    pub swing_min_horizontal: f64,
    /// Sideways movement must exceed this multiple of |vertical| for a swing
    pub swing_ratio: f64,
    /// Minimum downfield gain for a gainer
    pub gainer_min_vertical: f64,
    /// A throw losing more than this many yards is a dump
    pub dump_max_loss: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            huck_min_vertical: 40.0,
            swing_min_horizontal: 10.0,
            swing_ratio: 2.0,
            gainer_min_vertical: 4.0,
            dump_max_loss: 4.0,
        }
    }
}

/// Field landmarks along the attacking axis, in yards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Goal line the pulling team defends; pull distance is measured from it
    pub pull_line_y: f64,
    /// Start of the red zone
    pub redzone_start_y: f64,
    /// Attacking goal line; the red zone ends here
    pub goal_line_y: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            pull_line_y: 20.0,
            redzone_start_y: 80.0,
            goal_line_y: 100.0,
        }
    }
}

impl FieldConfig {
    /// True if `y` lies inside the red zone.
    pub fn in_redzone(&self, y: f64) -> bool {
        y >= self.redzone_start_y && y < self.goal_line_y
    }
}

/// Point timing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointConfig {
    /// Duration given to a point still open when the log ends
    pub fallback_duration_secs: u32,
}

impl Default for PointConfig {
    fn default() -> Self {
        Self {
            fallback_duration_secs: FALLBACK_POINT_SECS,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Error that can occur during TOML serialization.
#[derive(Debug, thiserror::Error)]
#[error("TOML serialize error: {0}")]
pub struct TomlSerializeError(#[source] pub toml::ser::Error);

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Analyzer Configuration

[classifier]
huck_min_vertical = 40.0
swing_min_horizontal = 10.0
swing_ratio = 2.0
gainer_min_vertical = 4.0
dump_max_loss = 4.0

[field]
pull_line_y = 20.0
redzone_start_y = 80.0
goal_line_y = 100.0

[points]
fallback_duration_secs = 90
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_toml_matches_defaults() {
        let parsed = AnalysisConfig::from_str(&default_config_toml()).unwrap();
        assert_eq!(parsed, AnalysisConfig::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[classifier]
huck_min_vertical = 35.0
"#;
        let config = AnalysisConfig::from_str(toml).unwrap();
        assert_eq!(config.classifier.huck_min_vertical, 35.0);
        assert_eq!(config.classifier.swing_min_horizontal, 10.0);
        assert_eq!(config.field, FieldConfig::default());
        assert_eq!(config.points.fallback_duration_secs, 90);
    }

    #[test]
    fn test_empty_config() {
        let config = AnalysisConfig::from_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let result = AnalysisConfig::from_str("[classifier\nhuck = ");
        assert!(matches!(result, Err(ConfigError::TomlError(_))));
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let mut config = AnalysisConfig::default();
        config.field.redzone_start_y = 75.0;
        let toml = config.to_toml().unwrap();
        let parsed = AnalysisConfig::from_str(&toml).unwrap();
        assert_eq!(parsed.field.redzone_start_y, 75.0);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.toml");
        std::fs::write(&path, "[points]\nfallback_duration_secs = 60\n").unwrap();

        let config = AnalysisConfig::from_file(&path).unwrap();
        assert_eq!(config.points.fallback_duration_secs, 60);

        let missing = AnalysisConfig::from_file(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_redzone_bounds() {
        let field = FieldConfig::default();
        assert!(!field.in_redzone(79.9));
        assert!(field.in_redzone(80.0));
        assert!(field.in_redzone(99.9));
        assert!(!field.in_redzone(100.0));
    }
}
