//! File-based configuration.
//!
//! A config file describes how to build a [`DesignSystem`]. YAML and JSON are
//! both accepted; the format is picked from the file extension.
//!
//! ```yaml
//! important: false
//! theme_css: theme.css
//! theme:
//!   --color-brand: "#0088cc"
//!   --spacing: 0.25rem
//! ```
//!
//! Tokens from `theme_css` are loaded first; entries under `theme` are added
//! on top and override tokens with the same name.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::design_system::DesignSystem;
use crate::theme::{Theme, ThemeError};

/// Error loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {}", .path.display(), .message)]
    Io { path: PathBuf, message: String },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error(transparent)]
    Theme(#[from] ThemeError),
}

/// Design-system configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Emit every declaration `!important`.
    pub important: bool,
    /// Theme tokens, by custom-property name.
    pub theme: IndexMap<String, String>,
    /// CSS file with `@theme` blocks to load before `theme`.
    pub theme_css: Option<PathBuf>,
}

impl Config {
    /// Parses a YAML config.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parses a JSON config.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads a config file. Files ending in `.json` are parsed as JSON,
    /// everything else as YAML.
    ///
    /// A relative `theme_css` path is resolved against the config file's
    /// directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let mut config = if is_json {
            Self::from_json(&source)?
        } else {
            Self::from_yaml(&source)?
        };

        if let (Some(theme_css), Some(dir)) = (&config.theme_css, path.parent()) {
            if theme_css.is_relative() {
                config.theme_css = Some(dir.join(theme_css));
            }
        }
        Ok(config)
    }

    /// Builds the theme described by this config.
    pub fn load_theme(&self) -> Result<Theme, ConfigError> {
        let mut theme = match &self.theme_css {
            Some(path) => Theme::from_css_file(path)?,
            None => Theme::new(),
        };
        for (name, value) in &self.theme {
            if !name.starts_with("--") {
                return Err(ThemeError::InvalidName(name.clone()).into());
            }
            theme = theme.add(name.as_str(), value.as_str());
        }
        Ok(theme)
    }

    /// Builds a design system from this config.
    pub fn into_design_system(self) -> Result<DesignSystem, ConfigError> {
        let theme = self.load_theme()?;
        Ok(DesignSystem::builder()
            .theme(theme)
            .important(self.important)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_yaml() {
        let config = Config::from_yaml(
            r##"
important: true
theme:
  --color-brand: "#0088cc"
  --spacing: 0.25rem
"##,
        )
        .unwrap();

        assert!(config.important);
        assert_eq!(
            config.theme.get("--color-brand").map(String::as_str),
            Some("#0088cc")
        );
        assert_eq!(config.theme_css, None);
    }

    #[test]
    fn test_from_json() {
        let config = Config::from_json(r#"{"theme": {"--radius": "4px"}}"#).unwrap();
        assert!(!config.important);
        assert_eq!(config.theme.len(), 1);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = Config::from_yaml("colour: red").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_theme_rejects_plain_names() {
        let config = Config::from_yaml("theme:\n  color: red\n").unwrap();
        let err = config.load_theme().unwrap_err();
        assert!(matches!(err, ConfigError::Theme(ThemeError::InvalidName(_))));
    }

    #[test]
    fn test_from_file_resolves_theme_css() {
        let dir = tempfile::tempdir().unwrap();
        let css_path = dir.path().join("theme.css");
        std::fs::write(
            &css_path,
            "@theme { --color-red-500: #ef4444; --spacing: 1rem; }",
        )
        .unwrap();

        let config_path = dir.path().join("classcss.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "theme_css: theme.css").unwrap();
        writeln!(file, "theme:").unwrap();
        writeln!(file, "  --spacing: 0.25rem").unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.theme_css.as_deref(), Some(css_path.as_path()));

        let theme = config.load_theme().unwrap();
        assert_eq!(theme.get("--color-red-500"), Some("#ef4444"));
        assert_eq!(theme.get("--spacing"), Some("0.25rem"));
    }

    #[test]
    fn test_into_design_system() {
        let ds = Config::from_yaml("important: true\ntheme:\n  --spacing: 0.25rem\n")
            .unwrap()
            .into_design_system()
            .unwrap();
        assert!(ds.is_important());
        assert_eq!(
            ds.candidates_to_css(&["p-1"])[0].as_deref(),
            Some(".p-1 {\n  padding: calc(var(--spacing) * 1) !important;\n}\n")
        );
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
