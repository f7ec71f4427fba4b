//! Configuration for image radio bindings.
//!
//! The defaults reproduce the markup hosts style against:
//!
//! ```html
//! <span class="radio_img checked" id="star_3_img" data-imgradiogroup="stars"></span>
//! ```
//!
//! Hosts that already use those names for something else can override them
//! from a TOML file:
//!
//! ```toml
//! proxy_suffix = "_star"
//! proxy_class = "star"
//! selected_class = "lit"
//! group_attribute = "data-star-group"
//! hide_labels = false
//! mode = "rating"
//! ```

use std::path::{Path, PathBuf};

use imgradio_core::logging::targets;
use serde::{Deserialize, Serialize};

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value the binding layer cannot use.
    #[error("Invalid value for '{field}': {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a validation error.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// How a group reacts to activations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Radio buttons are exclusive, checkboxes independent.
    #[default]
    Standard,
    /// Selecting the Nth item also lights every item before it.
    Rating,
}

impl Mode {
    pub fn is_rating(self) -> bool {
        self == Self::Rating
    }
}

/// Names and switches used when binding controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImgRadioConfig {
    /// Appended to a control's identifier to form its proxy's identifier.
    pub proxy_suffix: String,
    /// Class every proxy carries.
    pub proxy_class: String,
    /// Class a proxy carries while selected.
    pub selected_class: String,
    /// Attribute holding the proxy's group tag.
    pub group_attribute: String,
    /// Hide `<label for=...>` elements of bound controls.
    pub hide_labels: bool,
    /// Mode used by [`ImageRadio::bind`](crate::ImageRadio::bind).
    pub mode: Mode,
}

impl Default for ImgRadioConfig {
    fn default() -> Self {
        Self {
            proxy_suffix: "_img".to_string(),
            proxy_class: "radio_img".to_string(),
            selected_class: "checked".to_string(),
            group_attribute: "data-imgradiogroup".to_string(),
            hide_labels: true,
            mode: Mode::Standard,
        }
    }
}

impl ImgRadioConfig {
    /// Parse and validate a configuration from TOML text.
    ///
    /// Missing fields take their default values.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Check that every name is usable in markup.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.proxy_suffix.is_empty() {
            return Err(ConfigError::invalid(
                "proxy_suffix",
                "must not be empty, proxies would share their control's identifier",
            ));
        }
        check_token("proxy_class", &self.proxy_class)?;
        check_token("selected_class", &self.selected_class)?;
        check_token("group_attribute", &self.group_attribute)?;
        if RESERVED_ATTRIBUTES.contains(&self.group_attribute.as_str()) {
            return Err(ConfigError::invalid(
                "group_attribute",
                format!(
                    "'{}' is an identity attribute of the element and cannot hold the group tag",
                    self.group_attribute
                ),
            ));
        }
        if self.proxy_class == self.selected_class {
            return Err(ConfigError::invalid(
                "selected_class",
                format!("must differ from proxy_class '{}'", self.proxy_class),
            ));
        }
        Ok(())
    }
}

/// Attributes that resolve to element identity rather than free-form values.
const RESERVED_ATTRIBUTES: [&str; 3] = ["id", "name", "type"];

fn check_token(field: &'static str, value: &str) -> ConfigResult<()> {
    if value.is_empty() {
        return Err(ConfigError::invalid(field, "must not be empty"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::invalid(
            field,
            format!("'{value}' must not contain whitespace"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ImgRadioConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.proxy_suffix, "_img");
        assert_eq!(config.mode, Mode::Standard);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ImgRadioConfig::from_toml_str(
            r#"
            selected_class = "lit"
            mode = "rating"
            "#,
        )
        .unwrap();
        assert_eq!(config.selected_class, "lit");
        assert_eq!(config.proxy_class, "radio_img");
        assert!(config.mode.is_rating());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ImgRadioConfig::from_toml_str("rating = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = ImgRadioConfig::from_toml_str(r#"mode = "stars""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_errors() {
        let err = ImgRadioConfig::from_toml_str(r#"proxy_suffix = """#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "proxy_suffix", .. }));

        let err = ImgRadioConfig::from_toml_str(r#"selected_class = "radio_img""#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "selected_class", .. }));

        let err = ImgRadioConfig::from_toml_str(r#"group_attribute = "data group""#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "group_attribute", .. }));
    }

    #[test]
    fn test_identity_attributes_rejected_as_group_attribute() {
        for attr in ["id", "name", "type"] {
            let err = ImgRadioConfig::from_toml_str(&format!("group_attribute = \"{attr}\""))
                .unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { field: "group_attribute", .. }),
                "{attr}: {err}"
            );
        }
        assert!(ImgRadioConfig::from_toml_str(r#"group_attribute = "data-name""#).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "proxy_suffix = \"_star\"\nhide_labels = false").unwrap();

        let config = ImgRadioConfig::load(file.path()).unwrap();
        assert_eq!(config.proxy_suffix, "_star");
        assert!(!config.hide_labels);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImgRadioConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }
}
