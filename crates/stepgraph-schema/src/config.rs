//! Registry configuration, loaded from JSON.
//!
//! ```json
//! {
//!   "require_endpoints": true,
//!   "label_style": "upper_snake",
//!   "reserved_labels": ["ID", "LABEL"]
//! }
//! ```
//!
//! Every field is optional.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{SchemaError, SchemaResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    #[default]
    Any,
    /// `FRIENDS_WITH`: upper-case ASCII letters, digits and underscores,
    /// starting with a letter.
    UpperSnake,
}

impl LabelStyle {
    pub fn accepts(self, label: &str) -> bool {
        match self {
            Self::Any => true,
            Self::UpperSnake => {
                let mut chars = label.chars();
                chars.next().is_some_and(|c| c.is_ascii_uppercase())
                    && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
            }
        }
    }
}

impl fmt::Display for LabelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::UpperSnake => f.write_str("upper_snake"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Relationship entities must declare both endpoint members.
    pub require_endpoints: bool,
    pub label_style: LabelStyle,
    pub reserved_labels: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            require_endpoints: true,
            label_style: LabelStyle::Any,
            reserved_labels: Vec::new(),
        }
    }
}

impl RegistryConfig {
    pub fn from_json_str(text: &str) -> SchemaResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Check a new edge label against the style and the reserved list.
    pub fn check_label(&self, label: &str) -> SchemaResult<()> {
        if self.reserved_labels.iter().any(|reserved| reserved == label) {
            return Err(SchemaError::ReservedLabel(label.to_string()));
        }
        if !self.label_style.accepts(label) {
            return Err(SchemaError::LabelStyle {
                label: label.to_string(),
                style: self.label_style,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_json_gives_defaults() {
        let config = RegistryConfig::from_json_str("{}").expect("config");
        assert_eq!(config, RegistryConfig::default());
        assert!(config.require_endpoints);
    }

    #[test]
    fn upper_snake_style_rejects_other_labels() {
        let config =
            RegistryConfig::from_json_str(r#"{"label_style": "upper_snake"}"#).expect("config");
        assert!(config.check_label("FRIENDS_WITH").is_ok());
        assert!(config.check_label("WORKS_AT_2").is_ok());

        let err = config.check_label("friendsWith").expect_err("camel case");
        assert_eq!(
            err.to_string(),
            "edge label `friendsWith` does not follow the `upper_snake` label style"
        );
        assert!(config.check_label("_HIDDEN").is_err());
    }

    #[test]
    fn reserved_labels_are_rejected() {
        let config = RegistryConfig {
            reserved_labels: vec!["LABEL".to_string()],
            ..RegistryConfig::default()
        };
        assert!(matches!(
            config.check_label("LABEL"),
            Err(SchemaError::ReservedLabel(label)) if label == "LABEL"
        ));
    }

    #[test]
    fn loads_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"require_endpoints": false}}"#).expect("write config");

        let config = RegistryConfig::from_json_file(file.path()).expect("config");
        assert!(!config.require_endpoints);
        assert_eq!(config.label_style, LabelStyle::Any);
    }

    #[test]
    fn bad_json_and_missing_files_are_reported() {
        assert!(matches!(
            RegistryConfig::from_json_str(r#"{"label_style": "kebab"}"#),
            Err(SchemaError::Config(_))
        ));
        assert!(matches!(
            RegistryConfig::from_json_file("/definitely/not/here.json"),
            Err(SchemaError::Io { .. })
        ));
    }
}
