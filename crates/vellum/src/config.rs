//! Manager configuration.
//!
//! [`TemplateManagerConfig`] holds everything the manager needs before any
//! template is loaded. It can be built in code or read from YAML:
//!
//! ```yaml
//! template_dir: ./templates
//! extension: html
//! layout: base
//! base_url: https://example.com
//! static_url: https://cdn.example.com
//! delimiters:
//!   left: "<%"
//!   right: "%>"
//! data:
//!   site_name: Example
//! ```
//!
//! Every field is optional in YAML; missing fields take the defaults of
//! [`TemplateManagerConfig::default`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::GlobalData;
use crate::error::{Result, TemplateError};

/// Default suffix appended to logical template names.
pub const DEFAULT_EXTENSION: &str = "html";

/// Markers delimiting template expressions.
///
/// Only variable expressions (`{{ name }}` by default) use this pair. Block
/// tags (`{% if %}`) and comments (`{# #}`) keep the engine's markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    pub left: String,
    pub right: String,
}

impl Delimiters {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Whether this is the engine's default `{{` / `}}` pair.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.left.is_empty() || self.right.is_empty() {
            return Err(TemplateError::invalid_delimiters(
                &self.left,
                &self.right,
                "delimiters must not be empty",
            ));
        }
        let has_space = |s: &str| s.chars().any(char::is_whitespace);
        if has_space(&self.left) || has_space(&self.right) {
            return Err(TemplateError::invalid_delimiters(
                &self.left,
                &self.right,
                "delimiters must not contain whitespace",
            ));
        }
        Ok(())
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new("{{", "}}")
    }
}

/// Configuration for a [`TemplateManager`](crate::TemplateManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateManagerConfig {
    /// Directory every logical template name is resolved against.
    pub template_dir: PathBuf,

    /// File suffix without the dot.
    pub extension: String,

    /// Expression markers used when parsing templates.
    pub delimiters: Delimiters,

    /// Logical name of the layout, loaded first and registered as the root.
    pub layout: Option<String>,

    /// Prefix for the `baseurl` helper.
    pub base_url: String,

    /// Prefix for the `staticurl` helper.
    pub static_url: String,

    /// Initial global data.
    pub data: GlobalData,
}

impl Default for TemplateManagerConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            delimiters: Delimiters::default(),
            layout: None,
            base_url: String::new(),
            static_url: String::new(),
            data: GlobalData::new(),
        }
    }
}

impl TemplateManagerConfig {
    /// Creates a configuration with the three settings every site needs.
    pub fn new(
        template_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
        static_url: impl Into<String>,
    ) -> Self {
        Self {
            template_dir: template_dir.into(),
            base_url: base_url.into(),
            static_url: static_url.into(),
            ..Self::default()
        }
    }

    /// Parses a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| TemplateError::Config(e.to_string()))?;
        config.delimiters.validate()?;
        Ok(config)
    }

    /// Reads and parses a YAML configuration file.
    ///
    /// A relative `template_dir` is resolved against the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)
            .map_err(|e| TemplateError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_yaml(&yaml)?;
        if config.template_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.template_dir = parent.join(&config.template_dir);
            }
        }
        Ok(config)
    }

    /// Resolves a logical template name to `{template_dir}/{name}.{extension}`.
    pub fn template_path(&self, name: &str) -> PathBuf {
        if self.extension.is_empty() {
            self.template_dir.join(name)
        } else {
            self.template_dir.join(format!("{}.{}", name, self.extension))
        }
    }
}
