//! Configuration for template file generation
//!
//! The four required settings mirror the public contract: two glob patterns,
//! the template data, and the output root. Everything else lives under
//! `options` and has a default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{GenerationError, Result},
    models::{PathLayout, DEFAULT_TEMPLATES_DIR, DEFAULT_TEMPLATE_MARKER},
    templates::CollisionPolicy,
};

const DEFAULT_CONCURRENCY: usize = 16;

/// Raw configuration, as loaded from a file or built in code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFilesConfig {
    /// Glob pattern for package-specific templates
    pub package_template_path: Option<String>,
    /// Glob pattern for default templates
    pub default_template_path: Option<String>,
    /// Data substituted into rendered templates
    pub template_data: Option<Value>,
    /// Root directory for generated files
    pub output_path: Option<PathBuf>,
    /// Optional tuning
    #[serde(default)]
    pub options: GenerationOptions,
}

/// Optional settings with defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationOptions {
    /// Maximum number of files materialized at once
    pub concurrency: usize,
    /// Leading character that marks a file for rendering
    pub template_marker: char,
    /// Directory name after which source paths are mirrored
    pub templates_dir: String,
    /// What to do when one set maps two sources to one destination
    pub collision_policy: CollisionPolicy,
    /// Fail rendering when a placeholder has no value
    pub strict_placeholders: bool,
    /// Report what would be written without touching the filesystem
    pub dry_run: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            template_marker: DEFAULT_TEMPLATE_MARKER,
            templates_dir: DEFAULT_TEMPLATES_DIR.to_string(),
            collision_policy: CollisionPolicy::default(),
            strict_placeholders: false,
            dry_run: false,
        }
    }
}

/// Configuration that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    /// Glob pattern for package-specific templates
    pub package_template_path: String,
    /// Glob pattern for default templates
    pub default_template_path: String,
    /// Data substituted into rendered templates
    pub template_data: Value,
    /// Root directory for generated files
    pub output_path: PathBuf,
    /// Optional tuning, normalized
    pub options: GenerationOptions,
}

impl ValidatedConfig {
    /// Path layout derived from the output root and markers
    pub fn layout(&self) -> PathLayout {
        PathLayout::new(&self.output_path)
            .with_templates_dir(self.options.templates_dir.clone())
            .with_template_marker(self.options.template_marker)
    }
}

impl TemplateFilesConfig {
    /// Empty configuration, to be filled with the builder methods
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML (`.yaml`/`.yml`) or JSON (`.json`) file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GenerationError::io(path, e))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(GenerationError::ConfigurationError(format!(
                "unsupported config format: {}",
                path.display()
            ))),
        }
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| GenerationError::ConfigurationError(format!("invalid YAML: {}", e)))
    }

    /// Parse configuration from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| GenerationError::ConfigurationError(format!("invalid JSON: {}", e)))
    }

    /// Set the package template glob
    pub fn package_template_path(mut self, pattern: impl Into<String>) -> Self {
        self.package_template_path = Some(pattern.into());
        self
    }

    /// Set the default template glob
    pub fn default_template_path(mut self, pattern: impl Into<String>) -> Self {
        self.default_template_path = Some(pattern.into());
        self
    }

    /// Set the template data
    pub fn template_data(mut self, data: Value) -> Self {
        self.template_data = Some(data);
        self
    }

    /// Set the output root
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Replace the optional settings
    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Check that every required setting is present
    ///
    /// Fails on the first missing field, in declaration order, before any
    /// filesystem access.
    pub fn validate(self) -> Result<ValidatedConfig> {
        let package_template_path = require(self.package_template_path, "packageTemplatePath")?;
        let default_template_path = require(self.default_template_path, "defaultTemplatePath")?;
        let template_data = match self.template_data {
            None | Some(Value::Null) => return Err(missing("templateData")),
            Some(data @ Value::Object(_)) => data,
            Some(_) => {
                return Err(GenerationError::ConfigurationError(
                    "templateData must be a key/value mapping".to_string(),
                ))
            }
        };
        let output_path = self
            .output_path
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or_else(|| missing("outputPath"))?;

        let mut options = self.options;
        if options.templates_dir.is_empty() || options.templates_dir.contains(['/', '\\']) {
            return Err(GenerationError::ConfigurationError(format!(
                "templatesDir must be a single directory name, got '{}'",
                options.templates_dir
            )));
        }
        options.concurrency = options.concurrency.max(1);

        Ok(ValidatedConfig {
            package_template_path,
            default_template_path,
            template_data,
            output_path,
            options,
        })
    }
}

fn require(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing(field))
}

fn missing(field: &str) -> GenerationError {
    GenerationError::ConfigurationError(format!("missing required setting: {}", field))
}
