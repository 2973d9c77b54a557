//! Template rendering
//!
//! The materializer only sees the [`TemplateRenderer`] trait: template text
//! and a data mapping in, rendered text out. [`HandlebarsRenderer`] is the
//! default implementation.

use handlebars::{Handlebars, RenderErrorReason};
use serde_json::Value;
use thiserror::Error;

use crate::templates::helpers::register_case_helpers;

/// Errors reported by a template renderer
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template text could not be parsed
    #[error("Invalid template syntax: {0}")]
    InvalidSyntax(String),

    /// Parsing succeeded but substitution failed
    #[error("Render error: {0}")]
    RenderError(String),
}

/// Renders template text against a data mapping
///
/// Implementations must be stateless from the caller's point of view: the
/// same text and data always produce the same output.
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` with `data`
    fn render(&self, template: &str, data: &Value) -> Result<String, TemplateError>;
}

/// Handlebars-backed renderer
///
/// HTML escaping is disabled since the output is source files. Case helpers
/// such as `{{snake_case name}}` are registered.
#[derive(Debug)]
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Renderer where missing placeholders render as empty text
    pub fn new() -> Self {
        Self::with_strict_mode(false)
    }

    /// Renderer that fails on missing placeholders when `strict` is set
    pub fn with_strict_mode(strict: bool) -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(strict);
        registry.register_escape_fn(handlebars::no_escape);
        register_case_helpers(&mut registry);

        Self { registry }
    }

    /// Whether missing placeholders are errors
    pub fn strict_mode(&self) -> bool {
        self.registry.strict_mode()
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, template: &str, data: &Value) -> Result<String, TemplateError> {
        self.registry
            .render_template(template, data)
            .map_err(|e| match e.reason() {
                RenderErrorReason::TemplateError(_) => TemplateError::InvalidSyntax(e.to_string()),
                _ => TemplateError::RenderError(e.to_string()),
            })
    }
}
