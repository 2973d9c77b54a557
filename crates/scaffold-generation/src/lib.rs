#![warn(missing_docs)]

//! Template file generation for scaffold
//!
//! Builds a package file tree from two template sets: shared defaults and
//! package-specific overrides. Both sets are discovered with glob patterns,
//! merged so that a package file replaces any default producing the same
//! output path, and then materialized. Files whose name starts with the
//! template marker (`_` by default) are rendered with Handlebars against the
//! template data and lose the marker; everything else is copied verbatim.
//!
//! ```no_run
//! use scaffold_generation::{TemplateFiles, TemplateFilesConfig};
//! use serde_json::json;
//!
//! # async fn run() -> scaffold_generation::Result<()> {
//! let config = TemplateFilesConfig::new()
//!     .default_template_path("defaults/templates/**/*")
//!     .package_template_path("packages/web/templates/**/*")
//!     .template_data(json!({ "name": "web" }))
//!     .output_path("build/web");
//!
//! let result = TemplateFiles::new(config)?.process().await?;
//! println!("{} rendered, {} copied", result.files_rendered, result.files_copied);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod generation_manager;
pub mod materializer;
pub mod models;
pub mod templates;

// Re-export public API
pub use config::{GenerationOptions, TemplateFilesConfig, ValidatedConfig};
pub use error::{GenerationError, Result};
pub use generation_manager::TemplateFiles;
pub use materializer::TemplateMaterializer;
pub use models::{
    FileWriteResult, MaterializeResult, PathLayout, TemplateOrigin, TemplateRecord, WriteAction,
    DEFAULT_TEMPLATES_DIR, DEFAULT_TEMPLATE_MARKER,
};
pub use templates::{
    CaseTransform, CollisionPolicy, HandlebarsRenderer, TemplateDiscoverer, TemplateError,
    TemplateMerger, TemplateRenderer,
};
