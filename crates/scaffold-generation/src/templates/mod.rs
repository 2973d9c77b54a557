//! Template discovery, merging and rendering
//!
//! Default and package template sets are discovered independently, merged so
//! that package files override defaults sharing a destination, and rendered
//! through a pluggable [`TemplateRenderer`].

pub mod discovery;
pub mod engine;
pub mod helpers;
pub mod merger;

// Re-export public API
pub use discovery::TemplateDiscoverer;
pub use engine::{HandlebarsRenderer, TemplateError, TemplateRenderer};
pub use helpers::CaseTransform;
pub use merger::{CollisionPolicy, TemplateMerger};
