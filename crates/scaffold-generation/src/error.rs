//! Error types for template file generation

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Errors that can occur while discovering, merging or materializing templates
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A required setting is missing or invalid
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The glob listing for a template set failed
    #[error("Discovery failed for pattern '{pattern}': {message}")]
    DiscoveryError {
        /// Glob pattern that was being expanded
        pattern: String,
        /// Underlying glob error message
        message: String,
    },

    /// A destination path could not be computed for a source file
    #[error("Cannot resolve destination for {path}: no usable '{marker}' directory in path")]
    PathResolutionError {
        /// Source path that failed to resolve
        path: PathBuf,
        /// Templates root marker that was searched for
        marker: String,
    },

    /// Two sources in the same set map to one destination
    #[error("Destination {destination} is produced by both {first} and {second}")]
    CollisionError {
        /// Destination path shared by both sources
        destination: PathBuf,
        /// Source that was seen first
        first: PathBuf,
        /// Source that collided with it
        second: PathBuf,
    },

    /// The template engine could not parse or render a source file
    #[error("Render error in {path}: {message}")]
    RenderError {
        /// Template source path
        path: PathBuf,
        /// Error reported by the template engine
        message: String,
    },

    /// Directory creation, read, write or copy failed
    #[error("IO error at {path}: {source}")]
    IoError {
        /// Path the operation was acting on
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// One or more records failed to materialize
    #[error("Materialization failed for {} file(s): {}", .failures.len(), summarize(.failures))]
    MaterializationError {
        /// Every per-record failure, in completion order
        failures: Vec<GenerationError>,
    },

    /// A background task panicked or was cancelled
    #[error("Task failed: {0}")]
    TaskFailed(String),
}

impl GenerationError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerationError::IoError {
            path: path.into(),
            source,
        }
    }

    /// Per-record failures when this is a `MaterializationError`, empty otherwise
    pub fn failures(&self) -> &[GenerationError] {
        match self {
            GenerationError::MaterializationError { failures } => failures,
            _ => &[],
        }
    }
}

fn summarize(failures: &[GenerationError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
