//! Template discovery from glob patterns
//!
//! Expands a glob pattern into files and decorates each one with its
//! destination path and template flag.

use std::path::PathBuf;

use tracing::debug;

use crate::{
    error::{GenerationError, Result},
    models::{PathLayout, TemplateOrigin, TemplateRecord},
};

/// Lists template files and computes where each one is written
#[derive(Debug, Clone)]
pub struct TemplateDiscoverer {
    layout: PathLayout,
}

impl TemplateDiscoverer {
    /// Create a discoverer for the given layout
    pub fn new(layout: PathLayout) -> Self {
        Self { layout }
    }

    /// Layout used to compute destinations
    pub fn layout(&self) -> &PathLayout {
        &self.layout
    }

    /// Expand `pattern` and decorate every matching file
    ///
    /// Directories matched by the pattern are skipped. A pattern that matches
    /// nothing yields an empty set.
    pub fn discover(&self, pattern: &str, origin: TemplateOrigin) -> Result<Vec<TemplateRecord>> {
        let files = list_files(pattern)?;
        let records = self.records_from_paths(files, origin)?;

        debug!(
            pattern,
            origin = ?origin,
            count = records.len(),
            "discovered template files"
        );

        Ok(records)
    }

    /// Decorate already-listed source paths, preserving their order
    pub fn records_from_paths<I, P>(
        &self,
        paths: I,
        origin: TemplateOrigin,
    ) -> Result<Vec<TemplateRecord>>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths
            .into_iter()
            .map(|path| TemplateRecord::from_source(path, &self.layout, origin))
            .collect()
    }
}

fn list_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let discovery_error = |message: String| GenerationError::DiscoveryError {
        pattern: pattern.to_string(),
        message,
    };

    let entries = glob::glob(pattern).map_err(|e| discovery_error(e.to_string()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| discovery_error(e.to_string()))?;
        if path.is_file() {
            files.push(path);
        }
    }

    Ok(files)
}
