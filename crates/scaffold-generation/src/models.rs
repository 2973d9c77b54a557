//! Core data models for template file generation

use std::{
    ffi::OsStr,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};

/// Default leading character that marks a file for rendering
pub const DEFAULT_TEMPLATE_MARKER: char = '_';

/// Default directory name after which source paths are mirrored into the output
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Which template set a record was discovered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateOrigin {
    /// Shared default templates
    Default,
    /// Package-specific overrides
    Package,
}

/// A discovered source file and the output location it maps to
///
/// The destination path is the record's identity: it is computed once at
/// discovery and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TemplateRecord {
    source_path: PathBuf,
    destination_path: PathBuf,
    parent_directory: PathBuf,
    is_template: bool,
    origin: TemplateOrigin,
}

impl TemplateRecord {
    /// Decorate a source path using the given layout
    pub fn from_source(
        source_path: impl Into<PathBuf>,
        layout: &PathLayout,
        origin: TemplateOrigin,
    ) -> Result<Self> {
        let source_path = source_path.into();
        let destination_path = layout.destination_for(&source_path)?;
        let parent_directory = source_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let is_template = layout.is_template(&source_path);

        Ok(Self {
            source_path,
            destination_path,
            parent_directory,
            is_template,
            origin,
        })
    }

    /// Path of the discovered source file
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Computed output path, unique after merge
    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    /// Directory portion of the source path
    pub fn parent_directory(&self) -> &Path {
        &self.parent_directory
    }

    /// Whether the source is rendered rather than copied
    pub fn is_template(&self) -> bool {
        self.is_template
    }

    /// Set the record was discovered from
    pub fn origin(&self) -> TemplateOrigin {
        self.origin
    }
}

/// Maps source paths to destination paths under an output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLayout {
    output_root: PathBuf,
    templates_dir: String,
    template_marker: char,
}

impl PathLayout {
    /// Layout with the default `templates` directory and `_` marker
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            templates_dir: DEFAULT_TEMPLATES_DIR.to_string(),
            template_marker: DEFAULT_TEMPLATE_MARKER,
        }
    }

    /// Override the templates root directory name
    pub fn with_templates_dir(mut self, templates_dir: impl Into<String>) -> Self {
        self.templates_dir = templates_dir.into();
        self
    }

    /// Override the template marker character
    pub fn with_template_marker(mut self, marker: char) -> Self {
        self.template_marker = marker;
        self
    }

    /// Root directory all destinations live under
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Templates root directory name
    pub fn templates_dir(&self) -> &str {
        &self.templates_dir
    }

    /// Template marker character
    pub fn template_marker(&self) -> char {
        self.template_marker
    }

    /// Whether the unmodified leaf name of `source` starts with the marker
    pub fn is_template(&self, source: &Path) -> bool {
        source
            .file_name()
            .and_then(OsStr::to_str)
            .is_some_and(|name| name.starts_with(self.template_marker))
    }

    /// Compute the output path for `source`
    ///
    /// Everything after the first `templates` component is joined onto the
    /// output root. A marked leaf loses exactly one leading marker character.
    /// Paths that climb out of the templates directory with `..` are rejected.
    pub fn destination_for(&self, source: &Path) -> Result<PathBuf> {
        let marker = OsStr::new(&self.templates_dir);
        let mut components = source.components();
        let found = components
            .by_ref()
            .any(|component| matches!(component, Component::Normal(name) if name == marker));

        let relative = components.as_path();
        let escapes_root = relative
            .components()
            .any(|component| matches!(component, Component::ParentDir));
        if !found || relative.as_os_str().is_empty() || escapes_root {
            return Err(self.unresolved(source));
        }

        let mut destination = self.output_root.join(relative);
        let stripped = destination
            .file_name()
            .and_then(OsStr::to_str)
            .and_then(|leaf| leaf.strip_prefix(self.template_marker))
            .map(str::to_string);

        if let Some(leaf) = stripped {
            if leaf.is_empty() {
                return Err(self.unresolved(source));
            }
            destination.set_file_name(leaf);
        }

        Ok(destination)
    }

    fn unresolved(&self, source: &Path) -> GenerationError {
        GenerationError::PathResolutionError {
            path: source.to_path_buf(),
            marker: self.templates_dir.clone(),
        }
    }
}

/// What happened to a single record during materialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteAction {
    /// Rendered through the template engine
    Rendered,
    /// Copied byte-for-byte
    Copied,
}

/// Result of materializing a single record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileWriteResult {
    /// Source the content came from
    pub source: PathBuf,
    /// Path that was (or would be) written
    pub destination: PathBuf,
    /// How the content was produced
    pub action: WriteAction,
    /// Whether the write was skipped because of dry-run
    pub dry_run: bool,
}

/// Completion report for a materialization run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializeResult {
    /// Per-file results, in completion order
    pub files: Vec<FileWriteResult>,
    /// Number of rendered templates
    pub files_rendered: usize,
    /// Number of verbatim copies
    pub files_copied: usize,
    /// Whether this was a dry-run
    pub dry_run: bool,
}

impl MaterializeResult {
    pub(crate) fn record(&mut self, result: FileWriteResult) {
        match result.action {
            WriteAction::Rendered => self.files_rendered += 1,
            WriteAction::Copied => self.files_copied += 1,
        }
        self.files.push(result);
    }

    /// Total number of files handled
    pub fn total(&self) -> usize {
        self.files.len()
    }

    /// Result for a given destination, if one was produced
    pub fn for_destination(&self, destination: &Path) -> Option<&FileWriteResult> {
        self.files.iter().find(|file| file.destination == destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> PathLayout {
        PathLayout::new("/out")
    }

    #[test]
    fn test_marked_leaf_is_stripped() {
        let record = TemplateRecord::from_source(
            "/pkg/templates/sub/_config.json",
            &layout(),
            TemplateOrigin::Default,
        )
        .unwrap();

        assert_eq!(record.destination_path(), Path::new("/out/sub/config.json"));
        assert!(record.is_template());
        assert_eq!(record.parent_directory(), Path::new("/pkg/templates/sub"));
    }

    #[test]
    fn test_plain_leaf_is_unchanged() {
        let record = TemplateRecord::from_source(
            "/pkg/templates/readme.md",
            &layout(),
            TemplateOrigin::Package,
        )
        .unwrap();

        assert_eq!(record.destination_path(), Path::new("/out/readme.md"));
        assert!(!record.is_template());
        assert_eq!(record.origin(), TemplateOrigin::Package);
    }

    #[test]
    fn test_only_one_marker_is_stripped() {
        let dest = layout()
            .destination_for(Path::new("/pkg/templates/__init__.py"))
            .unwrap();
        assert_eq!(dest, PathBuf::from("/out/_init__.py"));
    }

    #[test]
    fn test_marked_directory_is_not_stripped() {
        let dest = layout()
            .destination_for(Path::new("/pkg/templates/_dir/file.txt"))
            .unwrap();
        assert_eq!(dest, PathBuf::from("/out/_dir/file.txt"));
    }

    #[test]
    fn test_first_templates_component_wins() {
        let dest = layout()
            .destination_for(Path::new("/a/templates/b/templates/c.txt"))
            .unwrap();
        assert_eq!(dest, PathBuf::from("/out/b/templates/c.txt"));
    }

    #[test]
    fn test_relative_source_resolves() {
        let dest = layout()
            .destination_for(Path::new("templates/_a.txt"))
            .unwrap();
        assert_eq!(dest, PathBuf::from("/out/a.txt"));
    }

    #[test]
    fn test_missing_marker_directory_fails() {
        let err = layout()
            .destination_for(Path::new("/pkg/my-templates/a.txt"))
            .unwrap_err();
        assert!(matches!(err, GenerationError::PathResolutionError { .. }));
    }

    #[test]
    fn test_nothing_after_marker_fails() {
        let err = layout().destination_for(Path::new("/pkg/templates")).unwrap_err();
        assert!(matches!(err, GenerationError::PathResolutionError { .. }));
    }

    #[test]
    fn test_parent_dir_after_marker_fails() {
        let err = layout()
            .destination_for(Path::new("/x/templates/../y/a.txt"))
            .unwrap_err();
        assert!(matches!(err, GenerationError::PathResolutionError { .. }));

        let err = layout()
            .destination_for(Path::new("/x/templates/sub/../../_a.txt"))
            .unwrap_err();
        assert!(matches!(err, GenerationError::PathResolutionError { .. }));
    }

    #[test]
    fn test_bare_marker_leaf_fails() {
        let err = layout()
            .destination_for(Path::new("/pkg/templates/_"))
            .unwrap_err();
        assert!(matches!(err, GenerationError::PathResolutionError { .. }));
    }

    #[test]
    fn test_custom_layout() {
        let layout = PathLayout::new("/out")
            .with_templates_dir("skeleton")
            .with_template_marker('%');
        let record =
            TemplateRecord::from_source("/x/skeleton/%main.rs", &layout, TemplateOrigin::Default)
                .unwrap();

        assert_eq!(record.destination_path(), Path::new("/out/main.rs"));
        assert!(record.is_template());
        assert!(!layout.is_template(Path::new("/x/skeleton/_main.rs")));
    }

    #[test]
    fn test_materialize_result_counts() {
        let mut result = MaterializeResult::default();
        result.record(FileWriteResult {
            source: PathBuf::from("templates/_a.txt"),
            destination: PathBuf::from("/out/a.txt"),
            action: WriteAction::Rendered,
            dry_run: false,
        });
        result.record(FileWriteResult {
            source: PathBuf::from("templates/b.txt"),
            destination: PathBuf::from("/out/b.txt"),
            action: WriteAction::Copied,
            dry_run: false,
        });

        assert_eq!(result.total(), 2);
        assert_eq!(result.files_rendered, 1);
        assert_eq!(result.files_copied, 1);
        assert!(result.for_destination(Path::new("/out/b.txt")).is_some());
    }
}
