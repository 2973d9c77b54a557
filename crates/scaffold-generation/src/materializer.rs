//! Writes merged template records to the output tree
//!
//! Each record is rendered or copied independently with bounded
//! concurrency. Failures are collected rather than short-circuiting, and
//! files already written stay in place.

use std::{path::Path, sync::Arc};

use futures::stream::{self, StreamExt};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::{
    error::{GenerationError, Result},
    models::{FileWriteResult, MaterializeResult, TemplateRecord, WriteAction},
    templates::{HandlebarsRenderer, TemplateRenderer},
};

const DEFAULT_CONCURRENCY: usize = 16;

/// Renders or copies every record to its destination
#[derive(Clone)]
pub struct TemplateMaterializer {
    renderer: Arc<dyn TemplateRenderer>,
    concurrency: usize,
    dry_run: bool,
}

impl TemplateMaterializer {
    /// Materializer using the given renderer
    pub fn new(renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self {
            renderer,
            concurrency: DEFAULT_CONCURRENCY,
            dry_run: false,
        }
    }

    /// Limit the number of files processed at once (minimum 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Report what would be written without touching the output tree
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process every record
    ///
    /// Returns `MaterializationError` listing every failed record if any
    /// failed. Records that succeeded are not rolled back.
    pub async fn materialize(
        &self,
        records: &[TemplateRecord],
        template_data: &Value,
    ) -> Result<MaterializeResult> {
        let outcomes: Vec<Result<FileWriteResult>> = stream::iter(records)
            .map(|record| self.materialize_one(record, template_data))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut result = MaterializeResult {
            dry_run: self.dry_run,
            ..Default::default()
        };
        let mut failures = Vec::new();

        for outcome in outcomes {
            match outcome {
                Ok(file) => result.record(file),
                Err(e) => {
                    warn!(error = %e, "failed to materialize template");
                    failures.push(e);
                }
            }
        }

        if !failures.is_empty() {
            return Err(GenerationError::MaterializationError { failures });
        }

        info!(
            rendered = result.files_rendered,
            copied = result.files_copied,
            dry_run = self.dry_run,
            "materialized template files"
        );

        Ok(result)
    }

    async fn materialize_one(
        &self,
        record: &TemplateRecord,
        template_data: &Value,
    ) -> Result<FileWriteResult> {
        let source = record.source_path();
        let destination = record.destination_path();

        let action = if record.is_template() {
            let content = fs::read_to_string(source)
                .await
                .map_err(|e| GenerationError::io(source, e))?;
            let rendered = self
                .renderer
                .render(&content, template_data)
                .map_err(|e| GenerationError::RenderError {
                    path: source.to_path_buf(),
                    message: e.to_string(),
                })?;

            if !self.dry_run {
                ensure_parent(destination).await?;
                fs::write(destination, rendered)
                    .await
                    .map_err(|e| GenerationError::io(destination, e))?;
            }
            WriteAction::Rendered
        } else {
            fs::metadata(source)
                .await
                .map_err(|e| GenerationError::io(source, e))?;
            if !self.dry_run {
                ensure_parent(destination).await?;
                fs::copy(source, destination)
                    .await
                    .map_err(|e| GenerationError::io(destination, e))?;
            }
            WriteAction::Copied
        };

        debug!(
            source = %source.display(),
            destination = %destination.display(),
            action = ?action,
            "materialized"
        );

        Ok(FileWriteResult {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            action,
            dry_run: self.dry_run,
        })
    }
}

impl Default for TemplateMaterializer {
    fn default() -> Self {
        Self::new(Arc::new(HandlebarsRenderer::new()))
    }
}

impl std::fmt::Debug for TemplateMaterializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateMaterializer")
            .field("concurrency", &self.concurrency)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

async fn ensure_parent(destination: &Path) -> Result<()> {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .await
            .map_err(|e| GenerationError::io(parent, e)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PathLayout, TemplateOrigin};
    use serde_json::json;
    use std::fs as std_fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        source_root: std::path::PathBuf,
        output_root: std::path::PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let source_root = temp_dir.path().join("defaults").join("templates");
            let output_root = temp_dir.path().join("out");
            std_fs::create_dir_all(&source_root).unwrap();
            Self {
                _temp_dir: temp_dir,
                source_root,
                output_root,
            }
        }

        fn record(&self, relative: &str, content: &str) -> TemplateRecord {
            let path = self.source_root.join(relative);
            std_fs::create_dir_all(path.parent().unwrap()).unwrap();
            std_fs::write(&path, content).unwrap();
            let layout = PathLayout::new(&self.output_root);
            TemplateRecord::from_source(path, &layout, TemplateOrigin::Default).unwrap()
        }
    }

    #[tokio::test]
    async fn test_renders_templates_and_copies_files() {
        let fixture = Fixture::new();
        let records = vec![
            fixture.record("_hello.txt", "Hello {{name}}"),
            fixture.record("assets/logo.svg", "<svg>{{name}}</svg>"),
        ];

        let result = TemplateMaterializer::default()
            .materialize(&records, &json!({ "name": "world" }))
            .await
            .unwrap();

        assert_eq!(result.files_rendered, 1);
        assert_eq!(result.files_copied, 1);
        assert_eq!(
            std_fs::read_to_string(fixture.output_root.join("hello.txt")).unwrap(),
            "Hello world"
        );
        assert_eq!(
            std_fs::read_to_string(fixture.output_root.join("assets/logo.svg")).unwrap(),
            "<svg>{{name}}</svg>"
        );
    }

    #[tokio::test]
    async fn test_copy_overwrites_existing_file() {
        let fixture = Fixture::new();
        let records = vec![fixture.record("config.toml", "new = true")];
        std_fs::create_dir_all(&fixture.output_root).unwrap();
        std_fs::write(fixture.output_root.join("config.toml"), "old = true").unwrap();

        TemplateMaterializer::default()
            .materialize(&records, &json!({}))
            .await
            .unwrap();

        assert_eq!(
            std_fs::read_to_string(fixture.output_root.join("config.toml")).unwrap(),
            "new = true"
        );
    }

    #[tokio::test]
    async fn test_render_failure_does_not_block_siblings() {
        let fixture = Fixture::new();
        let records = vec![
            fixture.record("_broken.txt", "{{#if name}}unterminated"),
            fixture.record("_ok.txt", "ok {{name}}"),
            fixture.record("plain.txt", "plain"),
        ];

        let err = TemplateMaterializer::default()
            .with_concurrency(1)
            .materialize(&records, &json!({ "name": "x" }))
            .await
            .unwrap_err();

        assert_eq!(err.failures().len(), 1);
        assert!(matches!(
            err.failures()[0],
            GenerationError::RenderError { .. }
        ));
        assert!(!fixture.output_root.join("broken.txt").exists());
        assert_eq!(
            std_fs::read_to_string(fixture.output_root.join("ok.txt")).unwrap(),
            "ok x"
        );
        assert!(fixture.output_root.join("plain.txt").exists());
    }

    #[tokio::test]
    async fn test_missing_source_is_io_error() {
        let fixture = Fixture::new();
        let record = fixture.record("gone.txt", "x");
        std_fs::remove_file(record.source_path()).unwrap();

        let err = TemplateMaterializer::default()
            .materialize(&[record], &json!({}))
            .await
            .unwrap_err();

        match &err.failures()[0] {
            GenerationError::IoError { path, .. } => {
                assert_eq!(path, &fixture.source_root.join("gone.txt"))
            }
            other => panic!("expected IoError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unwritable_destination_is_attributed_to_destination() {
        let fixture = Fixture::new();
        let record = fixture.record("config.toml", "x");
        std_fs::create_dir_all(fixture.output_root.join("config.toml")).unwrap();

        let err = TemplateMaterializer::default()
            .materialize(&[record], &json!({}))
            .await
            .unwrap_err();

        match &err.failures()[0] {
            GenerationError::IoError { path, .. } => {
                assert_eq!(path, &fixture.output_root.join("config.toml"))
            }
            other => panic!("expected IoError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let fixture = Fixture::new();
        let records = vec![
            fixture.record("_a.txt", "{{name}}"),
            fixture.record("b.txt", "b"),
        ];

        let result = TemplateMaterializer::default()
            .with_dry_run(true)
            .materialize(&records, &json!({ "name": "x" }))
            .await
            .unwrap();

        assert!(result.dry_run);
        assert_eq!(result.total(), 2);
        assert!(result.files.iter().all(|file| file.dry_run));
        assert!(!fixture.output_root.exists());
    }

    #[tokio::test]
    async fn test_empty_record_set() {
        let result = TemplateMaterializer::default()
            .materialize(&[], &json!({}))
            .await
            .unwrap();
        assert_eq!(result.total(), 0);
    }

    #[test]
    fn test_concurrency_floor() {
        let materializer = TemplateMaterializer::default().with_concurrency(0);
        assert_eq!(materializer.concurrency, 1);
    }
}
