//! Orchestrates a full template generation run
//!
//! Validates configuration, discovers the default and package template sets,
//! merges them, and materializes the result.

use std::sync::Arc;

use tracing::info;

use crate::{
    config::{TemplateFilesConfig, ValidatedConfig},
    error::{GenerationError, Result},
    materializer::TemplateMaterializer,
    models::{MaterializeResult, TemplateOrigin, TemplateRecord},
    templates::{HandlebarsRenderer, TemplateDiscoverer, TemplateMerger, TemplateRenderer},
};

/// Generates a package file tree from default and package templates
#[derive(Debug)]
pub struct TemplateFiles {
    config: ValidatedConfig,
    discoverer: Arc<TemplateDiscoverer>,
    merger: TemplateMerger,
    materializer: TemplateMaterializer,
}

impl TemplateFiles {
    /// Validate `config` and build a generator using Handlebars
    pub fn new(config: TemplateFilesConfig) -> Result<Self> {
        let config = config.validate()?;
        let renderer = HandlebarsRenderer::with_strict_mode(config.options.strict_placeholders);
        Ok(Self::from_validated(config, Arc::new(renderer)))
    }

    /// Validate `config` and build a generator using a custom renderer
    pub fn with_renderer(
        config: TemplateFilesConfig,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Result<Self> {
        Ok(Self::from_validated(config.validate()?, renderer))
    }

    fn from_validated(config: ValidatedConfig, renderer: Arc<dyn TemplateRenderer>) -> Self {
        let discoverer = Arc::new(TemplateDiscoverer::new(config.layout()));
        let merger = TemplateMerger::with_policy(config.options.collision_policy);
        let materializer = TemplateMaterializer::new(renderer)
            .with_concurrency(config.options.concurrency)
            .with_dry_run(config.options.dry_run);

        Self {
            config,
            discoverer,
            merger,
            materializer,
        }
    }

    /// Validated configuration
    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Discover both template sets and merge them
    ///
    /// The two discoveries run concurrently on the blocking pool; the first
    /// failure aborts the run.
    pub async fn find_templates(&self) -> Result<Vec<TemplateRecord>> {
        let (defaults, packages) = tokio::try_join!(
            self.discover(&self.config.default_template_path, TemplateOrigin::Default),
            self.discover(&self.config.package_template_path, TemplateOrigin::Package),
        )?;

        self.merger.merge(&defaults, &packages)
    }

    /// Run discovery, merge and materialization
    pub async fn process(&self) -> Result<MaterializeResult> {
        info!(
            output = %self.config.output_path.display(),
            dry_run = self.config.options.dry_run,
            "generating template files"
        );

        let templates = self.find_templates().await?;
        self.materializer
            .materialize(&templates, &self.config.template_data)
            .await
    }

    async fn discover(&self, pattern: &str, origin: TemplateOrigin) -> Result<Vec<TemplateRecord>> {
        let discoverer = Arc::clone(&self.discoverer);
        let pattern = pattern.to_string();

        tokio::task::spawn_blocking(move || discoverer.discover(&pattern, origin))
            .await
            .map_err(|e| GenerationError::TaskFailed(format!("template discovery: {}", e)))?
    }
}
