use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::translation::{
    BatchPipeline, BatchReport, RetryPolicy, TranslationBackend, TranslationDocument, TranslationService,
};

// @module: Application controller for phrase document translation

/// Main application controller for phrase document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate `input_file` with the configured OpenAI backend.
    ///
    /// Returns the written output path, or `None` when the output already
    /// exists and `force_overwrite` is not set.
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<Option<PathBuf>> {
        let service = TranslationService::from_config(&self.config);
        info!(
            "Backend: {} - {} (temperature {}, max {} tokens)",
            service.provider_name(),
            service.policy().model,
            service.policy().temperature,
            service.policy().max_output_tokens
        );
        self.run_with_backend(service, &input_file, &output_dir, force_overwrite).await
    }

    /// Translate `input_file` with an arbitrary backend
    pub async fn run_with_backend<B: TranslationBackend>(
        &self,
        backend: B,
        input_file: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        let start_time = std::time::Instant::now();

        FileManager::ensure_json_file(input_file)?;
        FileManager::ensure_dir(output_dir)?;

        let target_language = &self.config.target_language;
        let output_path = FileManager::translated_output_path(output_dir, target_language);
        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping, output already exists: {} (use -f to force overwrite)",
                output_path.display()
            );
            return Ok(None);
        }

        let content = FileManager::read_to_string(input_file)?;
        let pipeline = BatchPipeline::new(backend, RetryPolicy::from_config(&self.config.pipeline));

        let report = self
            .translate_with_progress(&pipeline, &content, target_language)
            .await
            .map_err(|e| anyhow!("Error processing translations: {}", e))?;

        let json = report.document.to_json_pretty()?;
        FileManager::write_to_file(&output_path, &json)?;

        info!(
            "Translation completed in {}: {}",
            Self::format_duration(start_time.elapsed()),
            output_path.display()
        );

        Ok(Some(output_path))
    }

    async fn translate_with_progress<B: TranslationBackend>(
        &self,
        pipeline: &BatchPipeline<B>,
        content: &str,
        target_language: &str,
    ) -> Result<BatchReport> {
        let document = TranslationDocument::from_json(content)?;

        let progress_bar = ProgressBar::new(document.phrases.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} phrases ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        let pb = progress_bar.clone();
        let result = pipeline
            .run_with_progress(document, target_language, move |done, _total| {
                pb.set_position(done as u64);
            })
            .await;

        progress_bar.finish_and_clear();
        Ok(result?)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
