use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::{Config, OutputFormat};
use crate::file_utils::FileManager;
use crate::ocr_input;
use crate::output;
use crate::segmentation::{self, PatternLibrary, SegmentedDocument};

// @module: Application controller for document segmentation

/// Output path meaning standard output
pub const STDOUT_PATH: &str = "-";

/// What happened to one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Report written to this path
    Written(PathBuf),
    /// Report printed to standard output
    Printed,
    /// Existing report kept
    Skipped(PathBuf),
}

/// Counters for a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Compiled pattern table, shared by every engine
    library: Arc<PatternLibrary>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let library = Arc::new(config.pattern_library()?);

        Ok(Self { config, library })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Segment in-memory images with a fresh engine
    pub fn segment_images(&self, images: &[Vec<String>]) -> SegmentedDocument {
        segmentation::segment_images(images, Arc::clone(&self.library), self.config.segmentation.clone())
    }

    /// Load and segment one document
    pub async fn segment_path(&self, input: &Path) -> Result<SegmentedDocument> {
        let images = ocr_input::load_document(input, &self.config.input)
            .await
            .with_context(|| format!("Failed to load OCR output from {:?}", input))?;
        Ok(self.segment_images(&images))
    }

    /// Render a document with the configured format
    pub fn render(&self, document: &SegmentedDocument) -> Result<String> {
        output::render(document, self.config.output.format)
    }

    /// Default report path for an input: next to it, with the output extension
    pub fn default_output_path(&self, input: &Path) -> PathBuf {
        let output_dir = input.parent().unwrap_or(Path::new("."));
        FileManager::generate_output_path(input, output_dir, self.config.output.extension())
    }

    /// Run the main workflow for one document.
    /// `output` of `None` writes next to the input; `-` prints to stdout.
    pub async fn run(&self, input: PathBuf, output: Option<PathBuf>, force_overwrite: bool) -> Result<RunOutcome> {
        let start_time = std::time::Instant::now();

        let to_stdout = output.as_deref() == Some(Path::new(STDOUT_PATH));
        let output_path = output.unwrap_or_else(|| self.default_output_path(&input));

        if !to_stdout && output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, output already exists (use -f to force overwrite)", output_path);
            return Ok(RunOutcome::Skipped(output_path));
        }

        let document = self.segment_path(&input).await?;
        let rendered = self.render(&document)?;

        let outcome = if to_stdout {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("Failed to write report to stdout")?;
            RunOutcome::Printed
        } else {
            FileManager::write_to_file(&output_path, &rendered)?;
            info!("Success: {}", output_path.display());
            RunOutcome::Written(output_path)
        };

        info!(
            "{} questions in {}",
            document.question_count(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(outcome)
    }

    /// Segment every document of a directory. Each document gets its own engine;
    /// failures are logged and counted, never fatal to the batch.
    pub async fn run_batch(&self, input_dir: PathBuf, output_dir: Option<PathBuf>, force_overwrite: bool) -> Result<BatchSummary> {
        let start_time = std::time::Instant::now();

        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let report_extensions = [
            OutputFormat::Text.default_extension(),
            OutputFormat::Json.default_extension(),
            self.config.output.extension(),
        ];
        let documents = ocr_input::discover_documents(&input_dir, &report_extensions)?;
        if documents.is_empty() {
            return Err(anyhow!("No OCR documents found in directory: {:?}", input_dir));
        }

        if let Some(dir) = &output_dir {
            FileManager::ensure_dir(dir)?;
        }

        let progress_bar = ProgressBar::new(documents.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Segmenting");

        let concurrency = self.config.input.batch_concurrency.max(1);
        let extension = self.config.output.extension();

        let mut results = stream::iter(documents)
            .map(|document| {
                let output_path = match &output_dir {
                    Some(dir) => FileManager::generate_output_path(&document, dir, extension),
                    None => self.default_output_path(&document),
                };
                async move {
                    let result = self.run(document.clone(), Some(output_path), force_overwrite).await;
                    (document, result)
                }
            })
            .buffer_unordered(concurrency);

        let mut summary = BatchSummary::default();
        while let Some((document, result)) = results.next().await {
            let name = document
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            match result {
                Ok(RunOutcome::Skipped(_)) => summary.skipped += 1,
                Ok(_) => summary.processed += 1,
                Err(e) => {
                    error!("Error processing {}: {:#}", name, e);
                    summary.failed += 1;
                }
            }

            progress_bar.set_message(name);
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Batch complete");

        info!(
            "Batch completed: {} processed, {} skipped, {} errors in {}",
            summary.processed,
            summary.skipped,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
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
