/*!
 * Application controller: batch translation runs over files and folders.
 *
 * The controller wires configuration, backend and engine together and adds
 * the user-facing concerns: output naming, overwrite protection, progress
 * reporting and keep-going batch semantics (one document's failure never
 * aborts the rest of a folder run).
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};

use crate::app_config::Config;
use crate::backend::TranslationBackend;
use crate::backend::chat::ChatBackend;
use crate::document::SourceDocument;
use crate::file_utils::FileManager;
use crate::translation::{DocumentTranslator, TRANSLATION_FAILED_SENTINEL, TranslationSummary};

/// Main application controller
pub struct Controller {
    /// Application configuration
    config: Config,

    /// Backend shared by every chunk task
    backend: Arc<dyn TranslationBackend>,
}

impl Controller {
    /// Create a controller from configuration, building the HTTP backend
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let backend = ChatBackend::new(
            config.backend.endpoint.clone(),
            config.backend.api_key.clone(),
            config.backend.model.clone(),
            config.backend.timeout_secs,
        )?;

        Ok(Self {
            config,
            backend: Arc::new(backend),
        })
    }

    /// Create a controller with an injected backend - used by tests
    pub fn with_backend(config: Config, backend: Arc<dyn TranslationBackend>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, backend })
    }

    /// Build the document translator for this configuration
    fn translator(&self) -> DocumentTranslator {
        DocumentTranslator::new(
            self.backend.clone(),
            self.config.prompt.clone(),
            self.config.chunk_size,
            self.config.max_workers,
            self.config.max_retries,
        )
    }

    /// Translate a file or every subtitle file in a directory
    pub async fn run(
        &self,
        input_path: PathBuf,
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<()> {
        if FileManager::dir_exists(&input_path) {
            self.run_folder(&input_path, output_dir.as_deref(), force_overwrite)
                .await
        } else {
            self.run_file(&input_path, output_dir.as_deref(), force_overwrite)
                .await
                .map(|_| ())
        }
    }

    /// Translate a single subtitle file
    pub async fn run_file(
        &self,
        input: &Path,
        output_dir: Option<&Path>,
        force_overwrite: bool,
    ) -> Result<TranslationSummary> {
        if !FileManager::file_exists(input) {
            return Err(anyhow!("Input file does not exist: {}", input.display()));
        }

        let output = FileManager::translated_output_path(input, output_dir);
        if FileManager::file_exists(&output) && !force_overwrite {
            return Err(anyhow!(
                "Output file already exists (use --force-overwrite): {}",
                output.display()
            ));
        }

        info!("Translating {}", input.display());
        let document = SourceDocument::load(input)?;

        let total_chunks = document.chunks(self.config.chunk_size).len();
        let progress_bar = ProgressBar::new(total_chunks as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let pb = progress_bar.clone();
        let final_lines = self
            .translator()
            .translate_lines(&document, move |current, _total| {
                pb.set_position(current as u64);
            })
            .await;
        progress_bar.finish_and_clear();

        let failed_lines = final_lines
            .iter()
            .filter(|line| line.as_str() == TRANSLATION_FAILED_SENTINEL)
            .count();
        let translated_lines = final_lines
            .iter()
            .zip(&document.lines)
            .filter(|(out, original)| out != original)
            .count()
            - failed_lines;

        SourceDocument::write_lines(&output, &final_lines)?;

        if failed_lines > 0 {
            warn!(
                "{} line(s) could not be translated and carry '{}'",
                failed_lines, TRANSLATION_FAILED_SENTINEL
            );
        }
        info!(
            "Done: {} ({} lines, {} replaced) -> {}",
            input.display(),
            final_lines.len(),
            translated_lines,
            output.display()
        );

        Ok(TranslationSummary {
            total_lines: final_lines.len(),
            translated_lines,
            failed_lines,
        })
    }

    /// Translate every subtitle file in a directory.
    ///
    /// Already-translated outputs are skipped; a failing file is logged and
    /// the batch keeps going.
    pub async fn run_folder(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
        force_overwrite: bool,
    ) -> Result<()> {
        let subtitle_files: Vec<PathBuf> = FileManager::find_files(input_dir, &["srt"])?
            .into_iter()
            .filter(|path| !FileManager::is_translated_output(path))
            .collect();

        if subtitle_files.is_empty() {
            warn!("No subtitle files found under {}", input_dir.display());
            return Ok(());
        }

        info!("Found {} subtitle file(s)", subtitle_files.len());

        let mut failures = 0;
        for subtitle_file in &subtitle_files {
            if let Err(e) = self
                .run_file(subtitle_file, output_dir, force_overwrite)
                .await
            {
                error!("Failed to translate {}: {}", subtitle_file.display(), e);
                failures += 1;
            }
        }

        if failures > 0 {
            warn!(
                "Finished with {}/{} file(s) failed",
                failures,
                subtitle_files.len()
            );
        } else {
            info!("All {} file(s) translated", subtitle_files.len());
        }

        Ok(())
    }
}
