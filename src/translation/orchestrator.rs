/*!
 * Document-level translation orchestration.
 *
 * The orchestrator fans one translation task per chunk out over a bounded
 * pool, waits for every task unconditionally, merges the disjoint per-chunk
 * result maps and reassembles the document in original order. Chunk tasks
 * may finish in any order; ordering is restored at reassembly, never assumed
 * during execution. A failed chunk degrades only its own lines, so there is
 * no cancellation path.
 */

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use futures::stream::{self, StreamExt};
use log::{debug, info};
use tokio::sync::Semaphore;

use crate::backend::TranslationBackend;
use crate::document::SourceDocument;

use super::batch::{ChunkTranslator, TRANSLATION_FAILED_SENTINEL};

/// Outcome counters for one translated document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslationSummary {
    /// Total number of lines in the document
    pub total_lines: usize,
    /// Number of lines replaced with a translation
    pub translated_lines: usize,
    /// Number of lines carrying the failure sentinel
    pub failed_lines: usize,
}

/// Orchestrates concurrent chunk translation over a whole document
pub struct DocumentTranslator {
    /// Per-chunk translator, shared by every task
    translator: ChunkTranslator,

    /// Lines per chunk
    chunk_size: usize,

    /// Concurrency cap for in-flight chunk tasks
    max_workers: usize,
}

impl DocumentTranslator {
    /// Create a new document translator
    pub fn new(
        backend: Arc<dyn TranslationBackend>,
        prompt: String,
        chunk_size: usize,
        max_workers: usize,
        max_retries: u32,
    ) -> Self {
        Self {
            translator: ChunkTranslator::new(backend, prompt, max_retries),
            chunk_size: chunk_size.max(1),
            max_workers: max_workers.max(1),
        }
    }

    /// Translate every chunk of a loaded document and return the final line
    /// sequence, equal in length to the input.
    ///
    /// `progress_callback` is invoked with (completed, total) after each chunk
    /// task finishes, in completion order.
    pub async fn translate_lines(
        &self,
        document: &SourceDocument,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Vec<String> {
        let chunks = document.chunks(self.chunk_size);
        let total_chunks = chunks.len();

        // Bounded fan-out: one task per chunk, gated by the semaphore
        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let completed_chunks = Arc::new(AtomicUsize::new(0));

        let results = stream::iter(chunks)
            .map(|chunk| {
                let translator = self.translator.clone();
                let semaphore = semaphore.clone();
                let completed_chunks = completed_chunks.clone();
                let progress_callback = progress_callback.clone();

                async move {
                    let _permit = semaphore.acquire().await.unwrap();
                    let result = translator.translate_chunk(&chunk).await;

                    let current = completed_chunks.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total_chunks);

                    result
                }
            })
            .buffer_unordered(self.max_workers)
            .collect::<Vec<_>>()
            .await;

        // Chunk position ranges are disjoint by construction, so the merge is
        // a plain union with no conflicting keys.
        let mut merged: HashMap<usize, String> = HashMap::new();
        for (start, translations) in results {
            debug!(
                "Merged chunk at line {}: {} translated lines",
                start,
                translations.len()
            );
            merged.extend(translations);
        }

        // Rebuild in original order: translation where present, original line
        // everywhere else.
        document
            .lines
            .iter()
            .enumerate()
            .map(|(idx, line)| merged.remove(&idx).unwrap_or_else(|| line.clone()))
            .collect()
    }

    /// Translate one file end to end: load, translate, write.
    ///
    /// Read and write failures are fatal for this document and propagate;
    /// backend trouble never is, it only degrades lines to the sentinel.
    pub async fn translate_file<P: AsRef<Path>>(
        &self,
        input: P,
        output: P,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<TranslationSummary> {
        let input = input.as_ref();
        let output = output.as_ref();

        let document = SourceDocument::load(input)?;
        let final_lines = self.translate_lines(&document, progress_callback).await;

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

        SourceDocument::write_lines(output, &final_lines)?;
        info!(
            "Translated {} ({} lines, {} replaced, {} failed) -> {}",
            input.display(),
            final_lines.len(),
            translated_lines,
            failed_lines,
            output.display()
        );

        Ok(TranslationSummary {
            total_lines: final_lines.len(),
            translated_lines,
            failed_lines,
        })
    }
}
