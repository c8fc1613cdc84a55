/*!
 * Chunk-level batch translation.
 *
 * This module turns one [`Chunk`] into a map of absolute line positions to
 * translated text: it selects the translatable lines, sends them to the
 * backend as a 1-indexed numbered list, parses and validates the free-form
 * response, and retries the whole chunk on failure. A chunk that exhausts its
 * attempts degrades to a visible failure sentinel on every translatable line,
 * never to a missing or partial result.
 */

use std::collections::HashMap;
use std::sync::Arc;

use log::{error, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::backend::TranslationBackend;
use crate::document::Chunk;
use crate::errors::TranslationError;
use crate::subtitle::is_translatable;

/// Placeholder written to every translatable line of a chunk whose attempts
/// are exhausted
pub const TRANSLATION_FAILED_SENTINEL: &str = "[TRANSLATION FAILED]";

/// Internal marker a backend response must never contain verbatim
pub const PARSE_ERROR_SENTINEL: &str = "[PARSE ERROR]";

// Lines of the response that count as translations: "<digits>. <text>"
static RESPONSE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*(.*)$").unwrap());

/// Build the user payload for a batch: one numbered entry per line, 1-indexed
pub fn format_batch_input(texts: &[&str]) -> String {
    texts
        .iter()
        .enumerate()
        .map(|(idx, text)| format!("{}. {}", idx + 1, text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract the numbered entries from a raw backend response, in order.
///
/// Only lines matching `<digits>. ` are retained; the index prefix and
/// separator are stripped and the remainder trimmed. Anything else the model
/// chose to say (preambles, commentary, blank lines) is discarded.
pub fn parse_numbered_response(response: &str) -> Vec<String> {
    response
        .lines()
        .filter_map(|line| {
            RESPONSE_LINE
                .captures(line)
                .map(|caps| caps[1].trim().to_string())
        })
        .collect()
}

/// Check a parsed response against the batch that was submitted.
///
/// The retained entries must match the submitted count exactly, and no entry
/// may be empty or carry an internal sentinel marker. Any deviation is a
/// validation failure for the whole attempt, not a crash.
pub fn validate_translations(
    translations: &[String],
    expected: usize,
) -> Result<(), TranslationError> {
    if translations.len() != expected {
        return Err(TranslationError::Validation {
            expected,
            parsed: translations.len(),
            detail: "line count mismatch".to_string(),
        });
    }

    for (idx, translation) in translations.iter().enumerate() {
        if translation.trim().is_empty() {
            return Err(TranslationError::Validation {
                expected,
                parsed: translations.len(),
                detail: format!("entry {} is empty", idx + 1),
            });
        }
        if translation.contains(PARSE_ERROR_SENTINEL)
            || translation.contains(TRANSLATION_FAILED_SENTINEL)
        {
            return Err(TranslationError::Validation {
                expected,
                parsed: translations.len(),
                detail: format!("entry {} contains a sentinel marker", idx + 1),
            });
        }
    }

    Ok(())
}

/// Translator for a single chunk of document lines
#[derive(Clone)]
pub struct ChunkTranslator {
    /// The backend every attempt goes through
    backend: Arc<dyn TranslationBackend>,

    /// Fixed system instruction sent with every request
    prompt: String,

    /// Total attempts per chunk before sentinel fill
    max_retries: u32,
}

impl ChunkTranslator {
    /// Create a new chunk translator
    pub fn new(backend: Arc<dyn TranslationBackend>, prompt: String, max_retries: u32) -> Self {
        Self {
            backend,
            prompt,
            max_retries: max_retries.max(1),
        }
    }

    /// Translate one chunk, returning its start offset and a map from
    /// absolute line position to translated text.
    ///
    /// This never fails: a chunk whose attempts are exhausted (or that hits a
    /// terminal backend error) returns the failure sentinel for every
    /// translatable position instead. Chunks with no translatable lines
    /// return an empty map without touching the backend.
    pub async fn translate_chunk(&self, chunk: &Chunk) -> (usize, HashMap<usize, String>) {
        let positions: Vec<usize> = chunk
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| is_translatable(line))
            .map(|(idx, _)| idx)
            .collect();

        if positions.is_empty() {
            return (chunk.start, HashMap::new());
        }

        let texts: Vec<&str> = positions.iter().map(|&idx| chunk.lines[idx].as_str()).collect();
        let payload = format_batch_input(&texts);

        for attempt in 1..=self.max_retries {
            match self.attempt(&payload, texts.len()).await {
                Ok(translations) => {
                    let map = positions
                        .iter()
                        .zip(translations)
                        .map(|(&relative, text)| (chunk.start + relative, text))
                        .collect();
                    return (chunk.start, map);
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{} failed for chunk at line {}: {}",
                        attempt, self.max_retries, chunk.start, e
                    );
                    if !e.is_retryable() {
                        error!(
                            "Terminal error for chunk at line {}, not retrying",
                            chunk.start
                        );
                        break;
                    }
                    // TODO: add backoff between attempts; they currently fire back-to-back
                }
            }
        }

        // The chunk fails, not the job: every translatable position gets the
        // sentinel so the output stays complete and inspectable.
        let map = positions
            .iter()
            .map(|&relative| (chunk.start + relative, TRANSLATION_FAILED_SENTINEL.to_string()))
            .collect();
        (chunk.start, map)
    }

    /// One full attempt: backend call, parse, validate
    async fn attempt(
        &self,
        payload: &str,
        expected: usize,
    ) -> Result<Vec<String>, TranslationError> {
        let response = self.backend.complete(&self.prompt, payload).await?;
        let translations = parse_numbered_response(&response);

        if let Err(e) = validate_translations(&translations, expected) {
            warn!(
                "Rejected response from backend '{}'. Prompt: {}\nSubmitted payload:\n{}\nRaw response:\n{}",
                self.backend.name(),
                self.prompt,
                payload,
                response
            );
            return Err(e);
        }

        Ok(translations)
    }
}
