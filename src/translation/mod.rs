/*!
 * Concurrent chunked translation engine.
 *
 * This module contains the core pipeline that rewrites a document's dialogue
 * lines through a translation backend. It is split into two submodules:
 *
 * - `batch`: per-chunk request building, response parsing/validation and retry
 * - `orchestrator`: document-level concurrent fan-out, merge and reassembly
 */

// Re-export main types for easier usage
pub use self::batch::{
    ChunkTranslator, PARSE_ERROR_SENTINEL, TRANSLATION_FAILED_SENTINEL, format_batch_input,
    parse_numbered_response, validate_translations,
};
pub use self::orchestrator::{DocumentTranslator, TranslationSummary};

// Submodules
pub mod batch;
pub mod orchestrator;
