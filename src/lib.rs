/*!
 * # subtrans - concurrent chunked subtitle translation
 *
 * A Rust library for rewriting the dialogue text of SubRip subtitle files
 * into another language through an LLM backend, without touching structural
 * lines (sequence indices, timestamp ranges, blank separators).
 *
 * ## Features
 *
 * - Classifies dialogue versus structural lines
 * - Batches lines into fixed-size chunks and dispatches them concurrently
 * - Defensively validates free-form backend responses and retries bad chunks
 * - Always produces an output with the same line count as the input, marking
 *   permanently failed spans with a visible sentinel
 * - Companion utilities for audio extraction and multi-device transcription
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle`: SRT line classification
 * - `document`: Line-oriented document model and chunk partitioning
 * - `translation`: The translation engine:
 *   - `translation::batch`: Per-chunk request/parse/validate/retry
 *   - `translation::orchestrator`: Concurrent fan-out, merge and reassembly
 * - `backend`: Clients for text-generation services:
 *   - `backend::chat`: OpenAI-compatible chat-completions client
 *   - `backend::mock`: Deterministic backend for tests
 * - `media`: ffmpeg audio extraction and transcription dispatch
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod backend;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod media;
pub mod subtitle;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use document::{Chunk, SourceDocument};
pub use errors::{AppError, BackendError, TranslationError};
pub use subtitle::is_translatable;
pub use translation::{ChunkTranslator, DocumentTranslator, TRANSLATION_FAILED_SENTINEL};
