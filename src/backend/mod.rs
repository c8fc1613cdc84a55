/*!
 * Backend implementations for text-generation services.
 *
 * This module contains the client seam between the translation engine and
 * whatever LLM actually produces the translations:
 * - `chat`: OpenAI-compatible chat-completions API client
 * - `mock`: deterministic in-process backend for tests and benchmarks
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::BackendError;

/// Common trait for all translation backends
///
/// The engine treats the backend as an opaque text generator: it sends a fixed
/// system instruction plus a user payload and gets free-form text back. The
/// trait is object-safe so one `Arc<dyn TranslationBackend>` can be shared by
/// every concurrent chunk task.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Complete a request: system instruction plus user payload in, raw text out
    ///
    /// # Arguments
    /// * `system_prompt` - The fixed translation instruction
    /// * `user_payload` - The numbered list of lines to translate
    ///
    /// # Returns
    /// * `Result<String, BackendError>` - The raw response text or an error
    async fn complete(&self, system_prompt: &str, user_payload: &str)
        -> Result<String, BackendError>;

    /// Human-readable backend name for logging
    fn name(&self) -> &str;
}

pub mod chat;
pub mod mock;
