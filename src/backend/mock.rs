/*!
 * Mock backend implementations for testing.
 *
 * This module provides deterministic backends that simulate different
 * response shapes the engine must tolerate:
 * - `MockBackend::numbered()` - always returns a well-formed numbered list
 * - `MockBackend::empty()` - always returns an empty string
 * - `MockBackend::failing()` - always fails with an API error
 * - wrong-count, stray-line and sentinel-content behaviors for validation tests
 */

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::TranslationBackend;
use crate::errors::BackendError;

static PAYLOAD_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.\s(.*)$").unwrap());

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Echo each submitted line back with its number and a translation marker
    Numbered,
    /// Return an empty response body
    Empty,
    /// Drop the last entry so the count never matches
    MissingLast,
    /// Interleave un-numbered noise between well-formed numbered lines
    StrayLines,
    /// Return the failure sentinel as the content of every entry
    SentinelContent,
    /// Always fail with a server error
    Failing,
    /// Fail with a client error that no retry can fix
    Terminal,
    /// Fail the first N requests, then behave like `Numbered`
    FailFirst { failures: usize },
    /// Delay before answering (for timeout-adjacent tests)
    Slow { delay_ms: u64 },
}

/// Deterministic backend for testing engine behavior
#[derive(Debug)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Total number of `complete` calls, shared across clones
    request_count: Arc<AtomicUsize>,
    /// Custom response generator, applied instead of `Numbered` echoing
    custom_response: Option<fn(&str) -> String>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a mock that always returns a correct numbered translation
    pub fn numbered() -> Self {
        Self::new(MockBehavior::Numbered)
    }

    /// Create a mock that always returns an empty string
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that always drops the last entry
    pub fn missing_last() -> Self {
        Self::new(MockBehavior::MissingLast)
    }

    /// Create a mock that interleaves stray non-numbered lines
    pub fn stray_lines() -> Self {
        Self::new(MockBehavior::StrayLines)
    }

    /// Create a mock that always fails with a retryable server error
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that always fails with a terminal client error
    pub fn terminal() -> Self {
        Self::new(MockBehavior::Terminal)
    }

    /// Create a mock that fails the first `failures` requests then succeeds
    pub fn fail_first(failures: usize) -> Self {
        Self::new(MockBehavior::FailFirst { failures })
    }

    /// Set a custom response generator, given the raw user payload
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests seen so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Parse the numbered entries out of a request payload
    fn payload_entries(payload: &str) -> Vec<(usize, String)> {
        payload
            .lines()
            .filter_map(|line| {
                PAYLOAD_LINE.captures(line).map(|caps| {
                    let idx = caps[1].parse().unwrap_or(0);
                    (idx, caps[2].to_string())
                })
            })
            .collect()
    }

    /// Render a well-formed numbered translation of a payload
    fn translate_payload(payload: &str) -> String {
        Self::payload_entries(payload)
            .into_iter()
            .map(|(idx, text)| format!("{}. [{}]", idx, text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Clone for MockBackend {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn complete(
        &self,
        _system_prompt: &str,
        user_payload: &str,
    ) -> Result<String, BackendError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Numbered => {
                if let Some(generator) = self.custom_response {
                    Ok(generator(user_payload))
                } else {
                    Ok(Self::translate_payload(user_payload))
                }
            }

            MockBehavior::Empty => Ok(String::new()),

            MockBehavior::MissingLast => {
                let mut entries = Self::payload_entries(user_payload);
                entries.pop();
                Ok(entries
                    .into_iter()
                    .map(|(idx, text)| format!("{}. [{}]", idx, text))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }

            MockBehavior::StrayLines => {
                let mut lines = Vec::new();
                lines.push("Sure! Here are the translations:".to_string());
                for (idx, text) in Self::payload_entries(user_payload) {
                    lines.push(format!("{}. [{}]", idx, text));
                    lines.push("(note: idiomatic rendering)".to_string());
                }
                lines.push("Let me know if you need anything else.".to_string());
                Ok(lines.join("\n"))
            }

            MockBehavior::SentinelContent => {
                let entries = Self::payload_entries(user_payload);
                Ok(entries
                    .into_iter()
                    .map(|(idx, _)| format!("{}. [TRANSLATION FAILED]", idx))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }

            MockBehavior::Failing => Err(BackendError::ApiError {
                status_code: 500,
                message: "Simulated backend failure".to_string(),
            }),

            MockBehavior::Terminal => Err(BackendError::ApiError {
                status_code: 401,
                message: "Simulated invalid credentials".to_string(),
            }),

            MockBehavior::FailFirst { failures } => {
                if count < failures {
                    Err(BackendError::ApiError {
                        status_code: 503,
                        message: format!("Simulated transient failure (request #{})", count + 1),
                    })
                } else {
                    Ok(Self::translate_payload(user_payload))
                }
            }

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(Self::translate_payload(user_payload))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
