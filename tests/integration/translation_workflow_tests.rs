/*!
 * End-to-end translation workflow tests with deterministic mock backends
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use subtrans::app_config::Config;
use subtrans::app_controller::Controller;
use subtrans::backend::mock::MockBackend;
use subtrans::document::SourceDocument;
use subtrans::file_utils::FileManager;
use subtrans::subtitle::is_translatable;
use subtrans::translation::{DocumentTranslator, TRANSLATION_FAILED_SENTINEL};

use crate::common;

fn translator_with(backend: &MockBackend, chunk_size: usize, max_workers: usize, max_retries: u32) -> DocumentTranslator {
    DocumentTranslator::new(
        Arc::new(backend.clone()),
        "You are a professional translator.".to_string(),
        chunk_size,
        max_workers,
        max_retries,
    )
}

fn no_progress(_current: usize, _total: usize) {}

/// A single block translates exactly as the backend dictates, structure untouched
#[tokio::test]
async fn test_translateLines_withSingleBlock_shouldReplaceOnlyDialogue() {
    let backend = MockBackend::numbered().with_custom_response(|_| "1. 你好世界".to_string());
    let translator = translator_with(&backend, 500, 10, 5);

    let document = SourceDocument::from_lines(vec![
        "1".to_string(),
        "00:00:01,000 --> 00:00:02,000".to_string(),
        "Hello world".to_string(),
        "".to_string(),
    ]);

    let output = translator.translate_lines(&document, no_progress).await;

    assert_eq!(
        output,
        vec![
            "1".to_string(),
            "00:00:01,000 --> 00:00:02,000".to_string(),
            "你好世界".to_string(),
            "".to_string(),
        ]
    );
    assert_eq!(backend.request_count(), 1);
}

/// A backend that always answers with an empty string burns exactly
/// max_retries attempts and leaves the sentinel behind
#[tokio::test]
async fn test_translateLines_withEmptyBackend_shouldSentinelAfterExactRetries() {
    let backend = MockBackend::empty();
    let translator = translator_with(&backend, 500, 10, 3);

    let document = SourceDocument::from_lines(vec![
        "1".to_string(),
        "00:00:01,000 --> 00:00:02,000".to_string(),
        "Hello world".to_string(),
        "".to_string(),
    ]);

    let output = translator.translate_lines(&document, no_progress).await;

    assert_eq!(
        output,
        vec![
            "1".to_string(),
            "00:00:01,000 --> 00:00:02,000".to_string(),
            TRANSLATION_FAILED_SENTINEL.to_string(),
            "".to_string(),
        ]
    );
    assert_eq!(backend.request_count(), 3);
}

/// Output length always equals input length, whatever the chunking
#[tokio::test]
async fn test_translateLines_withManyChunks_shouldPreserveLength() {
    let backend = MockBackend::numbered();
    let translator = translator_with(&backend, 7, 4, 2);

    let lines = common::generate_subtitle_lines(40);
    let document = SourceDocument::from_lines(lines.clone());

    let output = translator.translate_lines(&document, no_progress).await;

    assert_eq!(output.len(), lines.len());
    // Every dialogue line was replaced, nothing failed
    assert!(!output.iter().any(|l| l == TRANSLATION_FAILED_SENTINEL));
    for (original, translated) in lines.iter().zip(&output) {
        if is_translatable(original) {
            assert_eq!(translated, &format!("[{}]", original));
        }
    }
}

/// Structural lines pass through byte-identical
#[tokio::test]
async fn test_translateLines_shouldPassStructuralLinesThroughUnchanged() {
    let backend = MockBackend::numbered();
    let translator = translator_with(&backend, 5, 3, 2);

    let lines = common::generate_subtitle_lines(25);
    let document = SourceDocument::from_lines(lines.clone());

    let output = translator.translate_lines(&document, no_progress).await;

    for (original, translated) in lines.iter().zip(&output) {
        if !is_translatable(original) {
            assert_eq!(original, translated);
        }
    }
}

/// The result is independent of worker-completion order: sequential and
/// concurrent runs produce the same final document
#[tokio::test]
async fn test_translateLines_shouldBeIndependentOfCompletionOrder() {
    let lines = common::generate_subtitle_lines(30);

    let sequential_backend = MockBackend::numbered();
    let sequential = translator_with(&sequential_backend, 6, 1, 2)
        .translate_lines(&SourceDocument::from_lines(lines.clone()), no_progress)
        .await;

    let concurrent_backend = MockBackend::numbered();
    let concurrent = translator_with(&concurrent_backend, 6, 8, 2)
        .translate_lines(&SourceDocument::from_lines(lines.clone()), no_progress)
        .await;

    assert_eq!(sequential, concurrent);
}

/// A chunk that permanently fails degrades only its own lines; siblings finish
#[tokio::test]
async fn test_translateLines_withOneBadChunk_shouldNotAffectSiblings() {
    // fail_first(4) with max_retries=2: the first chunk dispatched burns its
    // two attempts and part of the next chunk's, depending on scheduling, so
    // run sequentially for a deterministic victim
    let backend = MockBackend::fail_first(2);
    let translator = translator_with(&backend, 4, 1, 2);

    let lines = common::generate_subtitle_lines(8);
    let document = SourceDocument::from_lines(lines.clone());

    let output = translator.translate_lines(&document, no_progress).await;

    assert_eq!(output.len(), lines.len());
    let failed = output
        .iter()
        .filter(|l| l.as_str() == TRANSLATION_FAILED_SENTINEL)
        .count();
    let translated = output
        .iter()
        .filter(|l| l.starts_with('[') && l.as_str() != TRANSLATION_FAILED_SENTINEL)
        .count();
    assert!(failed > 0);
    assert!(translated > 0);
    assert_eq!(
        failed + translated,
        lines.iter().filter(|l| is_translatable(l)).count()
    );
}

/// Progress is reported once per chunk, ending at (total, total)
#[tokio::test]
async fn test_translateLines_shouldReportProgressPerChunk() {
    let backend = MockBackend::numbered();
    let translator = translator_with(&backend, 4, 3, 2);

    let document = SourceDocument::from_lines(common::generate_subtitle_lines(12));
    let expected_chunks = document.chunks(4).len();

    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();
    translator
        .translate_lines(&document, move |_current, total| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            assert_eq!(total, expected_chunks);
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), expected_chunks);
}

/// End-to-end file translation through the library entry point
#[tokio::test]
async fn test_translateFile_shouldLoadTranslateAndWrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(&temp_dir.path().to_path_buf(), "in.srt")?;
    let output = temp_dir.path().join("out.srt");

    let backend = MockBackend::numbered();
    let summary = translator_with(&backend, 4, 2, 2)
        .translate_file(&input, &output, no_progress)
        .await?;

    assert_eq!(summary.total_lines, common::sample_subtitle_lines().len());
    assert_eq!(summary.translated_lines, 3);
    assert_eq!(summary.failed_lines, 0);

    let written = SourceDocument::load(&output)?;
    assert_eq!(written.len(), summary.total_lines);
    Ok(())
}

/// Reading a missing input is fatal for the job and propagates
#[tokio::test]
async fn test_translateFile_withMissingInput_shouldFail() {
    let backend = MockBackend::numbered();
    let result = translator_with(&backend, 4, 2, 2)
        .translate_file(
            std::path::Path::new("/nonexistent/in.srt"),
            std::path::Path::new("/nonexistent/out.srt"),
            no_progress,
        )
        .await;
    assert!(result.is_err());
    assert_eq!(backend.request_count(), 0);
}

/// End-to-end file translation through the controller
#[tokio::test]
async fn test_controller_runFile_shouldWriteTranslatedOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(&temp_dir.path().to_path_buf(), "episode.srt")?;

    let config = Config {
        chunk_size: 4,
        max_workers: 2,
        max_retries: 2,
        ..Config::default()
    };
    let controller = Controller::with_backend(config, Arc::new(MockBackend::numbered()))?;

    let summary = controller.run_file(&input, None, false).await?;

    let output = temp_dir.path().join("episode_translated.srt");
    assert!(FileManager::file_exists(&output));
    assert_eq!(summary.failed_lines, 0);
    assert_eq!(summary.translated_lines, 3);

    let translated = SourceDocument::load(&output)?;
    assert_eq!(translated.len(), common::sample_subtitle_lines().len());
    assert_eq!(translated.lines[2], "[This is a test subtitle.]");
    Ok(())
}

/// Overwrite protection blocks a second run unless forced
#[tokio::test]
async fn test_controller_runFile_withExistingOutput_shouldRespectForceFlag() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(&temp_dir.path().to_path_buf(), "episode.srt")?;

    let config = Config {
        chunk_size: 4,
        ..Config::default()
    };
    let controller = Controller::with_backend(config, Arc::new(MockBackend::numbered()))?;

    controller.run_file(&input, None, false).await?;
    assert!(controller.run_file(&input, None, false).await.is_err());
    assert!(controller.run_file(&input, None, true).await.is_ok());
    Ok(())
}

/// Folder runs translate every subtitle and skip already-translated outputs
#[tokio::test]
async fn test_controller_runFolder_shouldSkipTranslatedOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_subtitle(&dir, "one.srt")?;
    common::create_test_subtitle(&dir, "two.srt")?;
    common::create_test_subtitle(&dir, "old_translated.srt")?;

    let config = Config {
        chunk_size: 4,
        ..Config::default()
    };
    let controller = Controller::with_backend(config, Arc::new(MockBackend::numbered()))?;

    controller.run_folder(&dir, None, false).await?;

    assert!(FileManager::file_exists(dir.join("one_translated.srt")));
    assert!(FileManager::file_exists(dir.join("two_translated.srt")));
    assert!(!FileManager::file_exists(
        dir.join("old_translated_translated.srt")
    ));
    Ok(())
}
