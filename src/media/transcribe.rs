/*!
 * Transcription dispatch across accelerator devices.
 *
 * Audio files are queued into a shared FIFO and drained by one long-lived
 * worker task per device. Each worker binds its child processes to its device
 * through the `CUDA_VISIBLE_DEVICES` environment selector and produces one
 * subtitle file per audio file. A failing file is logged and skipped; it never
 * stalls the queue or its worker.
 */

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use futures::future::join_all;
use log::{error, info, warn};
use parking_lot::Mutex;
use tokio::process::Command;

use crate::file_utils::FileManager;

/// Audio container extensions eligible for transcription
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "aac"];

/// Settings for a transcription dispatch run
#[derive(Debug, Clone)]
pub struct TranscribeConfig {
    /// Language code passed to the transcriber (e.g. "en", "zh")
    pub language: String,

    /// Optional custom model path; the transcriber's default model otherwise
    pub model_path: Option<PathBuf>,

    /// Number of accelerator devices, one worker per device
    pub num_devices: usize,

    /// Transcriber executable to invoke
    pub command: String,
}

impl Default for TranscribeConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            model_path: None,
            num_devices: 1,
            command: "whisper".to_string(),
        }
    }
}

/// Outcome counters for a dispatch run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TranscriptionSummary {
    /// Files transcribed successfully
    pub transcribed: usize,
    /// Files skipped after a transcription failure
    pub failed: usize,
}

/// Dispatches transcription jobs from a shared queue to per-device workers
pub struct TranscriptionDispatcher {
    config: TranscribeConfig,
}

impl TranscriptionDispatcher {
    /// Create a new dispatcher
    pub fn new(config: TranscribeConfig) -> Self {
        Self {
            config: TranscribeConfig {
                num_devices: config.num_devices.max(1),
                ..config
            },
        }
    }

    /// Transcribe every audio file under `input_dir` into `output_dir`.
    ///
    /// Files are consumed from a shared FIFO by one worker per device, so a
    /// slow file on one device never blocks the others.
    pub async fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<TranscriptionSummary> {
        FileManager::ensure_dir(output_dir)?;

        let audio_files = FileManager::find_files(input_dir, AUDIO_EXTENSIONS)?;
        if audio_files.is_empty() {
            warn!("No audio files found under {}", input_dir.display());
            return Ok(TranscriptionSummary::default());
        }

        info!(
            "Dispatching {} audio files across {} device(s)",
            audio_files.len(),
            self.config.num_devices
        );

        let queue: Arc<Mutex<VecDeque<PathBuf>>> =
            Arc::new(Mutex::new(audio_files.into_iter().collect()));
        let transcribed = Arc::new(AtomicUsize::new(0));
        let failed = Arc::new(AtomicUsize::new(0));

        let workers = (0..self.config.num_devices).map(|device_id| {
            let queue = queue.clone();
            let transcribed = transcribed.clone();
            let failed = failed.clone();
            let config = self.config.clone();
            let output_dir = output_dir.to_path_buf();

            async move {
                loop {
                    // Pop under the lock, run the job outside it
                    let next = queue.lock().pop_front();
                    let Some(audio_file) = next else {
                        break;
                    };

                    info!("Processing {} on device {}", audio_file.display(), device_id);
                    match transcribe_one(&config, &audio_file, &output_dir, device_id).await {
                        Ok(srt_path) => {
                            info!("Wrote {}", srt_path.display());
                            transcribed.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(e) => {
                            error!("Skipping {}: {}", audio_file.display(), e);
                            failed.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                }
            }
        });

        join_all(workers).await;

        Ok(TranscriptionSummary {
            transcribed: transcribed.load(Ordering::SeqCst),
            failed: failed.load(Ordering::SeqCst),
        })
    }
}

/// Run the transcriber on one audio file, bound to one device
async fn transcribe_one(
    config: &TranscribeConfig,
    audio_file: &Path,
    output_dir: &Path,
    device_id: usize,
) -> Result<PathBuf> {
    let stem = audio_file
        .file_stem()
        .ok_or_else(|| anyhow!("Audio path has no file name: {}", audio_file.display()))?;
    let srt_path = output_dir.join(format!("{}.srt", stem.to_string_lossy()));

    let mut command = Command::new(&config.command);
    command
        .env("CUDA_VISIBLE_DEVICES", device_id.to_string())
        .arg(audio_file)
        .arg(&srt_path)
        .args(["--language", config.language.as_str()]);

    if let Some(model_path) = &config.model_path {
        command.arg("--model").arg(model_path);
    }

    let output = command
        .output()
        .await
        .map_err(|e| anyhow!("Failed to execute {}: {}", config.command, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "{} exited with {} on {}: {}",
            config.command,
            output.status,
            audio_file.display(),
            stderr.trim()
        ));
    }

    Ok(srt_path)
}
