use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, anyhow};
use log::{error, info, warn};
use tokio::process::Command;

use crate::file_utils::FileManager;

// @module: Audio extraction from video files via ffmpeg

/// Video container extensions eligible for audio extraction
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "mov", "flv", "wmv"];

/// Per-file timeout for the ffmpeg invocation
const FFMPEG_TIMEOUT: Duration = Duration::from_secs(600);

/// Outcome counters for a directory extraction run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExtractionSummary {
    /// Files extracted successfully
    pub extracted: usize,
    /// Files skipped after an extraction failure
    pub failed: usize,
}

/// Extract the audio track of one video file into `output_dir` as mp3.
///
/// Output keeps the video's base name with an `.mp3` extension.
pub async fn extract_audio(video_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    if !FileManager::file_exists(video_path) {
        return Err(anyhow!("Video file does not exist: {}", video_path.display()));
    }
    FileManager::ensure_dir(output_dir)?;

    let stem = video_path
        .file_stem()
        .ok_or_else(|| anyhow!("Video path has no file name: {}", video_path.display()))?;
    let audio_path = output_dir.join(format!("{}.mp3", stem.to_string_lossy()));

    // Select all audio streams and transcode with libmp3lame
    let ffmpeg_future = Command::new("ffmpeg")
        .args([
            "-y",
            "-i",
            video_path.to_str().unwrap_or_default(),
            "-map",
            "0:a",
            "-c:a",
            "libmp3lame",
            "-q:a",
            "2",
            audio_path.to_str().unwrap_or_default(),
        ])
        .output();

    let output = tokio::select! {
        result = ffmpeg_future => {
            result.map_err(|e| anyhow!("Failed to execute ffmpeg: {}", e))?
        },
        _ = tokio::time::sleep(FFMPEG_TIMEOUT) => {
            return Err(anyhow!("ffmpeg timed out after {}s on {}", FFMPEG_TIMEOUT.as_secs(), video_path.display()));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let filtered = filter_ffmpeg_stderr(&stderr);
        error!("Audio extraction failed for {}: {}", video_path.display(), filtered);
        return Err(anyhow!("ffmpeg extraction failed: {}", filtered));
    }

    info!("Audio extracted: {}", audio_path.display());
    Ok(audio_path)
}

/// Extract audio from every video file under `input_dir`.
///
/// A failing file is logged and skipped; the batch keeps going.
pub async fn extract_all(input_dir: &Path, output_dir: &Path) -> Result<ExtractionSummary> {
    let videos = FileManager::find_files(input_dir, VIDEO_EXTENSIONS)?;
    if videos.is_empty() {
        warn!("No video files found under {}", input_dir.display());
        return Ok(ExtractionSummary::default());
    }

    let mut summary = ExtractionSummary::default();
    for video in videos {
        match extract_audio(&video, output_dir).await {
            Ok(_) => summary.extracted += 1,
            Err(e) => {
                error!("Skipping {}: {}", video.display(), e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "size=",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| line.starts_with(p) || trimmed.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
