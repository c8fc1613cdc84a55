// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::Config;
use crate::app_controller::Controller;
use crate::media::audio;
use crate::media::transcribe::{TranscribeConfig, TranscriptionDispatcher};

mod app_config;
mod app_controller;
mod backend;
mod document;
mod errors;
mod file_utils;
mod media;
mod subtitle;
mod translation;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate subtitle dialogue lines using an LLM backend (default command)
    Translate(TranslateArgs),

    /// Extract audio tracks from video files via ffmpeg
    ExtractAudio(ExtractAudioArgs),

    /// Transcribe audio files to subtitles across accelerator devices
    Transcribe(TranscribeArgs),

    /// Generate shell completions for subtrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Directory for translated files (defaults to beside each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Lines per translation chunk
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Maximum concurrent chunk requests
    #[arg(long)]
    max_workers: Option<usize>,

    /// Attempts per chunk before marking its lines failed
    #[arg(long)]
    max_retries: Option<u32>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct ExtractAudioArgs {
    /// Directory to scan for video files
    #[arg(value_name = "INPUT_DIR", default_value = ".")]
    input_dir: PathBuf,

    /// Directory for extracted audio files
    #[arg(short, long, default_value = "audio")]
    output_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct TranscribeArgs {
    /// Directory to scan for audio files
    #[arg(value_name = "INPUT_DIR", default_value = "audio")]
    input_dir: PathBuf,

    /// Directory for generated subtitle files
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Language code (e.g. "en", "zh")
    #[arg(short, long, default_value = "en")]
    language: String,

    /// Custom model path (transcriber default model if omitted)
    #[arg(short, long)]
    model_path: Option<PathBuf>,

    /// Number of accelerator devices to spread work over
    #[arg(short, long, default_value_t = 1)]
    num_devices: usize,

    /// Transcriber executable to invoke
    #[arg(long, default_value = "whisper")]
    command: String,
}

/// subtrans - LLM-powered subtitle translation pipeline
///
/// Rewrites the dialogue lines of SubRip files through a translation backend
/// while leaving indices, timestamps and separators untouched.
#[derive(Parser, Debug)]
#[command(name = "subtrans")]
#[command(version = "0.1.0")]
#[command(about = "Concurrent chunked subtitle translation")]
#[command(long_about = "subtrans translates the dialogue text of .srt files using an \
OpenAI-compatible LLM backend, batching lines into chunks and dispatching them \
concurrently. Structural lines pass through untouched and the output always has \
the same line count as the input, even when some chunks fail.

EXAMPLES:
    subtrans movie.srt                      # Translate one file using conf.json
    subtrans /media/show/                   # Translate every .srt in a directory
    subtrans --chunk-size 20 movie.srt      # Smaller batches, finer failure isolation
    subtrans extract-audio /videos -o audio # Pull audio tracks out of videos
    subtrans transcribe audio -n 8          # Transcribe across 8 devices
    subtrans completions bash               # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Directory for translated files (defaults to beside each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Lines per translation chunk
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Maximum concurrent chunk requests
    #[arg(long)]
    max_workers: Option<usize>,

    /// Attempts per chunk before marking its lines failed
    #[arg(long)]
    max_retries: Option<u32>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subtrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::ExtractAudio(args)) => run_extract_audio(args).await,
        Some(Commands::Transcribe(args)) => run_transcribe(args).await,
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let translate_args = TranslateArgs {
                input_path,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                chunk_size: cli.chunk_size,
                max_workers: cli.max_workers,
                max_retries: cli.max_retries,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

/// Run the translate command
async fn run_translate(args: TranslateArgs) -> Result<()> {
    let mut config = Config::from_file(&args.config_path)?;

    // CLI options override the config file
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(max_workers) = args.max_workers {
        config.max_workers = max_workers;
    }
    if let Some(max_retries) = args.max_retries {
        config.max_retries = max_retries;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;
    controller
        .run(args.input_path, args.output_dir, args.force_overwrite)
        .await
}

/// Run the extract-audio command
async fn run_extract_audio(args: ExtractAudioArgs) -> Result<()> {
    let summary = audio::extract_all(&args.input_dir, &args.output_dir).await?;
    info!(
        "Audio extraction finished: {} extracted, {} failed",
        summary.extracted, summary.failed
    );
    Ok(())
}

/// Run the transcribe command
async fn run_transcribe(args: TranscribeArgs) -> Result<()> {
    let dispatcher = TranscriptionDispatcher::new(TranscribeConfig {
        language: args.language,
        model_path: args.model_path,
        num_devices: args.num_devices,
        command: args.command,
    });

    let summary = dispatcher.run(&args.input_dir, &args.output_dir).await?;
    info!(
        "Transcription finished: {} transcribed, {} failed",
        summary.transcribed, summary.failed
    );
    Ok(())
}
