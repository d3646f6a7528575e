// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod ass_builder;
mod errors;
mod file_utils;
mod karaoke_renderer;
mod language_utils;
mod phrase_inference;
mod phrase_matcher;
mod providers;
mod run_context;
mod sequencer;
mod subtitle_extractor;
mod text_normalizer;
mod translation;
mod video_encoder;

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
    /// Build the karaoke montage from a folder of clips (default command)
    Run(RunArgs),

    /// Generate shell completions for karacut
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Folder of input clips to process
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// Phrase to highlight; inferred from the clips when omitted
    #[arg(short, long)]
    phrase: Option<String>,

    /// Target language code(s) for translated renditions (repeatable)
    #[arg(short = 'l', long = "lang")]
    languages: Vec<String>,

    /// Translation API key
    #[arg(long, env = "GOOGLE_API_KEY")]
    api_key: Option<String>,

    /// Output canvas size as WIDTHxHEIGHT
    #[arg(short, long)]
    size: Option<String>,

    /// Directory receiving the final montage files
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "karacut.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Keep per-clip temporary files after the run
    #[arg(long)]
    keep_temp: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

/// karacut - karaoke phrase montages from subtitled clips
///
/// Turns a folder of short subtitled clips into one annotated video with
/// word-by-word karaoke highlighting of a common phrase.
#[derive(Parser, Debug)]
#[command(name = "karacut")]
#[command(version = "1.0.0")]
#[command(about = "Karaoke phrase montage builder")]
#[command(long_about = "karacut scans a folder of short video clips, reads the word-synced subtitle
track embedded in each one, highlights a phrase across all clips and burns a
karaoke overlay before concatenating everything into a single montage.

EXAMPLES:
    karacut clips/                          # Infer the common phrase and build
    karacut -p \"happy birthday\" clips/      # Highlight an explicit phrase
    karacut -l fr -l de clips/              # Add French and German renditions
    karacut -s 1280x720 -o out clips/       # Custom canvas and output folder
    karacut completions bash > karacut.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in karacut.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically. Translated renditions
    require a Google Cloud Translation API key (--api-key or GOOGLE_API_KEY).")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Folder of input clips to process
    #[arg(value_name = "INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Phrase to highlight; inferred from the clips when omitted
    #[arg(short, long)]
    phrase: Option<String>,

    /// Target language code(s) for translated renditions (repeatable)
    #[arg(short = 'l', long = "lang")]
    languages: Vec<String>,

    /// Translation API key
    #[arg(long, env = "GOOGLE_API_KEY")]
    api_key: Option<String>,

    /// Output canvas size as WIDTHxHEIGHT
    #[arg(short, long)]
    size: Option<String>,

    /// Directory receiving the final montage files
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "karacut.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Keep per-clip temporary files after the run
    #[arg(long)]
    keep_temp: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
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

    // @returns: ANSI color for log level
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
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
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
            generate(shell, &mut cmd, "karacut", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Run(args)) => run_montage(args).await,
        None => {
            // Default behavior - top-level args mirror the run subcommand
            let input_dir = cli.input_dir.ok_or_else(|| {
                anyhow!("INPUT_DIR is required when no subcommand is specified")
            })?;

            let args = RunArgs {
                input_dir,
                phrase: cli.phrase,
                languages: cli.languages,
                api_key: cli.api_key,
                size: cli.size,
                output_dir: cli.output_dir,
                config_path: cli.config_path,
                log_level: cli.log_level,
                keep_temp: cli.keep_temp,
                force_overwrite: cli.force_overwrite,
            };
            run_montage(args).await
        }
    }
}

async fn run_montage(options: RunArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if options.phrase.is_some() {
        config.target_phrase = options.phrase.clone();
    }
    if !options.languages.is_empty() {
        config.target_languages = options
            .languages
            .iter()
            .flat_map(|l| l.split(','))
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
    }
    if let Some(api_key) = &options.api_key {
        config.translation.set_api_key(api_key);
    }
    if let Some(size) = &options.size {
        config.video_size = size.clone();
    }
    if let Some(output_dir) = &options.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if options.keep_temp {
        config.keep_temp = true;
    }

    // Configuration problems are fatal before any clip is touched
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let controller = Controller::with_config(config)?;
    controller.run(options.input_dir, options.force_overwrite).await
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
