// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use qasplit::app_config::{self, Config, OutputFormat};
use qasplit::app_controller::Controller;

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Text => OutputFormat::Text,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

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
    /// Segment OCR output into questions and answers (default command)
    #[command(alias = "split")]
    Segment(SegmentArgs),

    /// Generate shell completions for qasplit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct SegmentArgs {
    /// Page directory, form-feed separated .txt file, or .json page list
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file ('-' for stdout); output directory with --batch
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format
    #[arg(short = 'F', long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Treat INPUT as a directory of documents
    #[arg(short, long)]
    batch: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

/// qasplit - Question/Answer segmentation for OCR'd exam pages
#[derive(Parser, Debug)]
#[command(name = "qasplit")]
#[command(version = "0.1.0")]
#[command(args_conflicts_with_subcommands = true)]
#[command(about = "Split OCR'd exam pages into questions and answers")]
#[command(long_about = "qasplit reads recognized text of handwritten exam pages and splits it into
ordered question/answer records, keeping questions intact across page breaks.

EXAMPLES:
    qasplit pages/                          # Segment a directory of page .txt files
    qasplit scan.txt -o -                   # Print the report to stdout
    qasplit -F json scan.json               # Write a JSON report next to the input
    qasplit --batch exams/ -o reports/      # Segment every document in a directory
    qasplit completions bash > qasplit.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Page directory, form-feed separated .txt file, or .json page list
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file ('-' for stdout); output directory with --batch
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format
    #[arg(short = 'F', long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Treat INPUT as a directory of documents
    #[arg(short, long)]
    batch: bool,

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
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
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
    // The logger accepts everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "qasplit", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Segment(args)) => run_segment(args).await,
        None => {
            // Default behavior - top-level args mirror the segment subcommand
            let input = cli
                .input
                .ok_or_else(|| anyhow!("INPUT is required when no subcommand is specified"))?;

            let args = SegmentArgs {
                input,
                output: cli.output,
                format: cli.format,
                config_path: cli.config_path,
                log_level: cli.log_level,
                batch: cli.batch,
                force_overwrite: cli.force_overwrite,
            };
            run_segment(args).await
        }
    }
}

async fn run_segment(options: SegmentArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    // Load or create configuration
    let (mut config, created) = Config::load_or_create(&options.config_path)
        .with_context(|| format!("Failed to load config: {}", options.config_path))?;
    if created {
        warn!("Config file not found at '{}', created default config.", options.config_path);
    }

    // Override config with CLI options if provided
    if let Some(format) = &options.format {
        config.output.format = format.clone().into();
        config.output.extension.clear();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    if options.batch {
        let summary = controller
            .run_batch(options.input, options.output, options.force_overwrite)
            .await?;
        if summary.failed > 0 {
            return Err(anyhow!("{} documents failed", summary.failed));
        }
        return Ok(());
    }

    if !options.input.exists() {
        return Err(anyhow!("Input path does not exist: {:?}", options.input));
    }

    let outcome = controller
        .run(options.input, options.output, options.force_overwrite)
        .await?;
    info!("{:?}", outcome);

    Ok(())
}
