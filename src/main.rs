// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use phrasewai::app_config::{self, Config};
use phrasewai::app_controller::Controller;

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
    /// Translate a phrase document (default command)
    Translate {
        /// Input phrase document (.json)
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        #[command(flatten)]
        options: TranslateOptions,
    },

    /// Generate shell completions for phrasewai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by the default invocation and the `translate` subcommand
#[derive(Args, Debug, Clone)]
struct TranslateOptions {
    /// Directory for the translated document (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Overwrite an existing <lang>-translated.json
    #[arg(short, long)]
    force_overwrite: bool,

    /// Override the backend model (e.g. gpt-4o)
    #[arg(short, long)]
    model: Option<String>,

    /// Target language (ISO code such as 'es', or a language name)
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Log verbosity, overrides the config file
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// phrasewai - phrase document translation with AI
///
/// Translates every phrase of a JSON phrase document, including the styled
/// fragments inside each phrase, using an OpenAI-compatible language model.
#[derive(Parser, Debug)]
#[command(name = "phrasewai")]
#[command(version)]
#[command(about = "AI-powered phrase document translation tool")]
#[command(long_about = "phrasewai translates JSON phrase documents using an OpenAI-compatible language model.

EXAMPLES:
    phrasewai phrases.json                      # Translate using default config
    phrasewai -t fr phrases.json                # Translate to French
    phrasewai -t \"Brazilian Portuguese\" p.json  # Free-form language names work too
    phrasewai -f -o out/ phrases.json           # Write to out/, overwriting
    phrasewai completions bash > phrasewai.bash # Generate bash completions

CONFIGURATION:
    Settings are read from conf.json unless -c points elsewhere; a default file
    is written on first use. The API key comes from the OPENAI_API_KEY
    environment variable, or the variable named by backend.api_key_env.

OUTPUT:
    The translated document is written as <target_language>-translated.json.")]
#[command(args_conflicts_with_subcommands = true)]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input phrase document (.json)
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: TranslateOptions,
}

/// Colored stderr logger with wall-clock timestamps
struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    fn install(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(StderrLogger { level }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Marker and ANSI color for a level
    fn style(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => ("·", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = chrono::Local::now().format("%H:%M:%S.%3f");
        let (marker, color) = Self::style(record.level());
        let mut stderr = std::io::stderr().lock();

        // Module path only at debug and below
        let _ = if record.level() >= Level::Debug {
            writeln!(
                stderr,
                "\x1B[{}m{} {} [{}] {}\x1B[0m",
                color,
                timestamp,
                marker,
                record.target(),
                record.args()
            )
        } else {
            writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, timestamp, marker, record.args())
        };
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Accept everything here, the effective level is set through set_max_level
    StderrLogger::install(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "phrasewai", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate { input_path, options }) => run_translate(input_path, options).await,
        None => {
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required, see --help"))?;
            run_translate(input_path, cli.options).await
        }
    }
}

/// Load the config file, or write a default one when it does not exist
fn load_or_create_config(config_path: &Path) -> Result<Config> {
    if config_path.exists() {
        let raw = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        return serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file: {}", config_path.display()));
    }

    warn!("No config at '{}', writing defaults", config_path.display());
    let config = Config::default();
    let json = serde_json::to_string_pretty(&config).context("Failed to serialize default config")?;
    fs::write(config_path, json)
        .with_context(|| format!("Failed to write default config: {}", config_path.display()))?;

    Ok(config)
}

async fn run_translate(input_path: PathBuf, options: TranslateOptions) -> Result<()> {
    let mut config = load_or_create_config(Path::new(&options.config_path))?;

    // CLI flags win over the config file
    if let Some(model) = options.model {
        config.backend.model = model;
    }
    if let Some(target_language) = options.target_language {
        config.target_language = target_language;
    }
    if let Some(level) = options.log_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    let output_dir = match options.output_dir {
        Some(dir) => dir,
        None => input_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf(),
    };

    let controller = Controller::with_config(config)?;
    if let Some(output_path) = controller
        .run(input_path, output_dir, options.force_overwrite)
        .await?
    {
        info!("Success: {}", output_path.display());
    }

    Ok(())
}
