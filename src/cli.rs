//! clap-derive command-line surface.
//!
//! [`Cli`] is the top-level parser; [`Commands`] covers the four
//! subcommands (`run`, `init`, `validate`, `health`). Every runtime
//! flag doubles as an environment variable so containerized
//! deployments can configure the proxy without a command line.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "backhaul",
    version,
    about = "Host-routing HTTP reverse proxy with upstream failover",
    propagate_version = true,
    after_help = "\x1b[1mGetting started:\x1b[0m\n  \
        backhaul init                 Write a starter backhaul.yaml\n  \
        backhaul run                  Serve using ./backhaul.yaml\n  \
        backhaul run -c prod.yaml     Serve using a specific file"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server
    Run(Box<RunArgs>),

    /// Generate a starter config file
    Init(InitArgs),

    /// Validate a config file without starting
    Validate(ValidateArgs),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        backhaul run                              Auto-detect config in cwd\n  \
        backhaul run -c prod.yaml -p 80           Explicit config and port\n  \
        backhaul run --pretty -l debug            Verbose local development")]
pub struct RunArgs {
    /// Config file (.yaml, .json, or .toml)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // -- Logging --
    /// Minimum log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Human-readable log output
    #[arg(long)]
    pub pretty: bool,

    /// JSON log output even on a TTY
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Default per-upstream timeout in milliseconds
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_MS",
        default_value_t = 30_000,
        help_heading = "Tuning"
    )]
    pub timeout: u64,

    /// Largest accepted request body in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 1_048_576,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        backhaul init                             Minimal YAML starter\n  \
        backhaul init --full                      Every knob, documented\n  \
        backhaul init -f toml -o services.toml    TOML, custom path")]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Where to write the file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include commented documentation for every option
    #[arg(long)]
    pub full: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to check
    #[arg(default_value = "backhaul.yaml")]
    pub config: PathBuf,

    /// Report format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct HealthArgs {
    /// Base URL of the running instance
    #[arg(default_value = "http://localhost:8080")]
    pub url: String,

    /// Print the raw JSON payload
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<&LogLevel> for tracing::Level {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
