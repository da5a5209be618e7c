//! Tracing subscriber initialization.
//!
//! Production runs emit one JSON object per log line; interactive runs
//! get pretty-printed output. The choice follows the `--json` /
//! `--pretty` flags, falling back to TTY detection when neither is
//! given. Filtering uses a `Targets` filter built from the CLI log
//! level.

use std::io::IsTerminal;

use tracing_subscriber::filter::Targets;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::LogLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Pick the output format from the CLI flags, with TTY detection as
    /// the tiebreaker.
    #[must_use]
    pub fn resolve(pretty: bool, json: bool) -> Self {
        if json {
            Self::Json
        } else if pretty || std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

pub fn init(level: &LogLevel, format: LogFormat) {
    let filter = Targets::new().with_default(tracing::Level::from(level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(false))
            .init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
    }
}
