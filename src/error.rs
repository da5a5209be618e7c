//! Error types.
//!
//! [`BackhaulError`] covers every failure the binary can hit outside a
//! request's lifecycle (config resolution, validation, startup);
//! per-request failures are shaped into synthetic responses instead.
//! [`ValidationError`] carries one config problem with enough context
//! to point the user at the offending field.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub service: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  [{}] {}: {}", self.service, self.field, self.message)?;
        match &self.suggestion {
            Some(hint) => write!(f, " ({hint})"),
            None => Ok(()),
        }
    }
}

impl std::error::Error for ValidationError {}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BackhaulError {
    #[error("no config source found\n\n  {hint}")]
    NoConfigSource { hint: String },

    #[error("config file does not exist: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("could not parse {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("config rejected:\n{}", join_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("unsupported config format '{0}' (expected yaml, json, or toml)")]
    UnsupportedFormat(String),

    #[error("invalid listen address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("refusing to overwrite {}", path.display())]
    FileExists { path: PathBuf },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("instance reported status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}
