//! Concrete [`ConfigSource`](super::ConfigSource) implementations and
//! format-dispatch helpers.

pub mod file_source;

use sha2::{Digest, Sha256};

use crate::config::model::Config;
use crate::error::BackhaulError;

/// Deserialize a config document, choosing the format from the file
/// extension. Extensions whose format feature is disabled fall through
/// to [`BackhaulError::UnsupportedFormat`].
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, BackhaulError> {
    let parse_err = |e: Box<dyn std::error::Error + Send + Sync>| BackhaulError::ConfigParse {
        path: path_display.to_string(),
        source: e,
    };

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| parse_err(Box::new(e))),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| parse_err(Box::new(e))),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| parse_err(Box::new(e))),

        other => Err(BackhaulError::UnsupportedFormat(other.to_string())),
    }
}

/// Lowercase hex SHA-256 of the raw config bytes, used as the loaded
/// config's version identifier.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}
