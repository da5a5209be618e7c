//! File-backed [`ConfigSource`].
//!
//! One [`FileSource`] type serves every file format: the constructors
//! ([`FileSource::yaml`], [`FileSource::json`], [`FileSource::toml`],
//! each behind its feature flag) differ only in the deserializer they
//! plug in. Loading reads the file through tokio, parses, validates,
//! and hashes the raw bytes into a [`ConfigVersion`].

use std::path::PathBuf;

use async_trait::async_trait;

use super::sha256_hex;
use crate::config::model::Config;
use crate::config::validation::validate;
use crate::config::{ConfigSource, ConfigVersion};
use crate::error::BackhaulError;

type Deserializer = fn(&str) -> Result<Config, Box<dyn std::error::Error + Send + Sync>>;

pub struct FileSource {
    path: PathBuf,
    name: &'static str,
    deserialize: Deserializer,
}

impl FileSource {
    #[cfg(feature = "yaml")]
    #[must_use]
    pub fn yaml(path: PathBuf) -> Self {
        Self {
            path,
            name: "yaml",
            deserialize: |content| serde_yml::from_str(content).map_err(Into::into),
        }
    }

    #[cfg(feature = "json")]
    #[must_use]
    pub fn json(path: PathBuf) -> Self {
        Self {
            path,
            name: "json",
            deserialize: |content| serde_json::from_str(content).map_err(Into::into),
        }
    }

    #[cfg(feature = "toml")]
    #[must_use]
    pub fn toml(path: PathBuf) -> Self {
        Self {
            path,
            name: "toml",
            deserialize: |content| toml::from_str(content).map_err(Into::into),
        }
    }
}

#[async_trait]
impl ConfigSource for FileSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn load(&self) -> Result<(Config, ConfigVersion), BackhaulError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BackhaulError::ConfigFileNotFound {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let config = (self.deserialize)(&content).map_err(|e| BackhaulError::ConfigParse {
            path: self.path.display().to_string(),
            source: e,
        })?;
        validate(&config).map_err(|errors| BackhaulError::ConfigValidation { errors })?;

        let version = ConfigVersion::Hash(sha256_hex(content.as_bytes()));
        Ok((config, version))
    }
}
