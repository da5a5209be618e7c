//! Configuration loading.
//!
//! A [`ConfigSource`] turns some backing store into a validated
//! [`Config`] plus a [`ConfigVersion`] identifying exactly what was
//! loaded (surfaced by `/health`). The proxy resolves its source once
//! at startup; nothing reloads afterwards.

pub mod model;
pub mod sources;
pub mod validation;

use async_trait::async_trait;

use crate::error::BackhaulError;
use model::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigVersion {
    Hash(String),
}

// Boxed as `dyn ConfigSource`, which native async-fn-in-trait cannot
// support; async_trait provides the object-safe shape.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn load(&self) -> Result<(Config, ConfigVersion), BackhaulError>;
}
