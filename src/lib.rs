//! Backhaul is a host-routing HTTP reverse proxy.
//!
//! Inbound requests are matched by host against an ordered service
//! list; the matched service's upstreams are rotated round robin, and
//! the upstream response is relayed back. An upstream that keeps
//! answering 502 is suspended from rotation and returns automatically
//! once a cooldown expires.
//!
//! # Architecture
//!
//! - [`cli`] -- clap-derive command-line surface.
//! - [`cmd`] -- one module per subcommand (run, init, validate, health).
//! - [`config`] -- config model, validation, and the
//!   [`ConfigSource`](config::ConfigSource) loading trait.
//! - [`error`] -- `thiserror`-based error types.
//! - [`health`] -- the `/health` diagnostics endpoint, including
//!   per-service pool membership.
//! - [`logging`] -- tracing-subscriber setup (JSON or pretty).
//! - [`proxy`] -- the forwarding core: backend pools, host routing,
//!   header hygiene, outbound execution, response relay.
//! - [`server`] -- router assembly, shared state, outbound client,
//!   graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config files _(default)_ |
//! | `json` | JSON config files |
//! | `toml` | TOML config files |
//! | `file-backends` | every file format |
//! | `full` | everything above |

// Binary crate; the public items exist for the integration tests.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod proxy;
pub mod server;
