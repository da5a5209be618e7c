//! `backhaul run` — start the proxy server.
//!
//! Resolves the config file (explicit flag or auto-detection), builds
//! the routing table with one backend pool per service, and serves
//! until a shutdown signal arrives. Config is read exactly once; the
//! table never changes while the process runs.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::cli::RunArgs;
use crate::config::sources::file_source::FileSource;
use crate::config::ConfigSource;
use crate::error::BackhaulError;
use crate::logging;
use crate::proxy::routing::RoutingTable;
use crate::server::{self, AppState, Stats};

pub async fn execute(args: RunArgs) -> Result<(), BackhaulError> {
    logging::init(
        &args.log_level,
        logging::LogFormat::resolve(args.pretty, args.json),
    );

    let source = resolve_file_source(args.config.as_deref()).await?;
    let (mut config, version) = source.load().await?;

    // A --timeout flag beats the config-file default.
    if args.timeout != config.defaults.timeout {
        config.defaults.timeout = args.timeout;
    }

    let table = RoutingTable::from_config(&config)?;

    let state = Arc::new(AppState {
        table,
        http_client: server::build_http_client(),
        start_time: Instant::now(),
        source_name: source.name().to_string(),
        config_version: version,
        loaded_at: Instant::now(),
        stats: Stats::default(),
    });

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %addr,
        services = config.services.len(),
        upstreams = config.total_upstreams(),
        "backhaul started"
    );

    let router = server::build_router(state, args.max_body);
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!("backhaul stopped");
    Ok(())
}

const AUTO_DETECT: [&str; 4] = [
    "backhaul.yaml",
    "backhaul.yml",
    "backhaul.json",
    "backhaul.toml",
];

async fn resolve_file_source(
    explicit: Option<&Path>,
) -> Result<Box<dyn ConfigSource>, BackhaulError> {
    if let Some(path) = explicit {
        return source_for_path(path);
    }

    for name in AUTO_DETECT {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return source_for_path(&path);
        }
    }

    Err(BackhaulError::NoConfigSource {
        hint: "Pass --config <file>, or keep a backhaul.yaml in the working directory\n  \
               ('backhaul init' writes a starter one)."
            .into(),
    })
}

fn source_for_path(path: &Path) -> Result<Box<dyn ConfigSource>, BackhaulError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(Box::new(FileSource::yaml(path.to_path_buf()))),

        #[cfg(feature = "json")]
        "json" => Ok(Box::new(FileSource::json(path.to_path_buf()))),

        #[cfg(feature = "toml")]
        "toml" => Ok(Box::new(FileSource::toml(path.to_path_buf()))),

        other => Err(BackhaulError::UnsupportedFormat(other.to_string())),
    }
}
