//! Claims Decision Service - API Server Binary
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin claims-decision-api
//!
//! API_PORT=8080 API_DATABASE_URL=postgres://... cargo run --bin claims-decision-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` / `API_PORT` - Listen address (default: 0.0.0.0:8000)
//! * `API_DATABASE_URL` - Decision store connection string
//! * `API_ARCHIVE_DATABASE_URL` - Raw claim archive; archival is skipped when unset
//! * `API_OLLAMA_BASE_URL` / `API_OLLAMA_MODEL` - Remote explanation generator
//! * `API_API_KEY` - Required `X-API-Key` for scoring
//! * `API_SEED_TOKEN` - Enables `POST /api/seed`
//! * `API_LOG_LEVEL` / `API_LOG_FORMAT` - `info`, `debug`, ... and `pretty` or `json`

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_scoring::{ClaimArchive, DecisionRecorder, ExplanationStrategy, TextGenerator};
use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresClaimArchive, PostgresDecisionStore};
use infra_external::{OllamaClient, OllamaConfig};
use interface_api::{config::ApiConfig, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("failed to load configuration")?;
    config.validate()?;

    init_tracing(&config.log_level, &config.log_format);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        model_version = %config.model_version,
        policy_version = %config.policy_version,
        "Starting claims decision API server"
    );

    let pool = create_pool(DatabaseConfig::new(&config.database_url))
        .await
        .context("failed to connect to decision store")?;
    run_migrations(&pool).await.context("failed to run migrations")?;

    let store = Arc::new(PostgresDecisionStore::new(pool));

    let generator: Arc<dyn TextGenerator> = Arc::new(OllamaClient::new(
        OllamaConfig {
            base_url: config.ollama_base_url.clone(),
            ..OllamaConfig::default()
        }
        .with_model(&config.ollama_model)
        .with_timeout(config.generator_timeout()),
    )?);
    if !generator.is_available() {
        tracing::info!("No explanation generator configured, using template explanations");
    }

    let mut recorder = DecisionRecorder::new(
        store,
        ExplanationStrategy::new(Some(generator), config.generator_timeout()),
        config.versions(),
    );
    if let Some(archive) = connect_archive(&config).await {
        recorder = recorder.with_archive(archive, config.archive_timeout());
    }

    let app = create_router(AppState::new(recorder, config.clone()));

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log_level: &str, log_format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Connects the archive store; a failure only disables archival
async fn connect_archive(config: &ApiConfig) -> Option<Arc<dyn ClaimArchive>> {
    let url = config.archive_database_url()?;

    match create_pool(DatabaseConfig::new(url).max_connections(5)).await {
        Ok(pool) => {
            if let Err(e) = run_migrations(&pool).await {
                tracing::warn!(error = %e, "Archive migrations failed, archival disabled");
                return None;
            }
            tracing::info!("Claim archive connected");
            Some(Arc::new(PostgresClaimArchive::new(pool)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Claim archive unreachable, archival disabled");
            None
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
