use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{header, Method, Request, Response};
use http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use rewards_ledger::adapters::http::{rewards_router, RewardsAppState};
use rewards_ledger::adapters::{
    InMemoryDocumentStore, InMemoryMailSender, LeaderboardScheduler, PostgresDocumentStore,
    ResendConfig, ResendMailSender,
};
use rewards_ledger::application::ledger::LedgerStore;
use rewards_ledger::config::{AppConfig, MailDelivery, StoreBackend};
use rewards_ledger::ports::{DocumentStore, MailSender};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config);
    config.validate().context("invalid configuration")?;

    let store = build_store(&config).await?;
    let mailer = build_mailer(&config)?;
    let state = RewardsAppState::from_config(&config, LedgerStore::new(store), mailer);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = config.rewards.reset_interval().map(|interval| {
        let scheduler = LeaderboardScheduler::new(state.leaderboard_action_handler(), interval);
        tokio::spawn(async move { scheduler.run(shutdown_rx).await })
    });

    let app = rewards_router(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config)?)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(|res: &Response<_>, latency: Duration, span: &tracing::Span| {
                    let status = res.status();
                    span.record("status", tracing::field::display(status));
                    let latency_ms = latency.as_millis() as u64;
                    if status.is_server_error() {
                        tracing::error!(%status, latency_ms, "response");
                    } else {
                        tracing::info!(%status, latency_ms, "response");
                    }
                }),
        );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, environment = ?config.server.environment, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await?;

    if let Some(task) = scheduler {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "leaderboard scheduler task failed");
        }
    }
    tracing::info!("shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over the configured level; production logs are JSON.
fn init_tracing(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match config.database.backend {
        StoreBackend::Postgres => {
            let db = &config.database;
            let pool = PgPoolOptions::new()
                .max_connections(db.max_connections)
                .min_connections(db.min_connections)
                .acquire_timeout(db.acquire_timeout())
                .idle_timeout(db.idle_timeout())
                .connect(&db.url)
                .await
                .context("failed to connect to Postgres")?;

            let store = PostgresDocumentStore::new(pool);
            if db.run_migrations {
                store.migrate().await?;
                tracing::info!("migrations applied");
            }
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory document store; data is lost on restart");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
    }
}

fn build_mailer(config: &AppConfig) -> anyhow::Result<Arc<dyn MailSender>> {
    match config.email.delivery {
        MailDelivery::Resend => {
            let api_key = config
                .email
                .resend_api_key
                .clone()
                .context("email.resend_api_key is required for resend delivery")?;
            Ok(Arc::new(ResendMailSender::new(ResendConfig::new(api_key))?))
        }
        MailDelivery::Log => {
            tracing::warn!("verification mail is logged, not delivered");
            Ok(Arc::new(InMemoryMailSender::log_only()))
        }
    }
}

/// Permissive when no origins are configured.
fn cors_layer(config: &AppConfig) -> anyhow::Result<CorsLayer> {
    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()
        .context("invalid CORS origin")?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
    let _ = shutdown_tx.send(true);
}
