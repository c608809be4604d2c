use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use innkeep_api::background::housekeeping;
use innkeep_api::bootstrap::{ensure_admin, BootstrapAdmin};
use innkeep_api::config::ServerConfig;
use innkeep_api::router::build_app_router;
use innkeep_api::state::AppState;
use innkeep_availability::{AvailabilityOracle, HttpAvailabilityOracle, OracleConfig};
use innkeep_events::{EmailConfig, LogNotifier, Notifier, SmtpNotifier};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = innkeep_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    innkeep_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    innkeep_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready, migrations applied");

    if let Some(admin) = BootstrapAdmin::from_env() {
        ensure_admin(&pool, &admin)
            .await
            .expect("Failed to create bootstrap admin");
    }

    let housekeeping_cancel = CancellationToken::new();
    let housekeeping_handle = tokio::spawn(housekeeping::run(
        pool.clone(),
        config.housekeeping_retention_hours,
        housekeeping_cancel.clone(),
    ));

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        notifier: build_notifier(),
        oracle: build_oracle(),
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("No longer accepting connections, stopping housekeeping");
    housekeeping_cancel.cancel();
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(grace, housekeeping_handle).await.is_err() {
        tracing::warn!(grace_secs = grace.as_secs(), "Housekeeping did not stop in time");
    }

    pool.close().await;
    tracing::info!("Shutdown complete");
}

/// `RUST_LOG` overrides the default filter. `LOG_FORMAT=json` switches to
/// structured output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "innkeep_api=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// SMTP when `SMTP_HOST` is configured, otherwise emails are only logged.
fn build_notifier() -> Arc<dyn Notifier> {
    match EmailConfig::from_env() {
        Some(email_config) => {
            let smtp = SmtpNotifier::new(email_config).expect("Invalid SMTP configuration");
            tracing::info!("SMTP notifier configured");
            Arc::new(smtp)
        }
        None => {
            tracing::warn!("SMTP_HOST not set, guest emails will only be logged");
            Arc::new(LogNotifier)
        }
    }
}

fn build_oracle() -> Option<Arc<dyn AvailabilityOracle>> {
    let Some(oracle_config) = OracleConfig::from_env() else {
        tracing::info!("AVAILABILITY_SERVICE_URL not set, external availability check disabled");
        return None;
    };
    tracing::info!(
        endpoint = %oracle_config.endpoint(),
        timeout_ms = oracle_config.timeout.as_millis() as u64,
        "External availability check enabled"
    );
    let client =
        HttpAvailabilityOracle::new(oracle_config).expect("Failed to build availability client");
    Some(Arc::new(client))
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res.expect("Failed to install Ctrl-C handler");
                tracing::info!(signal = "SIGINT", "Shutting down");
            }
            _ = sigterm.recv() => tracing::info!(signal = "SIGTERM", "Shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
        tracing::info!(signal = "Ctrl-C", "Shutting down");
    }
}
