use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vantage_api::backends::{self, CachedMarkingCatalog, HttpQueryEngine, PgSharingPolicy};
use vantage_api::config::ServerConfig;
use vantage_api::router::build_app_router;
use vantage_api::state::AppState;
use vantage_widgets::SharingPolicy;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vantage_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        query_engine_url = %config.query_engine_url,
        marking_ceiling_mode = %config.marking_ceiling_mode,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = vantage_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    vantage_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    vantage_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Event bus ---
    let event_bus = Arc::new(vantage_events::EventBus::default());

    // Spawn audit persistence (writes audit events to the database).
    let persistence_handle = tokio::spawn(vantage_events::AuditPersistence::run(
        pool.clone(),
        event_bus.subscribe(),
    ));

    // --- Marking catalog ---
    let markings = Arc::new(CachedMarkingCatalog::new(pool.clone()));
    match markings.warm().await {
        Ok(count) => tracing::info!(count, "Marking catalog loaded"),
        Err(e) => tracing::warn!(error = %e, "Marking catalog not preloaded"),
    }
    let invalidation_handle = {
        let markings = Arc::clone(&markings);
        let rx = event_bus.subscribe();
        tokio::spawn(async move { markings.run_invalidation(rx).await })
    };
    tracing::info!("Event services started (audit persistence, marking cache invalidation)");

    // --- Widget engine ---
    let policy: Arc<dyn SharingPolicy> = Arc::new(PgSharingPolicy::new(pool.clone()));
    let query_engine = HttpQueryEngine::new(
        config.query_engine_url.clone(),
        Duration::from_secs(config.query_engine_timeout_secs),
    )
    .expect("Failed to build query engine client");
    let widgets = backends::build_widget_engine(
        &pool,
        markings.clone(),
        Arc::clone(&policy),
        Arc::new(query_engine),
        config.query_max_concurrency,
    );

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
        markings,
        policy,
        widgets,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Dropping the last sender closes the broadcast channel, which stops
    // both subscribers. The router (and its state clone) is gone by now.
    drop(event_bus);
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    let _ = tokio::time::timeout(drain, persistence_handle).await;
    let _ = tokio::time::timeout(drain, invalidation_handle).await;
    tracing::info!("Event services shut down");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
