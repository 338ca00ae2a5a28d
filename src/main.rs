use people_pets_api::{
    config::Settings,
    datalayer::initialize_database,
    logging::{TelemetryConfig, init_telemetry, shutdown_telemetry},
    routes::create_router,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables first
    dotenvy::dotenv().ok();

    init_telemetry(TelemetryConfig::default())?;

    let settings = Settings::load()?;
    tracing::info!(
        port = settings.port,
        public_dir = %settings.public_dir.display(),
        bootstrap_schema = settings.bootstrap_schema,
        "Starting people & pets registry"
    );

    let db_ops = initialize_database(&settings.database, settings.bootstrap_schema).await?;
    tracing::info!(pool = ?db_ops.stats(), "Database initialized successfully");

    let app = create_router(AppState::from_db(db_ops.clone()), &settings.public_dir);

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        address = %addr,
        endpoints = ?["/people", "/pets", "/people/:id/pets", "/health"],
        "Server listening and ready to accept connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_ops.shutdown().await;
    shutdown_telemetry();

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::warn!("Shutdown signal received, cleaning up...");
}
