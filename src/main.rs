use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use dotenvy::dotenv;

use tricycle_portal::build_router;
use tricycle_portal::config::EnvironmentConfig;
use tricycle_portal::database::connection::ensure_admin;
use tricycle_portal::database::DatabaseConnection;
use tricycle_portal::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🛺 Tricycle Route Administration Portal");
    info!("========================================");

    let config = EnvironmentConfig::from_env()?;
    if config.is_development() {
        warn!("⚠️ Running in development mode");
    }
    if config.is_production() && config.cors_origins.is_empty() {
        warn!("⚠️ CORS_ORIGINS is empty; every origin will be accepted");
    }

    let db_connection = match DatabaseConnection::new_default(&config).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Could not connect to the database: {}", e);
            return Err(e);
        }
    };
    db_connection.initialize().await?;
    ensure_admin(db_connection.pool(), &config).await?;

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let addr: SocketAddr = config.server_url().parse()?;
    let state = AppState::new(db_connection.pool().clone(), config);
    info!("📁 Uploads stored under {}", state.storage.root().display());
    let app = build_router(state);

    info!("🌐 Server listening on http://{}", addr);
    info!("🔍 Endpoints:");
    info!("   GET  /health");
    info!("   POST /api/auth/login");
    info!("   GET  /api/auth/me");
    info!("🛣️ Routes:");
    info!("   GET|POST /api/routes, GET|PUT /api/routes/:id");
    info!("   GET  /api/routes/:id/logs, POST /api/routes/:id/submit");
    info!("   GET|POST /api/routes/:id/stops, PUT|DELETE /api/stops/:id");
    info!("📍 Facilities:");
    info!("   /api/terminals, /api/loading-zones, /api/restrictions");
    info!("👥 People:");
    info!("   /api/operators, /api/associations, /api/drivers");
    info!("   /api/drivers/:id/association-records");
    info!("📨 Intake:");
    info!("   /api/submissions, /api/documents");
    info!("🛡️ Admin:");
    info!("   POST /api/admin/routes/:id/actions");
    info!("   POST /api/admin/submissions/:id/review");
    info!("   POST /api/admin/barangays, GET|POST /api/admin/users");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Server error: {}", e);
        return Err(e.into());
    }

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Failed to install Ctrl+C handler: {}", e);
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
                error!("❌ Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("🛑 Termination signal received, shutting down...");
        },
    }
}
