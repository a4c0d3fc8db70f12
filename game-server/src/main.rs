use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

use game_server::{
    config::Config, create_routes, game_manager::GameManager, websocket::ConnectionManager,
};

const IDLE_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    info!("Starting draw-and-guess server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let addr: std::net::IpAddr = match config.host.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid HOST {:?}: {}", config.host, e);
            std::process::exit(1);
        }
    };

    let connection_manager = Arc::new(ConnectionManager::new());
    let game_manager = GameManager::from_config(connection_manager.clone(), &config);

    let routes = create_routes(connection_manager.clone(), game_manager.clone(), &config);

    // Idle sockets are closed and their players leave their rooms
    let sweep_connection_manager = connection_manager.clone();
    let sweep_game_manager = game_manager.clone();
    let connection_timeout = config.connection_timeout();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(IDLE_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sweep_connection_manager
                .cleanup_inactive_connections(connection_timeout)
                .await;
            for connection_id in removed {
                sweep_game_manager.leave_room(connection_id).await;
            }
        }
    });

    info!("Server starting on {}:{}", config.host, config.port);

    let (addr, server) =
        match warp::serve(routes).try_bind_with_graceful_shutdown((addr, config.port), shutdown_signal())
        {
            Ok(bound) => bound,
            Err(e) => {
                error!("Failed to bind {}:{}: {}", config.host, config.port, e);
                std::process::exit(1);
            }
        };

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let (mut sigint, mut sigterm) = match (
            signal::unix::signal(signal::unix::SignalKind::interrupt()),
            signal::unix::signal(signal::unix::SignalKind::terminate()),
        ) {
            (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
            _ => {
                error!("Failed to install signal handlers, falling back to Ctrl+C");
                let _ = signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl+c: {}", e);
        }
        info!("Received Ctrl+C, shutting down gracefully...");
    }
}
