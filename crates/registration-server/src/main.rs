//! Student Registration Server - Entry point.

use registration_server::{
    api::{create_router_with_body_limit, AppState},
    config::Config,
    store::{Backend, RegistrationStore},
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Student Registration Server");

    // Initialize storage
    let backend = if config.store.persist {
        Backend::file(config.store.path.clone())
    } else {
        info!("Persistence disabled, using in-memory storage");
        Backend::memory()
    };
    let store = RegistrationStore::load(backend, config.store.debounce()).await;
    info!("Store ready with {} registrations", store.len().await);

    tokio::spawn(store.clone().run_flusher());

    if config.admin.uses_default_pin() {
        warn!("Default admin PIN in use. Set ADMIN__PIN to something stronger.");
    }

    let state = AppState::new(store.clone(), config.admin.pin);
    let app = create_router_with_body_limit(state, config.server.body_limit_bytes);

    // Bind to address
    let addr = SocketAddr::new(
        config
            .server
            .listen_addr
            .parse()
            .unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Listening on http://{}", addr);

    // Run server
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    info!("Saving registrations before exit");
    store.flush().await;

    if let Err(e) = result {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT received"),
        _ = terminate => info!("SIGTERM received"),
    }
}
