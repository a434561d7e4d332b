use std::sync::Arc;

use axum::{routing::get, Router};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seer::config::Config;
use seer::engine::TrackerEngine;
use seer::sources::{KlineHistoryClient, TradeStream};
use seer::{api, websocket, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seer=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting Seer server on {}:{}", config.host, config.port);

    // Root token fanned out to every background task
    let shutdown = CancellationToken::new();

    // Start the signal engine
    let (engine, events, snapshots) = TrackerEngine::new(config.rsi_period, shutdown.child_token());
    tokio::spawn(engine.run());

    // Start the candle history poller
    let history_client = KlineHistoryClient::new(&config, events.clone());
    tokio::spawn(history_client.start_polling(shutdown.child_token()));

    // Start the live trade stream
    let trade_stream = TradeStream::new(&config, events);
    tokio::spawn(trade_stream.connect(shutdown.child_token()));

    // Create application state
    let state = AppState {
        config: config.clone(),
        snapshots,
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .route("/ws", get(websocket::ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Cancel background tasks on Ctrl+C
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
                shutdown.cancel();
            }
        });
    }

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Seer server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown({
            let shutdown = shutdown.clone();
            async move { shutdown.cancelled().await }
        })
        .await?;

    Ok(())
}
