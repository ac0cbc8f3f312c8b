//! RPS Game Oracle Service
//!
//! HTTP service that commits to the computer's move for each round, judges the
//! human's move, and discloses the key so anyone can audit the round.

mod config;
mod error;
mod handlers;
mod state;

use anyhow::Result;
use config::OracleConfig;
use handlers::create_router;
use rps_game_core::RelationTable;
use state::OracleState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = OracleConfig::from_env()?;
    let table = RelationTable::build(config.moves.clone())?;
    info!("Rules: {}", table.moves().as_slice().join(", "));

    info!(
        "Holding up to {} rounds for {}s each",
        config.retention.max_rounds,
        config.retention.window.as_secs()
    );

    let app = create_router(Arc::new(OracleState::new(table, config.retention)));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Oracle service listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
