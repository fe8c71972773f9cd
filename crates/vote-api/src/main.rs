use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use vote_api::ranking::RankingClient;
use vote_api::{AppState, router};
use vote_core::DynamoVoteStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let votes_table =
        std::env::var("VOTES_TABLE").unwrap_or_else(|_| "project-votes".to_string());
    let tallies_table =
        std::env::var("TALLIES_TABLE").unwrap_or_else(|_| "project-vote-tallies".to_string());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let ranking = std::env::var("RANKING_URL").ok().map(RankingClient::new);

    let store = DynamoVoteStore::new(votes_table, tallies_table).await;
    info!(
        votes_table = store.votes_table(),
        tallies_table = store.tallies_table(),
        ranking = ranking.is_some(),
        "vote store ready"
    );

    let state = AppState {
        store: Arc::new(store),
        ranking,
    };

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind {bind_addr}: {e}");
            std::process::exit(1);
        }
    };
    info!(%bind_addr, "listening");

    if let Err(e) = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {e}");
    }
    info!("shutdown signal received");
}
