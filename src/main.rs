use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::{Extension, Router};
use std::net::SocketAddr;
use typeahead::ingestion::handlers::{handle_bulk, handle_delete, handle_flush, handle_update};
use typeahead::search::handlers::{cors, handle_search};
use typeahead::stats::handlers::handle_stats;
use typeahead::store::memory::MemoryStore;
use typeahead::store::pool::StorePool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut bind_addr: SocketAddr = "0.0.0.0:3000".parse()?;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = args[i + 1].parse()?;
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    // 1. Store and client pool:
    let pool_size = std::env::var("STORE_POOL_SIZE")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(10);
    let store = MemoryStore::new();
    let pool = StorePool::new(store, pool_size);
    tracing::info!("Store pool ready with {} clients", pool_size);

    // 2. HTTP Router:
    let max_body_bytes = std::env::var("MAX_BODY_BYTES")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(20 * 1024 * 1024);

    let app = Router::new()
        .route("/", get(handle_index))
        .route("/ping", get(handle_ping))
        .route("/v1/search", get(handle_search))
        .route("/v1/update", post(handle_update))
        .route("/v1/bulk", post(handle_bulk))
        .route("/v1/delete", delete(handle_delete))
        .route("/v1/flush", post(handle_flush))
        .route("/v1/stats", get(handle_stats))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(Extension(pool.clone()));

    // 3. Start HTTP server:
    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn handle_index() -> impl axum::response::IntoResponse {
    (cors(), "typeahead autocomplete service\n")
}

async fn handle_ping() -> impl axum::response::IntoResponse {
    (cors(), "pong\n")
}
