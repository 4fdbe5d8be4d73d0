use std::net::SocketAddr;
use std::sync::Arc;
use tasklist_server::api::{self, AppState};
use tasklist_server::db::Db;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── Open the store ─────────────────────────────────────────
    let db_path = std::env::var("TASKLIST_DB").unwrap_or_else(|_| "tasks.db".to_string());
    let db = Db::open(&db_path).expect("Failed to open tasks database");
    tracing::info!("Tasks database: {db_path}");

    // ── Router ─────────────────────────────────────────────────
    let state = Arc::new(AppState { db });
    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // ── Start ──────────────────────────────────────────────────
    let addr: SocketAddr = std::env::var("TASKLIST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()
        .expect("Invalid TASKLIST_ADDR");
    tracing::info!("Server running on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
