pub mod api;
pub mod auth;
pub mod cli;
pub mod db;
pub mod jwt;
pub mod password;
pub mod revocation;

use api::create_api_router;
use axum::{Json, Router, routing::get};
use db::Database;
use jwt::JwtConfig;
use revocation::Revocations;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// Secret for signing bearer tokens
    pub jwt_secret: Vec<u8>,
    /// Token lifetime in seconds
    pub token_ttl_secs: u64,
    /// Revocation registry consulted on every authenticated request.
    /// In-memory by default; injectable for multi-instance deployments.
    pub revocations: Revocations,
}

/// Root handler, kept as a liveness line for humans.
async fn root() -> &'static str {
    "API is running"
}

/// Health check endpoint.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Create the application router with the given configuration.
///
/// Public routes: `/`, `/health`, `POST /users` (signup), and
/// `POST /users/login`. Everything else goes through the authorization gate.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = Arc::new(JwtConfig::new(&config.jwt_secret, config.token_ttl_secs));

    let api_router = create_api_router(config.db.clone(), jwt, config.revocations.clone());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(api_router)
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}

/// Start the server on the given port in a background task. Use port 0 to let
/// the OS choose a random port. Returns the actual address the server is
/// listening on. For production use, prefer `run_server` directly in main.
pub async fn start_server(
    config: ServerConfig,
    port: u16,
) -> (tokio::task::JoinHandle<()>, SocketAddr) {
    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");
    let local_addr = listener.local_addr().expect("Failed to get local address");

    let handle = tokio::spawn(async move {
        run_server(config, listener).await.ok();
    });

    (handle, local_addr)
}
