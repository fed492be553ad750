use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tracing::info;

pub const ALIVE_MESSAGE: &str = "News digest bot is running";

pub fn router() -> Router {
    Router::new().route("/", get(alive))
}

/// GET /
async fn alive() -> &'static str {
    ALIVE_MESSAGE
}

pub async fn serve(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Liveness endpoint listening on {}", addr);
    axum::serve(listener, router()).await
}
