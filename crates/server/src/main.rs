use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod ai;
mod routes;

const DEFAULT_BIND: &str = "0.0.0.0:3001";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Clone)]
pub struct AppState {
    pub ai_api_key: Option<String>,
    pub model: String,
    pub http: reqwest::Client,
}

impl AppState {
    fn from_env() -> Self {
        Self {
            ai_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            model: std::env::var("ADVISOR_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            http: reqwest::Client::new(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/chat", post(routes::chat))
        .route("/api/metrics", post(routes::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,tower_http=info".into()),
        )
        .init();

    let state = AppState::from_env();
    if state.ai_api_key.is_none() {
        tracing::warn!("ANTHROPIC_API_KEY not set; /api/chat will answer 503");
    }

    let bind = std::env::var("MASSING_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("Server running on http://{bind} (model {})", state.model);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
