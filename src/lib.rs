use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod store;

use store::TodoRepository;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoRepository>) -> Self {
        Self { store }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .route(
            "/mcp",
            post(http::handlers::mcp_endpoint).options(http::handlers::mcp_preflight),
        )
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
