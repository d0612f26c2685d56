use std::sync::Arc;

use todo_mcp_server::{build_app, config::Config, logging, store::SqliteTodoStore, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let bind_socket = config.bind_socket()?;
    let store = Arc::new(SqliteTodoStore::connect(&config.database_path).await?);
    let state = AppState::new(store);
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        database_path = %config.database_path,
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
