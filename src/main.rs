use std::sync::Arc;

use nameday_mcp::{build_app, calendar::EmbeddedCalendar, config::Config, logging, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let calendar = Arc::new(EmbeddedCalendar::load()?);

    let bind_socket = config.bind_socket()?;
    let state = AppState::new(calendar);
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
