mod config;
mod console;
mod handlers;
mod llm;
mod routes;
mod state;
mod websocket;

use anyhow::Result;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("lingua_console=debug,tower_http=debug")
        .init();

    // Load configuration - CONFIG_PATH override first, then well-known
    // names; every field has a default so the console runs with no file.
    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.jsonld".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut config = None;
    for path in &config_paths {
        match Config::load(path) {
            Ok(cfg) => {
                info!("Loaded configuration from: {}", path);
                config = Some(cfg);
                break;
            }
            Err(e) => {
                tracing::debug!("Failed to load config from {}: {}", path, e);
            }
        }
    }
    let config = config.unwrap_or_else(|| {
        info!("No config file found, using built-in defaults");
        Config::default()
    });

    let app_state = AppState::new(config.clone());

    let app = Router::new()
        .merge(routes::create_routes(app_state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = format!(
        "{}:{}",
        config.system_config.host, config.system_config.port
    );
    info!("Starting translation console on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
