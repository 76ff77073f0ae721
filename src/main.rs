// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::demo_session::DemoSession;
use crate::application::flows::FlowService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::openai_model::OpenAiModel;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    ab_test, activities, add_row, add_sheet, analyze, clean, column_totals, demo_chat, demo_reset, demo_script,
    demo_state, forecast, get_data, health_check, kpi_cards, mock_chat, pivot, region_chart,
    remove_sheet, rename_artifact, rename_sheet, select_sheet, summarize, what_if,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Language model adapter (infrastructure layer)
    let model = Arc::new(OpenAiModel::from_settings(&config.model)?);
    tracing::info!("Using model {} at {}", config.model.model, config.model.base_url);

    // Create services (application layer)
    let flows = FlowService::new(model);
    let analyst = config.demo.fallback_to_model.then(|| flows.clone());
    let session = DemoSession::new(config.demo.latency(), analyst);

    // Create application state
    let state = Arc::new(AppState { session, flows });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/data", get(get_data))
        .route("/analyze", post(analyze))
        .route("/clean", post(clean))
        .route("/forecast", post(forecast))
        .route("/summarize", post(summarize))
        .route("/chat", post(mock_chat))
        .route("/demo/state", get(demo_state))
        .route("/demo/chat", post(demo_chat))
        .route("/demo/reset", post(demo_reset))
        .route("/demo/script", get(demo_script))
        .route("/demo/sheets", post(add_sheet))
        .route("/demo/sheets/:id", put(rename_sheet).delete(remove_sheet))
        .route("/demo/sheets/:id/select", post(select_sheet))
        .route("/demo/artifacts/:key", put(rename_artifact))
        .route("/demo/rows", post(add_row))
        .route("/demo/activities", get(activities))
        .route("/demo/pivot", get(pivot))
        .route("/demo/charts/revenue-by-region", get(region_chart))
        .route("/demo/kpis", get(kpi_cards))
        .route("/demo/totals/:column", get(column_totals))
        .route("/demo/ab-test", get(ab_test))
        .route("/demo/what-if", get(what_if))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting workos-canvas service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
