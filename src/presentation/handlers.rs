// HTTP request handlers
use crate::presentation::app_state::AppState;
use crate::presentation::dashboard_view::region_html;
use crate::presentation::page::render_page;
use axum::{
    extract::State,
    response::{Html, Json},
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub state: &'static str,
    pub sequence: u64,
    pub reloading: bool,
    pub total_sbcs: Option<u64>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Full page with the dashboard as currently loaded
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let current = state.client.state();
    Html(render_page(&current, state.client.is_reloading()))
}

/// Dashboard region only, for swapping into an existing page
pub async fn dashboard_fragment(State(state): State<Arc<AppState>>) -> Html<String> {
    let current = state.client.state();
    Html(region_html(&current, state.client.is_reloading()))
}

/// Manual reload: invalidate the backend cache, refetch, return the new region
///
/// The cycle runs in its own task so a client disconnect cannot cancel it.
pub async fn reload_dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    let client = state.client.clone();
    let refreshed = match tokio::spawn(async move { client.load(true).await }).await {
        Ok(refreshed) => refreshed,
        Err(err) => {
            tracing::error!("Manual SBC reload task failed: {}", err);
            state.client.state()
        }
    };
    tracing::info!("Manual SBC reload finished in state {}", refreshed.name());
    Html(region_html(&refreshed, state.client.is_reloading()))
}

pub async fn dashboard_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let current = state.client.state();
    Json(StateResponse {
        state: current.name(),
        sequence: state.client.applied_sequence(),
        reloading: state.client.is_reloading(),
        total_sbcs: state.client.snapshot().map(|o| o.total_sbcs),
    })
}
