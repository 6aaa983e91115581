// Presentation layer - axum routes and HTML rendering
pub mod app_state;
pub mod dashboard_view;
pub mod handlers;
pub mod html;
pub mod page;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    dashboard_fragment, dashboard_state, health_check, index, reload_dashboard,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/", get(index))
        .route("/dashboard", get(dashboard_fragment))
        .route("/dashboard/reload", post(reload_dashboard))
        .route("/dashboard/state", get(dashboard_state))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
