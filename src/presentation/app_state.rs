// Application state for HTTP handlers
use crate::application::refresh_client::DashboardRefreshClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<DashboardRefreshClient>,
}
