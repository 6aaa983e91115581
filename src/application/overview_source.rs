// Overview source trait - the seam to the SBC aggregation backend
use crate::domain::overview::OverviewAggregate;
use async_trait::async_trait;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Overview,
    Reload,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Overview => "/api/sbc/overview",
            Endpoint::Reload => "/api/sbc/reload",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// How the dashboard reacts to a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// 401/403: the user cannot see the dashboard.
    Unauthorized,
    /// 404/500: the CSV source is missing or misconfigured.
    SourceUnavailable,
    /// Anything else, including transport and decode failures.
    Transient,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: Endpoint, status: u16 },
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: Endpoint, message: String },
    #[error("could not decode {endpoint} response: {message}")]
    Decode { endpoint: Endpoint, message: String },
}

impl FetchError {
    pub fn class(&self) -> FailureClass {
        match self {
            FetchError::Status { status: 401 | 403, .. } => FailureClass::Unauthorized,
            FetchError::Status { status: 404 | 500, .. } => FailureClass::SourceUnavailable,
            _ => FailureClass::Transient,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            FetchError::Status { endpoint, .. }
            | FetchError::Transport { endpoint, .. }
            | FetchError::Decode { endpoint, .. } => *endpoint,
        }
    }
}

#[async_trait]
pub trait OverviewSource: Send + Sync {
    /// Fetch the current cached aggregate (`GET /api/sbc/overview`)
    async fn fetch_overview(&self) -> Result<OverviewAggregate, FetchError>;

    /// Invalidate the backend cache and recompute (`GET /api/sbc/reload`).
    /// The response body is ignored.
    async fn reload(&self) -> Result<(), FetchError>;
}
