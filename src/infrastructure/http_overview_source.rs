// HTTP overview source - talks to the SBC aggregation backend with reqwest
use crate::application::overview_source::{Endpoint, FetchError, OverviewSource};
use crate::domain::overview::OverviewAggregate;
use crate::infrastructure::config::BackendSettings;
use anyhow::Context;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct HttpOverviewSource {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpOverviewSource {
    pub fn new(settings: &BackendSettings) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_token: settings.api_token.clone(),
        })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    async fn get(&self, endpoint: Endpoint) -> Result<reqwest::Response, FetchError> {
        let mut request = self
            .client
            .get(self.url(endpoint))
            .header("Accept", "application/json");
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Token {}", token));
        }

        let response = request.send().await.map_err(|e| FetchError::Transport {
            endpoint,
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl OverviewSource for HttpOverviewSource {
    async fn fetch_overview(&self) -> Result<OverviewAggregate, FetchError> {
        let endpoint = Endpoint::Overview;
        let body = self
            .get(endpoint)
            .await?
            .bytes()
            .await
            .map_err(|e| FetchError::Transport {
                endpoint,
                message: e.to_string(),
            })?;

        OverviewAggregate::from_json(&body).map_err(|e| FetchError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }

    async fn reload(&self) -> Result<(), FetchError> {
        self.get(Endpoint::Reload).await?;
        Ok(())
    }
}
