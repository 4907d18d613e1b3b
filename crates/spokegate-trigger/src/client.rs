//! HTTP client for the orchestrator's DAG-run endpoint.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::auth::{missing_credentials, BasicCredentials};
use crate::error::{TriggerError, TriggerResult};
use crate::types::{DagRunRequest, ResponseBody, TriggerConfig, TriggerResponse};

/// User agent for orchestrator requests.
const USER_AGENT_VALUE: &str = concat!("spokegate/", env!("CARGO_PKG_VERSION"));

/// Client that submits DAG runs.
#[derive(Debug, Clone)]
pub struct DagTriggerClient {
    /// HTTP client.
    client: reqwest::Client,

    /// Base URL without trailing slash.
    base_url: String,

    credentials: BasicCredentials,
}

impl DagTriggerClient {
    /// Create a client. Fails when no credentials are configured.
    pub fn new(config: TriggerConfig) -> TriggerResult<Self> {
        let credentials = config.credentials.ok_or_else(missing_credentials)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| TriggerError::Config {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Endpoint for `dag_id`.
    pub fn dag_runs_url(&self, dag_id: &str) -> String {
        format!("{}/api/v1/dags/{}/dagRuns", self.base_url, dag_id)
    }

    /// Submit one DAG run. One attempt, bounded by the configured timeout.
    pub async fn trigger(
        &self,
        dag_id: &str,
        request: &DagRunRequest,
    ) -> TriggerResult<TriggerResponse> {
        let url = self.dag_runs_url(dag_id);
        debug!(dag_id = %dag_id, url = %url, dag_run_id = %request.dag_run_id, "posting DAG run");
        debug!(payload = %serde_json::to_string(request).unwrap_or_default(), "request payload");

        let response = self
            .client
            .post(&url)
            .basic_auth(self.credentials.username(), Some(self.credentials.password()))
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| TriggerError::Transport {
            message: format!("failed to read response body: {}", e),
        })?;
        debug!(status, "orchestrator responded");

        if !(200..300).contains(&status) {
            return Err(TriggerError::Rejected { status, body: text });
        }

        Ok(TriggerResponse {
            status,
            body: ResponseBody::from_text(text),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
