//! Request and configuration types for the trigger client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::BasicCredentials;
use crate::error::{TriggerError, TriggerResult};

/// Base URL variable.
pub const BASE_URL_ENV: &str = "AIRFLOW_BASE_URL";

/// Request timeout variable (seconds).
pub const TIMEOUT_ENV: &str = "AIRFLOW_TIMEOUT";

/// Default prefix of generated run ids.
pub const DEFAULT_RUN_ID_PREFIX: &str = "jenkins_manual";

/// Timestamp appended to run ids (UTC, second resolution).
const RUN_ID_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

fn default_base_url() -> String {
    "http://airflow-webserver:8080".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Trigger client configuration.
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// Orchestrator webserver base URL.
    pub base_url: String,

    /// Basic-auth credentials. Required to build a client.
    pub credentials: Option<BasicCredentials>,

    /// Fixed request timeout in seconds. No retries are made.
    pub timeout_secs: u64,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            credentials: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl TriggerConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `AIRFLOW_BASE_URL` | Webserver base URL (default `http://airflow-webserver:8080`) |
    /// | `AIRFLOW_USERNAME` | Basic-auth user |
    /// | `AIRFLOW_PASSWORD` | Basic-auth password |
    /// | `AIRFLOW_TIMEOUT` | Request timeout in seconds (default 30) |
    ///
    /// Missing credentials are not an error here; [`DagTriggerClient::new`]
    /// reports them. A timeout that is not a positive integer is.
    ///
    /// [`DagTriggerClient::new`]: crate::DagTriggerClient::new
    pub fn from_env() -> TriggerResult<Self> {
        let timeout_secs = match std::env::var(TIMEOUT_ENV) {
            Ok(raw) if !raw.trim().is_empty() => parse_timeout(&raw)?,
            _ => default_timeout(),
        };
        Ok(Self {
            base_url: std::env::var(BASE_URL_ENV).unwrap_or_else(|_| default_base_url()),
            credentials: BasicCredentials::from_env().ok(),
            timeout_secs,
        })
    }

    /// Set the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the credentials.
    pub fn with_credentials(mut self, credentials: BasicCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

fn parse_timeout(raw: &str) -> TriggerResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(TriggerError::Config {
            message: format!(
                "{} must be a positive number of seconds, got '{}'",
                TIMEOUT_ENV, raw
            ),
        }),
    }
}

/// Body of `POST /api/v1/dags/{dag_id}/dagRuns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DagRunRequest {
    pub dag_run_id: String,
    pub conf: Value,
}

impl DagRunRequest {
    pub fn new(dag_run_id: impl Into<String>, conf: Value) -> Self {
        Self {
            dag_run_id: dag_run_id.into(),
            conf,
        }
    }
}

/// `"{prefix}__{YYYYMMDDTHHMMSSZ}"`.
pub fn build_run_id(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}__{}", prefix, now.format(RUN_ID_TIMESTAMP_FORMAT))
}

/// Run configuration: the caller's JSON object if given, otherwise a default
/// tagging the run with its environment. A blank `conf_json` counts as absent.
pub fn build_conf(env: &str, conf_json: Option<&str>) -> TriggerResult<Value> {
    let Some(raw) = conf_json.filter(|s| !s.trim().is_empty()) else {
        return Ok(json!({
            "triggered_by": "jenkins",
            "env": env,
            "note": "self-service trigger",
        }));
    };

    let value: Value = serde_json::from_str(raw).map_err(|e| TriggerError::InvalidConf {
        message: e.to_string(),
    })?;
    if !value.is_object() {
        return Err(TriggerError::InvalidConf {
            message: "conf must be a JSON object".to_string(),
        });
    }
    Ok(value)
}

/// What the orchestrator answered with on success.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerResponse {
    pub status: u16,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(v) => Self::Json(v),
            Err(_) => Self::Text(text),
        }
    }
}

impl std::fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(v) => match serde_json::to_string_pretty(v) {
                Ok(s) => f.write_str(&s),
                Err(_) => write!(f, "{}", v),
            },
            Self::Text(t) => f.write_str(t),
        }
    }
}
