//! Orchestrator trigger stage of the spokegate deployment gate.
//!
//! Submits a single DAG run to an Airflow-compatible REST API once the
//! manifest and authorization stages have passed.
//!
//! - One `POST /api/v1/dags/{dag_id}/dagRuns` with HTTP basic auth
//! - One fixed timeout, no retries
//! - Any status outside `[200, 300)` fails the stage
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `AIRFLOW_BASE_URL` | Webserver base URL (default: `http://airflow-webserver:8080`) |
//! | `AIRFLOW_USERNAME` | Basic-auth user (required) |
//! | `AIRFLOW_PASSWORD` | Basic-auth password (required) |
//! | `AIRFLOW_TIMEOUT` | Request timeout in seconds (default: 30) |

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use auth::BasicCredentials;
pub use client::DagTriggerClient;
pub use error::{TriggerError, TriggerResult};
pub use types::{
    build_conf, build_run_id, DagRunRequest, ResponseBody, TriggerConfig, TriggerResponse,
    DEFAULT_RUN_ID_PREFIX,
};
