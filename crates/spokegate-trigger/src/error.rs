//! Error types for the trigger client.

/// Trigger errors.
///
/// Every variant fails the trigger stage with the same exit code; the
/// variants exist so the log says whether the orchestrator was unreachable or
/// answered with a rejection.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    /// Missing or invalid local configuration (credentials, URL).
    #[error("configuration error: {message}")]
    Config { message: String },

    /// `--conf-json` was not valid JSON.
    #[error("invalid JSON in --conf-json: {message}")]
    InvalidConf { message: String },

    /// The request never produced an HTTP response.
    #[error("error calling orchestrator API: {message}")]
    Transport { message: String },

    /// The orchestrator answered outside 2xx.
    #[error("orchestrator rejected DAG run: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl TriggerError {
    /// Exit code for the trigger stage.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Whether the orchestrator was reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<reqwest::Error> for TriggerError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }
}

/// Result type for trigger operations.
pub type TriggerResult<T> = Result<T, TriggerError>;
