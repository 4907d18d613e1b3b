//! Basic-auth credentials for the orchestrator API.
//!
//! Credentials only ever come from the environment (CI secret injection), never
//! from command-line flags, so they stay out of process listings and build logs.

use crate::error::{TriggerError, TriggerResult};

/// Username variable.
pub const USERNAME_ENV: &str = "AIRFLOW_USERNAME";

/// Password variable.
pub const PASSWORD_ENV: &str = "AIRFLOW_PASSWORD";

#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    username: String,
    password: String,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read `AIRFLOW_USERNAME` / `AIRFLOW_PASSWORD`. Both must be set and
    /// non-empty.
    pub fn from_env() -> TriggerResult<Self> {
        let username = non_empty_var(USERNAME_ENV);
        let password = non_empty_var(PASSWORD_ENV);
        match (username, password) {
            (Some(username), Some(password)) => Ok(Self { username, password }),
            _ => Err(missing_credentials()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Error for a client built without credentials.
pub(crate) fn missing_credentials() -> TriggerError {
    TriggerError::Config {
        message: format!(
            "{} and {} must be set (e.g. via CI credentials or environment)",
            USERNAME_ENV, PASSWORD_ENV
        ),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
