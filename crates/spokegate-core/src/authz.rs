//! Authorization engine.
//!
//! [`authorize`] combines the static [`PolicyTable`] with the membership
//! snapshot for one environment and returns a three-way [`Decision`]. It has
//! no side effects beyond the single [`GroupSource::load`] call.

use tracing::debug;

use crate::groups::{GroupSource, GroupStoreError};
use crate::outcome::OutcomeClass;
use crate::policy::{PolicyLookupError, PolicyTable};
use crate::similarity::closest_name;

/// Who wants to do what, where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthzRequest {
    pub user: String,
    /// Always lower-case.
    pub environment: String,
    pub action: String,
}

impl AuthzRequest {
    pub fn new(
        user: impl Into<String>,
        environment: impl AsRef<str>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            environment: environment.as_ref().to_lowercase(),
            action: action.into(),
        }
    }
}

/// Platform-side problems that prevent a decision from being made.
#[derive(Debug, thiserror::Error)]
pub enum AuthzConfigError {
    #[error("unknown action '{action}'{}", did_you_mean(.suggestion))]
    UnknownAction {
        action: String,
        suggestion: Option<String>,
    },

    #[error(
        "no group rules for env='{environment}', action='{action}'{}",
        did_you_mean(.suggestion)
    )]
    NoRuleForEnvironment {
        action: String,
        environment: String,
        suggestion: Option<String>,
    },

    #[error(transparent)]
    GroupStore(#[from] GroupStoreError),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{}'?", s),
        None => String::new(),
    }
}

impl AuthzConfigError {
    fn from_lookup(err: PolicyLookupError, policy: &PolicyTable) -> Self {
        match err {
            PolicyLookupError::UnknownAction { action } => {
                let suggestion = closest_name(&action, policy.actions()).map(|m| m.candidate);
                Self::UnknownAction { action, suggestion }
            }
            PolicyLookupError::NoRuleForEnvironment {
                action,
                environment,
            } => {
                let suggestion = closest_name(&environment, policy.environments_for(&action))
                    .map(|m| m.candidate);
                Self::NoRuleForEnvironment {
                    action,
                    environment,
                    suggestion,
                }
            }
        }
    }
}

/// Result of an authorization check.
///
/// `ConfigurationError` is not a stronger deny: it means no decision could be
/// made and the platform needs fixing.
#[derive(Debug)]
pub enum Decision {
    Allow {
        /// First required group (in policy order) that listed the user.
        matched_group: String,
    },
    Deny {
        required_groups: Vec<String>,
    },
    ConfigurationError(AuthzConfigError),
}

impl Decision {
    pub fn class(&self) -> OutcomeClass {
        match self {
            Self::Allow { .. } => OutcomeClass::Success,
            Self::Deny { .. } => OutcomeClass::PolicyRejection,
            Self::ConfigurationError(_) => OutcomeClass::ConfigurationError,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Allow { .. } => "ALLOW",
            Self::Deny { .. } => "DENY",
            Self::ConfigurationError(_) => "CONFIGURATION_ERROR",
        }
    }
}

/// Decide whether `request.user` may perform `request.action` in
/// `request.environment`.
///
/// The policy is consulted before the snapshot is loaded, so an unknown
/// action or environment is reported even when no group file exists.
pub fn authorize<S>(request: &AuthzRequest, policy: &PolicyTable, source: &S) -> Decision
where
    S: GroupSource + ?Sized,
{
    let required = match policy.lookup(&request.action, &request.environment) {
        Ok(groups) => groups,
        Err(e) => return Decision::ConfigurationError(AuthzConfigError::from_lookup(e, policy)),
    };

    let snapshot = match source.load(&request.environment) {
        Ok(s) => s,
        Err(e) => return Decision::ConfigurationError(e.into()),
    };

    // A policy group missing from the snapshot is just a group nobody is in.
    // A typo in the table therefore denies instead of erroring.
    for group in required {
        if snapshot.is_member(group, &request.user) {
            debug!(user = %request.user, group = %group, "matched required group");
            return Decision::Allow {
                matched_group: (*group).to_string(),
            };
        }
        if snapshot.get(group).is_none() {
            debug!(group = %group, env = %request.environment, "required group absent from snapshot");
        }
    }

    Decision::Deny {
        required_groups: required.iter().map(|g| (*g).to_string()).collect(),
    }
}
