//! Three-tier classification shared by every gate stage.

use serde::Serialize;

/// Who is expected to fix a failed check.
///
/// `PolicyRejection` is the requester's problem (not in a group, env not
/// allowed, nothing to deploy). `ConfigurationError` is the platform's
/// problem (missing files, unknown action, no rule). Pipelines branch on the
/// difference, so the two must never be merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeClass {
    Success,
    PolicyRejection,
    ConfigurationError,
}

impl OutcomeClass {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Stable lowercase label used in logs and JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::PolicyRejection => "policy_rejection",
            Self::ConfigurationError => "configuration_error",
        }
    }
}

impl std::fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(OutcomeClass::Success.to_string(), "success");
        assert_eq!(
            serde_json::to_value(OutcomeClass::PolicyRejection).unwrap(),
            serde_json::json!("policy_rejection")
        );
        assert_eq!(
            OutcomeClass::ConfigurationError.as_str(),
            "configuration_error"
        );
    }

    #[test]
    fn test_only_success_is_success() {
        assert!(OutcomeClass::Success.is_success());
        assert!(!OutcomeClass::PolicyRejection.is_success());
        assert!(!OutcomeClass::ConfigurationError.is_success());
    }
}
