//! Static authorization policy.
//!
//! The table maps each (action, environment) pair to the ordered list of
//! groups whose members may perform the action there. It is compiled in and
//! never loaded from disk.
//!
//! A lookup can miss in two ways, and the two are kept apart:
//! the action is unknown altogether, or the action exists but has no rule for
//! the requested environment. Both are configuration errors; neither is a
//! deny.

use serde::Serialize;

/// Deploy a spoke repository's DAGs into the orchestrator.
pub const DEPLOY_DAG: &str = "deploy_dag";

/// One row of the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicyRule {
    pub action: &'static str,
    pub environment: &'static str,
    /// Membership in any one of these grants the action.
    pub required_groups: &'static [&'static str],
}

/// Immutable table of [`PolicyRule`] records keyed by (action, environment).
#[derive(Debug, Clone, Copy)]
pub struct PolicyTable {
    rules: &'static [PolicyRule],
}

const BUILTIN_RULES: &[PolicyRule] = &[
    PolicyRule {
        action: DEPLOY_DAG,
        environment: "dev",
        required_groups: &["data_science_dev", "platform_engineers_dev"],
    },
    PolicyRule {
        action: DEPLOY_DAG,
        environment: "stage",
        required_groups: &["data_science_stage", "platform_approvers_stage"],
    },
    PolicyRule {
        action: DEPLOY_DAG,
        environment: "prod",
        required_groups: &["model_publishers_prod"],
    },
];

static BUILTIN: PolicyTable = PolicyTable {
    rules: BUILTIN_RULES,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyLookupError {
    #[error("unknown action '{action}'")]
    UnknownAction { action: String },

    #[error("no group rules for env='{environment}', action='{action}'")]
    NoRuleForEnvironment { action: String, environment: String },
}

impl PolicyTable {
    /// The policy shipped with this build.
    pub fn builtin() -> &'static PolicyTable {
        &BUILTIN
    }

    /// Build a table from arbitrary static rules.
    ///
    /// Later duplicates of an (action, environment) pair are shadowed by the
    /// first occurrence.
    pub const fn from_rules(rules: &'static [PolicyRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [PolicyRule] {
        self.rules
    }

    /// Required groups for (action, environment), in policy order.
    pub fn lookup(
        &self,
        action: &str,
        environment: &str,
    ) -> Result<&'static [&'static str], PolicyLookupError> {
        let mut action_known = false;
        for rule in self.rules.iter().filter(|r| r.action == action) {
            action_known = true;
            if rule.environment == environment {
                return Ok(rule.required_groups);
            }
        }

        if action_known {
            Err(PolicyLookupError::NoRuleForEnvironment {
                action: action.to_string(),
                environment: environment.to_string(),
            })
        } else {
            Err(PolicyLookupError::UnknownAction {
                action: action.to_string(),
            })
        }
    }

    /// Distinct actions, in first-appearance order.
    pub fn actions(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for rule in self.rules {
            if !out.contains(&rule.action) {
                out.push(rule.action);
            }
        }
        out
    }

    /// Environments that have a rule for `action`.
    pub fn environments_for(&self, action: &str) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|r| r.action == action)
            .map(|r| r.environment)
            .collect()
    }
}
