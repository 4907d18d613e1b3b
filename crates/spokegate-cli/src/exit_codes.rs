//! Process exit codes for the gate stages.
//! These codes are part of the public contract: pipelines branch on them to
//! tell requester mistakes (1) from platform problems (2).

use spokegate_core::OutcomeClass;

pub const OK: i32 = 0;
pub const POLICY_REJECTED: i32 = 1; // Deny, missing field, env not allowed, no DAG files
pub const CONFIG_ERROR: i32 = 2; // Missing/unparseable files, unknown action, no rule

/// The only place an outcome becomes an exit code.
pub fn from_class(class: OutcomeClass) -> i32 {
    match class {
        OutcomeClass::Success => OK,
        OutcomeClass::PolicyRejection => POLICY_REJECTED,
        OutcomeClass::ConfigurationError => CONFIG_ERROR,
    }
}
