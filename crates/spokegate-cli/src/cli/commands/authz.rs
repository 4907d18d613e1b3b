use serde_json::json;
use spokegate_core::{authorize, AuthzRequest, Decision, GroupStore, PolicyTable};

use crate::cli::args::{AuthzArgs, OutputFormat};
use crate::exit_codes;

pub fn run(args: AuthzArgs) -> anyhow::Result<i32> {
    let request = AuthzRequest::new(&args.user, &args.env, &args.action);
    eprintln!(
        "[authz] Checking authorization for user='{}', env='{}', action='{}'",
        request.user, request.environment, request.action
    );

    let store = GroupStore::new(&args.base_dir);
    let decision = authorize(&request, PolicyTable::builtin(), &store);
    let exit_code = exit_codes::from_class(decision.class());

    match &decision {
        Decision::Allow { matched_group } => {
            eprintln!(
                "[authz] ALLOW: {} is authorized for {} in {} (group '{}')",
                request.user, request.action, request.environment, matched_group
            );
        }
        Decision::Deny { required_groups } => {
            eprintln!(
                "[authz] DENY: user '{}' not in groups {:?} for env '{}'",
                request.user, required_groups, request.environment
            );
        }
        Decision::ConfigurationError(e) => {
            eprintln!("[authz] ERROR: {}", e);
        }
    }

    if args.format == OutputFormat::Json {
        let doc = build_decision_json(&request, &decision, exit_code);
        println!("{}", serde_json::to_string_pretty(&doc)?);
    }

    Ok(exit_code)
}

fn build_decision_json(
    request: &AuthzRequest,
    decision: &Decision,
    exit_code: i32,
) -> serde_json::Value {
    let mut doc = json!({
        "decision": decision.label(),
        "class": decision.class(),
        "exit_code": exit_code,
        "user": request.user,
        "env": request.environment,
        "action": request.action,
    });
    match decision {
        Decision::Allow { matched_group } => doc["matched_group"] = json!(matched_group),
        Decision::Deny { required_groups } => doc["required_groups"] = json!(required_groups),
        Decision::ConfigurationError(e) => doc["error"] = json!(e.to_string()),
    }
    doc
}
