use serde_json::json;
use spokegate_core::{
    load_manifest, manifest_path, validate, OutcomeClass, ProjectManifest, ValidationOutcome,
};

use crate::cli::args::{OutputFormat, ValidateProjectArgs};
use crate::exit_codes;

pub fn run(args: ValidateProjectArgs) -> anyhow::Result<i32> {
    let env = args.env.to_lowercase();
    let path = manifest_path(&args.spoke_dir);

    // 1. Load manifest
    let raw = match load_manifest(&path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("[project] ERROR: {}", e);
            let exit_code = exit_codes::CONFIG_ERROR;
            if args.format == OutputFormat::Json {
                let doc = json!({
                    "outcome": "LOAD_ERROR",
                    "class": OutcomeClass::ConfigurationError,
                    "exit_code": exit_code,
                    "env": env,
                    "message": e.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            }
            return Ok(exit_code);
        }
    };

    // 2. Validate
    let outcome = validate(&raw, &env, &args.spoke_dir);
    let exit_code = exit_codes::from_class(outcome.class());

    // 3. Report
    match &outcome {
        ValidationOutcome::Valid { manifest, .. } => {
            print_manifest(manifest);
            eprintln!("[project] {}", outcome.message());
        }
        ValidationOutcome::EnvNotAllowed { manifest, .. } => {
            print_manifest(manifest);
            eprintln!("[project] ERROR: {}", outcome.message());
        }
        _ => eprintln!("[project] ERROR: {}", outcome.message()),
    }

    if args.format == OutputFormat::Json {
        let doc = build_validate_json(&outcome, &env, exit_code);
        println!("{}", serde_json::to_string_pretty(&doc)?);
    }

    Ok(exit_code)
}

fn print_manifest(manifest: &ProjectManifest) {
    eprintln!("[project] project_name = {}", manifest.project_name);
    eprintln!("[project] team         = {}", manifest.team);
    eprintln!("[project] dag_path     = {}", manifest.dag_path);
    eprintln!("[project] allowed_envs = {:?}", manifest.allowed_envs);
}

fn build_validate_json(outcome: &ValidationOutcome, env: &str, exit_code: i32) -> serde_json::Value {
    let mut doc = json!({
        "outcome": outcome.label(),
        "class": outcome.class(),
        "exit_code": exit_code,
        "env": env,
        "message": outcome.message(),
    });
    if let ValidationOutcome::Valid {
        manifest,
        dag_files,
        ..
    } = outcome
    {
        doc["project"] = json!(manifest);
        doc["dag_files"] = json!(dag_files);
    }
    doc
}
