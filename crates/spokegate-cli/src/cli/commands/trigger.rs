use spokegate_trigger::{
    build_conf, build_run_id, DagRunRequest, DagTriggerClient, TriggerConfig, TriggerResult,
};

use crate::cli::args::TriggerArgs;
use crate::exit_codes;

/// Every trigger failure, local or remote, exits with the error's own code.
pub async fn run(args: TriggerArgs) -> anyhow::Result<i32> {
    match execute(args).await {
        Ok(()) => Ok(exit_codes::OK),
        Err(e) => {
            eprintln!("[trigger] ERROR: {}", e);
            Ok(e.exit_code())
        }
    }
}

async fn execute(args: TriggerArgs) -> TriggerResult<()> {
    let mut config = TriggerConfig::from_env()?;
    if let Some(url) = args.airflow_base_url {
        config = config.with_url(url);
    }
    let client = DagTriggerClient::new(config)?;

    let run_id = build_run_id(&args.run_id_prefix, chrono::Utc::now());
    let conf = build_conf(&args.env, args.conf_json.as_deref())?;
    let request = DagRunRequest::new(run_id, conf);

    eprintln!(
        "[trigger] Triggering DAG '{}' at {}",
        args.dag_id,
        client.dag_runs_url(&args.dag_id)
    );
    eprintln!("[trigger] dag_run_id = {}", request.dag_run_id);
    eprintln!(
        "[trigger] payload = {}",
        serde_json::to_string_pretty(&request).unwrap_or_default()
    );

    let response = client.trigger(&args.dag_id, &request).await?;
    eprintln!("[trigger] HTTP {}", response.status);
    eprintln!("[trigger] Response:\n{}", response.body);
    eprintln!("[trigger] DAG run triggered successfully.");
    Ok(())
}
