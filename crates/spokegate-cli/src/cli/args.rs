use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use spokegate_core::DEPLOY_DAG;
use spokegate_trigger::DEFAULT_RUN_ID_PREFIX;

#[derive(Parser)]
#[command(
    name = "spokegate",
    version,
    about = "Deployment gate for promoting spoke repository DAGs into the shared orchestrator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check that a user may perform an action in an environment
    Authz(AuthzArgs),
    /// Validate a spoke repository's project.json and DAG layout
    ValidateProject(ValidateProjectArgs),
    /// Trigger a DAG run through the orchestrator REST API
    Trigger(TriggerArgs),
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args, Debug, Clone)]
pub struct AuthzArgs {
    /// Target environment: dev/stage/prod
    #[arg(long)]
    pub env: String,

    /// Triggering user id
    #[arg(long)]
    pub user: String,

    #[arg(long, default_value = DEPLOY_DAG)]
    pub action: String,

    /// Platform repo base dir (holds ad_groups/)
    #[arg(long, default_value = ".", env = "SPOKEGATE_BASE_DIR")]
    pub base_dir: PathBuf,

    /// Also print a JSON decision record on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ValidateProjectArgs {
    /// Target environment (dev/stage/prod)
    #[arg(long)]
    pub env: String,

    /// Path where the spoke repo is cloned
    #[arg(long, env = "SPOKEGATE_SPOKE_DIR")]
    pub spoke_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct TriggerArgs {
    /// Orchestrator webserver base URL
    #[arg(long, env = "AIRFLOW_BASE_URL")]
    pub airflow_base_url: Option<String>,

    /// DAG ID to trigger
    #[arg(long)]
    pub dag_id: String,

    /// Logical environment label, used for tagging the default conf
    #[arg(long, default_value = "dev")]
    pub env: String,

    /// Prefix for dag_run_id (a UTC timestamp is appended)
    #[arg(long, default_value = DEFAULT_RUN_ID_PREFIX)]
    pub run_id_prefix: String,

    /// JSON object to use as the run conf (default conf if omitted)
    #[arg(long)]
    pub conf_json: Option<String>,
}
