use super::args::*;

pub mod authz;
pub mod trigger;
pub mod validate_project;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Authz(args) => authz::run(args),
        Command::ValidateProject(args) => validate_project::run(args),
        Command::Trigger(args) => trigger::run(args).await,
    }
}
