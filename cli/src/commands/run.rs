//! `imirunner run`: validate a job config, start it, follow it, fetch results.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::dispatch::dispatch;
use crate::application::services::monitor::await_completion;
use crate::application::services::retrieve::RetrievalRequest;
use crate::commands::{InstanceArgs, select_instance};
use crate::domain::job::describe_job;
use crate::domain::remote::DEFAULT_LOG_FILE;
use crate::domain::{LaunchStyle, Session};

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Job config file; its name must match the RunName it declares
    #[arg(value_name = "CONFIG")]
    pub job_config: PathBuf,

    #[command(flatten)]
    pub target: InstanceArgs,

    /// Run in a detached tmux session (requires UseSlurm: false)
    #[arg(long)]
    pub tmux: bool,

    /// Extra arguments appended to run_imi.sh
    #[arg(long, allow_hyphen_values = true)]
    pub options: Option<String>,
}

/// Run `imirunner run`.
///
/// The config is validated before the instance is even listed.
///
/// # Errors
///
/// Returns an error on any validation failure, if the job cannot be started,
/// or if the log cannot be followed.
pub async fn run(app: &AppContext, args: &RunArgs) -> Result<ExitCode> {
    let path = &args.job_config;
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    let job = describe_job(
        &args.job_config,
        &contents,
        LaunchStyle::from_tmux_flag(args.tmux),
        args.options.clone(),
    )?;

    let mut session = Session::new();
    let selected = select_instance(app, &mut session, args.target.instance).await?;
    let address = selected.address()?;

    let reporter = app.output.reporter();
    dispatch(&app.remote, &app.fs, &app.layout, address, &job, &reporter).await?;

    let request = RetrievalRequest {
        run_name: &job.name,
        local_root: &app.settings.paths.local_data,
        overwrite: false,
    };
    let retrieved = await_completion(
        &app.remote,
        &app.fs,
        &app.layout,
        address,
        DEFAULT_LOG_FILE,
        request,
        &reporter,
    )
    .await?;

    match retrieved {
        Some(report) if !report.is_complete() => Ok(ExitCode::FAILURE),
        _ => Ok(ExitCode::SUCCESS),
    }
}
