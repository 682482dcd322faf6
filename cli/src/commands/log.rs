//! `imirunner log`: follow a log file on the instance.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::monitor;
use crate::commands::{InstanceArgs, select_instance};
use crate::domain::Session;
use crate::domain::remote::DEFAULT_LOG_FILE;

/// Arguments for the log command.
#[derive(Args, Debug)]
pub struct LogArgs {
    #[command(flatten)]
    pub target: InstanceArgs,

    /// Log file inside the workspace directory
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub logfile: String,
}

/// Run `imirunner log`. Streams until interrupted or the remote tail exits.
///
/// # Errors
///
/// Returns an error if the instance cannot be resolved or the tail fails.
pub async fn run(app: &AppContext, args: &LogArgs) -> Result<ExitCode> {
    let mut session = Session::new();
    let selected = select_instance(app, &mut session, args.target.instance).await?;
    let address = selected.address()?;
    monitor::follow(
        &app.remote,
        &app.layout,
        address,
        &args.logfile,
        &app.output.reporter(),
    )
    .await?;
    Ok(ExitCode::SUCCESS)
}
