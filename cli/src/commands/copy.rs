//! `imirunner copy-local` and `imirunner copy-from-s3`.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::retrieve::{RetrievalRequest, retrieve};
use crate::application::services::staging::stage_from_s3;
use crate::commands::{InstanceArgs, select_instance};
use crate::domain::Session;

/// Arguments for the copy-local command.
#[derive(Args, Debug)]
pub struct CopyLocalArgs {
    /// Run name (directory under ~/imi_output_dir on the instance)
    pub run_name: String,

    #[command(flatten)]
    pub target: InstanceArgs,

    /// Reuse the existing local run directory instead of creating <run>_N
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments for the copy-from-s3 command.
#[derive(Args, Debug)]
pub struct CopyFromS3Args {
    /// Run name; fetches <s3_data>/<run>/<run>.tar.gz
    pub run_name: String,

    #[command(flatten)]
    pub target: InstanceArgs,
}

/// Run `imirunner copy-local`.
///
/// Exits non-zero if any manifest item failed to copy.
///
/// # Errors
///
/// Returns an error if the instance cannot be resolved or the local run
/// directory cannot be created.
pub async fn copy_local(app: &AppContext, args: &CopyLocalArgs) -> Result<ExitCode> {
    let mut session = Session::new();
    let selected = select_instance(app, &mut session, args.target.instance).await?;
    let address = selected.address()?;

    let request = RetrievalRequest {
        run_name: &args.run_name,
        local_root: &app.settings.paths.local_data,
        overwrite: args.overwrite,
    };
    let report = retrieve(
        &app.remote,
        &app.fs,
        &app.layout,
        address,
        request,
        &app.output.reporter(),
    )
    .await?;

    if report.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Run `imirunner copy-from-s3`.
///
/// # Errors
///
/// Returns an error if the instance cannot be resolved or the download
/// cannot be started.
pub async fn copy_from_s3(app: &AppContext, args: &CopyFromS3Args) -> Result<ExitCode> {
    let mut session = Session::new();
    let selected = select_instance(app, &mut session, args.target.instance).await?;
    let address = selected.address()?;
    stage_from_s3(
        &app.remote,
        &app.layout,
        address,
        &app.settings.paths.s3_data,
        &args.run_name,
        &app.output.reporter(),
    )
    .await?;
    app.output
        .info("Watch progress on the instance with: tmux attach -t s3sync");
    Ok(ExitCode::SUCCESS)
}
