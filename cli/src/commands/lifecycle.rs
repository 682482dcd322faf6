//! `imirunner terminate | stop | restart | cancel-spot`.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::lifecycle;
use crate::commands::{InstanceArgs, select_instance};
use crate::domain::Session;

/// Run `imirunner terminate`.
///
/// # Errors
///
/// Returns an error if the instance cannot be resolved or terminated.
pub async fn terminate(app: &AppContext, args: InstanceArgs) -> Result<ExitCode> {
    let mut session = Session::new();
    let selected = select_instance(app, &mut session, args.instance).await?;

    let prompt = format!("Terminate instance {}? This cannot be undone.", selected.id);
    if !app.non_interactive && !app.confirm(&prompt, false)? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }
    lifecycle::terminate(&app.provider, &mut session, &app.output.reporter()).await?;
    Ok(ExitCode::SUCCESS)
}

/// Run `imirunner stop`.
///
/// # Errors
///
/// Returns an error if the instance is not running or cannot be stopped.
pub async fn stop(app: &AppContext, args: InstanceArgs) -> Result<ExitCode> {
    let mut session = Session::new();
    select_instance(app, &mut session, args.instance).await?;
    lifecycle::stop(&app.provider, &mut session, &app.output.reporter()).await?;
    app.output.info("Resume with: imirunner restart");
    Ok(ExitCode::SUCCESS)
}

/// Run `imirunner restart`.
///
/// # Errors
///
/// Returns an error if the instance is not stopped or cannot be started.
pub async fn restart(app: &AppContext, args: InstanceArgs) -> Result<ExitCode> {
    let mut session = Session::new();
    select_instance(app, &mut session, args.instance).await?;
    lifecycle::restart(&app.provider, &mut session, &app.output.reporter()).await?;
    Ok(ExitCode::SUCCESS)
}

/// Run `imirunner cancel-spot`.
///
/// `--instance` indexes the active spot requests, not the instance table.
///
/// # Errors
///
/// Returns an error if the requests cannot be listed or the index is invalid.
pub async fn cancel_spot(app: &AppContext, args: InstanceArgs) -> Result<ExitCode> {
    lifecycle::cancel_spot(&app.provider, args.instance, &app.output.reporter()).await?;
    Ok(ExitCode::SUCCESS)
}
