//! `imirunner shell`: interactive SSH session or one remote command.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::RemoteShell;
use crate::commands::{InstanceArgs, select_instance};
use crate::domain::Session;

/// Arguments for the shell command.
#[derive(Args, Debug)]
pub struct ShellArgs {
    #[command(flatten)]
    pub target: InstanceArgs,

    /// Command to run instead of a login shell
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Run `imirunner shell`. The remote exit code becomes ours.
///
/// # Errors
///
/// Returns an error if the instance cannot be resolved or `ssh` cannot start.
pub async fn run(app: &AppContext, args: &ShellArgs) -> Result<ExitCode> {
    let mut session = Session::new();
    let selected = select_instance(app, &mut session, args.target.instance).await?;
    let address = selected.address()?;
    let command: Vec<&str> = args.command.iter().map(String::as_str).collect();
    let status = app.remote.exec_interactive(address, &command).await?;
    Ok(ExitCode::from(exit_byte(status.code())))
}

/// Map a child exit code onto ours; a signal-terminated child maps to 1.
fn exit_byte(code: Option<i32>) -> u8 {
    code.and_then(|c| u8::try_from(c).ok()).unwrap_or(1)
}
