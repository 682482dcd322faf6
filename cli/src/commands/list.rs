//! `imirunner list`: show the instance table and the selected instance.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::{InstanceArgs, select_instance};
use crate::domain::Session;

/// Run `imirunner list`.
///
/// # Errors
///
/// Returns an error if instances cannot be listed or the index is invalid.
pub async fn run(app: &AppContext, args: InstanceArgs) -> Result<ExitCode> {
    let mut session = Session::new();
    select_instance(app, &mut session, args.instance).await?;
    Ok(ExitCode::SUCCESS)
}
