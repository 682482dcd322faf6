//! Command implementations

pub mod copy;
pub mod create;
pub mod lifecycle;
pub mod list;
pub mod log;
pub mod run;
pub mod setup;
pub mod shell;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::directory;
use crate::domain::{SelectedInstance, Session};
use crate::output::table;

/// Instance selection shared by every instance-targeting command.
#[derive(Args, Debug, Clone, Copy)]
pub struct InstanceArgs {
    /// Instance number from the listing (0-based)
    #[arg(short, long, default_value_t = 0)]
    pub instance: usize,
}

/// List instances, print the table, and select `index` into `session`.
///
/// The table is printed before selection so an out-of-range index can be
/// corrected from the same output.
pub(crate) async fn select_instance(
    app: &AppContext,
    session: &mut Session,
    index: usize,
) -> Result<SelectedInstance> {
    let listing = directory::list(&app.provider).await?;
    table::render_instances(&app.output, &listing);
    let selected = directory::select(&listing, session, index)?;
    table::render_selected(&app.output, index, &selected);
    Ok(selected)
}
