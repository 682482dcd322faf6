//! Instance directory: list instances and select one by 0-based index.
//!
//! Listings are snapshots; an index is only meaningful against the listing
//! it was taken from.

use anyhow::{Context, Result};

use crate::application::ports::InstanceCatalog;
use crate::domain::{InstanceDescriptor, SelectedInstance, Session};

/// Instances currently visible to the account, in provider order.
///
/// # Errors
///
/// Returns an error if the provider query fails.
pub async fn list(catalog: &impl InstanceCatalog) -> Result<Vec<InstanceDescriptor>> {
    catalog
        .describe_instances()
        .await
        .context("listing instances")
}

/// Select `index` from `listing` into `session`.
///
/// # Errors
///
/// Returns a `SelectionError` if the listing is empty or `index` is out of
/// range; the session is left unchanged in that case.
pub fn select(
    listing: &[InstanceDescriptor],
    session: &mut Session,
    index: usize,
) -> Result<SelectedInstance> {
    let selected = session.select(listing, index)?;
    tracing::debug!(id = %selected.id, state = %selected.state, index, "selected instance");
    Ok(selected.clone())
}

/// List, then select.
///
/// # Errors
///
/// Returns an error if listing fails or the selection is invalid.
pub async fn resolve(
    catalog: &impl InstanceCatalog,
    session: &mut Session,
    index: usize,
) -> Result<SelectedInstance> {
    let listing = list(catalog).await?;
    select(&listing, session, index)
}
