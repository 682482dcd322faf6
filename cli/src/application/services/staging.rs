//! S3 staging: pull an archived run from object storage onto the instance.

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, RemoteShell};
use crate::application::services::failure_reason;
use crate::domain::RemoteLayout;

/// Detached tmux session that runs the download.
pub const S3_SYNC_SESSION: &str = "s3sync";

/// Remote command that streams `<s3_root>/<run>/<run>.tar.gz` into `target`.
#[must_use]
pub fn staging_command(s3_root: &str, run_name: &str, target: &str) -> String {
    let s3_root = s3_root.trim_end_matches('/');
    format!(
        "tmux new-session -d -s {S3_SYNC_SESSION} \
         'aws s3 cp {s3_root}/{run_name}/{run_name}.tar.gz - | tar -xz -C {target}'"
    )
}

/// Create the run's output directory and start the background download.
///
/// Returns as soon as the tmux session is started; progress is visible with
/// `tmux attach -t s3sync` on the instance.
///
/// # Errors
///
/// Returns an error if either remote command fails.
pub async fn stage_from_s3(
    remote: &impl RemoteShell,
    layout: &RemoteLayout,
    address: &str,
    s3_root: &str,
    run_name: &str,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let target = layout.run_output(run_name);
    let out = remote
        .exec(address, &format!("mkdir -p {target}"))
        .await
        .context("creating remote run directory")?;
    anyhow::ensure!(
        out.status.success(),
        "failed to create {target}: {}",
        failure_reason(&out)
    );

    reporter.step(&format!("downloading {run_name} from {s3_root}..."));
    let out = remote
        .exec(address, &staging_command(s3_root, run_name, &target))
        .await
        .context("starting S3 download")?;
    anyhow::ensure!(
        out.status.success(),
        "failed to start S3 download: {}",
        failure_reason(&out)
    );
    reporter.success(&format!(
        "download running in tmux session '{S3_SYNC_SESSION}' into {target}"
    ));
    Ok(())
}
