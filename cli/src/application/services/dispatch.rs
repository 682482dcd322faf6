//! Job dispatcher: push job inputs and start the run.
//!
//! The job is validated before this service is called (see
//! `crate::domain::job::describe_job`); nothing here re-checks it.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{LocalFs, ProgressReporter, RemoteHost};
use crate::application::services::failure_reason;
use crate::domain::RemoteLayout;
use crate::domain::job::{ExecutionMode, JobDescriptor, REMOTE_SCHEDULE_FILE, SCHEDULE_FILE};

/// Copy the job inputs and launch it.
///
/// The schedule file is optional (warned about when absent or when its copy
/// fails); the config copy and the launch are required.
///
/// # Errors
///
/// Returns an error if the config file cannot be copied or the launch command
/// fails.
pub async fn dispatch(
    remote: &impl RemoteHost,
    fs: &impl LocalFs,
    layout: &RemoteLayout,
    address: &str,
    job: &JobDescriptor,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let workspace = layout.workspace();

    let schedule = Path::new(SCHEDULE_FILE);
    if fs.exists(schedule) {
        let target = format!("{workspace}/{REMOTE_SCHEDULE_FILE}");
        match remote.upload(address, schedule, &target).await {
            Ok(out) if out.status.success() => {}
            Ok(out) => reporter.warn(&format!(
                "failed to copy {SCHEDULE_FILE}: {}",
                failure_reason(&out)
            )),
            Err(e) => reporter.warn(&format!("failed to copy {SCHEDULE_FILE}: {e:#}")),
        }
    } else {
        reporter.warn(&format!("{SCHEDULE_FILE} not found, skipping transfer"));
    }

    reporter.step(&format!("copying {}...", job.config_file_name));
    let out = remote
        .upload(address, &job.config_path, &workspace)
        .await
        .with_context(|| format!("copying {}", job.config_path.display()))?;
    anyhow::ensure!(
        out.status.success(),
        "failed to copy {}: {}",
        job.config_path.display(),
        failure_reason(&out)
    );

    let how = match job.mode {
        ExecutionMode::Interactive => "tmux session",
        ExecutionMode::Queued => "batch queue",
    };
    reporter.step(&format!("starting run '{}' ({how})...", job.name));
    let command = format!("cd {workspace} && {}", job.launch_command());
    let out = remote
        .exec(address, &command)
        .await
        .context("launching run")?;
    anyhow::ensure!(
        out.status.success(),
        "failed to start run '{}': {}",
        job.name,
        failure_reason(&out)
    );
    reporter.success(&format!("inversion started for config: {}", job.config_file_name));
    Ok(())
}
