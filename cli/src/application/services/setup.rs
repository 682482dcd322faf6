//! Setup executor: push bootstrap artifacts, then run the setup steps.
//!
//! Imports only from `crate::domain` and `crate::application`.

use anyhow::Result;

use crate::application::ports::{LocalFs, ProgressReporter, RemoteHost};
use crate::application::services::failure_reason;
use crate::domain::setup::{
    ArtifactOutcome, FailurePolicy, SetupArtifact, SetupReport, SetupStep, StepOutcome,
};

/// Copy every present artifact, then run `steps` in order.
///
/// Missing artifacts are skipped with a warning. Under `BestEffort` every step
/// is attempted; under `FailFast` the steps after the first failure are
/// reported as skipped.
///
/// # Errors
///
/// Never fails for per-artifact or per-step problems; those are recorded in
/// the report. The `Result` is kept for symmetry with the other services.
pub async fn run_setup(
    remote: &impl RemoteHost,
    fs: &impl LocalFs,
    address: &str,
    artifacts: &[SetupArtifact],
    steps: &[SetupStep],
    policy: FailurePolicy,
    reporter: &impl ProgressReporter,
) -> Result<SetupReport> {
    let mut report = SetupReport::default();

    for artifact in artifacts {
        let outcome = push_artifact(remote, fs, address, artifact).await;
        match &outcome {
            ArtifactOutcome::Copied => {}
            ArtifactOutcome::Missing => {
                reporter.warn(&format!("missing file: {}", artifact.local.display()));
            }
            ArtifactOutcome::Failed(why) => {
                reporter.warn(&format!("failed to copy {}: {why}", artifact.local.display()));
            }
        }
        report.artifacts.push((artifact.local.clone(), outcome));
    }

    let mut halted = false;
    for step in steps {
        if halted {
            report.steps.push((step.name, StepOutcome::Skipped));
            continue;
        }
        reporter.step(&format!("setup: {}", step.name));
        let outcome = match remote.exec(address, step.command).await {
            Ok(output) if output.status.success() => StepOutcome::Succeeded,
            Ok(output) => StepOutcome::Failed(failure_reason(&output)),
            Err(e) => StepOutcome::Failed(format!("{e:#}")),
        };
        if let StepOutcome::Failed(why) = &outcome {
            reporter.warn(&format!("setup step '{}' failed: {why}", step.name));
            halted = policy == FailurePolicy::FailFast;
        }
        report.steps.push((step.name, outcome));
    }

    Ok(report)
}

async fn push_artifact(
    remote: &impl RemoteHost,
    fs: &impl LocalFs,
    address: &str,
    artifact: &SetupArtifact,
) -> ArtifactOutcome {
    if !fs.exists(&artifact.local) {
        return ArtifactOutcome::Missing;
    }
    match remote.upload(address, &artifact.local, &artifact.remote_dir).await {
        Ok(output) if output.status.success() => ArtifactOutcome::Copied,
        Ok(output) => ArtifactOutcome::Failed(failure_reason(&output)),
        Err(e) => ArtifactOutcome::Failed(format!("{e:#}")),
    }
}
