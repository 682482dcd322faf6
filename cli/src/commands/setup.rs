//! `imirunner setup`: run the setup sequence on an existing instance.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::setup::run_setup;
use crate::commands::{InstanceArgs, select_instance};
use crate::domain::Session;
use crate::domain::setup::{
    ArtifactOutcome, SETUP_STEPS, SetupReport, StepOutcome, setup_artifacts,
};
use crate::output::OutputContext;

/// Run `imirunner setup`.
///
/// # Errors
///
/// Returns an error if the instance cannot be resolved or any step failed.
pub async fn run(app: &AppContext, args: InstanceArgs) -> Result<ExitCode> {
    let mut session = Session::new();
    let selected = select_instance(app, &mut session, args.instance).await?;
    let address = selected.address()?;

    let settings = &app.settings;
    let artifacts = setup_artifacts(
        &settings.paths.artifacts,
        &settings.region.shapefile,
        &settings.region.state_vector,
        &app.layout,
    );
    let report = {
        let reporter = app.output.reporter();
        run_setup(
            &app.remote,
            &app.fs,
            address,
            &artifacts,
            SETUP_STEPS,
            settings.setup.policy(),
            &reporter,
        )
        .await?
    };

    render_report(&app.output, &report);
    anyhow::ensure!(
        report.is_success(),
        "setup failed: {}",
        report.failed_steps().join(", ")
    );
    Ok(ExitCode::SUCCESS)
}

/// Print a per-artifact and per-step summary.
pub(crate) fn render_report(ctx: &OutputContext, report: &SetupReport) {
    ctx.header("Setup summary:");
    for (path, outcome) in &report.artifacts {
        let status = match outcome {
            ArtifactOutcome::Copied => "copied".to_string(),
            ArtifactOutcome::Missing => "missing (skipped)".to_string(),
            ArtifactOutcome::Failed(why) => format!("failed: {why}"),
        };
        ctx.kv(&path.display().to_string(), &status);
    }
    for (name, outcome) in &report.steps {
        match outcome {
            StepOutcome::Succeeded => ctx.success(name),
            StepOutcome::Failed(why) => ctx.warn(&format!("{name}: {why}")),
            StepOutcome::Skipped => ctx.info(&format!("{name}: skipped")),
        }
    }
}
