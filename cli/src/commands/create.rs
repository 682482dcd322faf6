//! `imirunner create`: launch, wait for readiness, and set up an instance.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::lifecycle::{self, CreatePlan};
use crate::application::services::readiness::ReadinessPolicy;
use crate::commands::setup::render_report;
use crate::domain::Session;
use crate::domain::launch::LaunchTemplate;
use crate::domain::setup::{SETUP_STEPS, setup_artifacts};

/// Arguments for the create command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Extra run-instances parameters as a JSON object, merged over the defaults
    #[arg(long, value_name = "JSON")]
    pub options: Option<String>,
}

/// Run `imirunner create`.
///
/// # Errors
///
/// Returns an error if the options are invalid, the launch fails, or the
/// instance never becomes reachable.
pub async fn run(app: &AppContext, args: &CreateArgs) -> Result<ExitCode> {
    let settings = &app.settings;
    let plan = CreatePlan {
        template: LaunchTemplate {
            launch_template_id: &settings.aws.launch_template_id,
            key_name: &settings.aws.key_name,
            image_id: settings.aws.ami_id.as_deref(),
            instance_type: settings.aws.instance_type.as_deref(),
        },
        options: args.options.as_deref(),
        readiness: ReadinessPolicy::default(),
        artifacts: setup_artifacts(
            &settings.paths.artifacts,
            &settings.region.shapefile,
            &settings.region.state_vector,
            &app.layout,
        ),
        steps: SETUP_STEPS,
        policy: settings.setup.policy(),
    };

    let mut session = Session::new();
    let created = {
        let reporter = app.output.reporter();
        lifecycle::create(
            &app.provider,
            &app.remote,
            &app.fs,
            &mut session,
            &plan,
            &reporter,
        )
        .await?
    };

    let ctx = &app.output;
    ctx.kv("Instance ID:", &created.id);
    ctx.kv("Public DNS: ", &created.address);
    render_report(ctx, &created.setup);
    anyhow::ensure!(
        created.setup.is_success(),
        "instance {} is running but setup did not complete",
        created.id
    );
    ctx.success("Instance ready.");
    Ok(ExitCode::SUCCESS)
}
