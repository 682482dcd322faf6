//! Instance lifecycle: create, terminate, stop, restart, spot cancellation.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::{
    CloudProvider, InstanceControl, LocalFs, ProgressReporter, RemoteHost, SpotRequests,
};
use crate::application::services::readiness::{ReadinessPolicy, await_ready};
use crate::application::services::setup::run_setup;
use crate::domain::launch::{LaunchTemplate, launch_request};
use crate::domain::setup::{FailurePolicy, SetupArtifact, SetupReport, SetupStep};
use crate::domain::{InstanceState, LifecycleError, SelectedInstance, Session};

/// Everything `create` needs besides the adapters.
#[derive(Debug, Clone)]
pub struct CreatePlan<'a> {
    pub template: LaunchTemplate<'a>,
    /// Caller JSON merged over the template request.
    pub options: Option<&'a str>,
    pub readiness: ReadinessPolicy,
    pub artifacts: Vec<SetupArtifact>,
    pub steps: &'a [SetupStep],
    pub policy: FailurePolicy,
}

/// A freshly created, reachable, set-up instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub id: String,
    pub address: String,
    pub setup: SetupReport,
}

/// Launch one instance, wait until it is reachable, then run setup.
///
/// The new instance becomes the session's current instance as soon as it is
/// launched, so a later readiness failure still leaves it selected.
///
/// # Errors
///
/// Fails before any API call if the launch options are invalid. Launch,
/// readiness and provider failures are fatal. Setup problems are not; they
/// are returned in `Created::setup`.
pub async fn create(
    provider: &impl CloudProvider,
    remote: &impl RemoteHost,
    fs: &impl LocalFs,
    session: &mut Session,
    plan: &CreatePlan<'_>,
    reporter: &impl ProgressReporter,
) -> Result<Created> {
    let request = launch_request(&plan.template, plan.options)?;

    reporter.step("launching instance...");
    let id = provider
        .run_instance(&request)
        .await
        .context("launching instance")?;
    reporter.success(&format!("launched instance {id}"));
    session.adopt(SelectedInstance {
        id: id.clone(),
        address: None,
        state: InstanceState::Pending,
    });

    let address = await_ready(provider, remote, &id, &plan.readiness, reporter).await?;
    session.set_address(address.clone());

    reporter.step("running setup...");
    let setup = run_setup(
        remote,
        fs,
        &address,
        &plan.artifacts,
        plan.steps,
        plan.policy,
        reporter,
    )
    .await?;

    Ok(Created { id, address, setup })
}

/// Terminate the current instance and clear the session.
///
/// # Errors
///
/// Returns an error if nothing is selected or the provider call fails.
pub async fn terminate(
    provider: &impl InstanceControl,
    session: &mut Session,
    reporter: &impl ProgressReporter,
) -> Result<String> {
    let id = session.require()?.id.clone();
    provider
        .terminate(&id)
        .await
        .with_context(|| format!("terminating {id}"))?;
    session.clear();
    reporter.success(&format!("terminating instance {id}"));
    Ok(id)
}

/// Stop the current instance (must be running) and clear the session.
///
/// # Errors
///
/// `LifecycleError::WrongState` unless the instance is running.
pub async fn stop(
    provider: &impl InstanceControl,
    session: &mut Session,
    reporter: &impl ProgressReporter,
) -> Result<String> {
    let id = require_state(session, "stop", "running")?;
    provider
        .stop(&id)
        .await
        .with_context(|| format!("stopping {id}"))?;
    session.clear();
    reporter.success(&format!("stopping instance {id}"));
    Ok(id)
}

/// Start the current instance again (must be stopped).
///
/// # Errors
///
/// `LifecycleError::WrongState` unless the instance is stopped.
pub async fn restart(
    provider: &impl InstanceControl,
    session: &mut Session,
    reporter: &impl ProgressReporter,
) -> Result<String> {
    let id = require_state(session, "restart", "stopped")?;
    provider
        .start(&id)
        .await
        .with_context(|| format!("starting {id}"))?;
    reporter.success(&format!("starting instance {id}"));
    Ok(id)
}

fn require_state(
    session: &Session,
    operation: &'static str,
    expected: &'static str,
) -> Result<String> {
    let current = session.require()?;
    if current.state.as_str() != expected {
        return Err(LifecycleError::WrongState {
            id: current.id.clone(),
            operation,
            expected,
            actual: current.state.to_string(),
        }
        .into());
    }
    Ok(current.id.clone())
}

/// Cancel the `index`-th active spot request.
///
/// Returns the cancelled request id, or `None` when there are no active
/// requests.
///
/// # Errors
///
/// `LifecycleError::NoSpotRequest` for an index past the end.
pub async fn cancel_spot(
    provider: &impl SpotRequests,
    index: usize,
    reporter: &impl ProgressReporter,
) -> Result<Option<String>> {
    let requests = provider
        .active_spot_requests()
        .await
        .context("listing spot requests")?;
    if requests.is_empty() {
        reporter.warn("no active spot requests");
        return Ok(None);
    }
    let id = requests
        .get(index)
        .cloned()
        .ok_or(LifecycleError::NoSpotRequest {
            index,
            count: requests.len(),
        })?;
    provider
        .cancel_spot_request(&id)
        .await
        .with_context(|| format!("cancelling spot request {id}"))?;
    reporter.success(&format!("cancelled spot request {id}"));
    Ok(Some(id))
}
