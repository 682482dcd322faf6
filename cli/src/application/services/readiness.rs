//! Readiness prober: status checks first, then an SSH handshake.
//!
//! The two stages fail with distinct `ReadinessError` variants so callers can
//! tell a slow boot from an unreachable host.

use anyhow::{Context, Result};

use crate::application::ports::{
    InstanceCatalog, ProgressReporter, RemoteShell, RetryPolicy, SSH_HANDSHAKE, STATUS_WAIT,
    StatusWaiter,
};
use crate::domain::ReadinessError;

/// Bounds for both probe stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub status: RetryPolicy,
    pub handshake: RetryPolicy,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            status: STATUS_WAIT,
            handshake: SSH_HANDSHAKE,
        }
    }
}

/// Wait until `instance_id` passes status checks and accepts SSH.
///
/// Returns the instance's public address.
///
/// # Errors
///
/// `ReadinessError::StatusTimeout` if status checks never pass,
/// `ReadinessError::NoAddress` if no public address is assigned,
/// `ReadinessError::Unreachable` if every handshake fails. Provider API
/// failures propagate as-is.
pub async fn await_ready(
    provider: &(impl StatusWaiter + InstanceCatalog),
    remote: &impl RemoteShell,
    instance_id: &str,
    policy: &ReadinessPolicy,
    reporter: &impl ProgressReporter,
) -> Result<String> {
    reporter.step("waiting for instance initialization (this may take a few minutes)...");
    let ok = provider
        .wait_status_ok(instance_id, &policy.status)
        .await
        .context("waiting for instance status checks")?;
    if !ok {
        return Err(ReadinessError::StatusTimeout {
            instance_id: instance_id.to_string(),
            waited: policy.status.ceiling(),
        }
        .into());
    }
    reporter.success("status checks passed");

    let descriptor = provider
        .describe_instance(instance_id)
        .await
        .context("resolving instance address")?;
    let address = descriptor.address.ok_or_else(|| ReadinessError::NoAddress {
        instance_id: instance_id.to_string(),
    })?;

    reporter.step(&format!("testing SSH connectivity to {address}..."));
    let attempts = probe_ssh(remote, &address, &policy.handshake).await?;
    reporter.success(&format!("SSH reachable after {attempts} attempt(s)"));
    Ok(address)
}

/// Retry the handshake until it succeeds; returns the attempt that succeeded.
///
/// A probe that errors counts as a failed attempt.
///
/// # Errors
///
/// `ReadinessError::Unreachable` once every attempt has failed.
pub async fn probe_ssh(
    remote: &impl RemoteShell,
    address: &str,
    policy: &RetryPolicy,
) -> Result<u32> {
    for attempt in 1..=policy.attempts {
        match remote.probe(address).await {
            Ok(true) => return Ok(attempt),
            Ok(false) => tracing::debug!(attempt, address, "ssh handshake refused"),
            Err(e) => tracing::debug!(attempt, address, error = %e, "ssh handshake failed"),
        }
        if attempt < policy.attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }
    Err(ReadinessError::Unreachable {
        address: address.to_string(),
        attempts: policy.attempts,
    }
    .into())
}
