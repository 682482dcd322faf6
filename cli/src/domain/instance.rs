//! Instance descriptors as reported by the cloud control plane.
//!
//! Pure parsing of `aws ec2 describe-*` JSON output into typed values.
//! Nothing here is cached across invocations.

use std::fmt;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Lifecycle state of an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
    /// A state name this version does not know about.
    Other(String),
}

impl InstanceState {
    /// Map the provider's state name (`"running"`, `"shutting-down"`, ...).
    #[must_use]
    pub fn from_provider(name: &str) -> Self {
        match name {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "shutting-down" => Self::ShuttingDown,
            "terminated" => Self::Terminated,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One instance visible to the operator's account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDescriptor {
    pub id: String,
    pub state: InstanceState,
    /// Public DNS name; `None` while pending or once stopped.
    pub address: Option<String>,
    pub instance_type: String,
    pub launched_at: Option<DateTime<Utc>>,
}

// ── describe-instances ────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeInstances {
    #[serde(default)]
    reservations: Vec<Reservation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Reservation {
    #[serde(default)]
    instances: Vec<RawInstance>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawInstance {
    instance_id: String,
    state: RawState,
    #[serde(default)]
    public_dns_name: Option<String>,
    #[serde(default)]
    instance_type: String,
    #[serde(default)]
    launch_time: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawState {
    name: String,
}

impl From<RawInstance> for InstanceDescriptor {
    fn from(raw: RawInstance) -> Self {
        Self {
            id: raw.instance_id,
            state: InstanceState::from_provider(&raw.state.name),
            address: raw.public_dns_name.filter(|s| !s.is_empty()),
            instance_type: raw.instance_type,
            launched_at: raw.launch_time.as_deref().and_then(parse_timestamp),
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Parse `describe-instances` output, flattening reservations in the order
/// the provider enumerated them.
///
/// # Errors
///
/// Returns an error if the output is not the expected JSON shape.
pub fn parse_instances(json: &[u8]) -> Result<Vec<InstanceDescriptor>> {
    let parsed: DescribeInstances =
        serde_json::from_slice(json).context("parsing describe-instances output")?;
    Ok(parsed
        .reservations
        .into_iter()
        .flat_map(|r| r.instances)
        .map(InstanceDescriptor::from)
        .collect())
}

/// Extract the instance id from `run-instances` output.
///
/// # Errors
///
/// Returns an error if no instance was returned.
pub fn parse_launched_id(json: &[u8]) -> Result<String> {
    #[derive(Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct RunInstances {
        #[serde(default)]
        instances: Vec<Launched>,
    }
    #[derive(Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Launched {
        instance_id: String,
    }
    let parsed: RunInstances =
        serde_json::from_slice(json).context("parsing run-instances output")?;
    parsed
        .instances
        .into_iter()
        .next()
        .map(|i| i.instance_id)
        .ok_or_else(|| anyhow::anyhow!("run-instances returned no instance"))
}

// ── describe-instance-status ──────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStatus {
    #[serde(default)]
    instance_statuses: Vec<RawStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawStatus {
    instance_state: RawState,
    instance_status: RawCheck,
    system_status: RawCheck,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawCheck {
    status: String,
}

/// `true` when the instance is running and both the instance and system
/// status checks report `ok`.
///
/// # Errors
///
/// Returns an error if the output is not the expected JSON shape.
pub fn status_checks_passed(json: &[u8]) -> Result<bool> {
    let parsed: DescribeStatus =
        serde_json::from_slice(json).context("parsing describe-instance-status output")?;
    Ok(parsed.instance_statuses.iter().any(|s| {
        s.instance_state.name == "running"
            && s.instance_status.status == "ok"
            && s.system_status.status == "ok"
    }))
}

// ── Spot requests ─────────────────────────────────────────────────────────────

/// Parse `describe-spot-instance-requests` output into request ids.
///
/// # Errors
///
/// Returns an error if the output is not the expected JSON shape.
pub fn parse_spot_request_ids(json: &[u8]) -> Result<Vec<String>> {
    #[derive(Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct DescribeSpot {
        #[serde(default)]
        spot_instance_requests: Vec<RawSpot>,
    }
    #[derive(Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct RawSpot {
        spot_instance_request_id: String,
    }
    let parsed: DescribeSpot =
        serde_json::from_slice(json).context("parsing describe-spot-instance-requests output")?;
    Ok(parsed
        .spot_instance_requests
        .into_iter()
        .map(|r| r.spot_instance_request_id)
        .collect())
}
