//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator. Callers that need to branch on the kind use
//! `anyhow::Error::downcast_ref`.

use std::time::Duration;

use thiserror::Error;

// ── Instance selection ────────────────────────────────────────────────────────

/// Errors raised while resolving the current instance.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No instances found. Launch one with: imirunner create")]
    NoInstances,

    #[error("Invalid instance number: {index} (found {count} instance(s), numbered from 0)")]
    OutOfRange { index: usize, count: usize },

    #[error("No instance selected.")]
    NothingSelected,

    #[error("Instance {id} has no public address. Is it running?")]
    NoAddress { id: String },
}

// ── Readiness ─────────────────────────────────────────────────────────────────

/// Fatal readiness failures. The two probe stages fail with distinct variants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadinessError {
    #[error("Instance {instance_id} did not pass status checks within {}s", waited.as_secs())]
    StatusTimeout {
        instance_id: String,
        waited: Duration,
    },

    #[error("Instance {instance_id} passed status checks but has no public address")]
    NoAddress { instance_id: String },

    #[error("SSH connection to {address} failed after {attempts} attempts")]
    Unreachable { address: String, attempts: u32 },
}

// ── Job configuration ─────────────────────────────────────────────────────────

/// Validation failures for a job config file. All are fatal and raised before
/// any remote action.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobConfigError {
    #[error("Cannot derive a run name from config path '{0}'")]
    NoStem(String),

    #[error("Config file is missing the required '{field}' field")]
    MissingField { field: &'static str },

    #[error(
        "Config filename '{stem}' does not match RunName '{declared}'.\n\
         Please ensure the config filename matches the RunName value."
    )]
    NameMismatch { stem: String, declared: String },

    #[error("Invalid UseSlurm value: '{0}'. Must be 'true' or 'false'")]
    InvalidMode(String),

    #[error(
        "Configuration conflict: UseSlurm=true cannot be used with --tmux.\n\
         When using Slurm (UseSlurm=true), omit the --tmux option."
    )]
    QueuedWithInteractive,

    #[error(
        "Configuration conflict: UseSlurm=false requires the --tmux option.\n\
         When not using Slurm (UseSlurm=false), you must specify --tmux."
    )]
    InteractiveWithQueued,
}

// ── Launch options ────────────────────────────────────────────────────────────

/// Errors in the caller-supplied `--options` for instance creation.
#[derive(Debug, Error)]
pub enum LaunchOptionsError {
    #[error(
        "Invalid JSON format: {0}\n\
         Example valid format: {{\"InstanceType\": \"t3.micro\", \"KeyName\": \"my-key\"}}"
    )]
    InvalidJson(String),

    #[error("Launch options must be a JSON object, got: {0}")]
    NotAnObject(String),
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

/// An operation was requested on an instance in the wrong lifecycle state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Instance {id} is {actual}; '{operation}' requires it to be {expected}")]
    WrongState {
        id: String,
        operation: &'static str,
        expected: &'static str,
        actual: String,
    },

    #[error("No spot request #{index} (found {count} active request(s))")]
    NoSpotRequest { index: usize, count: usize },
}

// ── Settings ──────────────────────────────────────────────────────────────────

/// Settings file validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}
