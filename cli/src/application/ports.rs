//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;

use crate::domain::InstanceDescriptor;

// ── Value Types ───────────────────────────────────────────────────────────────

/// A bounded polling loop: at most `attempts` tries, `interval` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl RetryPolicy {
    /// Upper bound on the time the loop may take.
    #[must_use]
    pub fn ceiling(&self) -> Duration {
        self.interval * self.attempts
    }
}

/// Provider status wait: 30 × 30 s, about 15 minutes.
pub const STATUS_WAIT: RetryPolicy = RetryPolicy {
    attempts: 30,
    interval: Duration::from_secs(30),
};

/// SSH handshake: 10 × 30 s, about 5 more minutes.
pub const SSH_HANDSHAKE: RetryPolicy = RetryPolicy {
    attempts: 10,
    interval: Duration::from_secs(30),
};

// ── Cloud Control-Plane Ports ─────────────────────────────────────────────────

/// Instance enumeration.
#[allow(async_fn_in_trait)]
pub trait InstanceCatalog {
    /// All instances visible to the account, in the provider's order.
    async fn describe_instances(&self) -> Result<Vec<InstanceDescriptor>>;
    /// A single instance by id.
    async fn describe_instance(&self, id: &str) -> Result<InstanceDescriptor>;
}

/// Instance lifecycle operations.
#[allow(async_fn_in_trait)]
pub trait InstanceControl {
    /// Launch one instance from a `run-instances` request body; returns its id.
    async fn run_instance(&self, request: &serde_json::Value) -> Result<String>;
    async fn terminate(&self, id: &str) -> Result<()>;
    async fn stop(&self, id: &str) -> Result<()>;
    async fn start(&self, id: &str) -> Result<()>;
}

/// The provider's status-ok waiter.
#[allow(async_fn_in_trait)]
pub trait StatusWaiter {
    /// Block until the instance is running with both status checks passing.
    ///
    /// Returns `Ok(false)` when the policy is exhausted.
    async fn wait_status_ok(&self, id: &str, policy: &RetryPolicy) -> Result<bool>;
}

/// Spot request management.
#[allow(async_fn_in_trait)]
pub trait SpotRequests {
    /// Ids of active spot requests, in the provider's order.
    async fn active_spot_requests(&self) -> Result<Vec<String>>;
    async fn cancel_spot_request(&self, id: &str) -> Result<()>;
}

/// The full cloud control plane.
pub trait CloudProvider: InstanceCatalog + InstanceControl + StatusWaiter + SpotRequests {}

/// Blanket implementation: any type implementing all four sub-traits is a `CloudProvider`.
impl<T> CloudProvider for T where
    T: InstanceCatalog + InstanceControl + StatusWaiter + SpotRequests
{
}

// ── Remote Host Ports ─────────────────────────────────────────────────────────

/// A stream of output lines from a long-running remote command.
#[allow(async_fn_in_trait)]
pub trait LineSource {
    /// Next line without its terminator, or `None` once the stream ends.
    async fn next_line(&mut self) -> Result<Option<String>>;
}

/// Command execution on the remote host.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    type Lines: LineSource;

    /// Lightweight authenticated handshake (runs a trivial command).
    async fn probe(&self, address: &str) -> Result<bool>;
    /// Run a shell command and capture its output.
    async fn exec(&self, address: &str, command: &str) -> Result<Output>;
    /// Open a session with inherited stdio; no command means a login shell.
    async fn exec_interactive(&self, address: &str, command: &[&str]) -> Result<ExitStatus>;
    /// Start a command whose stdout is consumed line by line.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn stream(&self, address: &str, command: &str) -> Result<Self::Lines>;
}

/// File transfer between the local machine and the remote host.
#[allow(async_fn_in_trait)]
pub trait RemoteTransfer {
    /// Copy a local file into a remote path (file or directory).
    async fn upload(&self, address: &str, local: &Path, remote: &str) -> Result<Output>;
    /// Copy a remote file to a local path (file or directory).
    async fn download(&self, address: &str, remote: &str, local: &Path) -> Result<Output>;
    /// Recursively sync a remote directory into a local one. Only changed
    /// files are transferred and local-only files are kept.
    async fn mirror_down(&self, address: &str, remote_dir: &str, local_dir: &Path)
    -> Result<Output>;
}

/// A reachable instance: shell access plus file transfer.
pub trait RemoteHost: RemoteShell + RemoteTransfer {}

/// Blanket implementation: any type implementing both sub-traits is a `RemoteHost`.
impl<T> RemoteHost for T where T: RemoteShell + RemoteTransfer {}

// ── Local Filesystem Port ─────────────────────────────────────────────────────

/// Local filesystem checks needed by the services.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    /// Create a directory and its parents; succeeds if it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Spawn a program with piped stdout without waiting for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn spawn(&self, program: &str, args: &[&str]) -> Result<tokio::process::Child>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Pass a line of remote output through verbatim.
    fn echo(&self, line: &str);
}
