//! Shared test helpers for application service tests.
//!
//! Provides cross-platform `exit_status()`, canned `Output` constructors, and
//! scripted fakes for the remote host, the cloud provider, the local
//! filesystem and the progress reporter.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::rc::Rc;

use anyhow::Result;

use crate::application::ports::{
    InstanceCatalog, InstanceControl, LineSource, LocalFs, ProgressReporter, RemoteShell,
    RemoteTransfer, RetryPolicy, SpotRequests, StatusWaiter,
};
use crate::domain::{InstanceDescriptor, InstanceState};

/// Build an `ExitStatus` from a logical exit code (cross-platform).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn fail_output() -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: b"simulated failure".to_vec(),
    }
}

pub fn instance(id: &str, address: Option<&str>, state: InstanceState) -> InstanceDescriptor {
    InstanceDescriptor {
        id: id.to_string(),
        state,
        address: address.map(String::from),
        instance_type: "c5.9xlarge".to_string(),
        launched_at: None,
    }
}

// ── Reporter ──────────────────────────────────────────────────────────────────

/// Reporter that records every message by kind.
#[derive(Default)]
pub struct RecordingReporter {
    pub steps: RefCell<Vec<String>>,
    pub successes: RefCell<Vec<String>>,
    pub warnings: RefCell<Vec<String>>,
    pub echoed: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.steps.borrow_mut().push(message.to_string());
    }
    fn success(&self, message: &str) {
        self.successes.borrow_mut().push(message.to_string());
    }
    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
    fn echo(&self, line: &str) {
        self.echoed.borrow_mut().push(line.to_string());
    }
}

// ── Local filesystem ──────────────────────────────────────────────────────────

/// In-memory filesystem: a set of paths that "exist".
#[derive(Default)]
pub struct FakeFs {
    pub existing: RefCell<HashSet<PathBuf>>,
    pub created: RefCell<Vec<PathBuf>>,
}

impl FakeFs {
    pub fn with(paths: &[&str]) -> Self {
        let fs = Self::default();
        fs.existing
            .borrow_mut()
            .extend(paths.iter().map(PathBuf::from));
        fs
    }
}

impl LocalFs for FakeFs {
    fn exists(&self, path: &Path) -> bool {
        self.existing.borrow().contains(path)
    }
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.created.borrow_mut().push(path.to_path_buf());
        self.existing.borrow_mut().insert(path.to_path_buf());
        Ok(())
    }
}

// ── Remote host ───────────────────────────────────────────────────────────────

/// Scripted log stream that counts how many lines were consumed.
pub struct ScriptedLines {
    lines: VecDeque<String>,
    consumed: Rc<Cell<usize>>,
}

impl LineSource for ScriptedLines {
    async fn next_line(&mut self) -> Result<Option<String>> {
        let next = self.lines.pop_front();
        if next.is_some() {
            self.consumed.set(self.consumed.get() + 1);
        }
        Ok(next)
    }
}

/// Scripted remote host that records every call.
///
/// Calls whose command or path contains any substring in the matching
/// `fail_*` list return a failed `Output`; `error_downloads` makes the
/// transfer itself error out, like a timed-out `scp`.
#[derive(Default)]
pub struct FakeRemote {
    pub probe_results: RefCell<VecDeque<bool>>,
    pub probes: Cell<u32>,
    pub commands: RefCell<Vec<String>>,
    pub fail_commands: Vec<&'static str>,
    /// stdout returned for commands starting with `ls `.
    pub ls_stdout: String,
    pub uploads: RefCell<Vec<(PathBuf, String)>>,
    pub fail_uploads: Vec<&'static str>,
    pub downloads: RefCell<Vec<(String, PathBuf)>>,
    pub fail_downloads: Vec<&'static str>,
    pub error_downloads: Vec<&'static str>,
    pub mirrors: RefCell<Vec<(String, PathBuf)>>,
    pub fail_mirrors: Vec<&'static str>,
    pub log_lines: Vec<String>,
    pub streamed: RefCell<Vec<String>>,
    pub consumed: Rc<Cell<usize>>,
}

fn matches_any(subject: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| subject.contains(n))
}

impl RemoteShell for FakeRemote {
    type Lines = ScriptedLines;

    async fn probe(&self, _: &str) -> Result<bool> {
        self.probes.set(self.probes.get() + 1);
        Ok(self.probe_results.borrow_mut().pop_front().unwrap_or(false))
    }

    async fn exec(&self, _: &str, command: &str) -> Result<Output> {
        self.commands.borrow_mut().push(command.to_string());
        if matches_any(command, &self.fail_commands) {
            return Ok(fail_output());
        }
        if command.starts_with("ls ") {
            return Ok(ok_output(self.ls_stdout.as_bytes()));
        }
        Ok(ok_output(b""))
    }

    async fn exec_interactive(&self, _: &str, command: &[&str]) -> Result<ExitStatus> {
        self.commands.borrow_mut().push(command.join(" "));
        Ok(exit_status(0))
    }

    fn stream(&self, _: &str, command: &str) -> Result<ScriptedLines> {
        self.streamed.borrow_mut().push(command.to_string());
        Ok(ScriptedLines {
            lines: self.log_lines.iter().cloned().collect(),
            consumed: Rc::clone(&self.consumed),
        })
    }
}

impl RemoteTransfer for FakeRemote {
    async fn upload(&self, _: &str, local: &Path, remote: &str) -> Result<Output> {
        self.uploads
            .borrow_mut()
            .push((local.to_path_buf(), remote.to_string()));
        if matches_any(&local.to_string_lossy(), &self.fail_uploads) {
            return Ok(fail_output());
        }
        Ok(ok_output(b""))
    }

    async fn download(&self, _: &str, remote: &str, local: &Path) -> Result<Output> {
        self.downloads
            .borrow_mut()
            .push((remote.to_string(), local.to_path_buf()));
        if matches_any(remote, &self.error_downloads) {
            anyhow::bail!("scp timed out");
        }
        if matches_any(remote, &self.fail_downloads) {
            return Ok(fail_output());
        }
        Ok(ok_output(b""))
    }

    async fn mirror_down(&self, _: &str, remote_dir: &str, local_dir: &Path) -> Result<Output> {
        self.mirrors
            .borrow_mut()
            .push((remote_dir.to_string(), local_dir.to_path_buf()));
        if matches_any(remote_dir, &self.fail_mirrors) {
            anyhow::bail!("rsync: connection reset");
        }
        Ok(ok_output(b""))
    }
}

// ── Cloud provider ────────────────────────────────────────────────────────────

/// Scripted cloud provider that records lifecycle calls.
#[derive(Default)]
pub struct FakeProvider {
    pub instances: Vec<InstanceDescriptor>,
    pub launched_id: String,
    pub status_ok: bool,
    pub waits: RefCell<Vec<(String, RetryPolicy)>>,
    pub requests: RefCell<Vec<serde_json::Value>>,
    pub calls: RefCell<Vec<String>>,
    pub spot_requests: Vec<String>,
}

impl InstanceCatalog for FakeProvider {
    async fn describe_instances(&self) -> Result<Vec<InstanceDescriptor>> {
        Ok(self.instances.clone())
    }
    async fn describe_instance(&self, id: &str) -> Result<InstanceDescriptor> {
        self.instances
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("instance {id} not found"))
    }
}

impl InstanceControl for FakeProvider {
    async fn run_instance(&self, request: &serde_json::Value) -> Result<String> {
        self.requests.borrow_mut().push(request.clone());
        Ok(self.launched_id.clone())
    }
    async fn terminate(&self, id: &str) -> Result<()> {
        self.calls.borrow_mut().push(format!("terminate {id}"));
        Ok(())
    }
    async fn stop(&self, id: &str) -> Result<()> {
        self.calls.borrow_mut().push(format!("stop {id}"));
        Ok(())
    }
    async fn start(&self, id: &str) -> Result<()> {
        self.calls.borrow_mut().push(format!("start {id}"));
        Ok(())
    }
}

impl StatusWaiter for FakeProvider {
    async fn wait_status_ok(&self, id: &str, policy: &RetryPolicy) -> Result<bool> {
        self.waits.borrow_mut().push((id.to_string(), *policy));
        Ok(self.status_ok)
    }
}

impl SpotRequests for FakeProvider {
    async fn active_spot_requests(&self) -> Result<Vec<String>> {
        Ok(self.spot_requests.clone())
    }
    async fn cancel_spot_request(&self, id: &str) -> Result<()> {
        self.calls.borrow_mut().push(format!("cancel-spot {id}"));
        Ok(())
    }
}
