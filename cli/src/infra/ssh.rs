//! Infrastructure implementation of the remote host ports over OpenSSH.
//!
//! `SshRemote<R>` runs `ssh`, `scp` and `rsync` through a `CommandRunner`.
//! Host keys are not checked; instances are short-lived and their keys are
//! never known in advance.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout};

use crate::application::ports::{CommandRunner, LineSource, RemoteShell, RemoteTransfer};
use crate::infra::command_runner::{DEFAULT_REMOTE_TIMEOUT, TokioCommandRunner};

/// Upper bound on a single handshake, on top of `ConnectTimeout`.
const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection options shared by `ssh`, `scp` and rsync's transport.
pub const SSH_OPTIONS: [&str; 4] = [
    "-o",
    "StrictHostKeyChecking=no",
    "-o",
    "ConnectTimeout=10",
];

/// Infrastructure adapter for a remote instance reachable over SSH.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct SshRemote<R: CommandRunner> {
    runner: R,
    key: PathBuf,
    user: String,
}

impl<R: CommandRunner> SshRemote<R> {
    pub fn new(runner: R, key: impl Into<PathBuf>, user: impl Into<String>) -> Self {
        Self {
            runner,
            key: key.into(),
            user: user.into(),
        }
    }

    fn key(&self) -> String {
        self.key.to_string_lossy().into_owned()
    }

    fn target(&self, address: &str) -> String {
        format!("{}@{address}", self.user)
    }

    /// `ssh` arguments up to and including the destination.
    #[must_use]
    pub fn ssh_args(&self, address: &str) -> Vec<String> {
        let mut args = vec!["-i".to_string(), self.key()];
        args.extend(SSH_OPTIONS.iter().map(ToString::to_string));
        args.push(self.target(address));
        args
    }

    /// `scp` arguments for copying `from` to `to`.
    #[must_use]
    pub fn scp_args(&self, from: &str, to: &str) -> Vec<String> {
        let mut args = vec!["-i".to_string(), self.key()];
        args.extend(SSH_OPTIONS.iter().map(ToString::to_string));
        args.push(from.to_string());
        args.push(to.to_string());
        args
    }

    /// `rsync` arguments that mirror `remote_dir` into `local_dir`.
    ///
    /// Trailing slashes copy the directory's contents rather than nesting it.
    /// There is no `--delete`: local-only files survive.
    #[must_use]
    pub fn rsync_args(&self, address: &str, remote_dir: &str, local_dir: &Path) -> Vec<String> {
        let transport = format!("ssh -i {} {}", self.key(), SSH_OPTIONS.join(" "));
        let source = remote_dir.trim_end_matches('/');
        vec![
            "-az".to_string(),
            "-e".to_string(),
            transport,
            format!("{}:{source}/", self.target(address)),
            format!("{}/", local_dir.display()),
        ]
    }
}

impl SshRemote<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner(key: &Path, user: &str) -> Self {
        Self::new(TokioCommandRunner::new(DEFAULT_REMOTE_TIMEOUT), key, user)
    }
}

fn as_strs(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}

/// Lines of a spawned remote command's stdout.
///
/// Dropping it kills the underlying process.
pub struct ChildLines {
    _child: Child,
    lines: Lines<BufReader<ChildStdout>>,
}

impl LineSource for ChildLines {
    async fn next_line(&mut self) -> Result<Option<String>> {
        self.lines
            .next_line()
            .await
            .context("reading remote output")
    }
}

impl<R: CommandRunner> RemoteShell for SshRemote<R> {
    type Lines = ChildLines;

    async fn probe(&self, address: &str) -> Result<bool> {
        let mut args = self.ssh_args(address);
        args.push("true".to_string());
        let output = self
            .runner
            .run_with_timeout("ssh", &as_strs(&args), PROBE_TIMEOUT)
            .await?;
        Ok(output.status.success())
    }

    async fn exec(&self, address: &str, command: &str) -> Result<Output> {
        let mut args = self.ssh_args(address);
        args.push(command.to_string());
        self.runner
            .run("ssh", &as_strs(&args))
            .await
            .context("ssh exec")
    }

    async fn exec_interactive(&self, address: &str, command: &[&str]) -> Result<ExitStatus> {
        let mut args = vec!["-t".to_string()];
        args.extend(self.ssh_args(address));
        args.extend(command.iter().map(ToString::to_string));
        self.runner
            .run_status("ssh", &as_strs(&args))
            .await
            .context("ssh session")
    }

    fn stream(&self, address: &str, command: &str) -> Result<ChildLines> {
        let mut args = self.ssh_args(address);
        args.push(command.to_string());
        let mut child = self
            .runner
            .spawn("ssh", &as_strs(&args))
            .context("ssh stream")?;
        let stdout = child
            .stdout
            .take()
            .context("remote stdout was not captured")?;
        Ok(ChildLines {
            _child: child,
            lines: BufReader::new(stdout).lines(),
        })
    }
}

impl<R: CommandRunner> RemoteTransfer for SshRemote<R> {
    async fn upload(&self, address: &str, local: &Path, remote: &str) -> Result<Output> {
        let to = format!("{}:{remote}", self.target(address));
        let args = self.scp_args(&local.to_string_lossy(), &to);
        self.runner
            .run("scp", &as_strs(&args))
            .await
            .context("scp upload")
    }

    async fn download(&self, address: &str, remote: &str, local: &Path) -> Result<Output> {
        let from = format!("{}:{remote}", self.target(address));
        let args = self.scp_args(&from, &local.to_string_lossy());
        self.runner
            .run("scp", &as_strs(&args))
            .await
            .context("scp download")
    }

    async fn mirror_down(
        &self,
        address: &str,
        remote_dir: &str,
        local_dir: &Path,
    ) -> Result<Output> {
        let args = self.rsync_args(address, remote_dir, local_dir);
        self.runner
            .run("rsync", &as_strs(&args))
            .await
            .context("rsync")
    }
}
