//! Shared mock infrastructure for unit tests.
//!
//! Provides a scripted [`CommandRunner`] and output helpers so each test file
//! doesn't have to re-define the same boilerplate.

#![allow(dead_code, clippy::expect_used)]

use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, bail};
use imi_runner::application::ports::CommandRunner;

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
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

pub fn err_output(stderr: &[u8]) -> Output {
    Output {
        status: exit_status(255),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── MockCommandRunner ────────────────────────────────────────────────────────

type Call = (String, Vec<String>);

/// A `CommandRunner` that records every `(program, args)` call and answers
/// from a queue of canned outputs, falling back to an empty success.
#[derive(Clone, Default)]
pub struct MockCommandRunner {
    calls: Arc<Mutex<Vec<Call>>>,
    replies: Arc<Mutex<Vec<Output>>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue outputs, returned in order by successive `run*` calls.
    pub fn replying(outputs: Vec<Output>) -> Self {
        let mock = Self::default();
        let replies = outputs.into_iter().rev().collect();
        *mock.replies.lock().expect("mutex poisoned") = replies;
        mock
    }

    /// Return a snapshot of all recorded calls.
    pub fn recorded_calls(&self) -> Vec<Call> {
        self.calls.lock().expect("mutex poisoned").clone()
    }

    fn record(&self, program: &str, args: &[&str]) {
        let args = args.iter().map(ToString::to_string).collect();
        self.calls
            .lock()
            .expect("mutex poisoned")
            .push((program.to_owned(), args));
    }
}

impl CommandRunner for MockCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.record(program, args);
        Ok(self
            .replies
            .lock()
            .expect("mutex poisoned")
            .pop()
            .unwrap_or_else(|| ok_output(b"")))
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<Output> {
        self.run(program, args).await
    }

    fn spawn(&self, program: &str, args: &[&str]) -> Result<tokio::process::Child> {
        self.record(program, args);
        bail!("spawn not supported in MockCommandRunner")
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        self.record(program, args);
        Ok(exit_status(0))
    }
}
