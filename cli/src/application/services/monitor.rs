//! Completion monitor: follow the job log until a completion sentinel.
//!
//! This is a foreground wait with no timeout; the operator interrupts it if
//! the job never finishes.

use anyhow::{Context, Result};

use crate::application::ports::{LineSource, LocalFs, ProgressReporter, RemoteHost, RemoteShell};
use crate::application::services::retrieve::{RetrievalReport, RetrievalRequest, retrieve};
use crate::domain::RemoteLayout;
use crate::domain::log::completion_sentinel;

/// How a watch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// A sentinel line was seen; the rest of the stream was not read.
    Completed { sentinel: &'static str },
    /// The stream closed before any sentinel.
    StreamEnded,
}

/// Echo lines from `lines`; with `detect`, stop at the first sentinel.
///
/// # Errors
///
/// Returns an error if reading the stream fails.
pub async fn watch(
    lines: &mut impl LineSource,
    reporter: &impl ProgressReporter,
    detect: bool,
) -> Result<WatchOutcome> {
    while let Some(line) = lines.next_line().await? {
        reporter.echo(&line);
        if detect && let Some(sentinel) = completion_sentinel(&line) {
            tracing::info!(sentinel, "completion sentinel seen");
            return Ok(WatchOutcome::Completed { sentinel });
        }
    }
    Ok(WatchOutcome::StreamEnded)
}

/// Follow `log_file` indefinitely without any completion action.
///
/// # Errors
///
/// Returns an error if the tail cannot be started or read.
pub async fn follow(
    remote: &impl RemoteShell,
    layout: &RemoteLayout,
    address: &str,
    log_file: &str,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let mut lines = remote
        .stream(address, &layout.tail_command(log_file))
        .context("starting log tail")?;
    watch(&mut lines, reporter, false).await?;
    Ok(())
}

/// Follow `log_file` until the run completes, then retrieve its results once.
///
/// Returns `None` if the stream closed without a sentinel.
///
/// # Errors
///
/// Returns an error if the tail cannot be started or read, or if retrieval
/// cannot start.
pub async fn await_completion(
    remote: &impl RemoteHost,
    fs: &impl LocalFs,
    layout: &RemoteLayout,
    address: &str,
    log_file: &str,
    request: RetrievalRequest<'_>,
    reporter: &impl ProgressReporter,
) -> Result<Option<RetrievalReport>> {
    let outcome = {
        let mut lines = remote
            .stream(address, &layout.tail_command(log_file))
            .context("starting log tail")?;
        watch(&mut lines, reporter, true).await?
    };
    match outcome {
        WatchOutcome::Completed { .. } => {
            reporter.success("run completed, copying results...");
            let report = retrieve(remote, fs, layout, address, request, reporter).await?;
            Ok(Some(report))
        }
        WatchOutcome::StreamEnded => {
            reporter.warn("log stream closed before the run completed");
            Ok(None)
        }
    }
}
