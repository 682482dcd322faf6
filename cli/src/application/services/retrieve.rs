//! Result retriever: copy a run's output manifest to local storage.
//!
//! Every manifest item is independent: a failed item is reported as a warning
//! and the remaining items are still attempted.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{LocalFs, ProgressReporter, RemoteHost};
use crate::application::services::failure_reason;
use crate::domain::RemoteLayout;
use crate::domain::manifest::{TransferItem, TransferKind, result_manifest, run_directory};

/// What to retrieve and where.
#[derive(Debug, Clone, Copy)]
pub struct RetrievalRequest<'a> {
    pub run_name: &'a str,
    /// Root under which the run directory is created.
    pub local_root: &'a Path,
    /// Reuse `<root>/<run>` even if it already exists.
    pub overwrite: bool,
}

/// Outcome of one retrieval pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalReport {
    pub local_dir: PathBuf,
    /// Items that transferred successfully.
    pub copied: usize,
    /// `(remote path, reason)` for each failed item.
    pub failures: Vec<(String, String)>,
}

impl RetrievalReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Retrieve the run's manifest into a fresh (or reused) local directory.
///
/// # Errors
///
/// Returns an error only if the local run directory cannot be created.
/// Per-item transfer failures are collected in the report.
pub async fn retrieve(
    remote: &impl RemoteHost,
    fs: &impl LocalFs,
    layout: &RemoteLayout,
    address: &str,
    request: RetrievalRequest<'_>,
    reporter: &impl ProgressReporter,
) -> Result<RetrievalReport> {
    let local_dir = run_directory(request.local_root, request.run_name, request.overwrite, |p| {
        fs.exists(p)
    });
    reporter.step(&format!("using directory: {}", local_dir.display()));
    fs.create_dir_all(&local_dir)
        .with_context(|| format!("creating {}", local_dir.display()))?;

    let manifest = result_manifest(&layout.run_output(request.run_name), request.run_name);
    let mut report = RetrievalReport {
        local_dir: local_dir.clone(),
        copied: 0,
        failures: Vec::new(),
    };

    for item in &manifest {
        match transfer(remote, fs, address, item, &local_dir).await {
            Ok(()) => report.copied += 1,
            Err(e) => {
                let reason = format!("{e:#}");
                reporter.warn(&format!("failed to copy {}: {reason}", item.remote));
                report.failures.push((item.remote.clone(), reason));
            }
        }
    }

    if report.is_complete() {
        reporter.success(&format!("copied all data to: {}", local_dir.display()));
    } else {
        reporter.warn(&format!(
            "copied {} of {} items to {}",
            report.copied,
            manifest.len(),
            local_dir.display()
        ));
    }
    Ok(report)
}

async fn transfer(
    remote: &impl RemoteHost,
    fs: &impl LocalFs,
    address: &str,
    item: &TransferItem,
    run_dir: &Path,
) -> Result<()> {
    let target = item.local_target(run_dir);
    match &item.kind {
        TransferKind::Mirror { .. } => {
            fs.create_dir_all(&target)?;
            let out = remote.mirror_down(address, &item.remote, &target).await?;
            anyhow::ensure!(out.status.success(), "{}", failure_reason(&out));
        }
        TransferKind::File | TransferKind::Renamed { .. } => {
            let out = remote.download(address, &item.remote, &target).await?;
            anyhow::ensure!(out.status.success(), "{}", failure_reason(&out));
        }
        TransferKind::Glob => {
            let out = remote.exec(address, &format!("ls {}", item.remote)).await?;
            anyhow::ensure!(out.status.success(), "no match: {}", failure_reason(&out));
            let listing = String::from_utf8_lossy(&out.stdout);
            let mut failed = Vec::new();
            for file in listing.split_whitespace() {
                let copied = remote
                    .download(address, file, &target)
                    .await
                    .is_ok_and(|out| out.status.success());
                if !copied {
                    failed.push(file.to_string());
                }
            }
            anyhow::ensure!(failed.is_empty(), "could not copy {}", failed.join(", "));
        }
    }
    Ok(())
}
