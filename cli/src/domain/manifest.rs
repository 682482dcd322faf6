//! Result manifest and local run-directory naming.

use std::path::{Path, PathBuf};

/// Subdirectories of the remote run output mirrored recursively.
pub const MIRRORED_DIRS: &[&str] = &["preview", "inversion", "hemco_prior_emis", "archive_sf"];

/// Individual files copied verbatim.
pub const COPIED_FILES: &[&str] = &["imi_output.log", "StateVector.nc"];

/// Wildcard patterns listed remotely, then copied one by one.
pub const GLOB_PATTERNS: &[&str] = &["*.yml"];

/// Local name of the run-specific config file.
pub const CANONICAL_CONFIG_NAME: &str = "config.yml";

/// What a single manifest entry asks the retriever to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferKind {
    /// Recursive sync into `<local>/<subdir>`; never deletes local-only files.
    Mirror { subdir: String },
    /// Copy one file into the local run directory.
    File,
    /// List matching remote files and copy each into the local run directory.
    Glob,
    /// Copy one file and give it a new local name.
    Renamed { local_name: String },
}

/// One independent manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferItem {
    /// Absolute remote path (may contain `*` for `Glob`).
    pub remote: String,
    pub kind: TransferKind,
}

impl TransferItem {
    /// Local destination for this item under `run_dir`.
    #[must_use]
    pub fn local_target(&self, run_dir: &Path) -> PathBuf {
        match &self.kind {
            TransferKind::Mirror { subdir } => run_dir.join(subdir),
            TransferKind::File | TransferKind::Glob => run_dir.to_path_buf(),
            TransferKind::Renamed { local_name } => run_dir.join(local_name),
        }
    }
}

/// The fixed manifest for a run whose output lives at `remote_base`.
#[must_use]
pub fn result_manifest(remote_base: &str, run_name: &str) -> Vec<TransferItem> {
    let mut items = Vec::new();
    for dir in MIRRORED_DIRS {
        items.push(TransferItem {
            remote: format!("{remote_base}/{dir}"),
            kind: TransferKind::Mirror {
                subdir: (*dir).to_string(),
            },
        });
    }
    for file in COPIED_FILES {
        items.push(TransferItem {
            remote: format!("{remote_base}/{file}"),
            kind: TransferKind::File,
        });
    }
    for pattern in GLOB_PATTERNS {
        items.push(TransferItem {
            remote: format!("{remote_base}/{pattern}"),
            kind: TransferKind::Glob,
        });
    }
    items.push(TransferItem {
        remote: format!("{remote_base}/config_{run_name}.yml"),
        kind: TransferKind::Renamed {
            local_name: CANONICAL_CONFIG_NAME.to_string(),
        },
    });
    items
}

/// Pick the local directory for a run under `root`.
///
/// With `overwrite` the run name is reused as-is. Otherwise `root/<run>` is
/// used if free, else the first free `root/<run>_<n>` for `n = 1, 2, ...`.
pub fn run_directory(
    root: &Path,
    run_name: &str,
    overwrite: bool,
    exists: impl Fn(&Path) -> bool,
) -> PathBuf {
    let base = root.join(run_name);
    if overwrite || !exists(&base) {
        return base;
    }
    (1u64..)
        .map(|n| root.join(format!("{run_name}_{n}")))
        .find(|candidate| !exists(candidate))
        .unwrap_or(base)
}
