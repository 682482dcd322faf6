//! Bootstrap artifacts, setup steps, and the structured setup report.

use std::path::{Path, PathBuf};

use crate::domain::remote::RemoteLayout;

/// A local file pushed to the instance before the setup steps run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupArtifact {
    pub local: PathBuf,
    /// Remote destination directory.
    pub remote_dir: String,
}

/// Artifacts in the order they are copied.
#[must_use]
pub fn setup_artifacts(
    artifacts_dir: &Path,
    shapefile: &str,
    state_vector: &str,
    layout: &RemoteLayout,
) -> Vec<SetupArtifact> {
    let home = format!("{}/", layout.home());
    let workspace = layout.workspace();
    vec![
        SetupArtifact {
            local: artifacts_dir.join("tmux_install.sh"),
            remote_dir: home.clone(),
        },
        SetupArtifact {
            local: artifacts_dir.join("fixslurm.sh"),
            remote_dir: home,
        },
        SetupArtifact {
            local: artifacts_dir.join(format!("{shapefile}.shp")),
            remote_dir: workspace.clone(),
        },
        SetupArtifact {
            local: artifacts_dir.join(format!("{shapefile}.shx")),
            remote_dir: workspace.clone(),
        },
        SetupArtifact {
            local: artifacts_dir.join(state_vector),
            remote_dir: workspace,
        },
    ]
}

/// One remote shell command in the setup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupStep {
    pub name: &'static str,
    pub command: &'static str,
}

/// Setup steps, run in order from the remote home directory.
pub const SETUP_STEPS: &[SetupStep] = &[
    SetupStep {
        name: "remove-tmux",
        command: "sudo apt remove -y tmux",
    },
    SetupStep {
        name: "install-tmux",
        command: "chmod +x tmux_install.sh && ./tmux_install.sh",
    },
    SetupStep {
        name: "fix-slurm",
        command: "chmod +x fixslurm.sh && ./fixslurm.sh",
    },
];

/// What to do when a setup step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Attempt every step regardless of earlier failures.
    #[default]
    BestEffort,
    /// Skip the remaining steps after the first failure.
    FailFast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    Copied,
    /// Not present locally; skipped with a warning.
    Missing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Failed(String),
    /// Not attempted because an earlier step failed under `FailFast`.
    Skipped,
}

/// Per-artifact and per-step results of one setup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupReport {
    pub artifacts: Vec<(PathBuf, ArtifactOutcome)>,
    pub steps: Vec<(&'static str, StepOutcome)>,
}

impl SetupReport {
    /// `true` when every step succeeded. Missing artifacts do not count as
    /// failures; failed copies do.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.steps
            .iter()
            .all(|(_, o)| matches!(o, StepOutcome::Succeeded))
            && !self
                .artifacts
                .iter()
                .any(|(_, o)| matches!(o, ArtifactOutcome::Failed(_)))
    }

    /// Names of steps that did not succeed.
    #[must_use]
    pub fn failed_steps(&self) -> Vec<&'static str> {
        self.steps
            .iter()
            .filter(|(_, o)| !matches!(o, StepOutcome::Succeeded))
            .map(|(name, _)| *name)
            .collect()
    }
}
