//! Job descriptors: parsing and validating an IMI run config file.
//!
//! Only two fields of the config are interpreted here: `RunName` and
//! `UseSlurm`. Everything else in the file is passed to the remote job
//! untouched.

use std::path::{Path, PathBuf};

use crate::domain::error::JobConfigError;
use crate::domain::remote::DEFAULT_LOG_FILE;

/// tmux session name for interactive runs.
pub const TMUX_SESSION: &str = "imi";

/// Optional schedule file copied next to the job config when present locally.
pub const SCHEDULE_FILE: &str = "KalmanPeriods.csv";

/// Remote name of the schedule file inside the workspace.
pub const REMOTE_SCHEDULE_FILE: &str = "periods.csv";

const RUN_NAME_FIELD: &str = "RunName";
const USE_SLURM_FIELD: &str = "UseSlurm";

/// How the job declares it must be run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// `UseSlurm: true`, submitted to the batch queue.
    Queued,
    /// `UseSlurm: false`, run in a detached tmux session.
    Interactive,
}

/// How the caller asked the job to be launched (`--tmux` or not).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStyle {
    Queued,
    Interactive,
}

impl LaunchStyle {
    #[must_use]
    pub fn from_tmux_flag(tmux: bool) -> Self {
        if tmux { Self::Interactive } else { Self::Queued }
    }
}

/// The two significant fields of a job config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    pub run_name: String,
    pub mode: ExecutionMode,
}

/// A validated job, ready to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    /// Canonical run name (the config file stem).
    pub name: String,
    pub mode: ExecutionMode,
    /// Local path of the config file.
    pub config_path: PathBuf,
    /// File name the config has on the remote side.
    pub config_file_name: String,
    /// Free-form options passed to `run_imi.sh` unmodified.
    pub options: Option<String>,
}

impl JobDescriptor {
    /// Remote command (run from the workspace directory) that starts the job.
    #[must_use]
    pub fn launch_command(&self) -> String {
        let args = match self.options.as_deref() {
            Some(opts) if !opts.is_empty() => format!("{} {opts}", self.config_file_name),
            _ => self.config_file_name.clone(),
        };
        match self.mode {
            ExecutionMode::Interactive => format!(
                "tmux new-session -d -s {TMUX_SESSION} './run_imi.sh {args} > {DEFAULT_LOG_FILE}'"
            ),
            ExecutionMode::Queued => format!("sbatch run_imi.sh {args}"),
        }
    }
}

/// Parse the `RunName` and `UseSlurm` fields out of a config file.
///
/// The first occurrence of each field wins. Values may be quoted and may carry
/// a trailing ` #` comment.
///
/// # Errors
///
/// Returns `MissingField` when either field is absent and `InvalidMode` when
/// `UseSlurm` is not `true` or `false` (case-insensitive).
pub fn parse_job_config(text: &str) -> Result<JobConfig, JobConfigError> {
    let mut run_name = None;
    let mut mode = None;

    for line in text.lines() {
        if run_name.is_none()
            && let Some(value) = field_value(line, RUN_NAME_FIELD)
        {
            run_name = Some(value.to_string());
        } else if mode.is_none()
            && let Some(value) = field_value(line, USE_SLURM_FIELD)
        {
            mode = Some(match value.to_ascii_lowercase().as_str() {
                "true" => ExecutionMode::Queued,
                "false" => ExecutionMode::Interactive,
                _ => return Err(JobConfigError::InvalidMode(value.to_string())),
            });
        }
    }

    Ok(JobConfig {
        run_name: run_name.ok_or(JobConfigError::MissingField {
            field: RUN_NAME_FIELD,
        })?,
        mode: mode.ok_or(JobConfigError::MissingField {
            field: USE_SLURM_FIELD,
        })?,
    })
}

fn field_value<'a>(line: &'a str, field: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(field)?.strip_prefix(':')?;
    let value = rest.split(" #").next().unwrap_or_default().trim();
    Some(value.trim_matches(|c| c == '"' || c == '\''))
}

/// Reject a declared execution mode that contradicts the requested launch style.
///
/// # Errors
///
/// `QueuedWithInteractive` or `InteractiveWithQueued` on conflict.
pub fn check_launch_style(mode: ExecutionMode, style: LaunchStyle) -> Result<(), JobConfigError> {
    match (mode, style) {
        (ExecutionMode::Queued, LaunchStyle::Interactive) => {
            Err(JobConfigError::QueuedWithInteractive)
        }
        (ExecutionMode::Interactive, LaunchStyle::Queued) => {
            Err(JobConfigError::InteractiveWithQueued)
        }
        _ => Ok(()),
    }
}

/// Build a validated descriptor from a config path and its contents.
///
/// # Errors
///
/// Returns a `JobConfigError` when the path has no stem, the fields are
/// missing or malformed, `RunName` differs from the stem, or the declared
/// mode conflicts with `style`.
pub fn describe_job(
    config_path: &Path,
    contents: &str,
    style: LaunchStyle,
    options: Option<String>,
) -> Result<JobDescriptor, JobConfigError> {
    let no_stem = || JobConfigError::NoStem(config_path.display().to_string());
    let stem = config_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(no_stem)?;
    let file_name = config_path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(no_stem)?;

    let config = parse_job_config(contents)?;
    if config.run_name != stem {
        return Err(JobConfigError::NameMismatch {
            stem: stem.to_string(),
            declared: config.run_name,
        });
    }
    check_launch_style(config.mode, style)?;

    Ok(JobDescriptor {
        name: config.run_name,
        mode: config.mode,
        config_path: config_path.to_path_buf(),
        config_file_name: file_name.to_string(),
        options,
    })
}
