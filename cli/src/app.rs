//! Per-invocation state shared by every command handler.
//!
//! `AppContext` holds the output context, the loaded settings, and the
//! production adapters. It is built once in `Cli::run()`.

use std::path::PathBuf;

use anyhow::Result;

use crate::domain::{RemoteLayout, Settings};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlSettingsStore;
use crate::infra::ec2::AwsCliProvider;
use crate::infra::fs::StdFs;
use crate::infra::ssh::SshRemote;
use crate::output::OutputContext;

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `IMIRUNNER_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
    /// Explicit settings file (`--config`).
    pub config: Option<PathBuf>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    pub settings: Settings,
    /// `aws ec2` control plane.
    pub provider: AwsCliProvider<TokioCommandRunner>,
    /// `ssh`/`scp`/`rsync` access to instances.
    pub remote: SshRemote<TokioCommandRunner>,
    pub fs: StdFs,
    /// Remote directory layout for `settings.remote.user`.
    pub layout: RemoteLayout,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `IMIRUNNER_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be loaded or is invalid.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("IMIRUNNER_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let settings = YamlSettingsStore::new(flags.config).load()?;
        let provider = AwsCliProvider::default_runner(&settings.aws.region);
        let remote = SshRemote::default_runner(&settings.paths.ssh_key, &settings.remote.user);
        let layout = RemoteLayout::for_user(&settings.remote.user);

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            settings,
            provider,
            remote,
            fs: StdFs,
            layout,
            non_interactive,
        })
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `IMIRUNNER_YES`
    /// env), returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
