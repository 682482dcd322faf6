//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands::{self, InstanceArgs};
use crate::infra::config::CONFIG_ENV;

/// Run methane inversions on cloud instances
#[derive(Parser)]
#[command(
    name = "imirunner",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Settings file [default: ./settings.yml, then ~/.imirunner/settings.yml]
    #[arg(long, global = true, value_name = "PATH", env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (also disabled by a non-empty NO_COLOR)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Skip confirmation prompts
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Launch, wait for, and set up a new instance
    Create(commands::create::CreateArgs),

    /// Terminate an instance
    Terminate(InstanceArgs),

    /// Stop a running instance
    Stop(InstanceArgs),

    /// Start a stopped instance
    Restart(InstanceArgs),

    /// Cancel an active spot request
    CancelSpot(InstanceArgs),

    /// Re-run instance setup on an existing instance
    Setup(InstanceArgs),

    /// Start an inversion and copy its results when it completes
    Run(commands::run::RunArgs),

    /// Follow a log file on the instance
    Log(commands::log::LogArgs),

    /// Open a shell on the instance, or run one command
    Shell(commands::shell::ShellArgs),

    /// Copy a run's results from the instance to local storage
    CopyLocal(commands::copy::CopyLocalArgs),

    /// Download an archived run from S3 onto the instance
    CopyFromS3(commands::copy::CopyFromS3Args),

    /// List instances
    List(InstanceArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be loaded or the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            config,
            quiet,
            no_color,
            yes,
            command,
        } = self;
        let app = AppContext::new(AppFlags {
            output: OutputFlags { no_color, quiet },
            behaviour: BehaviourFlags { yes },
            config,
        })?;

        match command {
            Command::Create(args) => commands::create::run(&app, &args).await,
            Command::Terminate(args) => commands::lifecycle::terminate(&app, args).await,
            Command::Stop(args) => commands::lifecycle::stop(&app, args).await,
            Command::Restart(args) => commands::lifecycle::restart(&app, args).await,
            Command::CancelSpot(args) => commands::lifecycle::cancel_spot(&app, args).await,
            Command::Setup(args) => commands::setup::run(&app, args).await,
            Command::Run(args) => commands::run::run(&app, &args).await,
            Command::Log(args) => commands::log::run(&app, &args).await,
            Command::Shell(args) => commands::shell::run(&app, &args).await,
            Command::CopyLocal(args) => commands::copy::copy_local(&app, &args).await,
            Command::CopyFromS3(args) => commands::copy::copy_from_s3(&app, &args).await,
            Command::List(args) => commands::list::run(&app, args).await,
        }
    }
}
