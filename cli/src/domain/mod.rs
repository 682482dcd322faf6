//! Domain layer: pure types, parsing and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod instance;
pub mod job;
pub mod launch;
pub mod log;
pub mod manifest;
pub mod remote;
pub mod session;
pub mod setup;

pub use config::Settings;
pub use error::{
    JobConfigError, LaunchOptionsError, LifecycleError, ReadinessError, SelectionError,
    SettingsError,
};
pub use instance::{InstanceDescriptor, InstanceState};
pub use job::{ExecutionMode, JobDescriptor, LaunchStyle};
pub use remote::RemoteLayout;
pub use session::{SelectedInstance, Session};
