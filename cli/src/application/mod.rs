//! Application layer: ports and the services built on them.
//!
//! This module depends only on `crate::domain`, never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod ports;
pub mod services;

pub use ports::{
    CloudProvider, CommandRunner, InstanceCatalog, InstanceControl, LineSource, LocalFs,
    ProgressReporter, RemoteHost, RemoteShell, RemoteTransfer, RetryPolicy, SSH_HANDSHAKE,
    STATUS_WAIT, SpotRequests, StatusWaiter,
};
