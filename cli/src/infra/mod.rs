//! Infrastructure layer: adapters behind the application ports.
//!
//! This module contains all I/O-performing code: process execution, the
//! `aws` control plane, SSH access to instances, settings files, and the
//! local filesystem.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod ec2;
pub mod fs;
pub mod ssh;
