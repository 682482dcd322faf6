//! Use-case services.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod directory;
pub mod dispatch;
pub mod lifecycle;
pub mod monitor;
pub mod readiness;
pub mod retrieve;
pub mod setup;
pub mod staging;

#[cfg(test)]
pub(crate) mod test_support;

use std::process::Output;

/// First line of stderr, or the exit code when stderr is empty.
pub(crate) fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    match stderr.lines().map(str::trim).find(|l| !l.is_empty()) {
        Some(line) => line.to_string(),
        None => match output.status.code() {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        },
    }
}
