//! Infrastructure implementation of the cloud provider ports.
//!
//! `AwsCliProvider<R>` routes every control-plane call through the `aws` CLI
//! via a `CommandRunner`, always with `--region <r> --output json`.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{
    CommandRunner, InstanceCatalog, InstanceControl, RetryPolicy, SpotRequests, StatusWaiter,
};
use crate::domain::InstanceDescriptor;
use crate::domain::instance::{
    parse_instances, parse_launched_id, parse_spot_request_ids, status_checks_passed,
};
use crate::infra::command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};

/// Infrastructure adapter that drives the `aws ec2` CLI.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct AwsCliProvider<R: CommandRunner> {
    runner: R,
    region: String,
}

impl<R: CommandRunner> AwsCliProvider<R> {
    pub fn new(runner: R, region: impl Into<String>) -> Self {
        Self {
            runner,
            region: region.into(),
        }
    }

    /// Run `aws ec2 <subcommand> <args...>` and return stdout on success.
    async fn ec2(&self, subcommand: &str, args: &[&str]) -> Result<Vec<u8>> {
        let mut full = vec!["ec2", subcommand];
        full.extend_from_slice(args);
        full.extend_from_slice(&["--region", self.region.as_str(), "--output", "json"]);
        let output = self
            .runner
            .run("aws", &full)
            .await
            .with_context(|| format!("aws ec2 {subcommand}"))?;
        checked(subcommand, output)
    }
}

impl AwsCliProvider<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner(region: &str) -> Self {
        Self::new(TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT), region)
    }
}

fn checked(subcommand: &str, output: Output) -> Result<Vec<u8>> {
    if output.status.success() {
        return Ok(output.stdout);
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("aws ec2 {subcommand} failed: {}", stderr.trim())
}

impl<R: CommandRunner> InstanceCatalog for AwsCliProvider<R> {
    async fn describe_instances(&self) -> Result<Vec<InstanceDescriptor>> {
        let json = self.ec2("describe-instances", &[]).await?;
        parse_instances(&json)
    }

    async fn describe_instance(&self, id: &str) -> Result<InstanceDescriptor> {
        let json = self
            .ec2("describe-instances", &["--instance-ids", id])
            .await?;
        parse_instances(&json)?
            .into_iter()
            .next()
            .with_context(|| format!("instance {id} not found"))
    }
}

impl<R: CommandRunner> InstanceControl for AwsCliProvider<R> {
    async fn run_instance(&self, request: &serde_json::Value) -> Result<String> {
        let body = request.to_string();
        let json = self
            .ec2("run-instances", &["--cli-input-json", &body])
            .await?;
        let id = parse_launched_id(&json)?;
        tracing::info!(%id, "instance launched");
        Ok(id)
    }

    async fn terminate(&self, id: &str) -> Result<()> {
        self.ec2("terminate-instances", &["--instance-ids", id])
            .await
            .map(drop)
    }

    async fn stop(&self, id: &str) -> Result<()> {
        self.ec2("stop-instances", &["--instance-ids", id])
            .await
            .map(drop)
    }

    async fn start(&self, id: &str) -> Result<()> {
        self.ec2("start-instances", &["--instance-ids", id])
            .await
            .map(drop)
    }
}

impl<R: CommandRunner> StatusWaiter for AwsCliProvider<R> {
    async fn wait_status_ok(&self, id: &str, policy: &RetryPolicy) -> Result<bool> {
        for attempt in 1..=policy.attempts {
            let json = self
                .ec2(
                    "describe-instance-status",
                    &[
                        "--instance-ids",
                        id,
                        "--filters",
                        "Name=instance-state-name,Values=running",
                    ],
                )
                .await?;
            if status_checks_passed(&json)? {
                return Ok(true);
            }
            tracing::debug!(attempt, id, "status checks not yet passing");
            if attempt < policy.attempts {
                tokio::time::sleep(policy.interval).await;
            }
        }
        Ok(false)
    }
}

impl<R: CommandRunner> SpotRequests for AwsCliProvider<R> {
    async fn active_spot_requests(&self) -> Result<Vec<String>> {
        let json = self
            .ec2(
                "describe-spot-instance-requests",
                &["--filters", "Name=state,Values=active"],
            )
            .await?;
        parse_spot_request_ids(&json)
    }

    async fn cancel_spot_request(&self, id: &str) -> Result<()> {
        self.ec2(
            "cancel-spot-instance-requests",
            &["--spot-instance-request-ids", id],
        )
        .await
        .map(drop)
    }
}
