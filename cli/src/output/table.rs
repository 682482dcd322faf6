//! Instance listing table.

use owo_colors::OwoColorize as _;

use crate::domain::{InstanceDescriptor, InstanceState, SelectedInstance};
use crate::output::OutputContext;

const LAUNCH_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const RULE_WIDTH: usize = 100;

/// Header line of the instance table.
#[must_use]
pub fn header() -> String {
    format!(
        "{:<6} {:<20} {:<14} {:<12} {:<40} {}",
        "Index", "Instance ID", "State", "Type", "Public DNS", "Launch Time"
    )
}

/// One row of the instance table, without styling.
#[must_use]
pub fn row(index: usize, instance: &InstanceDescriptor) -> String {
    let launched = instance
        .launched_at
        .map_or_else(|| "-".to_string(), |t| t.format(LAUNCH_FORMAT).to_string());
    format!(
        "{index:<6} {:<20} {:<14} {:<12} {:<40} {launched}",
        instance.id,
        instance.state.as_str().to_uppercase(),
        instance.instance_type,
        instance.address.as_deref().unwrap_or("N/A"),
    )
}

/// Print the instance table. Suppressed when `quiet`.
pub fn render_instances(ctx: &OutputContext, instances: &[InstanceDescriptor]) {
    if ctx.quiet {
        return;
    }
    if instances.is_empty() {
        ctx.info("No instances found");
        return;
    }
    println!();
    ctx.header("Available instances:");
    println!("{}", header().style(ctx.styles.bold));
    println!("{}", "-".repeat(RULE_WIDTH).style(ctx.styles.dim));
    for (index, instance) in instances.iter().enumerate() {
        let line = row(index, instance);
        let style = match instance.state {
            InstanceState::Running => ctx.styles.running,
            InstanceState::Pending => ctx.styles.info,
            _ => ctx.styles.inactive,
        };
        println!("{}", line.style(style));
    }
    println!();
}

/// Print the details of the selected instance.
pub fn render_selected(ctx: &OutputContext, index: usize, selected: &SelectedInstance) {
    ctx.header(&format!("Selected instance {index}:"));
    ctx.kv("ID:        ", &selected.id);
    ctx.kv("State:     ", &selected.state.as_str().to_uppercase());
    ctx.kv("Public DNS:", selected.address.as_deref().unwrap_or("N/A"));
}
