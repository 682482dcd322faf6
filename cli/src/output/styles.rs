//! Color stylesheet. Every field is a no-op style until `colorize` runs.

use owo_colors::Style;

#[derive(Default, Clone)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub info: Style,
    /// Secondary text: keys, table rules.
    pub dim: Style,
    /// Table header row.
    pub bold: Style,
    pub header: Style,
    /// Table rows for running instances.
    pub running: Style,
    /// Table rows for stopped, terminated, and transitioning instances.
    pub inactive: Style,
}

impl Styles {
    pub fn colorize(&mut self) {
        *self = Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            info: Style::new().blue(),
            dim: Style::new().dimmed(),
            bold: Style::new().bold(),
            header: Style::new().bold().cyan(),
            running: Style::new().green().bold(),
            inactive: Style::new().dimmed(),
        };
    }
}
