//! Terminal output: styled status lines, the progress reporter, and the
//! instance table.

pub mod progress;
pub mod reporter;
pub mod styles;
pub mod table;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Terminal state for one invocation: styles, TTY detection, `--quiet`.
pub struct OutputContext {
    pub styles: Styles,
    /// stdout is a terminal; spinners are only drawn when it is.
    pub is_tty: bool,
    /// Only errors and streamed remote output are printed.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are enabled only on a TTY, without `--no-color` and without a
    /// non-empty `NO_COLOR` in the environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let mut styles = Styles::default();
        if is_tty && !no_color && !no_color_env(std::env::var_os("NO_COLOR").as_deref()) {
            styles.colorize();
        }
        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// A `ProgressReporter` bound to this context.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(self)
    }

    fn marked(&self, marker: &str, style: Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", marker.style(style));
        }
    }

    pub fn success(&self, msg: &str) {
        self.marked("✓", self.styles.success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.marked("!", self.styles.warning, msg);
    }

    pub fn info(&self, msg: &str) {
        self.marked("ℹ", self.styles.info, msg);
    }

    /// Section title, e.g. `Available instances:`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// `key  value` with the key dimmed; callers pad keys to align a block.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// `NO_COLOR` counts only when set to a non-empty value.
fn no_color_env(value: Option<&std::ffi::OsStr>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
