//! Fixed layout of the remote instance filesystem.

/// Directory (relative to the remote home) holding the inversion code.
pub const WORKSPACE_DIR: &str = "integrated_methane_inversion";

/// Directory (relative to the remote home) holding per-run output.
pub const OUTPUT_ROOT_DIR: &str = "imi_output_dir";

/// Log file the interactive launch redirects into.
pub const DEFAULT_LOG_FILE: &str = "imi_output.log";

/// Remote paths derived from the login user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLayout {
    home: String,
}

impl RemoteLayout {
    #[must_use]
    pub fn for_user(user: &str) -> Self {
        Self {
            home: format!("/home/{user}"),
        }
    }

    #[must_use]
    pub fn home(&self) -> &str {
        &self.home
    }

    /// `~/integrated_methane_inversion`
    #[must_use]
    pub fn workspace(&self) -> String {
        format!("{}/{WORKSPACE_DIR}", self.home)
    }

    /// `~/imi_output_dir/<run>`
    #[must_use]
    pub fn run_output(&self, run_name: &str) -> String {
        format!("{}/{OUTPUT_ROOT_DIR}/{run_name}", self.home)
    }

    /// Command that seeds with the last 1000 lines of `log_file` and follows it.
    #[must_use]
    pub fn tail_command(&self, log_file: &str) -> String {
        format!("tail -n 1000 -f {WORKSPACE_DIR}/{log_file}")
    }
}
