//! Completion sentinels in the job log.

/// Substrings that mark a finished run: results are ready, or the run ended.
pub const COMPLETION_SENTINELS: &[&str] = &["Posterior", "IMI ended"];

/// The sentinel contained in `line`, if any.
#[must_use]
pub fn completion_sentinel(line: &str) -> Option<&'static str> {
    COMPLETION_SENTINELS
        .iter()
        .copied()
        .find(|sentinel| line.contains(sentinel))
}
