//! CLI subcommand definitions

use clap::Subcommand;

/// Main CLI commands
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Start a work session, or resume the one already in progress
    Start,
    /// Stage everything and commit with timing appended to the message
    Commit {
        /// Commit message; words are joined with spaces
        message: Vec<String>,
    },
    /// Show elapsed time, the session total, and the all-time aggregate
    Time,
    /// Merge a branch, recording elapsed time in the merge message
    #[command(visible_alias = "gcmm")]
    Merge {
        /// Branch to merge into the current one
        branch: String,
    },
    /// List sessions recovered from commit history
    Sessions,
    /// End the session and delete its state
    Stop,
}
