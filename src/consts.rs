/// Commit message used when `commit` is invoked without one
pub(crate) const DEFAULT_MESSAGE: &str = "WIP";

/// Remote used when the current branch has no upstream yet
pub(crate) const DEFAULT_REMOTE: &str = "origin";

/// Directory name for timer state under the platform data dir
pub(crate) const STATE_DIR_NAME: &str = "tempo";
