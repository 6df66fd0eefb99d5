//! Thin wrapper over the git CLI.
//!
//! Every git interaction goes through `run`: spawn, capture, and turn a
//! non-zero exit into a typed error carrying git's own stderr. With
//! `--debug` each invocation is echoed before it runs.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::GitError;
use crate::utils::debug_enabled;

/// One line of `git log --pretty=format:%H|%at|%s`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommitLine {
    pub(crate) hash: String,
    pub(crate) timestamp: i64,
    pub(crate) subject: String,
}

/// How a merge ended. Conflicts are an outcome, not an error.
#[derive(Debug)]
pub(crate) enum MergeOutcome {
    Clean,
    Conflicted { files: Vec<PathBuf> },
}

fn run(repo: &Path, args: &[&str]) -> Result<Output, GitError> {
    if debug_enabled() {
        eprintln!("Running: git {}", args.join(" "));
    }
    Command::new("git")
        .args(args)
        .current_dir(repo)
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GitError::NotFound
            } else {
                GitError::Spawn(e)
            }
        })
}

/// Run and require success, returning stdout
fn run_capture(repo: &Path, args: &[&str]) -> Result<String, GitError> {
    let output = run(repo, args)?;
    if !output.status.success() {
        return Err(command_error(args, &output));
    }
    String::from_utf8(output.stdout).map_err(GitError::Utf8)
}

fn command_error(args: &[&str], output: &Output) -> GitError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        stderr.trim().to_string()
    };
    GitError::Command {
        command: args.first().copied().unwrap_or("git").to_string(),
        detail,
    }
}

/// Whether `repo` sits inside a git work tree. Distinguishes "not a
/// repository" (Ok(false)) from git itself being unavailable (Err).
pub(crate) fn is_work_tree(repo: &Path) -> Result<bool, GitError> {
    let output = run(repo, &["rev-parse", "--is-inside-work-tree"])?;
    Ok(output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true")
}

pub(crate) fn current_branch(repo: &Path) -> Result<String, GitError> {
    Ok(run_capture(repo, &["rev-parse", "--abbrev-ref", "HEAD"])?
        .trim()
        .to_string())
}

/// Whether the current branch has an upstream configured
pub(crate) fn has_upstream(repo: &Path) -> Result<bool, GitError> {
    let output = run(
        repo,
        &["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"],
    )?;
    Ok(output.status.success())
}

/// Commits reachable from any ref, newest first. Empty for a repository
/// with no commits yet.
pub(crate) fn log_all(repo: &Path) -> Result<Vec<CommitLine>, GitError> {
    let stdout = run_capture(repo, &["log", "--all", "--pretty=format:%H|%at|%s"])?;
    Ok(stdout.lines().filter_map(parse_log_line).collect())
}

fn parse_log_line(line: &str) -> Option<CommitLine> {
    let mut parts = line.splitn(3, '|');
    let hash = parts.next()?.trim();
    let timestamp = parts.next()?.trim().parse().ok()?;
    let subject = parts.next()?.trim();
    if hash.len() != 40 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(CommitLine {
        hash: hash.to_string(),
        timestamp,
        subject: subject.to_string(),
    })
}

pub(crate) fn stage_all(repo: &Path) -> Result<(), GitError> {
    run_capture(repo, &["add", "-A"]).map(|_| ())
}

pub(crate) fn commit(repo: &Path, message: &str) -> Result<(), GitError> {
    run_capture(repo, &["commit", "-m", message]).map(|_| ())
}

/// Attempt the merge. On failure, a non-empty unmerged-paths list turns
/// into `Conflicted`; any other failure stays an error.
pub(crate) fn merge(repo: &Path, branch: &str, message: &str) -> Result<MergeOutcome, GitError> {
    let args = ["merge", branch, "-m", message];
    let output = run(repo, &args)?;
    if output.status.success() {
        return Ok(MergeOutcome::Clean);
    }
    let files = conflicted_files(repo)?;
    if files.is_empty() {
        return Err(command_error(&args, &output));
    }
    Ok(MergeOutcome::Conflicted { files })
}

/// Unmerged paths, absolute
fn conflicted_files(repo: &Path) -> Result<Vec<PathBuf>, GitError> {
    let toplevel = run_capture(repo, &["rev-parse", "--show-toplevel"])?;
    let toplevel = PathBuf::from(toplevel.trim());
    let stdout = run_capture(repo, &["diff", "--name-only", "--diff-filter=U"])?;
    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| toplevel.join(line))
        .collect())
}

pub(crate) fn push(repo: &Path) -> Result<(), GitError> {
    run_capture(repo, &["push"]).map(|_| ())
}

pub(crate) fn push_set_upstream(repo: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
    run_capture(repo, &["push", "--set-upstream", remote, branch]).map(|_| ())
}

/// Local branches containing the given commit
pub(crate) fn branches_containing(repo: &Path, hash: &str) -> Result<Vec<String>, GitError> {
    let stdout = run_capture(repo, &["branch", "--contains", hash])?;
    Ok(stdout
        .lines()
        .map(|line| line.trim_start_matches('*').trim())
        .filter(|line| !line.is_empty() && !line.starts_with('('))
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_log_line_splits_three_fields() {
        let line = "abc123def456789012345678901234567890abcd|1755700000|Fix parser (00:02:05), Session (01:02:45) [SESSID: a1b2c3d4e5f6]";
        let commit = parse_log_line(line).unwrap();
        assert_eq!(commit.hash, "abc123def456789012345678901234567890abcd");
        assert_eq!(commit.timestamp, 1755700000);
        assert!(commit.subject.starts_with("Fix parser"));
    }

    #[test]
    fn parse_log_line_keeps_pipes_in_the_subject() {
        let line = "abc123def456789012345678901234567890abcd|1706400000|Fix bug | add tests";
        let commit = parse_log_line(line).unwrap();
        assert_eq!(commit.subject, "Fix bug | add tests");
    }

    #[test]
    fn parse_log_line_rejects_bad_hashes() {
        assert!(parse_log_line("abc123|1706400000|short hash").is_none());
        assert!(
            parse_log_line("zzz123def456789012345678901234567890abcd|1706400000|not hex")
                .is_none()
        );
    }

    #[test]
    fn parse_log_line_rejects_missing_fields() {
        assert!(parse_log_line("").is_none());
        assert!(parse_log_line("abc123def456789012345678901234567890abcd").is_none());
        assert!(parse_log_line("abc123def456789012345678901234567890abcd|1706400000").is_none());
        assert!(parse_log_line("abc123def456789012345678901234567890abcd|later|msg").is_none());
    }

    #[test]
    fn parse_log_line_allows_empty_subject() {
        let line = "abc123def456789012345678901234567890abcd|1706400000|";
        let commit = parse_log_line(line).unwrap();
        assert_eq!(commit.subject, "");
    }
}
