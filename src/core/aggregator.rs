//! Session recovery from commit history.
//!
//! Commit subjects carry a cumulative session total, so the figure
//! recovered for a session is the maximum value seen for its id, never a
//! sum: within one session a later commit supersedes the earlier ones,
//! and traversal order is not guaranteed. The grand total then sums
//! those per-session maxima, which combines independent sessions without
//! double-counting inside any one of them.

use std::collections::HashMap;

use crate::core::message::parse_subject;
use crate::git::CommitLine;
use crate::utils::debug_enabled;

/// One work session recovered from commit subjects
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionStats {
    pub(crate) session_id: String,
    /// Highest session total embedded in any of this session's subjects
    pub(crate) total_seconds: i64,
    pub(crate) commits: i64,
    /// Author timestamp of the newest commit in the session
    pub(crate) last_timestamp: i64,
    /// Hashes of the session's commits, for branch lookups
    pub(crate) hashes: Vec<String>,
}

/// Fold commit lines into per-session stats, oldest session first.
/// Subjects without a parsable trailer are skipped.
pub(crate) fn aggregate_sessions(commits: &[CommitLine]) -> Vec<SessionStats> {
    let mut sessions: HashMap<String, SessionStats> = HashMap::new();

    for commit in commits {
        let Some(trailer) = parse_subject(&commit.subject) else {
            if debug_enabled() {
                eprintln!("No timing trailer in {}: {}", commit.hash, commit.subject);
            }
            continue;
        };
        let entry = sessions
            .entry(trailer.session_id.clone())
            .or_insert_with(|| SessionStats {
                session_id: trailer.session_id.clone(),
                ..SessionStats::default()
            });
        entry.total_seconds = entry.total_seconds.max(trailer.session_total);
        entry.commits += 1;
        entry.last_timestamp = entry.last_timestamp.max(commit.timestamp);
        entry.hashes.push(commit.hash.clone());
    }

    let mut sessions: Vec<SessionStats> = sessions.into_values().collect();
    sessions.sort_by_key(|s| s.last_timestamp);
    sessions
}

/// Sum of per-session maxima
pub(crate) fn grand_total(sessions: &[SessionStats]) -> i64 {
    sessions.iter().map(|s| s.total_seconds).sum()
}
