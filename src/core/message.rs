//! Commit-subject timing trailer.
//!
//! Every subject this tool writes ends with
//! ` (<elapsed>), Session (<total>) [SESSID: <id>]` where both durations
//! are `HH:MM:SS` (hours may grow past two digits) and the id is twelve
//! lowercase hex characters. The trailer doubles as the persistence
//! format for finished sessions: parsing it back out of `git log` is how
//! historical totals are recovered, so any change to the format has to
//! keep `parse_subject` accepting subjects written by older versions.

use std::sync::LazyLock;

use regex::Regex;

/// Length of the hex session identifier
pub(crate) const SESSION_ID_LEN: usize = 12;

static TRAILER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\((\d{2,}:\d{2}:\d{2})\), Session \((\d{2,}:\d{2}:\d{2})\) \[SESSID: ([0-9a-f]{12})\]$",
    )
    .expect("trailer pattern compiles")
});

/// Timing data carried by one commit subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TimingTrailer {
    /// Seconds since the previous checkpoint
    pub(crate) elapsed: i64,
    /// Cumulative seconds for the session, this commit included
    pub(crate) session_total: i64,
    pub(crate) session_id: String,
}

/// Format seconds as `HH:MM:SS`; the hours field widens as needed
pub(crate) fn format_hms(seconds: i64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// Parse `HH:MM:SS` back to seconds. Minutes and seconds must be exactly
/// two digits and below 60; hours must be at least two digits.
pub(crate) fn parse_hms(text: &str) -> Option<i64> {
    let mut parts = text.split(':');
    let h = parts.next()?;
    let m = parts.next()?;
    let s = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    for field in [h, m, s] {
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    if h.len() < 2 || m.len() != 2 || s.len() != 2 {
        return None;
    }
    let (h, m, s) = (
        h.parse::<i64>().ok()?,
        m.parse::<i64>().ok()?,
        s.parse::<i64>().ok()?,
    );
    if m >= 60 || s >= 60 {
        return None;
    }
    Some(h * 3600 + m * 60 + s)
}

pub(crate) fn is_valid_session_id(id: &str) -> bool {
    id.len() == SESSION_ID_LEN && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Render a full subject line: the message followed by the trailer
pub(crate) fn encode_subject(message: &str, trailer: &TimingTrailer) -> String {
    format!(
        "{message} ({}), Session ({}) [SESSID: {}]",
        format_hms(trailer.elapsed),
        format_hms(trailer.session_total),
        trailer.session_id
    )
}

/// Extract the trailer from a subject, if one is present at the end
pub(crate) fn parse_subject(subject: &str) -> Option<TimingTrailer> {
    let caps = TRAILER_RE.captures(subject.trim_end())?;
    Some(TimingTrailer {
        elapsed: parse_hms(caps.get(1)?.as_str())?,
        session_total: parse_hms(caps.get(2)?.as_str())?,
        session_id: caps.get(3)?.as_str().to_string(),
    })
}
