//! Append-only duration log.
//!
//! One line per checkpointed interval: `<unix_ts> <seconds> <session_id>`.
//! Lines are never rewritten; totals are recomputed by re-reading the
//! file. Lines that fail to parse are skipped so a damaged log degrades
//! instead of erroring.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::error::AppError;

/// One logged interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DurationRecord {
    pub(crate) timestamp: i64,
    pub(crate) seconds: i64,
    pub(crate) session_id: String,
}

pub(crate) struct DurationLog {
    path: PathBuf,
}

impl DurationLog {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub(crate) fn append(&self, record: &DurationRecord) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AppError::io(&self.path, e))?;
        writeln!(
            file,
            "{} {} {}",
            record.timestamp, record.seconds, record.session_id
        )
        .map_err(|e| AppError::io(&self.path, e))
    }

    /// All parsable records, oldest first
    pub(crate) fn records(&self) -> Result<Vec<DurationRecord>, AppError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::io(&self.path, e)),
        };
        Ok(content.lines().filter_map(parse_line).collect())
    }

    /// Sum of logged seconds for one session
    pub(crate) fn session_total(&self, session_id: &str) -> Result<i64, AppError> {
        Ok(self
            .records()?
            .iter()
            .filter(|r| r.session_id == session_id)
            .map(|r| r.seconds)
            .sum())
    }
}

fn parse_line(line: &str) -> Option<DurationRecord> {
    let mut fields = line.split_whitespace();
    let timestamp = fields.next()?.parse().ok()?;
    let seconds = fields.next()?.parse().ok()?;
    let session_id = fields.next()?.to_string();
    if fields.next().is_some() {
        return None;
    }
    Some(DurationRecord {
        timestamp,
        seconds,
        session_id,
    })
}
