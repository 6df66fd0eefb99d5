//! Timer state store.
//!
//! Flat files under one directory: `start` and `checkpoint` hold unix
//! seconds, `session` holds the session id, and `durations.log` is the
//! append-only interval log. A state file holding unparsable content
//! counts as absent.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;

use uuid::Uuid;

use crate::core::message::{SESSION_ID_LEN, is_valid_session_id};
use crate::error::AppError;

const START_FILE: &str = "start";
const CHECKPOINT_FILE: &str = "checkpoint";
const SESSION_FILE: &str = "session";
const LOG_FILE: &str = "durations.log";

pub(crate) struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }

    /// Session id saved by a previous `start`, if any
    pub(crate) fn session_id(&self) -> Result<Option<String>, AppError> {
        let path = self.dir.join(SESSION_FILE);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let id = content.trim();
                Ok(is_valid_session_id(id).then(|| id.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::io(&path, e)),
        }
    }

    /// Reuse the saved session id, or mint one that does not collide
    /// with any id already present in history
    pub(crate) fn ensure_session(&self, taken: &HashSet<String>) -> Result<String, AppError> {
        if let Some(id) = self.session_id()? {
            return Ok(id);
        }
        let id = new_session_id(taken);
        self.write_file(SESSION_FILE, &id)?;
        Ok(id)
    }

    /// Reset the start and checkpoint timestamps to `now`
    pub(crate) fn begin(&self, now: i64) -> Result<(), AppError> {
        self.write_file(START_FILE, &now.to_string())?;
        self.write_file(CHECKPOINT_FILE, &now.to_string())
    }

    /// Seconds since the last checkpoint, moving the checkpoint to `now`.
    /// A clock that went backwards yields zero rather than a negative
    /// interval.
    pub(crate) fn checkpoint(&self, now: i64) -> Result<i64, AppError> {
        let prev = self.read_ts(CHECKPOINT_FILE)?.ok_or(AppError::NotStarted)?;
        self.write_file(CHECKPOINT_FILE, &now.to_string())?;
        Ok((now - prev).max(0))
    }

    /// Seconds since the last checkpoint without moving it
    pub(crate) fn peek(&self, now: i64) -> Result<i64, AppError> {
        let prev = self.read_ts(CHECKPOINT_FILE)?.ok_or(AppError::NotStarted)?;
        Ok((now - prev).max(0))
    }

    /// Delete every state file, the duration log included. Missing files
    /// are not an error.
    pub(crate) fn clear(&self) -> Result<(), AppError> {
        for name in [START_FILE, CHECKPOINT_FILE, SESSION_FILE, LOG_FILE] {
            let path = self.dir.join(name);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(AppError::io(&path, e)),
            }
        }
        Ok(())
    }

    fn read_ts(&self, name: &str) -> Result<Option<i64>, AppError> {
        let path = self.dir.join(name);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(content.trim().parse().ok()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::io(&path, e)),
        }
    }

    fn write_file(&self, name: &str, content: &str) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).map_err(|e| AppError::io(&self.dir, e))?;
        let path = self.dir.join(name);
        fs::write(&path, content).map_err(|e| AppError::io(&path, e))
    }
}

fn new_session_id(taken: &HashSet<String>) -> String {
    loop {
        let hex = Uuid::new_v4().simple().to_string();
        let id = hex[..SESSION_ID_LEN].to_string();
        if !taken.contains(&id) {
            return id;
        }
    }
}
