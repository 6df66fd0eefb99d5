use chrono::{DateTime, Utc};

/// Time source for everything that stamps or measures durations.
///
/// All handlers read the clock exactly once per invocation so a single
/// command never mixes two notions of "now".
pub(crate) trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Unix seconds, the unit used by the state files and duration log
    fn now_ts(&self) -> i64 {
        self.now().timestamp()
    }
}

/// Wall clock
pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub(crate) struct FixedClock(pub(crate) i64);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}
