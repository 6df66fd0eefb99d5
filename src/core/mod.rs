//! Core module - session state, the duration log, and the subject format

mod aggregator;
mod clock;
mod log;
mod message;
mod store;

pub(crate) use aggregator::{SessionStats, aggregate_sessions, grand_total};
pub(crate) use clock::{Clock, SystemClock};
pub(crate) use log::{DurationLog, DurationRecord};
pub(crate) use message::{TimingTrailer, encode_subject, format_hms};
pub(crate) use store::StateStore;
