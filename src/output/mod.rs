mod format;
mod sessions;
mod status;

pub(crate) use sessions::{output_session_json, print_session_table};
pub(crate) use status::{TimeReport, output_time_json, print_time_report};
