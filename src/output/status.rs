use crate::core::format_hms;

/// Everything the `time` command reports
#[derive(Debug)]
pub(crate) struct TimeReport {
    pub(crate) session_id: String,
    /// Seconds since the last checkpoint (start or last commit)
    pub(crate) elapsed_seconds: i64,
    /// Logged intervals for this session plus the pending elapsed
    pub(crate) session_seconds: i64,
    /// Sum of per-session maxima recovered from history
    pub(crate) total_seconds: i64,
    /// Distinct sessions found in history
    pub(crate) sessions: usize,
    pub(crate) branches: Vec<String>,
}

pub(crate) fn print_time_report(report: &TimeReport, use_color: bool) {
    let value = |text: String| {
        if use_color {
            format!("\x1b[36m{text}\x1b[0m")
        } else {
            text
        }
    };

    println!("\n  Session {}\n", report.session_id);
    println!("  Elapsed       {}", value(format_hms(report.elapsed_seconds)));
    println!("  This session  {}", value(format_hms(report.session_seconds)));
    println!(
        "  All sessions  {} ({} sessions)",
        value(format_hms(report.total_seconds)),
        report.sessions
    );
    if !report.branches.is_empty() {
        println!("  Branches      {}", report.branches.join(", "));
    }
    println!();
}

pub(crate) fn output_time_json(report: &TimeReport) -> String {
    let output = serde_json::json!({
        "session_id": report.session_id,
        "elapsed_seconds": report.elapsed_seconds,
        "elapsed": format_hms(report.elapsed_seconds),
        "session_seconds": report.session_seconds,
        "session": format_hms(report.session_seconds),
        "total_seconds": report.total_seconds,
        "total": format_hms(report.total_seconds),
        "sessions": report.sessions,
        "branches": report.branches,
    });
    serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        eprintln!("Failed to serialize JSON output: {e}");
        "{}".to_string()
    })
}
