use chrono::{DateTime, Utc};
use comfy_table::{Cell, Color};

use crate::core::{SessionStats, format_hms, grand_total};
use crate::output::format::{create_styled_table, header_cell, right_cell, styled_cell};

/// `YYYY-MM-DD` of a unix timestamp, UTC
fn commit_date(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub(crate) fn print_session_table(sessions: &[SessionStats], use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Session", use_color),
        header_cell("Commits", use_color),
        header_cell("Last commit", use_color),
        header_cell("Total", use_color),
    ]);

    let mut total_commits = 0;
    for session in sessions {
        total_commits += session.commits;
        table.add_row(vec![
            Cell::new(&session.session_id),
            right_cell(&session.commits.to_string(), None, false),
            Cell::new(commit_date(session.last_timestamp)),
            right_cell(&format_hms(session.total_seconds), None, false),
        ]);
    }

    let cyan = if use_color { Some(Color::Cyan) } else { None };
    table.add_row(vec![
        styled_cell("TOTAL", cyan, true),
        right_cell(&total_commits.to_string(), cyan, true),
        Cell::new(""),
        right_cell(&format_hms(grand_total(sessions)), cyan, true),
    ]);

    println!("\n  Sessions recovered from commit history\n");
    println!("{table}");
    println!("\n  {} sessions\n", sessions.len());
}

pub(crate) fn output_session_json(sessions: &[SessionStats]) -> String {
    let entries: Vec<serde_json::Value> = sessions
        .iter()
        .map(|session| {
            serde_json::json!({
                "session_id": session.session_id,
                "commits": session.commits,
                "last_commit": commit_date(session.last_timestamp),
                "total_seconds": session.total_seconds,
                "total": format_hms(session.total_seconds),
            })
        })
        .collect();

    let output = serde_json::json!({
        "sessions": entries,
        "total_seconds": grand_total(sessions),
        "total": format_hms(grand_total(sessions)),
    });
    serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        eprintln!("Failed to serialize JSON output: {e}");
        "{}".to_string()
    })
}
