use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::consts::{DEFAULT_MESSAGE, DEFAULT_REMOTE, STATE_DIR_NAME};
use crate::core::{
    Clock, DurationLog, DurationRecord, SessionStats, StateStore, SystemClock, TimingTrailer,
    aggregate_sessions, encode_subject, format_hms, grand_total,
};
use crate::error::AppError;
use crate::git::{self, MergeOutcome};
use crate::output::{
    TimeReport, output_session_json, output_time_json, print_session_table, print_time_report,
};

/// Print a JSON value, degrading to an empty object if it will not
/// serialize
fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize JSON output: {e}");
            println!("{{}}");
        }
    }
}

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) config: &'a Config,
    pub(crate) store: StateStore,
    pub(crate) log: DurationLog,
    pub(crate) repo: PathBuf,
    pub(crate) clock: &'a dyn Clock,
}

/// State directory when neither the flag nor the config sets one
fn default_state_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(STATE_DIR_NAME)
}

pub(crate) fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let store = StateStore::new(cli.state_dir.clone().unwrap_or_else(default_state_dir));
    let log = DurationLog::new(store.log_path());
    let repo = std::env::current_dir().map_err(|e| AppError::io(Path::new("."), e))?;
    let clock = SystemClock;

    let ctx = CommandContext {
        cli,
        config,
        store,
        log,
        repo,
        clock: &clock,
    };

    match &cli.command {
        Commands::Start => handle_start(&ctx),
        Commands::Commit { message } => handle_commit(&ctx, message),
        Commands::Time => handle_time(&ctx),
        Commands::Merge { branch } => handle_merge(&ctx, branch),
        Commands::Sessions => handle_sessions(&ctx),
        Commands::Stop => handle_stop(&ctx),
    }
}

fn ensure_repo(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    if git::is_work_tree(&ctx.repo)? {
        Ok(())
    } else {
        Err(AppError::NotARepo)
    }
}

fn handle_start(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    ensure_repo(ctx)?;

    let resumed = ctx.store.session_id()?.is_some();
    // Ids already used by finished sessions must not be reissued, or
    // their history would merge with the new session's
    let taken: HashSet<String> = if resumed {
        HashSet::new()
    } else {
        aggregate_sessions(&git::log_all(&ctx.repo)?)
            .into_iter()
            .map(|s| s.session_id)
            .collect()
    };
    let session_id = ctx.store.ensure_session(&taken)?;
    let now = ctx.clock.now_ts();
    ctx.store.begin(now)?;

    if ctx.cli.json {
        print_json(&serde_json::json!({
            "session_id": session_id,
            "resumed": resumed,
            "started_at": now,
        }));
    } else if resumed {
        println!("Resumed session {session_id}.");
    } else {
        println!("Started session {session_id}.");
    }
    Ok(())
}

fn handle_commit(ctx: &CommandContext<'_>, message: &[String]) -> Result<(), AppError> {
    ensure_repo(ctx)?;

    let session_id = ctx.store.session_id()?.ok_or(AppError::NotStarted)?;
    let now = ctx.clock.now_ts();
    let elapsed = ctx.store.checkpoint(now)?;
    ctx.log.append(&DurationRecord {
        timestamp: now,
        seconds: elapsed,
        session_id: session_id.clone(),
    })?;
    let session_total = ctx.log.session_total(&session_id)?;

    let message = if message.is_empty() {
        ctx.config
            .default_message
            .clone()
            .unwrap_or_else(|| DEFAULT_MESSAGE.to_string())
    } else {
        message.join(" ")
    };
    let subject = encode_subject(
        &message,
        &TimingTrailer {
            elapsed,
            session_total,
            session_id,
        },
    );

    git::stage_all(&ctx.repo)?;
    git::commit(&ctx.repo, &subject)?;
    let pushed = push_current(ctx)?;

    if ctx.cli.json {
        print_json(&serde_json::json!({
            "subject": subject,
            "elapsed_seconds": elapsed,
            "session_seconds": session_total,
            "pushed": pushed,
        }));
    } else {
        println!("Committed: {subject}");
        report_push(pushed);
    }
    Ok(())
}

fn handle_time(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    ensure_repo(ctx)?;

    let session_id = ctx.store.session_id()?.ok_or(AppError::NotStarted)?;
    let now = ctx.clock.now_ts();
    let elapsed = ctx.store.peek(now)?;
    let logged = ctx.log.session_total(&session_id)?;

    let sessions = aggregate_sessions(&git::log_all(&ctx.repo)?);
    let branches = collect_branches(ctx, &sessions)?;
    let report = TimeReport {
        session_id,
        elapsed_seconds: elapsed,
        session_seconds: logged + elapsed,
        total_seconds: grand_total(&sessions),
        sessions: sessions.len(),
        branches,
    };

    if ctx.cli.json {
        println!("{}", output_time_json(&report));
    } else {
        print_time_report(&report, ctx.cli.use_color());
    }
    Ok(())
}

fn handle_merge(ctx: &CommandContext<'_>, branch: &str) -> Result<(), AppError> {
    ensure_repo(ctx)?;

    let session_id = ctx.store.session_id()?.ok_or(AppError::NotStarted)?;
    let now = ctx.clock.now_ts();
    let elapsed = ctx.store.checkpoint(now)?;
    ctx.log.append(&DurationRecord {
        timestamp: now,
        seconds: elapsed,
        session_id: session_id.clone(),
    })?;
    let session_total = ctx.log.session_total(&session_id)?;

    let subject = encode_subject(
        &format!("Merge branch '{branch}'"),
        &TimingTrailer {
            elapsed,
            session_total,
            session_id,
        },
    );

    match git::merge(&ctx.repo, branch, &subject)? {
        MergeOutcome::Clean => {
            let pushed = push_current(ctx)?;
            if ctx.cli.json {
                print_json(&serde_json::json!({
                    "subject": subject,
                    "merged": true,
                    "conflicts": [],
                    "pushed": pushed,
                }));
            } else {
                println!("Merged: {subject}");
                report_push(pushed);
            }
        }
        MergeOutcome::Conflicted { files } => {
            if ctx.cli.json {
                let conflicts: Vec<String> =
                    files.iter().map(|f| f.display().to_string()).collect();
                print_json(&serde_json::json!({
                    "subject": subject,
                    "merged": false,
                    "conflicts": conflicts,
                    "pushed": false,
                }));
            } else {
                println!("Merge of '{branch}' stopped on conflicts:");
                for file in &files {
                    println!("  {}", file.display());
                }
                println!();
                println!("Resolve them, then finish with:");
                println!("  git commit -m \"{subject}\"");
                println!("Or back out with:");
                println!("  git merge --abort");
            }
        }
    }
    Ok(())
}

fn handle_sessions(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    ensure_repo(ctx)?;

    let sessions = aggregate_sessions(&git::log_all(&ctx.repo)?);
    if sessions.is_empty() {
        println!("No sessions found in commit history.");
        return Ok(());
    }
    if ctx.cli.json {
        println!("{}", output_session_json(&sessions));
    } else {
        print_session_table(&sessions, ctx.cli.use_color());
    }
    Ok(())
}

fn handle_stop(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let session_id = ctx.store.session_id()?;
    let logged = match &session_id {
        Some(id) => ctx.log.session_total(id)?,
        None => 0,
    };
    ctx.store.clear()?;

    if ctx.cli.json {
        print_json(&serde_json::json!({
            "session_id": session_id,
            "logged_seconds": logged,
        }));
    } else {
        match session_id {
            Some(id) => println!("Stopped session {id} ({} logged).", format_hms(logged)),
            None => println!("No session in progress."),
        }
    }
    Ok(())
}

/// Push the current branch, setting the upstream on first push. Returns
/// whether a push happened.
fn push_current(ctx: &CommandContext<'_>) -> Result<bool, AppError> {
    if ctx.cli.no_push {
        return Ok(false);
    }
    if git::has_upstream(&ctx.repo)? {
        git::push(&ctx.repo)?;
    } else {
        let remote = ctx.config.remote.as_deref().unwrap_or(DEFAULT_REMOTE);
        let branch = git::current_branch(&ctx.repo)?;
        git::push_set_upstream(&ctx.repo, remote, &branch)?;
    }
    Ok(true)
}

fn report_push(pushed: bool) {
    if pushed {
        println!("Pushed.");
    } else {
        println!("Push skipped.");
    }
}

/// Branches containing any recovered commit, deduplicated and sorted
fn collect_branches(
    ctx: &CommandContext<'_>,
    sessions: &[SessionStats],
) -> Result<Vec<String>, AppError> {
    let mut branches = BTreeSet::new();
    for session in sessions {
        for hash in &session.hashes {
            for branch in git::branches_containing(&ctx.repo, hash)? {
                branches.insert(branch);
            }
        }
    }
    Ok(branches.into_iter().collect())
}
