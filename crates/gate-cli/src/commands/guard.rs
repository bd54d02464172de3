//! `gate guard`: the interactive check-in terminal.
//!
//! Pass text and guard choices share stdin. A keyboard-wedge scanner types
//! the pass as one line; the guard answers the prompt that follows.

mod display;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use gate_core::clock::{Clock, SystemClock};
use gate_core::enums::{CheckInState, VerdictKind};
use gate_guard::machine::LoggedEntry;
use gate_guard::transport::SharedLines;
use gate_guard::{CheckInSession, GuardError, LineScanner, Notes, TransportError};
use gate_store::query::count_on_day;
use gate_store::{LogBackend, LogStore};
use tokio::io::{BufReader, Stdin};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::GuardArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

type Input = BufReader<Stdin>;
type Session = CheckInSession<LogBackend, Notes, SystemClock>;

enum Wait<T> {
    Done(T),
    Interrupted,
}

/// Handle `gate guard`.
pub async fn handle(args: &GuardArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut scanner = LineScanner::new(BufReader::new(tokio::io::stdin()));
    let lines = scanner.lines();
    let mut session: Session = CheckInSession::new(
        Arc::clone(&ctx.store),
        Arc::clone(&ctx.notes),
        Arc::new(SystemClock),
    );

    if !flags.quiet {
        eprintln!(
            "Gate guard terminal at {} ({})",
            ctx.project_root.display(),
            ctx.store.describe()
        );
    }
    session.start_scan(&mut scanner)?;
    let mut logged = 0usize;

    loop {
        match session.state() {
            CheckInState::Idle => match prompt(&lines, "[s]can  [q]uit").await?.as_deref() {
                Some("s") => session.start_scan(&mut scanner)?,
                Some("q") | None => break,
                _ => {}
            },
            CheckInState::Scanning => {
                if !scan(&mut session).await? {
                    break;
                }
            }
            CheckInState::Reviewing => review(&mut session, &lines).await?,
            CheckInState::Confirming => {
                if let Some(entry) = settle(&mut session).await? {
                    logged += 1;
                    output(&entry, flags.format)?;
                    if args.once {
                        break;
                    }
                }
            }
            CheckInState::Logged => {
                match prompt(&lines, "[n]ext visitor  [t]oday's count  [q]uit")
                    .await?
                    .as_deref()
                {
                    Some("n") => session.scan_next(&mut scanner)?,
                    Some("t") => {
                        let today = Local::now().date_naive();
                        let records = ctx.store.list_all().await?;
                        eprintln!("{} check-ins today", count_on_day(&records, today, &Local));
                    }
                    Some("q") | None => break,
                    _ => {}
                }
            }
        }
    }

    session.cancel().await?;
    if !flags.quiet {
        eprintln!("Guard session ended, {logged} check-in(s) logged.");
    }
    Ok(())
}

/// Wait for one scan. Returns `false` when the input has ended.
async fn scan(session: &mut Session) -> anyhow::Result<bool> {
    if let Some(fault) = session.transport_fault() {
        eprintln!("Scanner stopped: {fault}");
        return Ok(false);
    }

    eprintln!("Waiting for a pass scan (Ctrl-C to cancel)...");
    let step = tokio::select! {
        verdict = session.await_decode() => Wait::Done(verdict.cloned()),
        _ = tokio::signal::ctrl_c() => Wait::Interrupted,
    };

    match step {
        Wait::Interrupted => {
            session.cancel().await?;
            eprintln!("Scan cancelled.");
            Ok(true)
        }
        Wait::Done(Ok(verdict)) => {
            let now = SystemClock.now_millis();
            eprintln!("{}", display::verdict_card(&verdict, now, &Local));
            Ok(true)
        }
        Wait::Done(Err(GuardError::Transport(TransportError::Closed))) => Ok(false),
        Wait::Done(Err(error)) => Err(error.into()),
    }
}

async fn review(session: &mut Session, lines: &SharedLines<Input>) -> anyhow::Result<()> {
    let Some(review) = session.review() else {
        return Ok(());
    };
    if let Some(error) = &review.last_error {
        eprintln!("Not saved: {error}");
    }
    let choices = match review.verdict.kind() {
        VerdictKind::Valid => "[c]onfirm entry  [x] cancel",
        VerdictKind::Expired => "[e] log as EXPIRED anyway  [x] cancel",
        VerdictKind::Malformed => "[x] dismiss",
    };

    let started = match prompt(lines, choices).await?.as_deref() {
        Some("c") => session.begin_confirm(),
        Some("e") => session.begin_confirm_expired(),
        Some("x") | None => return Ok(session.cancel().await?),
        _ => return Ok(()),
    };
    match started {
        Ok(()) => Ok(()),
        Err(GuardError::Rejected(reason)) => {
            eprintln!("{reason}");
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}

/// Wait for the in-flight write. Ctrl-C cannot interrupt it.
async fn settle(session: &mut Session) -> anyhow::Result<Option<LoggedEntry>> {
    let spinner = Progress::spinner("Saving check-in...");
    let settled = loop {
        tokio::select! {
            entry = session.settle() => break entry.cloned(),
            _ = tokio::signal::ctrl_c() => {
                spinner.set_message("Saving check-in... (cannot cancel while saving)");
            }
        }
    };

    match settled {
        Ok(entry) => {
            spinner.finish_clear();
            if let Some(reason) = &entry.receipt.degraded_reason {
                eprintln!("warning: remote log unavailable, saved locally ({reason})");
            }
            eprintln!("{}", display::logged_line(&entry.record, &Local));
            Ok(Some(entry))
        }
        Err(GuardError::Persistence(error)) => {
            spinner.finish_err(&format!("Not saved: {error}"));
            Ok(None)
        }
        Err(error) => Err(error.into()),
    }
}

/// Show `choices` and read one answer, lowercased. `None` on end of input or
/// Ctrl-C.
async fn prompt(lines: &SharedLines<Input>, choices: &str) -> anyhow::Result<Option<String>> {
    eprint!("{choices} > ");
    std::io::stderr().flush().ok();

    let mut lines = lines.lock().await;
    tokio::select! {
        line = lines.next_line() => {
            let line = line.context("failed to read guard input")?;
            Ok(line.map(|answer| answer.trim().to_ascii_lowercase()))
        }
        _ = tokio::signal::ctrl_c() => Ok(None),
    }
}
