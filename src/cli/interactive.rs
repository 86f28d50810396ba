//! Line-oriented conversion session.
//!
//! Mirrors the widget's controls: editing the amount only records it, while
//! picking a different currency re-runs the conversion straight away.

use super::convert::render_state;
use super::ui;
use crate::core::{InteractionState, Orchestrator, Side};
use anyhow::{Result, anyhow};
use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const HELP: &str = "\
Commands:
  amount <value>   set the amount (does not convert)
  from <CODE>      set the source currency
  to <CODE>        set the target currency
  swap             exchange source and target
  convert          convert with the current inputs
  show             print the current state
  help             print this help
  quit             leave the session";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Amount(String),
    Currency(Side, String),
    Swap,
    Convert,
    Show,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (verb, arg) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, arg)| (verb, arg.trim()));

        match (verb.to_lowercase().as_str(), arg) {
            ("amount", arg) => Ok(SessionCommand::Amount(arg.to_string())),
            ("from", code) if !code.is_empty() => {
                Ok(SessionCommand::Currency(Side::Source, code.to_string()))
            }
            ("to", code) if !code.is_empty() => {
                Ok(SessionCommand::Currency(Side::Target, code.to_string()))
            }
            ("swap", "") => Ok(SessionCommand::Swap),
            ("convert", "") => Ok(SessionCommand::Convert),
            ("show", "") => Ok(SessionCommand::Show),
            ("help", "") | ("?", "") => Ok(SessionCommand::Help),
            ("quit", "") | ("exit", "") => Ok(SessionCommand::Quit),
            _ => Err(anyhow!("Unknown command: {line} (type 'help')")),
        }
    }
}

type PendingConversions<'a> = FuturesUnordered<BoxFuture<'a, Option<InteractionState>>>;

fn write_prompt<W: Write>(orchestrator: &Orchestrator, out: &mut W) -> Result<()> {
    let state = orchestrator.snapshot();
    write!(out, "{} {} -> {}> ", state.amount, state.source, state.target)?;
    out.flush()?;
    Ok(())
}

/// Runs the session until `quit` or end of input.
///
/// Input keeps being read while conversions are in flight, so a quick second
/// currency change supersedes the first. End of input waits for pending
/// conversions; `quit` abandons them.
pub async fn run_session<R, W>(orchestrator: &Orchestrator, reader: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{HELP}")?;
    write_prompt(orchestrator, out)?;

    let mut lines = reader.lines();
    let mut pending = PendingConversions::new();
    let mut reading = true;
    while reading || !pending.is_empty() {
        tokio::select! {
            line = lines.next_line(), if reading => match line? {
                Some(line) => {
                    if !handle_line(orchestrator, &line, out, &mut pending)? {
                        break;
                    }
                }
                None => reading = false,
            },
            Some(finished) = pending.next(), if !pending.is_empty() => {
                // Superseded conversions resolve to None and print nothing
                if let Some(state) = finished {
                    write!(out, "{}", render_state(&state))?;
                    write_prompt(orchestrator, out)?;
                }
            }
        }
    }

    writeln!(out)?;
    Ok(())
}

/// Applies one input line. Returns `false` once the user quits.
fn handle_line<'a, W: Write>(
    orchestrator: &'a Orchestrator,
    line: &str,
    out: &mut W,
    pending: &mut PendingConversions<'a>,
) -> Result<bool> {
    if line.trim().is_empty() {
        write_prompt(orchestrator, out)?;
        return Ok(true);
    }

    let command = match line.parse::<SessionCommand>() {
        Ok(command) => command,
        Err(e) => {
            writeln!(out, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?;
            write_prompt(orchestrator, out)?;
            return Ok(true);
        }
    };
    debug!(?command, "Session command");

    match command {
        SessionCommand::Amount(text) => orchestrator.set_amount(&text),
        SessionCommand::Currency(side, code) => match orchestrator.select_currency(side, &code) {
            Ok(true) => pending.push(orchestrator.start_conversion()),
            Ok(false) => {}
            Err(e) if e.is_validation() => writeln!(
                out,
                "{}",
                ui::style_text(&e.user_message(), ui::StyleType::Error)
            )?,
            Err(e) => return Err(e.into()),
        },
        SessionCommand::Swap => {
            if orchestrator.swap_selection() {
                pending.push(orchestrator.start_conversion());
            }
        }
        SessionCommand::Convert => pending.push(orchestrator.start_conversion()),
        SessionCommand::Show => write!(out, "{}", render_state(&orchestrator.snapshot()))?,
        SessionCommand::Help => writeln!(out, "{HELP}")?,
        SessionCommand::Quit => return Ok(false),
    }

    write_prompt(orchestrator, out)?;
    Ok(true)
}

pub async fn run(orchestrator: &Orchestrator) -> Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_session(orchestrator, stdin, &mut stdout).await
}
