//! tetcon runner (default binary).
//!
//! Plays a contest between built-in decision routines and writes one report
//! line per round. Settings come from flags, then `TETCON_*` variables, then
//! built-in defaults.

use std::io;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::tty::IsTty;

use tetcon::adapter::{EnvConfig, FileReport, Journal, StdoutReport};
use tetcon::engine::rules::{DEFAULT_REPORT, DEFAULT_RULE, DEFAULT_VIEW};
use tetcon::engine::{GameControl, ReportSink, RuleConfig, ViewConfig, BUILTIN_PLAYERS};
use tetcon::term::ConsoleView;

/// Deterministic Tetris contest referee.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Rule options, e.g. `RULE=LONGRUN&W=10&H=18&G=10&R=10`.
    #[arg(long)]
    rule: Option<String>,

    /// View options, e.g. `W=79&H=25&S=1` (S = frames per drawn frame).
    #[arg(long)]
    view: Option<String>,

    /// Report file; `<yymmdd>` and `<hhmmss>` become the start time. `-` prints
    /// the reports on stdout.
    #[arg(long)]
    report: Option<String>,

    /// Fixed seed for the piece sequence of every round.
    #[arg(long)]
    seed: Option<u32>,

    /// Append a JSON-lines journal of contest events to this file.
    #[arg(long)]
    log: Option<String>,

    /// Directory the routines read their settings from.
    #[arg(long, default_value = ".")]
    work_path: String,

    /// Run without the console view.
    #[arg(long)]
    headless: bool,

    /// Decision routines to enter, in seat order.
    #[arg(required = true, value_name = "ROUTINE")]
    players: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::from_env();

    let rule_line = args.rule.or(env.rule).unwrap_or_else(|| DEFAULT_RULE.to_string());
    let view_line = args.view.or(env.view).unwrap_or_else(|| DEFAULT_VIEW.to_string());
    let report_dst = args
        .report
        .or(env.report)
        .unwrap_or_else(|| DEFAULT_REPORT.to_string());
    let seed = args.seed.or(env.seed);
    let log_path = args.log.or(env.log_path);

    let rule = RuleConfig::parse(&rule_line).context("refusing to start with this rule")?;
    let view = ViewConfig::parse(&view_line).context("refusing to start with this view")?;

    eprintln!("tetcon {}", env!("CARGO_PKG_VERSION"));
    eprintln!("[Contest] rule: {}", rule);
    eprintln!("[Contest] routines available: {}", BUILTIN_PLAYERS.join(", "));

    let sink: Box<dyn ReportSink> = if report_dst == "-" {
        Box::new(StdoutReport)
    } else {
        let report = FileReport::new(&report_dst);
        eprintln!("[Report] writing to {}", report.path().display());
        Box::new(report)
    };

    let interactive = !args.headless && io::stdout().is_tty();
    let mut contest = GameControl::new(rule, view)
        .with_sink(sink)
        .with_work_path(&args.work_path)
        .quiet(interactive);
    if let Some(seed) = seed {
        contest = contest.with_seed(seed);
    }
    if let Some(path) = log_path {
        contest = contest.with_log(Box::new(Journal::open(&path)?));
    }
    for name in &args.players {
        contest
            .add_player(name)
            .with_context(|| format!("cannot enter routine {name:?}"))?;
    }
    if interactive {
        contest = contest.with_view(Box::new(ConsoleView::enter(&view)?));
    }

    let started = Instant::now();
    let result = contest.run();
    // Drops the console view, which restores the terminal.
    drop(contest);
    let reports = result?;

    let secs = started.elapsed().as_secs();
    eprintln!(
        "[Contest] {} round(s) in {:02}h {:02}m {:02}s",
        reports.len(),
        secs / 3600,
        secs / 60 % 60,
        secs % 60
    );
    Ok(())
}
