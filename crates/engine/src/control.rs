//! Contest controller.
//!
//! Runs `R` rounds over all registered participants. Every participant of a
//! round gets a copy of the same RNG, so they all see the same piece
//! sequence. Each frame ticks the participants in registration order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use tetcon_core::{Field, Piece, Player, Playfield, Score, Xorshift128};
use tetcon_types::Event;

use crate::players::{create_player, RegistryError};
use crate::report;
use crate::rules::{RuleConfig, ViewConfig};

/// Read-only view of one participant, handed to viewers.
#[derive(Clone, Copy)]
pub struct Entry<'a> {
    pub name: &'a str,
    pub playfield: &'a Playfield,
}

impl<'a> Entry<'a> {
    pub fn field(&self) -> &'a Field {
        self.playfield.field()
    }

    pub fn ctrl_piece(&self) -> &'a Piece {
        self.playfield.ctrl_piece()
    }

    pub fn next_piece(&self) -> &'a Piece {
        self.playfield.next_piece()
    }

    pub fn score(&self) -> &'a Score {
        self.playfield.score()
    }

    pub fn is_playing(&self) -> bool {
        self.playfield.is_playing()
    }
}

/// Presentation of a running contest.
pub trait ContestView {
    fn round_started(&mut self, round: u32);

    /// While true the contest does not advance.
    fn is_animating(&self) -> bool;

    fn draw(&mut self, round: u32, entries: &[Entry<'_>]) -> Result<()>;

    /// The viewer asked to stop the contest.
    fn quit_requested(&self) -> bool {
        false
    }
}

/// Headless viewer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl ContestView for NullView {
    fn round_started(&mut self, _round: u32) {}

    fn is_animating(&self) -> bool {
        false
    }

    fn draw(&mut self, _round: u32, _entries: &[Entry<'_>]) -> Result<()> {
        Ok(())
    }
}

/// Destination of round reports.
pub trait ReportSink {
    fn submit(&mut self, content: &str) -> Result<()>;
}

/// Keeps submitted reports in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryReport {
    pub lines: Vec<String>,
}

impl ReportSink for MemoryReport {
    fn submit(&mut self, content: &str) -> Result<()> {
        self.lines.push(content.to_string());
        Ok(())
    }
}

/// Observer of contest events, e.g. a journal file.
pub trait ContestLog {
    /// A participant produced a non-empty major event.
    fn on_event(&mut self, round: u32, frame: u64, player: &str, event: Event);

    fn on_round_end(&mut self, round: u32, player: &str, score: &Score);
}

struct Participant {
    playfield: Playfield,
    player: Box<dyn Player>,
}

enum Seed {
    Fixed(Xorshift128),
    Clock,
}

pub struct GameControl {
    rule: RuleConfig,
    view: ViewConfig,
    seed: Seed,
    work_path: PathBuf,
    host: String,
    participants: Vec<Participant>,
    instances: HashMap<String, usize>,
    queue: Vec<(usize, Event)>,
    frame: u64,
    quiet: bool,
    display: Box<dyn ContestView>,
    sink: Box<dyn ReportSink>,
    log: Option<Box<dyn ContestLog>>,
}

impl GameControl {
    /// A headless contest that keeps its reports in memory.
    pub fn new(rule: RuleConfig, view: ViewConfig) -> Self {
        Self {
            rule,
            view,
            seed: Seed::Clock,
            work_path: PathBuf::from("."),
            host: report::hostname(),
            participants: Vec::new(),
            instances: HashMap::new(),
            queue: Vec::new(),
            frame: 0,
            quiet: false,
            display: Box::new(NullView),
            sink: Box::new(MemoryReport::default()),
            log: None,
        }
    }

    /// Draw round RNGs from a fixed seed instead of the clock.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Seed::Fixed(Xorshift128::new(seed));
        self
    }

    pub fn with_view(mut self, display: Box<dyn ContestView>) -> Self {
        self.display = display;
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_log(mut self, log: Box<dyn ContestLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Directory built-in routines read their settings from.
    pub fn with_work_path(mut self, path: impl AsRef<Path>) -> Self {
        self.work_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Suppress `[Contest]` progress lines (e.g. while a console view owns
    /// the terminal).
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn rule(&self) -> &RuleConfig {
        &self.rule
    }

    pub fn view_config(&self) -> &ViewConfig {
        &self.view
    }

    /// Register a built-in routine by name.
    pub fn add_player(&mut self, name: &str) -> Result<(), RegistryError> {
        let key = name.to_ascii_lowercase();
        let instance_id = self.instances.get(&key).copied().unwrap_or(0);
        let player = create_player(name, &self.work_path, &self.rule, instance_id)?;
        self.instances.insert(key, instance_id + 1);
        self.add_boxed_player(player);
        Ok(())
    }

    /// Register an externally built routine.
    pub fn add_boxed_player(&mut self, player: Box<dyn Player>) {
        let playfield = Playfield::new(self.rule.width, self.rule.height, self.rule.gravity);
        self.participants.push(Participant { playfield, player });
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn playfield(&self, index: usize) -> Option<&Playfield> {
        self.participants.get(index).map(|p| &p.playfield)
    }

    pub fn player_name(&self, index: usize) -> Option<&str> {
        self.participants.get(index).map(|p| p.player.name())
    }

    /// Major events of the current round as `(participant, event)`.
    pub fn events(&self) -> &[(usize, Event)] {
        &self.queue
    }

    pub fn is_playing(&self) -> bool {
        self.participants.iter().any(|p| p.playfield.is_playing())
    }

    fn round_rng(&mut self) -> Xorshift128 {
        match &mut self.seed {
            Seed::Fixed(master) => Xorshift128::new(master.next_u32()),
            Seed::Clock => Xorshift128::from_clock(),
        }
    }

    fn record(&mut self, round: u32, index: usize, event: Event) {
        if event.is_empty() {
            return;
        }
        self.queue.push((index, event));
        if let Some(log) = self.log.as_mut() {
            let name = self.participants[index].player.name();
            log.on_event(round, self.frame, name, event);
        }
    }

    /// Start every participant on a fresh round.
    pub fn start_round(&mut self, round: u32) {
        let rng = self.round_rng();
        self.queue.clear();
        self.frame = 0;
        for index in 0..self.participants.len() {
            let p = &mut self.participants[index];
            let event = p.playfield.start_game(&rng, p.player.as_mut());
            self.record(round, index, event);
        }
        if !self.quiet {
            eprintln!(
                "[Contest] round {}/{} started ({} participants)",
                round,
                self.rule.rounds,
                self.participants.len()
            );
        }
    }

    /// Advance every participant by one frame.
    pub fn tick(&mut self, round: u32) {
        self.frame += 1;
        for index in 0..self.participants.len() {
            let p = &mut self.participants[index];
            let event = p.playfield.tick(p.player.as_mut());
            self.record(round, index, event);
        }
    }

    /// Header plus one entry per participant.
    pub fn round_report(&self, round: u32) -> String {
        let now = Local::now().naive_local();
        let header = report::header(&self.rule, &self.host, round, &now);
        report::round_report(
            &header,
            self.participants
                .iter()
                .map(|p| (p.player.as_ref(), p.playfield.score())),
        )
    }

    fn finish_round(&mut self, round: u32) -> Result<String> {
        let line = self.round_report(round);
        self.sink
            .submit(&line)
            .with_context(|| format!("submitting report of round {round}"))?;

        for p in &self.participants {
            if let Some(log) = self.log.as_mut() {
                log.on_round_end(round, p.player.name(), p.playfield.score());
            }
            if let Some(fault) = p.playfield.last_fault() {
                if !self.quiet {
                    eprintln!("[Contest] {} disqualified: {}", p.player.name(), fault);
                }
            }
        }
        if !self.quiet {
            eprintln!("[Contest] round {} over after {} frames", round, self.frame);
        }
        Ok(line)
    }

    fn draw(&mut self, round: u32) -> Result<()> {
        let entries: Vec<Entry<'_>> = self
            .participants
            .iter()
            .map(|p| Entry {
                name: p.player.name(),
                playfield: &p.playfield,
            })
            .collect();
        self.display.draw(round, &entries)
    }

    /// Play all rounds. Returns the report line of every finished round.
    ///
    /// Stops early, without an error, when the viewer asks to quit.
    pub fn run(&mut self) -> Result<Vec<String>> {
        let mut reports = Vec::with_capacity(self.rule.rounds as usize);
        let skip = self.view.skip_frames.max(1);

        for round in 1..=self.rule.rounds {
            self.start_round(round);
            self.display.round_started(round);

            while self.is_playing() {
                if self.display.quit_requested() {
                    if !self.quiet {
                        eprintln!("[Contest] stopped by viewer in round {}", round);
                    }
                    return Ok(reports);
                }
                if !self.display.is_animating() {
                    for _ in 0..skip {
                        self.tick(round);
                    }
                }
                self.draw(round)?;
            }
            self.draw(round)?;
            reports.push(self.finish_round(round)?);
        }
        Ok(reports)
    }
}
