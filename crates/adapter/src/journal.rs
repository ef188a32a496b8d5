//! JSON-lines contest journal.

use std::fs::{File, OpenOptions};
use std::io::Write;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tetcon_core::Score;
use tetcon_engine::ContestLog;
use tetcon_types::Event;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub pieces: u32,
    pub lines: u32,
    pub lines_by_clear: [u32; 4],
    pub penalties: u32,
    pub spots_inc: u32,
    pub spots_dec: u32,
    pub piece_ratio: u32,
    pub line_ratio: u32,
    pub recover_ratio: u32,
}

impl From<&Score> for ScoreSummary {
    fn from(score: &Score) -> Self {
        Self {
            pieces: score.pieces(),
            lines: score.lines(),
            lines_by_clear: [1, 2, 3, 4].map(|n| score.line_tally(n)),
            penalties: score.penalties(),
            spots_inc: score.spots_inc(),
            spots_dec: score.spots_dec(),
            piece_ratio: score.piece_ratio(),
            line_ratio: score.line_ratio(),
            recover_ratio: score.recover_ratio(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JournalRecord {
    Event {
        round: u32,
        frame: u64,
        player: String,
        event: String,
        bits: u32,
    },
    Round {
        round: u32,
        player: String,
        score: ScoreSummary,
    },
}

/// Writes one JSON record per line. The first write failure disables the
/// journal; the contest keeps running.
pub struct Journal<W: Write = File> {
    out: Option<W>,
    buf: Vec<u8>,
    label: String,
}

impl Journal<File> {
    pub fn open(path: &str) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening journal {path}"))?;
        Ok(Self::new(file, path))
    }
}

impl<W: Write> Journal<W> {
    pub fn new(out: W, label: impl Into<String>) -> Self {
        Self {
            out: Some(out),
            buf: Vec::with_capacity(256),
            label: label.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.out.is_some()
    }

    pub fn get_ref(&self) -> Option<&W> {
        self.out.as_ref()
    }

    pub fn write(&mut self, record: &JournalRecord) {
        let Some(out) = self.out.as_mut() else {
            return;
        };

        self.buf.clear();
        if serde_json::to_writer(&mut self.buf, record).is_err() {
            return;
        }
        self.buf.push(b'\n');
        if let Err(e) = out.write_all(&self.buf).and_then(|_| out.flush()) {
            eprintln!("[Journal] disabled after write error on {}: {}", self.label, e);
            self.out = None;
        }
    }
}

impl<W: Write> ContestLog for Journal<W> {
    fn on_event(&mut self, round: u32, frame: u64, player: &str, event: Event) {
        self.write(&JournalRecord::Event {
            round,
            frame,
            player: player.to_string(),
            event: event.to_string(),
            bits: event.bits(),
        });
    }

    fn on_round_end(&mut self, round: u32, player: &str, score: &Score) {
        self.write(&JournalRecord::Round {
            round,
            player: player.to_string(),
            score: ScoreSummary::from(score),
        });
    }
}
