//! Round statistics and the derived ratios reported after each round.

use std::fmt;
use std::ops::AddAssign;

use tetcon_types::PIECES_PER_ROUND;

/// Cumulative counters of one participant.
///
/// `lines[0]` is the total number of cleared lines, `lines[n]` counts the
/// clears that removed `n` lines at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    rounds: u32,
    pieces: u32,
    lines: [u32; 5],
    penalties: u32,
    spots_inc: u32,
    spots_dec: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn touch(&mut self) {
        if self.rounds == 0 {
            self.rounds = 1;
        }
    }

    pub fn add_pieces(&mut self) {
        self.touch();
        self.pieces += 1;
    }

    /// Record a clear of `count` simultaneous lines. Only 1 to 4 count.
    pub fn add_lines(&mut self, count: u32) {
        self.touch();
        if (1..=4).contains(&count) {
            self.lines[0] += count;
            self.lines[count as usize] += 1;
        }
    }

    pub fn add_penalties(&mut self, penalty: u32) {
        self.touch();
        self.penalties += penalty;
    }

    /// Record a change of the buried-hole count.
    pub fn add_spots(&mut self, old: u32, new: u32) {
        self.touch();
        if new > old {
            self.spots_inc += 1;
        } else if new < old {
            self.spots_dec += 1;
        }
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn pieces(&self) -> u32 {
        self.pieces
    }

    /// Total cleared lines.
    pub fn lines(&self) -> u32 {
        self.lines[0]
    }

    /// Number of clears of exactly `count` lines (0 = total lines).
    pub fn line_tally(&self, count: usize) -> u32 {
        self.lines.get(count).copied().unwrap_or(0)
    }

    pub fn penalties(&self) -> u32 {
        self.penalties
    }

    pub fn spots_inc(&self) -> u32 {
        self.spots_inc
    }

    pub fn spots_dec(&self) -> u32 {
        self.spots_dec
    }

    /// Percentage (0-100) of the piece quota consumed without penalty.
    pub fn piece_ratio(&self) -> u32 {
        let pieces = self.pieces.min(PIECES_PER_ROUND);
        if pieces < self.penalties {
            return 0;
        }
        100 * (pieces - self.penalties) / PIECES_PER_ROUND
    }

    /// Average lines per clear, times 100 (0-400).
    pub fn line_ratio(&self) -> u32 {
        let clears: u32 = self.lines[1..].iter().sum();
        if clears == 0 {
            return 0;
        }
        100 * self.lines[0] / clears
    }

    /// Hole recoveries per hole creation, times 100.
    pub fn recover_ratio(&self) -> u32 {
        if self.spots_inc == 0 {
            return 0;
        }
        100 * self.spots_dec / self.spots_inc
    }

    /// The `P=..&L=..&...&RR=..` report fragment.
    pub fn report_string(&self) -> String {
        self.to_string()
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Score) {
        self.rounds += rhs.rounds;
        self.pieces += rhs.pieces;
        for (acc, add) in self.lines.iter_mut().zip(rhs.lines) {
            *acc += add;
        }
        self.penalties += rhs.penalties;
        self.spots_inc += rhs.spots_inc;
        self.spots_dec += rhs.spots_dec;
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P={}&L={}&L1={}&L2={}&L3={}&L4={}&X={}&SI={}&SD={}&PR={}&LR={}&RR={}",
            self.pieces,
            self.lines[0],
            self.lines[1],
            self.lines[2],
            self.lines[3],
            self.lines[4],
            self.penalties,
            self.spots_inc,
            self.spots_dec,
            self.piece_ratio(),
            self.line_ratio(),
            self.recover_ratio(),
        )
    }
}
