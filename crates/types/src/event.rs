//! Event flag word exchanged with decision routines every frame.
//!
//! Three tiers share one `u32`:
//!
//! - **Input** (bits 0-3): moves and rotations requested by a routine.
//! - **Feedback** (bits 8-11): the same request, shifted up by 8, raised by the
//!   engine when the request collided and was dropped.
//! - **Sequence** (bits 12-15, 29-31): which phase of the frame protocol the
//!   routine is being called for, plus round/game end markers.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Event(u32);

impl Event {
    pub const NONE: Event = Event(0);

    pub const MOVE_L: Event = Event(1 << 0);
    pub const MOVE_R: Event = Event(1 << 1);
    pub const ROT_L: Event = Event(1 << 2);
    pub const ROT_R: Event = Event(1 << 3);

    pub const MOVE_L_BLOCKED: Event = Event(1 << 8);
    pub const MOVE_R_BLOCKED: Event = Event(1 << 9);
    pub const ROT_L_BLOCKED: Event = Event(1 << 10);
    pub const ROT_R_BLOCKED: Event = Event(1 << 11);

    /// A new piece is about to enter the field.
    pub const PREP: Event = Event(1 << 12);
    /// The controlled piece is falling.
    pub const FALL: Event = Event(1 << 13);
    /// The controlled piece touches a surface.
    pub const LAND: Event = Event(1 << 14);
    /// The previous input was penalized.
    pub const PENALTY: Event = Event(1 << 15);
    /// The piece quota of the round was reached.
    pub const ROUND_OVER: Event = Event(1 << 29);
    /// Reserved for versus play.
    pub const OPPONENT: Event = Event(1 << 30);
    pub const GAME_OVER: Event = Event(1 << 31);

    pub const MOVE: Event = Event(Self::MOVE_L.0 | Self::MOVE_R.0);
    pub const ROT: Event = Event(Self::ROT_L.0 | Self::ROT_R.0);
    /// Everything a decision routine may request.
    pub const INPUT: Event = Event(0x0000_00FF);
    /// Bits carried over into the next frame before its sequence flag is set.
    pub const MASK_PRE: Event =
        Event(0xFFFF_FF00 & !Self::PREP.0 & !Self::FALL.0 & !Self::LAND.0);

    pub const fn from_bits(bits: u32) -> Self {
        Event(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// All bits of `other` are set.
    pub const fn contains(self, other: Event) -> bool {
        self.0 & other.0 == other.0
    }

    /// At least one bit of `other` is set.
    pub const fn intersects(self, other: Event) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Event) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Event) {
        self.0 &= !other.0;
    }

    /// Feedback flags matching the input bits of `self`.
    pub const fn feedback(self) -> Event {
        Event((self.0 & Self::INPUT.0 & (Self::MOVE.0 | Self::ROT.0)) << 8)
    }

    /// Names of the set flags, in bit order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        EVENT_NAMES
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
    }
}

static EVENT_NAMES: [(Event, &str); 15] = [
    (Event::MOVE_L, "MOVE_L"),
    (Event::MOVE_R, "MOVE_R"),
    (Event::ROT_L, "ROT_L"),
    (Event::ROT_R, "ROT_R"),
    (Event::MOVE_L_BLOCKED, "nMOVE_L"),
    (Event::MOVE_R_BLOCKED, "nMOVE_R"),
    (Event::ROT_L_BLOCKED, "nROT_L"),
    (Event::ROT_R_BLOCKED, "nROT_R"),
    (Event::PREP, "PREP"),
    (Event::FALL, "FALL"),
    (Event::LAND, "LAND"),
    (Event::PENALTY, "PENALTY"),
    (Event::ROUND_OVER, "ROUND_OVER"),
    (Event::OPPONENT, "OPPONENT"),
    (Event::GAME_OVER, "GAME_OVER"),
];

impl BitOr for Event {
    type Output = Event;
    fn bitor(self, rhs: Event) -> Event {
        Event(self.0 | rhs.0)
    }
}

impl BitAnd for Event {
    type Output = Event;
    fn bitand(self, rhs: Event) -> Event {
        Event(self.0 & rhs.0)
    }
}

impl Not for Event {
    type Output = Event;
    fn not(self) -> Event {
        Event(!self.0)
    }
}

impl BitOrAssign for Event {
    fn bitor_assign(&mut self, rhs: Event) {
        self.0 |= rhs.0;
    }
}

impl BitAndAssign for Event {
    fn bitand_assign(&mut self, rhs: Event) {
        self.0 &= rhs.0;
    }
}

impl From<u32> for Event {
    fn from(bits: u32) -> Self {
        Event(bits)
    }
}

impl From<Event> for u32 {
    fn from(event: Event) -> u32 {
        event.0
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("0");
        }
        let mut first = true;
        for name in self.names() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(name)?;
            first = false;
        }
        if first {
            write!(f, "{:#010x}", self.0)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_values() {
        assert_eq!(Event::MOVE_L.bits(), 0x1);
        assert_eq!(Event::MOVE_R.bits(), 0x2);
        assert_eq!(Event::ROT_L.bits(), 0x4);
        assert_eq!(Event::ROT_R.bits(), 0x8);
        assert_eq!(Event::MOVE_L_BLOCKED.bits(), 0x100);
        assert_eq!(Event::ROT_R_BLOCKED.bits(), 0x800);
        assert_eq!(Event::PREP.bits(), 0x1000);
        assert_eq!(Event::FALL.bits(), 0x2000);
        assert_eq!(Event::LAND.bits(), 0x4000);
        assert_eq!(Event::PENALTY.bits(), 0x8000);
        assert_eq!(Event::ROUND_OVER.bits(), 0x2000_0000);
        assert_eq!(Event::OPPONENT.bits(), 0x4000_0000);
        assert_eq!(Event::GAME_OVER.bits(), 0x8000_0000);
    }

    #[test]
    fn test_mask_pre_strips_input_and_phase() {
        let carried = Event::INPUT
            | Event::PREP
            | Event::FALL
            | Event::LAND
            | Event::MOVE_R_BLOCKED
            | Event::GAME_OVER;
        let masked = carried & Event::MASK_PRE;
        assert_eq!(masked, Event::MOVE_R_BLOCKED | Event::GAME_OVER);
        assert_eq!(Event::MASK_PRE.bits(), 0xFFFF_8F00);
    }

    #[test]
    fn test_feedback_shift() {
        assert_eq!(Event::MOVE_L.feedback(), Event::MOVE_L_BLOCKED);
        assert_eq!(Event::ROT_R.feedback(), Event::ROT_R_BLOCKED);
        assert_eq!((Event::PREP | Event::MOVE_R).feedback(), Event::MOVE_R_BLOCKED);
    }

    #[test]
    fn test_contains_and_intersects() {
        let ev = Event::FALL | Event::MOVE_L;
        assert!(ev.contains(Event::FALL));
        assert!(!ev.contains(Event::FALL | Event::LAND));
        assert!(ev.intersects(Event::MOVE));
        assert!(!ev.intersects(Event::ROT));
    }

    #[test]
    fn test_insert_remove() {
        let mut ev = Event::NONE;
        ev.insert(Event::ROT);
        assert_eq!(ev, Event::ROT);
        ev.remove(Event::ROT_L);
        assert_eq!(ev, Event::ROT_R);
    }

    #[test]
    fn test_display() {
        assert_eq!(Event::NONE.to_string(), "0");
        assert_eq!((Event::PREP | Event::MOVE_L).to_string(), "MOVE_L|PREP");
        assert_eq!(Event::from_bits(1 << 20).to_string(), "0x00100000");
    }
}
