//! Playfield module - the per-frame match state machine
//!
//! A [`Playfield`] owns one participant's field, RNG, current and next piece
//! and score, and advances them one frame per [`Playfield::tick`]:
//!
//! ```text
//! NotPlaying --start_game--> Prep --> Fall --(land)--> Check --> Prep ...
//!                                                        |
//!                                                        +--> LineOut --> Prep ...
//! Prep (spawn blocked) or quota reached --> GameOver --> NotPlaying
//! ```
//!
//! Every decision routine call goes through one guarded call site. An `Err`
//! or a panic from the routine costs [`PENALTY_ON_EXCEPTION`] and
//! disqualifies the participant on the spot.

use std::panic::{self, AssertUnwindSafe};

use tetcon_types::{
    Event, Size, GRAVITY_UNIT, LAND_BONUS_FRAME, PENALTY_ON_EXCEPTION, PIECES_PER_ROUND,
};

use crate::field::Field;
use crate::piece::{Piece, PieceFactory};
use crate::player::{Player, PlayerFault};
use crate::rng::Xorshift128;
use crate::score::Score;

/// Match phase of a playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sequence {
    #[default]
    NotPlaying,
    /// The next piece is promoted and enters the field.
    Prep,
    /// The piece is falling and can be steered.
    Fall,
    /// The piece locked; look for full rows.
    Check,
    /// Full rows are being removed.
    LineOut,
    /// Final notification of the routine.
    GameOver,
}

impl Sequence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sequence::NotPlaying => "not_playing",
            Sequence::Prep => "prep",
            Sequence::Fall => "fall",
            Sequence::Check => "check",
            Sequence::LineOut => "line_out",
            Sequence::GameOver => "game_over",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Playfield {
    rng: Xorshift128,
    seq: Sequence,
    seq_frame: u32,
    /// Gravity accumulated since the last drop, in tenths of a row.
    hover: u32,
    /// Landing grace timer; 0 while airborne.
    land: u32,
    spot_count: u32,
    next_event: Event,
    field: Field,
    factory: PieceFactory,
    ctrl: Piece,
    next: Piece,
    score: Score,
    ended: bool,
    last_fault: Option<PlayerFault>,
}

impl Playfield {
    pub fn new(width: i32, height: i32, gravity: u32) -> Self {
        let field = Field::new(width, height, gravity);
        let factory = field.piece_factory();
        Self {
            rng: Xorshift128::new(0),
            seq: Sequence::NotPlaying,
            seq_frame: 0,
            hover: 0,
            land: 0,
            spot_count: 0,
            next_event: Event::NONE,
            ctrl: factory.invalid(),
            next: factory.invalid(),
            field,
            factory,
            score: Score::new(),
            ended: false,
            last_fault: None,
        }
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn field_size(&self) -> Size {
        self.field.size()
    }

    /// The piece under control; `Void` while none is.
    pub fn ctrl_piece(&self) -> &Piece {
        &self.ctrl
    }

    /// The queued piece; `Void` during the prep frame.
    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    pub fn is_playing(&self) -> bool {
        self.seq != Sequence::NotPlaying
    }

    pub fn sequence(&self) -> Sequence {
        self.seq
    }

    /// Consecutive frames spent in the current sequence.
    pub fn seq_frame(&self) -> u32 {
        self.seq_frame
    }

    /// Buried holes after the last locked piece.
    pub fn spot_count(&self) -> u32 {
        self.spot_count
    }

    /// The fault that disqualified this participant, if any.
    pub fn last_fault(&self) -> Option<&PlayerFault> {
        self.last_fault.as_ref()
    }

    pub fn give_penalty(&mut self, penalty: u32, disqualify: bool) {
        self.score.add_penalties(penalty);
        if disqualify {
            self.seq = Sequence::NotPlaying;
        }
    }

    fn fault(&mut self, player: &mut dyn Player, fault: PlayerFault) -> Event {
        self.last_fault = Some(fault);
        self.give_penalty(PENALTY_ON_EXCEPTION, true);
        // A disqualified routine still hears about its final score once;
        // a second failure there changes nothing.
        let _ = panic::catch_unwind(AssertUnwindSafe(|| self.end_game(player)));
        Event::GAME_OVER
    }

    /// Start a round with a copy of `rng`. Does nothing while already playing.
    ///
    /// Returns `GAME_OVER` when the routine faults during its start
    /// notification, else an empty event.
    pub fn start_game(&mut self, rng: &Xorshift128, player: &mut dyn Player) -> Event {
        if self.is_playing() {
            return Event::NONE;
        }

        self.rng = *rng;
        self.seq = Sequence::Prep;
        self.seq_frame = 0;
        self.hover = 0;
        self.land = 0;
        self.next_event = Event::NONE;
        self.spot_count = 0;
        self.ended = false;
        self.last_fault = None;
        self.field.start_game();
        self.ctrl = self.factory.randomize(&mut self.rng);
        self.next = self.factory.randomize(&mut self.rng);
        self.score.clear();

        let field = &self.field;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| player.start_game(field)));
        match outcome {
            Ok(Ok(())) => Event::NONE,
            Ok(Err(fault)) => self.fault(player, fault),
            Err(payload) => self.fault(player, PlayerFault::from_panic(payload)),
        }
    }

    /// Advance one frame.
    ///
    /// Returns the major event of the frame: `GAME_OVER` or `ROUND_OVER` when
    /// the participant's round ends, else an empty event.
    pub fn tick(&mut self, player: &mut dyn Player) -> Event {
        let before = self.seq;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.step(player)));
        let (seq, evt) = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(fault)) => return self.fault(player, fault),
            Err(payload) => return self.fault(player, PlayerFault::from_panic(payload)),
        };
        self.seq = seq;
        self.seq_frame = if before == seq { self.seq_frame + 1 } else { 0 };
        evt
    }

    fn step(&mut self, player: &mut dyn Player) -> Result<(Sequence, Event), PlayerFault> {
        match self.seq {
            Sequence::NotPlaying => Ok((Sequence::NotPlaying, Event::NONE)),
            Sequence::Prep => self.tick_prep(player).map(|seq| (seq, Event::NONE)),
            Sequence::Fall => self.tick_fall(player).map(|seq| (seq, Event::NONE)),
            Sequence::Check => Ok((self.tick_check(), Event::NONE)),
            Sequence::LineOut => Ok((self.tick_line_out(), Event::NONE)),
            Sequence::GameOver => self.tick_game_over(player),
        }
    }

    fn exec(&mut self, player: &mut dyn Player, phase: Event) -> Result<(), PlayerFault> {
        let event = (self.next_event & Event::MASK_PRE) | phase;
        let requested = player.exec(event, &self.field, &self.ctrl, &self.next)?;
        self.next_event = requested & Event::INPUT;
        Ok(())
    }

    /// Drop both halves of an opposed request pair.
    fn cancel_opposed(&mut self, pair: Event) {
        if self.next_event.contains(pair) {
            self.next_event.remove(pair);
        }
    }

    fn is_resting(&self) -> bool {
        !self.field.can_place(&self.ctrl.move_y(-1))
    }

    fn tick_prep(&mut self, player: &mut dyn Player) -> Result<Sequence, PlayerFault> {
        self.ctrl = self.next;
        self.next = self.factory.invalid();
        self.score.add_pieces();

        self.exec(player, Event::PREP)?;

        self.next = self.factory.randomize(&mut self.rng);

        // The piece is still above the ceiling, so this turn is never blocked.
        self.cancel_opposed(Event::ROT);
        if self.next_event.intersects(Event::ROT) {
            let steps = if self.next_event.contains(Event::ROT_L) { 1 } else { -1 };
            self.ctrl = self.ctrl.rotate(steps);
        }

        self.ctrl = self.ctrl.move_y(self.ctrl.top_ofs());
        if !self.field.can_place(&self.ctrl) {
            self.next_event |= Event::GAME_OVER;
            self.field.place(&self.ctrl);
            self.ctrl = self.factory.invalid();
            self.end_game(player);
            return Ok(Sequence::GameOver);
        }

        self.hover = 0;
        self.land = 0;

        // High gravity: one extra row per full gravity unit above 1G.
        for _ in (GRAVITY_UNIT..self.field.gravity()).step_by(GRAVITY_UNIT as usize) {
            let lower = self.ctrl.move_y(-1);
            if !self.field.can_place(&lower) {
                break;
            }
            self.ctrl = lower;
        }

        if self.is_resting() {
            self.next_event |= Event::LAND;
            self.land = 1;
        }
        Ok(Sequence::Fall)
    }

    fn tick_fall(&mut self, player: &mut dyn Player) -> Result<Sequence, PlayerFault> {
        self.exec(player, Event::FALL)?;

        self.cancel_opposed(Event::ROT);
        if self.next_event.intersects(Event::ROT) {
            let steps = if self.next_event.contains(Event::ROT_L) { 1 } else { -1 };
            let turned = self.ctrl.rotate(steps);
            if self.field.can_place(&turned) {
                self.ctrl = turned;
            } else {
                self.next_event |= (self.next_event & Event::ROT).feedback();
            }
        }

        self.cancel_opposed(Event::MOVE);
        if self.next_event.intersects(Event::MOVE) {
            let dx = if self.next_event.contains(Event::MOVE_L) { 1 } else { -1 };
            let shifted = self.ctrl.move_x(dx);
            if self.field.can_place(&shifted) {
                self.ctrl = shifted;
            } else {
                self.next_event |= (self.next_event & Event::MOVE).feedback();
            }
        }

        let gravity = self.field.gravity();
        self.hover += gravity;
        if self.hover >= GRAVITY_UNIT || self.land >= LAND_BONUS_FRAME {
            for step in (0..gravity.max(1)).step_by(GRAVITY_UNIT as usize) {
                let lower = self.ctrl.move_y(-1);
                if !self.field.can_place(&lower) {
                    if step == 0 {
                        if self.land >= LAND_BONUS_FRAME {
                            self.next_event |= Event::LAND;
                        } else {
                            self.land += 1;
                        }
                    }
                    break;
                }
                self.ctrl = lower;
                self.hover = 0;
                self.land = 0;
            }
            if self.land == 0 && self.is_resting() {
                self.land = 1;
            }
        } else if self.land > 0 {
            self.land += 1;
        }

        if self.next_event.contains(Event::LAND) {
            self.field.place(&self.ctrl);
            self.ctrl = self.factory.invalid();
            return Ok(Sequence::Check);
        }
        Ok(Sequence::Fall)
    }

    fn tick_check(&mut self) -> Sequence {
        if self.field.count_filled_lines() > 0 {
            return Sequence::LineOut;
        }
        self.update_spots();
        self.after_piece()
    }

    fn tick_line_out(&mut self) -> Sequence {
        self.score.add_lines(self.field.count_filled_lines());
        self.field.remove_filled_lines();
        self.update_spots();
        self.after_piece()
    }

    fn tick_game_over(&mut self, player: &mut dyn Player) -> Result<(Sequence, Event), PlayerFault> {
        let round_over = self.quota_reached();
        let mut phase = Event::GAME_OVER;
        let evt = if round_over {
            phase |= Event::ROUND_OVER;
            Event::ROUND_OVER
        } else {
            Event::GAME_OVER
        };

        self.exec(player, phase)?;
        self.next_event = Event::NONE;
        if round_over {
            self.end_game(player);
        }
        Ok((Sequence::NotPlaying, evt))
    }

    fn update_spots(&mut self) {
        let spots = self.field.count_spots();
        self.score.add_spots(self.spot_count, spots);
        self.spot_count = spots;
    }

    fn quota_reached(&self) -> bool {
        self.score.pieces() >= PIECES_PER_ROUND
    }

    fn after_piece(&self) -> Sequence {
        if self.quota_reached() {
            Sequence::GameOver
        } else {
            Sequence::Prep
        }
    }

    fn end_game(&mut self, player: &mut dyn Player) {
        if !self.ended {
            self.ended = true;
            player.end_game(&self.score);
        }
    }
}
