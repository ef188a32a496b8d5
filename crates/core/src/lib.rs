//! Core referee logic - pure, deterministic, and testable
//!
//! This crate holds the whole rule set of the contest engine. It does no I/O
//! and never touches a terminal or file; the only clock read is the optional
//! clock seed. Every match can be replayed frame by frame from a seed.
//!
//! # Module Structure
//!
//! - [`bits`]: row bitmap helpers (bit 0 is the rightmost column)
//! - [`rng`]: xorshift128 generator shared by all participants of a round
//! - [`piece`]: tetromino catalogue, [`Piece`] transforms and spawning
//! - [`field`]: bordered bitmap [`Field`] with collision and line removal
//! - [`score`]: per-participant [`Score`] counters and ratios
//! - [`player`]: the [`Player`] decision routine contract
//! - [`playfield`]: the per-frame [`Playfield`] state machine
//! - [`analysis`]: column/hole scans used by lookahead routines
//!
//! # Example
//!
//! ```
//! use tetcon_core::{Field, Piece, Player, PlayerFault, Playfield, Xorshift128};
//! use tetcon_types::Event;
//!
//! struct Idle;
//!
//! impl Player for Idle {
//!     fn name(&self) -> &str { "IDLE/1.00" }
//!     fn author(&self) -> &str { "nobody" }
//!     fn exec(&mut self, _: Event, _: &Field, _: &Piece, _: &Piece) -> Result<Event, PlayerFault> {
//!         Ok(Event::NONE)
//!     }
//! }
//!
//! let mut player = Idle;
//! let mut pf = Playfield::new(10, 18, 10);
//! pf.start_game(&Xorshift128::new(42), &mut player);
//! while pf.is_playing() {
//!     pf.tick(&mut player);
//! }
//! assert!(pf.score().pieces() > 0);
//! ```
//!
//! # Timing
//!
//! There is no wall clock in here. One [`Playfield::tick`] is one frame;
//! gravity is counted in tenths of a row per frame.

pub mod analysis;
pub mod bits;
pub mod field;
pub mod piece;
pub mod player;
pub mod playfield;
pub mod rng;
pub mod score;

pub use tetcon_types as types;

pub use field::Field;
pub use piece::{Piece, PieceBitmap, PieceFactory};
pub use player::{Player, PlayerFault};
pub use playfield::{Playfield, Sequence};
pub use rng::Xorshift128;
pub use score::Score;
