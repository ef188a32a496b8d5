//! Console viewer for tetcon contests.
//!
//! A small, game-oriented rendering layer: the contest is laid out into a
//! framebuffer by [`ContestScreen`] (pure, testable) and flushed to the
//! terminal by [`TerminalRenderer`], which only rewrites changed cells.
//! [`ConsoleView`] ties both to the engine's `ContestView` contract.

pub mod console;
pub mod contest_view;
pub mod fb;
pub mod renderer;

pub use console::{should_quit, ConsoleView};
pub use contest_view::{ContestScreen, PLAYFIELD_WIDTH, TILE_SIZE};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
