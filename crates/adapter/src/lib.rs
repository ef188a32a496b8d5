//! Adapter module - the contest's connections to the outside world
//!
//! Everything that touches files, stdout or the process environment lives
//! here, so the engine itself stays pure.
//!
//! # Report sinks
//!
//! - [`FileReport`]: appends one line per round to a file whose name may
//!   contain `<yymmdd>` / `<hhmmss>` placeholders (expanded once, when the
//!   sink is created)
//! - [`StdoutReport`]: prints each round line
//!
//! # Journal
//!
//! [`Journal`] writes line-delimited JSON for every major event and every
//! round summary:
//!
//! ```text
//! {"type":"event","round":1,"frame":412,"player":"IDLE/1.00","event":"GAME_OVER","bits":2147483648}
//! {"type":"round","round":1,"player":"IDLE/1.00","score":{"pieces":23,...}}
//! ```
//!
//! # Environment Variables
//!
//! - `TETCON_RULE`: rule option string
//! - `TETCON_VIEW`: view option string
//! - `TETCON_REPORT`: report file name template
//! - `TETCON_SEED`: fixed RNG seed
//! - `TETCON_LOG_PATH`: journal file

pub mod config;
pub mod journal;
pub mod report;

pub use tetcon_core as core;
pub use tetcon_engine as engine;
pub use tetcon_types as types;

pub use config::EnvConfig;
pub use journal::{Journal, JournalRecord, ScoreSummary};
pub use report::{FileReport, StdoutReport};
