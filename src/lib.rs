//! tetcon (workspace facade crate).
//!
//! Re-exports the workspace crates under short names so tests, benches and
//! the binary can write `tetcon::core::Playfield` or
//! `tetcon::engine::GameControl`. The implementation lives under `crates/`.

pub use tetcon_adapter as adapter;
pub use tetcon_core as core;
pub use tetcon_engine as engine;
pub use tetcon_term as term;
pub use tetcon_types as types;
