//! Built-in decision routines and the registry that creates them by name.

mod greedy;
mod idle;
mod sample;

use std::path::Path;

use thiserror::Error;

use tetcon_core::Player;

use crate::rules::RuleConfig;

pub use greedy::{GreedyPlayer, Weights};
pub use idle::IdlePlayer;
pub use sample::SamplePlayer;

/// Names accepted by [`create_player`].
pub const BUILTIN_PLAYERS: [&str; 3] = ["idle", "sample1", "greedy"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown decision routine {0:?} (known: idle, sample1, greedy)")]
    Unknown(String),
    #[error("decision routine {name:?} does not support rule {rule:?}")]
    Unavailable { name: String, rule: String },
}

/// Create a built-in routine.
///
/// `instance_id` counts earlier instances of the same routine in this contest,
/// starting at 0. `work_path` is a directory the routine may read its own
/// settings from.
pub fn create_player(
    name: &str,
    work_path: &Path,
    rule: &RuleConfig,
    instance_id: usize,
) -> Result<Box<dyn Player>, RegistryError> {
    let key = name.to_ascii_lowercase();
    let unavailable = || RegistryError::Unavailable {
        name: name.to_string(),
        rule: rule.name().to_string(),
    };

    match key.as_str() {
        "idle" => Ok(Box::new(IdlePlayer::new())),
        "sample1" => {
            if !SamplePlayer::is_available(rule) {
                return Err(unavailable());
            }
            Ok(Box::new(SamplePlayer::new(instance_id)))
        }
        "greedy" => {
            if !GreedyPlayer::is_available(rule) {
                return Err(unavailable());
            }
            let weights = Weights::load(work_path).tweaked(instance_id);
            Ok(Box::new(GreedyPlayer::new(weights)))
        }
        _ => Err(RegistryError::Unknown(name.to_string())),
    }
}
