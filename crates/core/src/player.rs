//! Decision routine contract.
//!
//! A routine is consulted once per frame through [`Player::exec`] and answers
//! with the inputs it wants applied. Routines are external logic: anything they
//! raise, by `Err` or by panicking, is contained by the playfield.

use std::any::Any;

use thiserror::Error;

use tetcon_types::Event;

use crate::field::Field;
use crate::piece::Piece;
use crate::score::Score;

/// Failure reported by (or caught around) a decision routine call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerFault {
    #[error("decision routine rejected the call: {0}")]
    Rejected(String),
    #[error("decision routine panicked: {0}")]
    Panicked(String),
}

impl PlayerFault {
    /// Build a fault from a `catch_unwind` payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        PlayerFault::Panicked(message)
    }
}

pub trait Player {
    /// Program name including its version, e.g. `SAMPLE1/0.00`.
    fn name(&self) -> &str;

    fn author(&self) -> &str;

    /// A new round starts on `field`.
    fn start_game(&mut self, _field: &Field) -> Result<(), PlayerFault> {
        Ok(())
    }

    /// The round ended for this participant with `score`.
    fn end_game(&mut self, _score: &Score) {}

    /// Decide the inputs for this frame.
    ///
    /// `event` carries the phase flag plus feedback of the previous frame. Only
    /// the input bits of the returned value are honored.
    fn exec(
        &mut self,
        event: Event,
        field: &Field,
        ctrl: &Piece,
        next: &Piece,
    ) -> Result<Event, PlayerFault>;

    /// `NAME=..&AUTHOR=..` fragment of the round report.
    fn report_string(&self) -> String {
        format!(
            "NAME={}&AUTHOR={}",
            sanitize(self.name()),
            sanitize(self.author())
        )
    }
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn author(&self) -> &str {
        (**self).author()
    }

    fn start_game(&mut self, field: &Field) -> Result<(), PlayerFault> {
        (**self).start_game(field)
    }

    fn end_game(&mut self, score: &Score) {
        (**self).end_game(score)
    }

    fn exec(
        &mut self,
        event: Event,
        field: &Field,
        ctrl: &Piece,
        next: &Piece,
    ) -> Result<Event, PlayerFault> {
        (**self).exec(event, field, ctrl, next)
    }
}

/// Keep ASCII letters, digits and ` .-_/`; drop everything else.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || " .-_/".contains(*c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named;

    impl Player for Named {
        fn name(&self) -> &str {
            "BOT&1/0.1"
        }

        fn author(&self) -> &str {
            "A. Person=<x>"
        }

        fn exec(&mut self, _: Event, _: &Field, _: &Piece, _: &Piece) -> Result<Event, PlayerFault> {
            Ok(Event::NONE)
        }
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("SAMPLE1/0.00"), "SAMPLE1/0.00");
        assert_eq!(sanitize("a&b=c d_e-f"), "abc d_e-f");
        assert_eq!(sanitize("名前x"), "x");
    }

    #[test]
    fn test_report_string_is_sanitized() {
        assert_eq!(Named.report_string(), "NAME=BOT1/0.1&AUTHOR=A. Personx");
    }

    #[test]
    fn test_from_panic_payloads() {
        let fault = PlayerFault::from_panic(Box::new("boom"));
        assert_eq!(fault, PlayerFault::Panicked("boom".into()));
        let fault = PlayerFault::from_panic(Box::new(String::from("bang")));
        assert_eq!(fault, PlayerFault::Panicked("bang".into()));
        let fault = PlayerFault::from_panic(Box::new(7u8));
        assert_eq!(fault.to_string(), "decision routine panicked: unknown panic payload");
    }

    #[test]
    fn test_boxed_player_delegates() {
        let mut boxed: Box<dyn Player> = Box::new(Named);
        let field = Field::new(10, 18, 10);
        assert!(boxed.start_game(&field).is_ok());
        assert_eq!(boxed.name(), "BOT&1/0.1");
    }
}
