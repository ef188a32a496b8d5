use tetcon_core::{Field, Piece, Player, PlayerFault};
use tetcon_types::Event;

/// Never touches the controls; the piece just falls.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdlePlayer;

impl IdlePlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Player for IdlePlayer {
    fn name(&self) -> &str {
        "IDLE/1.00"
    }

    fn author(&self) -> &str {
        "tetcon"
    }

    fn exec(&mut self, _: Event, _: &Field, _: &Piece, _: &Piece) -> Result<Event, PlayerFault> {
        Ok(Event::NONE)
    }
}
