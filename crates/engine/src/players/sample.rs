//! Reference routine shipped with the contest kit.

use tetcon_core::{Field, Piece, Player, PlayerFault};
use tetcon_types::Event;

use crate::rules::RuleConfig;

/// Turns every piece to a fixed rotation and sweeps it from wall to wall.
///
/// The target rotation is `instance_id % rot_count`, so several instances
/// in one contest stack differently. The sweep starts to the right and
/// flips whenever a move is rejected.
#[derive(Debug, Clone)]
pub struct SamplePlayer {
    instance_id: usize,
    /// `+1` sweeps left, `-1` sweeps right.
    speed: i32,
    rot: u8,
}

impl SamplePlayer {
    pub fn new(instance_id: usize) -> Self {
        Self {
            instance_id,
            speed: -1,
            rot: 0,
        }
    }

    pub fn is_available(rule: &RuleConfig) -> bool {
        rule.is_longrun()
    }
}

impl Player for SamplePlayer {
    fn name(&self) -> &str {
        "SAMPLE1/0.00"
    }

    fn author(&self) -> &str {
        "Abe Chanta"
    }

    fn start_game(&mut self, _field: &Field) -> Result<(), PlayerFault> {
        self.speed = -1;
        self.rot = 0;
        Ok(())
    }

    fn exec(
        &mut self,
        event: Event,
        _field: &Field,
        ctrl: &Piece,
        _next: &Piece,
    ) -> Result<Event, PlayerFault> {
        if event.contains(Event::GAME_OVER) {
            return Ok(Event::NONE);
        }

        if event.contains(Event::PREP) {
            let count = ctrl.rot_count().max(1) as usize;
            self.rot = (self.instance_id % count) as u8;
        }

        if event.contains(Event::FALL) {
            if event.contains(Event::MOVE_R_BLOCKED) {
                self.speed = 1;
            }
            if event.contains(Event::MOVE_L_BLOCKED) {
                self.speed = -1;
            }
        }

        let mut answer = Event::NONE;
        if ctrl.rot != self.rot {
            answer |= Event::ROT_L;
        }
        if self.speed > 0 {
            answer |= Event::MOVE_L;
        } else if self.speed < 0 {
            answer |= Event::MOVE_R;
        }
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetcon_types::{Pos, Shape};

    fn piece(shape: Shape, rot: u8) -> Piece {
        Piece::new(shape, rot, Pos::new(4, 10))
    }

    #[test]
    fn test_starts_sweeping_right() {
        let field = Field::new(10, 18, 10);
        let mut player = SamplePlayer::new(0);
        let answer = player
            .exec(Event::PREP, &field, &piece(Shape::T, 0), &piece(Shape::I, 0))
            .unwrap();
        assert_eq!(answer, Event::MOVE_R);
    }

    #[test]
    fn test_rotates_towards_instance_rotation() {
        let field = Field::new(10, 18, 10);
        let mut player = SamplePlayer::new(3);
        let next = piece(Shape::I, 0);
        let answer = player.exec(Event::PREP, &field, &piece(Shape::T, 0), &next).unwrap();
        assert!(answer.contains(Event::ROT_L));
        let answer = player.exec(Event::FALL, &field, &piece(Shape::T, 3), &next).unwrap();
        assert!(!answer.contains(Event::ROT_L));
    }

    #[test]
    fn test_o_piece_never_rotates() {
        let field = Field::new(10, 18, 10);
        let mut player = SamplePlayer::new(3);
        let answer = player
            .exec(Event::PREP, &field, &piece(Shape::O, 0), &piece(Shape::O, 0))
            .unwrap();
        assert!(!answer.intersects(Event::ROT));
    }

    #[test]
    fn test_reverses_on_blocked_move() {
        let field = Field::new(10, 18, 10);
        let mut player = SamplePlayer::new(0);
        let (ctrl, next) = (piece(Shape::O, 0), piece(Shape::O, 0));
        let answer = player
            .exec(Event::FALL | Event::MOVE_R_BLOCKED, &field, &ctrl, &next)
            .unwrap();
        assert_eq!(answer, Event::MOVE_L);
        let answer = player
            .exec(Event::FALL | Event::MOVE_L_BLOCKED, &field, &ctrl, &next)
            .unwrap();
        assert_eq!(answer, Event::MOVE_R);
    }

    #[test]
    fn test_quiet_on_game_over() {
        let field = Field::new(10, 18, 10);
        let mut player = SamplePlayer::new(1);
        let answer = player
            .exec(Event::GAME_OVER, &field, &piece(Shape::T, 0), &piece(Shape::T, 0))
            .unwrap();
        assert!(answer.is_empty());
    }

    #[test]
    fn test_start_game_resets_sweep() {
        let field = Field::new(10, 18, 10);
        let mut player = SamplePlayer::new(0);
        let (ctrl, next) = (piece(Shape::O, 0), piece(Shape::O, 0));
        player
            .exec(Event::FALL | Event::MOVE_R_BLOCKED, &field, &ctrl, &next)
            .unwrap();
        player.start_game(&field).unwrap();
        let answer = player.exec(Event::FALL, &field, &ctrl, &next).unwrap();
        assert_eq!(answer, Event::MOVE_R);
    }
}
