//! One-piece lookahead routine.
//!
//! On every new piece (and whenever a slide is rejected on the way down) it
//! tries each rotation at each reachable column, drops it, scores the
//! resulting field and steers towards the best placement.

use std::fmt;
use std::path::Path;

use tetcon_core::analysis::{column_heights, drop_limit, slide_limit, spot_heights, spots_per_row};
use tetcon_core::{Field, Piece, Player, PlayerFault, Xorshift128};
use tetcon_types::Event;

use crate::rules::RuleConfig;

/// Scoring weights.
///
/// Tables are indexed by a count (holes in a row, lines cleared, ...) and
/// saturate at their last entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weights {
    /// Per row above half the field height.
    pub height: i32,
    /// Per row an edge column stands above its neighbour.
    pub edge_up: i32,
    /// Per row an edge column sits below its neighbour.
    pub edge_down: i32,
    /// Deduction by holes in a row.
    pub spots: Vec<i32>,
    /// Bonus by lines cleared.
    pub lines: Vec<i32>,
    /// Deduction by height step between neighbours.
    pub diffs: Vec<i32>,
    /// Deduction by well depth (both neighbours higher).
    pub cliffs: Vec<i32>,
    /// Deduction by cells stacked over a hole.
    pub over: Vec<i32>,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            height: 4,
            edge_up: -1,
            edge_down: 1,
            spots: vec![0, 24, 36, 48],
            lines: vec![0, 6, 14, 28, 64],
            diffs: vec![0, 1, 3, 6, 10, 15],
            cliffs: vec![0, 0, 0, 4, 8, 16, 24],
            over: vec![0, 2, 4, 8, 12],
        }
    }
}

fn pick(table: &[i32], index: usize) -> i64 {
    table
        .get(index)
        .or(table.last())
        .copied()
        .map(i64::from)
        .unwrap_or(0)
}

fn tweak_list(list: &mut Vec<i32>, op: u32, rng: &mut Xorshift128) {
    match op {
        0 => {
            if list.len() > 1 {
                list.pop();
            }
        }
        1 => {
            let last = list.last().copied().unwrap_or(0);
            list.push(last + last / 2);
        }
        _ => {
            if list.is_empty() {
                return;
            }
            let index = rng.next_u32() as usize % list.len();
            list[index] += if op == 2 { 1 } else { -1 };
        }
    }
}

impl Weights {
    /// Settings file looked up in the work directory.
    pub const FILE_NAME: &'static str = "greedy.ini";

    /// Parse `HR, EP, EN, n, spots.., n, lines.., n, diffs.., n, cliffs.., n, over..`.
    ///
    /// Values are integers separated by commas or whitespace. Every table
    /// needs at least one entry.
    pub fn parse(text: &str) -> Option<Self> {
        let mut values = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| token.parse::<i32>().ok());
        let mut next = move || values.next().flatten();

        let height = next()?;
        let edge_up = next()?;
        let edge_down = next()?;
        let mut table = || -> Option<Vec<i32>> {
            let count = usize::try_from(next()?).ok().filter(|&n| n > 0)?;
            (0..count).map(|_| next()).collect()
        };
        Some(Self {
            height,
            edge_up,
            edge_down,
            spots: table()?,
            lines: table()?,
            diffs: table()?,
            cliffs: table()?,
            over: table()?,
        })
    }

    /// Weights from `<dir>/greedy.ini`, or the defaults when there is none.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(Self::FILE_NAME);
        let Ok(text) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match Self::parse(&text) {
            Some(weights) => weights,
            None => {
                eprintln!("[Greedy] ignoring malformed {}", path.display());
                Self::default()
            }
        }
    }

    /// Perturb one weight so that instances after the first explore nearby
    /// settings. Deterministic per `instance_id`; instance 0 is unchanged.
    #[must_use]
    pub fn tweaked(mut self, instance_id: usize) -> Self {
        if instance_id == 0 {
            return self;
        }
        let mut rng = Xorshift128::new(0);
        for _ in 0..instance_id {
            rng.next_u32();
        }
        match (rng.next_u32() / 17) % 26 {
            0 => self.height += 1,
            1 => self.height -= 1,
            2 => self.edge_up += 1,
            3 => self.edge_up -= 1,
            4 => self.edge_down += 1,
            5 => self.edge_down -= 1,
            n => {
                let op = (n - 6) % 4;
                let list = match (n - 6) / 4 {
                    0 => &mut self.spots,
                    1 => &mut self.lines,
                    2 => &mut self.diffs,
                    3 => &mut self.cliffs,
                    _ => &mut self.over,
                };
                tweak_list(list, op, &mut rng);
            }
        }
        self
    }

    /// Score a field that has the candidate piece stamped in. Higher is better.
    pub fn evaluate(&self, field: &Field) -> i64 {
        let mut field = field.clone();
        let size = field.size();
        let (ww, hh) = (size.x as usize, size.y as usize);

        let line_bonus = pick(&self.lines, field.remove_filled_lines() as usize);

        let spots = spots_per_row(&field);
        let spot_deduct: i64 = spots[1..hh - 1]
            .iter()
            .map(|&n| pick(&self.spots, n as usize))
            .sum();

        let mut heights = column_heights(&field);
        let half = (size.y - 1) / 2;
        let height_deduct: i64 = heights[1..ww - 1]
            .iter()
            .filter(|&&h| h >= half)
            .map(|&h| i64::from(self.height) * i64::from(h - half))
            .sum();

        heights[0] = heights[1];
        heights[ww - 1] = heights[ww - 2];
        let diff_deduct: i64 = (1..ww - 1)
            .map(|x| pick(&self.diffs, heights[x - 1].abs_diff(heights[x]) as usize))
            .sum();

        heights[0] = heights[2];
        heights[ww - 1] = heights[ww - 3];
        let cliff_deduct: i64 = (1..ww - 1)
            .filter_map(|x| {
                let right = heights[x - 1] - heights[x];
                let left = heights[x + 1] - heights[x];
                (right > 0 && left > 0).then(|| pick(&self.cliffs, (right + left) as usize))
            })
            .sum();

        let edge = |inner: i32, outer: i32| -> i64 {
            let step = i64::from(inner - outer);
            if inner > outer {
                i64::from(self.edge_down) * step
            } else {
                i64::from(self.edge_up) * step
            }
        };
        let edge_deduct = edge(heights[2], heights[1]) + edge(heights[ww - 3], heights[ww - 2]);

        let over = spot_heights(&field);
        let over_deduct: i64 = over[1..ww - 1]
            .iter()
            .map(|&n| pick(&self.over, n as usize))
            .sum();

        line_bonus
            - spot_deduct
            - height_deduct
            - diff_deduct
            - cliff_deduct
            - edge_deduct
            - over_deduct
    }
}

impl fmt::Display for Weights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn table(list: &[i32]) -> String {
            let items: Vec<String> = list.iter().map(i32::to_string).collect();
            format!("({})", items.join(","))
        }
        write!(
            f,
            "HR={}&EP={}&EN={}&SP={}&LP={}&DP={}&CP={}&OP={}",
            self.height,
            self.edge_up,
            self.edge_down,
            table(&self.spots),
            table(&self.lines),
            table(&self.diffs),
            table(&self.cliffs),
            table(&self.over),
        )
    }
}

#[derive(Debug, Clone)]
pub struct GreedyPlayer {
    weights: Weights,
    target: Piece,
    best: i64,
}

impl GreedyPlayer {
    pub fn new(weights: Weights) -> Self {
        Self {
            weights,
            target: Piece::default(),
            best: 0,
        }
    }

    pub fn is_available(rule: &RuleConfig) -> bool {
        rule.is_longrun()
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// The placement currently steered to.
    pub fn target(&self) -> &Piece {
        &self.target
    }

    fn consider(&mut self, field: &Field, upper: Piece) {
        let landed = drop_limit(field, upper);
        let score = self.weights.evaluate(&field.with_piece(&landed));
        if score > self.best {
            self.best = score;
            self.target = landed;
        }
    }

    /// Pick the best landing spot for `ctrl`. With `entering`, `ctrl` is still
    /// at its spawn position and each rotation is searched from its entry row.
    fn search(&mut self, field: &Field, ctrl: &Piece, entering: bool) {
        let start = if entering {
            ctrl.move_y(ctrl.top_ofs())
        } else {
            *ctrl
        };
        self.target = drop_limit(field, start);
        self.best = self.weights.evaluate(&field.with_piece(&self.target));

        for rot in 0..ctrl.rot_count() {
            let turned = Piece { rot, ..*ctrl };
            let upper = if entering {
                turned.move_y(turned.top_ofs())
            } else {
                turned
            };
            if !field.can_place(&upper) {
                continue;
            }

            if rot != start.rot {
                self.consider(field, upper);
            }
            for dx in [1, -1] {
                let limit = slide_limit(field, upper, dx);
                let mut x = limit.pos.x;
                while x != upper.pos.x {
                    self.consider(field, upper.move_x(x - upper.pos.x));
                    x -= dx;
                }
            }
        }
    }

    fn steer(&self, ctrl: &Piece) -> Event {
        let mut answer = Event::NONE;
        if ctrl.pos.x > self.target.pos.x {
            answer |= Event::MOVE_R;
        } else if ctrl.pos.x < self.target.pos.x {
            answer |= Event::MOVE_L;
        }

        let count = ctrl.rot_count();
        match count {
            2 => {
                if ctrl.rot % 2 != self.target.rot % 2 {
                    answer |= Event::ROT_L;
                }
            }
            4 => match (self.target.rot + 4 - ctrl.rot) % 4 {
                1 | 2 => answer |= Event::ROT_L,
                3 => answer |= Event::ROT_R,
                _ => {}
            },
            _ => {}
        }
        answer
    }
}

impl Player for GreedyPlayer {
    fn name(&self) -> &str {
        "GREEDY/1.01"
    }

    fn author(&self) -> &str {
        "tetcon"
    }

    fn start_game(&mut self, _field: &Field) -> Result<(), PlayerFault> {
        self.target = Piece::default();
        self.best = 0;
        Ok(())
    }

    fn exec(
        &mut self,
        event: Event,
        field: &Field,
        ctrl: &Piece,
        _next: &Piece,
    ) -> Result<Event, PlayerFault> {
        if event.contains(Event::GAME_OVER) {
            return Ok(Event::NONE);
        }
        if event.contains(Event::PREP) {
            self.search(field, ctrl, true);
        }
        if event.contains(Event::FALL)
            && event.intersects(Event::MOVE_L_BLOCKED | Event::MOVE_R_BLOCKED)
        {
            self.search(field, ctrl, false);
        }
        if ctrl.is_void() || self.target.shape != ctrl.shape {
            return Ok(Event::NONE);
        }
        Ok(self.steer(ctrl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetcon_types::{Pos, Shape};

    fn full_row(field: &Field) -> u32 {
        field.line_filled()
    }

    #[test]
    fn test_parse_weights() {
        let text = "4, -1, 1, 2, 0, 20, 1, 5, 1, 1, 1, 0, 1, 2";
        let weights = Weights::parse(text).unwrap();
        assert_eq!(weights.height, 4);
        assert_eq!(weights.edge_up, -1);
        assert_eq!(weights.spots, vec![0, 20]);
        assert_eq!(weights.lines, vec![5]);
        assert_eq!(weights.over, vec![2]);
        assert_eq!(
            weights.to_string(),
            "HR=4&EP=-1&EN=1&SP=(0,20)&LP=(5)&DP=(1)&CP=(0)&OP=(2)"
        );
    }

    #[test]
    fn test_parse_rejects_truncated_or_empty_tables() {
        assert!(Weights::parse("4 -1 1 2 0").is_none());
        assert!(Weights::parse("4 -1 1 0 1 5 1 1 1 0 1 2").is_none());
        assert!(Weights::parse("4 x 1").is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = std::env::temp_dir().join("tetcon-greedy-missing");
        assert_eq!(Weights::load(&dir), Weights::default());
    }

    #[test]
    fn test_tweak_is_deterministic_and_small() {
        let base = Weights::default();
        assert_eq!(base.clone().tweaked(0), base);
        for id in 1..8 {
            let a = base.clone().tweaked(id);
            assert_eq!(a, base.clone().tweaked(id));
            assert_ne!(a, base, "instance {id} should differ");
        }
    }

    #[test]
    fn test_pick_saturates() {
        assert_eq!(pick(&[1, 2, 3], 1), 2);
        assert_eq!(pick(&[1, 2, 3], 9), 3);
        assert_eq!(pick(&[], 0), 0);
    }

    #[test]
    fn test_evaluate_prefers_line_clear() {
        let weights = Weights::default();
        let mut field = Field::new(10, 18, 10);
        // Bottom row missing only the rightmost column.
        field.stamp_row(1, full_row(&field) & !0b10);
        let upright = Piece::new(Shape::I, 1, Pos::new(4, 10));

        let into_gap = drop_limit(&field, Piece { pos: Pos::new(0, 10), ..upright });
        let elsewhere = drop_limit(&field, upright);
        let gap = weights.evaluate(&field.with_piece(&into_gap));
        let other = weights.evaluate(&field.with_piece(&elsewhere));
        assert!(gap > other);
    }

    #[test]
    fn test_evaluate_penalizes_holes() {
        let weights = Weights::default();
        let field = Field::new(10, 18, 10);
        let flat = drop_limit(&field, Piece::new(Shape::O, 0, Pos::new(4, 10)));
        let mut holed = field.clone();
        holed.stamp_row(2, 0b1100000);
        let clean = weights.evaluate(&field.with_piece(&flat));
        let covered = weights.evaluate(&holed.with_piece(&flat.move_y(2)));
        assert!(clean > covered);
    }

    #[test]
    fn test_search_fills_the_gap() {
        let mut field = Field::new(10, 18, 10);
        field.stamp_row(1, full_row(&field) & !0b10);
        field.stamp_row(2, full_row(&field) & !0b10);
        field.stamp_row(3, full_row(&field) & !0b10);
        field.stamp_row(4, full_row(&field) & !0b10);

        let mut player = GreedyPlayer::new(Weights::default());
        let ctrl = field.piece_factory().spawn(Shape::I);
        let next = field.piece_factory().spawn(Shape::O);
        let answer = player.exec(Event::PREP, &field, &ctrl, &next).unwrap();

        let target = *player.target();
        assert_eq!(target.rot % 2, 1);
        assert_eq!(field.with_piece(&target).count_filled_lines(), 4);
        assert!(answer.contains(Event::ROT_L));
        assert!(answer.contains(Event::MOVE_R));
    }

    #[test]
    fn test_steer_rotation_direction() {
        let mut player = GreedyPlayer::new(Weights::default());
        let ctrl = Piece::new(Shape::T, 0, Pos::new(4, 10));
        for (target_rot, expected) in [
            (0, Event::NONE),
            (1, Event::ROT_L),
            (2, Event::ROT_L),
            (3, Event::ROT_R),
        ] {
            player.target = Piece { rot: target_rot, ..ctrl };
            assert_eq!(player.steer(&ctrl), expected);
        }
        player.target = ctrl.move_x(2);
        assert_eq!(player.steer(&ctrl), Event::MOVE_L);
        player.target = ctrl.move_x(-2);
        assert_eq!(player.steer(&ctrl), Event::MOVE_R);
    }

    #[test]
    fn test_quiet_on_game_over() {
        let field = Field::new(10, 18, 10);
        let mut player = GreedyPlayer::new(Weights::default());
        let ctrl = field.piece_factory().spawn(Shape::T);
        let answer = player.exec(Event::GAME_OVER, &field, &ctrl, &ctrl).unwrap();
        assert!(answer.is_empty());
    }
}
