//! Field analysis helpers for lookahead routines
//!
//! All scans run top-down over the playable rows. Per-column results are
//! indexed by bordered column (index 0 is the right wall) and always have
//! `field.size().x` entries; border entries stay 0.

use arrayvec::ArrayVec;

use crate::bits::bit_of;
use crate::field::Field;
use crate::piece::Piece;

/// One value per bordered column.
pub type Columns = ArrayVec<i32, 32>;

fn columns(field: &Field) -> Columns {
    (0..field.size().x).map(|_| 0).collect()
}

/// Top-down iterator over `(y, filled cells)` of the playable rows.
fn playable_rows(field: &Field) -> impl Iterator<Item = (i32, u32)> + '_ {
    let filled = field.line_filled();
    (1..field.size().y - 1)
        .rev()
        .map(move |y| (y, field.row(y) & filled))
}

/// Highest filled row of every column, 0 for empty columns.
pub fn column_heights(field: &Field) -> Columns {
    let mut heights = columns(field);
    let mut found = 0u32;
    for (y, blocks) in playable_rows(field) {
        let fresh = blocks & !found;
        if fresh != 0 {
            for x in 1..field.size().x - 1 {
                if fresh & bit_of(x) != 0 {
                    heights[x as usize] = y;
                }
            }
        }
        found |= blocks;
    }
    heights
}

/// Buried holes per row, indexed by bordered row.
///
/// A hole is an empty cell with a filled cell somewhere above it in the same
/// column.
pub fn spots_per_row(field: &Field) -> Vec<u32> {
    let mut spots = vec![0; field.size().y as usize];
    let mut covered = 0u32;
    for (y, blocks) in playable_rows(field) {
        spots[y as usize] = (!blocks & covered & field.line_filled()).count_ones();
        covered |= blocks;
    }
    spots
}

/// Filled cells stacked above the topmost hole of every column, 0 for
/// columns without holes.
pub fn spot_heights(field: &Field) -> Columns {
    let mut heights = columns(field);
    let filled = field.line_filled();
    let mut covered = 0u32;
    let mut holed = 0u32;
    for (_, blocks) in playable_rows(field) {
        let above_hole = blocks & !holed;
        for x in 1..field.size().x - 1 {
            if above_hole & bit_of(x) != 0 {
                heights[x as usize] += 1;
            }
        }
        covered |= blocks;
        holed |= !blocks & filled & covered;
    }
    for x in 1..field.size().x - 1 {
        if holed & bit_of(x) == 0 {
            heights[x as usize] = 0;
        }
    }
    heights
}

/// Lowest reachable position by dropping straight down. A void piece stays put.
pub fn drop_limit(field: &Field, piece: Piece) -> Piece {
    let mut piece = piece;
    if piece.is_void() {
        return piece;
    }
    loop {
        let lower = piece.move_y(-1);
        if !field.can_place(&lower) {
            return piece;
        }
        piece = lower;
    }
}

/// Farthest reachable position sliding by `dx` per step (`+1` is left).
pub fn slide_limit(field: &Field, piece: Piece, dx: i32) -> Piece {
    let mut piece = piece;
    if dx == 0 || piece.is_void() {
        return piece;
    }
    loop {
        let next = piece.move_x(dx.signum());
        if !field.can_place(&next) {
            return piece;
        }
        piece = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetcon_types::{Pos, Shape};

    fn field_with(rows: &[(i32, u32)]) -> Field {
        let mut field = Field::new(10, 18, 10);
        for &(y, cells) in rows {
            field.stamp_row(y, cells);
        }
        field
    }

    #[test]
    fn test_heights_of_empty_field() {
        let field = Field::new(10, 18, 10);
        let heights = column_heights(&field);
        assert_eq!(heights.len(), 12);
        assert!(heights.iter().all(|&h| h == 0));
    }

    #[test]
    fn test_heights_track_topmost_block() {
        // Column 1 filled at rows 1 and 3, column 5 at row 2.
        let field = field_with(&[(1, 0b10), (2, 0b10_0000), (3, 0b10)]);
        let heights = column_heights(&field);
        assert_eq!(heights[1], 3);
        assert_eq!(heights[5], 2);
        assert_eq!(heights[2], 0);
        assert_eq!(heights[0], 0);
        assert_eq!(heights[11], 0);
    }

    #[test]
    fn test_spots_per_row() {
        // Two covered holes at row 1 below the row-2 blocks.
        let field = field_with(&[(2, 0b110)]);
        let spots = spots_per_row(&field);
        assert_eq!(spots[1], 2);
        assert_eq!(spots[2], 0);
        assert_eq!(spots.iter().sum::<u32>(), field.count_spots());
    }

    #[test]
    fn test_spot_heights_count_cells_over_hole() {
        // Column 1: blocks at rows 2..=4 above a hole at row 1.
        // Column 2: solid, no hole.
        let field = field_with(&[(1, 0b100), (2, 0b110), (3, 0b110), (4, 0b10)]);
        let heights = spot_heights(&field);
        assert_eq!(heights[1], 3);
        assert_eq!(heights[2], 0);
    }

    #[test]
    fn test_limits_leave_void_piece_in_place() {
        let field = Field::new(10, 18, 10);
        let void = field.piece_factory().invalid();
        assert_eq!(drop_limit(&field, void), void);
        assert_eq!(slide_limit(&field, void, 1), void);
        assert_eq!(slide_limit(&field, void, -1), void);
    }

    #[test]
    fn test_drop_limit_rests_on_floor() {
        let field = Field::new(10, 18, 10);
        let piece = field.piece_factory().spawn(Shape::O);
        let landed = drop_limit(&field, piece);
        assert!(field.can_place(&landed));
        assert!(!field.can_place(&landed.move_y(-1)));
        // O occupies local rows 0 and 1; the floor is row 0.
        assert_eq!(landed.pos.y, 1);
    }

    #[test]
    fn test_drop_limit_stops_on_stack() {
        let field = field_with(&[(1, field_line(10)), (2, field_line(10) & !0b10)]);
        let piece = Piece::new(Shape::O, 0, Pos::new(4, 10));
        assert_eq!(drop_limit(&field, piece).pos.y, 3);
    }

    fn field_line(width: i32) -> u32 {
        crate::bits::mask_of(width) << 1
    }

    #[test]
    fn test_slide_limits_reach_walls() {
        let field = Field::new(10, 18, 10);
        let piece = Piece::new(Shape::I, 0, Pos::new(4, 10));
        let left = slide_limit(&field, piece, 1);
        let right = slide_limit(&field, piece, -1);
        assert_eq!(left.pos.x, 7);
        assert_eq!(right.pos.x, 1);
        assert_eq!(slide_limit(&field, piece, 0).pos.x, 4);
    }
}
