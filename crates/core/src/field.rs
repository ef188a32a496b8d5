//! Field module - bordered bit-grid playfield
//!
//! One `u32` per row, bit 0 is the right wall. Row 0 is the floor and the last
//! row is the ceiling; both are fully occupied. The two wall columns are set in
//! every row. Only bits inside [`Field::line_filled`] are playable cells.

use tetcon_types::{Pos, Size, FIELD_HEIGHT_MAX, FIELD_WIDTH_MAX, PIECE_WIDTH};

use crate::bits::{mask_of, pop_count, shift};
use crate::piece::{Piece, PieceFactory};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    gravity: u32,
    size: Size,
    line_filled: u32,
    frame: u32,
    rows: Vec<u32>,
}

impl Field {
    /// Create a field with `width x height` playable cells.
    ///
    /// Width is clamped to `PIECE_WIDTH..=FIELD_WIDTH_MAX`, height to
    /// `PIECE_WIDTH..=FIELD_HEIGHT_MAX`. The field starts with empty playable rows.
    pub fn new(width: i32, height: i32, gravity: u32) -> Self {
        let width = width.clamp(PIECE_WIDTH, FIELD_WIDTH_MAX);
        let height = height.clamp(PIECE_WIDTH, FIELD_HEIGHT_MAX);
        let size = Size::new(width + 2, height + 2);

        let line_filled = mask_of(width) << 1;
        let frame = ((line_filled << 1) | (line_filled >> 1)) & !line_filled;

        let mut rows = vec![frame; size.y as usize];
        rows[0] |= line_filled;
        rows[size.y as usize - 1] |= line_filled;

        Self {
            gravity,
            size,
            line_filled,
            frame,
            rows,
        }
    }

    /// Clear every playable cell.
    pub fn start_game(&mut self) {
        let top = self.ceiling();
        for row in &mut self.rows[1..top] {
            *row = self.frame;
        }
    }

    /// Bordered size (playable + 2 on each axis).
    pub fn size(&self) -> Size {
        self.size
    }

    /// Playable width and height.
    pub fn playable_size(&self) -> Size {
        Size::new(self.size.x - 2, self.size.y - 2)
    }

    pub fn gravity(&self) -> u32 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: u32) {
        self.gravity = gravity;
    }

    /// Mask of a completely occupied playable row.
    pub fn line_filled(&self) -> u32 {
        self.line_filled
    }

    /// Piece factory for this field size.
    pub fn piece_factory(&self) -> PieceFactory {
        PieceFactory::new(self.size)
    }

    /// Raw row bitmap; 0 for rows outside the field.
    pub fn row(&self, y: i32) -> u32 {
        if y < 0 {
            return 0;
        }
        self.rows.get(y as usize).copied().unwrap_or(0)
    }

    pub fn rows(&self) -> &[u32] {
        &self.rows
    }

    /// Whether the bordered cell `(x, y)` is occupied; false outside the field.
    pub fn cell(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.size.x {
            return false;
        }
        self.row(y) & (1 << x) != 0
    }

    /// OR `cells` (restricted to the playable mask) into a playable row.
    pub fn stamp_row(&mut self, y: i32, cells: u32) {
        if y >= 1 && y < self.ceiling() as i32 {
            self.rows[y as usize] |= cells & self.line_filled;
        }
    }

    #[inline(always)]
    fn ceiling(&self) -> usize {
        self.rows.len() - 1
    }

    #[inline(always)]
    fn is_filled(&self, row: u32) -> bool {
        !row & self.line_filled == 0
    }

    /// Placement test at the piece's own position.
    pub fn can_place(&self, piece: &Piece) -> bool {
        self.can_place_at(piece, piece.pos)
    }

    /// Placement test with `piece` moved to `pos`. Rows outside the field
    /// never collide.
    pub fn can_place_at(&self, piece: &Piece, pos: Pos) -> bool {
        piece.bitmap().iter().enumerate().all(|(dy, line)| {
            let y = pos.y + dy as i32;
            if y < 0 || y >= self.size.y {
                return true;
            }
            shift(*line, pos.x) & self.rows[y as usize] == 0
        })
    }

    pub fn place(&mut self, piece: &Piece) {
        self.place_at(piece, piece.pos);
    }

    /// Stamp the piece into playable rows; parts outside them are dropped.
    pub fn place_at(&mut self, piece: &Piece, pos: Pos) {
        let top = self.ceiling() as i32;
        for (dy, line) in piece.bitmap().iter().enumerate() {
            let y = pos.y + dy as i32;
            if y >= 1 && y < top {
                self.rows[y as usize] |= shift(*line, pos.x);
            }
        }
    }

    /// Copy of this field with `piece` stamped in.
    #[must_use]
    pub fn with_piece(&self, piece: &Piece) -> Field {
        let mut field = self.clone();
        field.place(piece);
        field
    }

    /// Number of completely occupied playable rows.
    pub fn count_filled_lines(&self) -> u32 {
        let top = self.ceiling();
        self.rows[1..top]
            .iter()
            .filter(|row| self.is_filled(**row))
            .count() as u32
    }

    /// Remove filled rows, shifting everything above down. Rows keep their
    /// relative order; the exposed top rows become empty.
    ///
    /// Returns the number of removed rows.
    pub fn remove_filled_lines(&mut self) -> u32 {
        let top = self.ceiling();
        let mut write = 1;
        for read in 1..top {
            let row = self.rows[read];
            if self.is_filled(row) {
                continue;
            }
            self.rows[write] = row;
            write += 1;
        }
        for row in &mut self.rows[write..top] {
            *row &= !self.line_filled;
        }
        (top - write) as u32
    }

    /// Count empty playable cells that have an occupied cell somewhere above
    /// them in the same column.
    pub fn count_spots(&self) -> u32 {
        let top = self.ceiling();
        let mut covered = 0u32;
        let mut spots = 0;
        for row in self.rows[1..top].iter().rev() {
            let blocks = row & self.line_filled;
            spots += pop_count(!blocks & covered, self.size.x);
            covered |= blocks;
        }
        spots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetcon_types::Shape;

    fn standard() -> Field {
        Field::new(10, 18, 10)
    }

    #[test]
    fn test_new_field_borders() {
        let field = standard();
        assert_eq!(field.size(), Size::new(12, 20));
        assert_eq!(field.playable_size(), Size::new(10, 18));
        assert_eq!(field.line_filled(), 0b0111_1111_1110);
        assert_eq!(field.row(0), 0b1111_1111_1111);
        assert_eq!(field.row(19), 0b1111_1111_1111);
        for y in 1..19 {
            assert_eq!(field.row(y), 0b1000_0000_0001);
        }
        assert_eq!(field.row(20), 0);
        assert_eq!(field.row(-1), 0);
    }

    #[test]
    fn test_size_clamping() {
        assert_eq!(Field::new(2, 2, 10).size(), Size::new(6, 6));
        assert_eq!(Field::new(40, 18, 10).size(), Size::new(32, 20));
        assert_eq!(Field::new(10, i32::MAX, 10).size(), Size::new(12, 4098));
        let widest = Field::new(30, 4, 10);
        assert_eq!(widest.row(0), u32::MAX);
        assert_eq!(widest.row(1), 0x8000_0001);
    }

    #[test]
    fn test_cell() {
        let mut field = standard();
        assert!(field.cell(0, 5));
        assert!(field.cell(11, 5));
        assert!(!field.cell(5, 5));
        field.stamp_row(5, 1 << 5);
        assert!(field.cell(5, 5));
        assert!(!field.cell(12, 5));
        assert!(!field.cell(-1, 5));
    }

    #[test]
    fn test_stamp_row_ignores_borders() {
        let mut field = standard();
        field.stamp_row(0, u32::MAX);
        field.stamp_row(19, 0);
        field.stamp_row(3, u32::MAX);
        assert_eq!(field.row(3), 0b1111_1111_1111);
        assert_eq!(field.count_filled_lines(), 1);
    }

    #[test]
    fn test_can_place_off_field_rows() {
        let field = standard();
        let piece = field.piece_factory().spawn(Shape::T);
        // Spawn row is the ceiling: the top half overlaps it.
        assert!(!field.can_place(&piece));
        let entered = piece.move_y(piece.top_ofs());
        assert!(field.can_place(&entered));
        // Entirely above the field.
        assert!(field.can_place(&piece.move_y(5)));
    }

    #[test]
    fn test_place_and_walls() {
        let mut field = standard();
        let piece = field.piece_factory().spawn(Shape::O).move_y(-10);
        assert!(field.can_place(&piece));
        field.place(&piece);
        assert!(!field.can_place(&piece));
        // O occupies local columns 1..=2 at x = 4 -> bits 5 and 6.
        assert_eq!(field.row(9) & field.line_filled(), 0b0110_0000);
        assert_eq!(field.row(10) & field.line_filled(), 0b0110_0000);

        let mut wall_hug = piece;
        while field.can_place(&wall_hug.move_x(-1)) {
            wall_hug = wall_hug.move_x(-1);
        }
        assert_eq!(wall_hug.pos.x, 1 + wall_hug.right_ofs());
    }

    #[test]
    fn test_place_skips_border_rows() {
        let mut field = standard();
        let piece = field.piece_factory().spawn(Shape::T);
        field.place(&piece);
        assert_eq!(field.row(19), 0b1111_1111_1111);
        assert_eq!(field.row(20), 0);
    }

    #[test]
    fn test_remove_filled_lines_compacts() {
        let mut field = standard();
        let full = field.line_filled();
        field.stamp_row(1, full);
        field.stamp_row(2, 1 << 3);
        field.stamp_row(3, full);
        field.stamp_row(4, 1 << 7);
        assert_eq!(field.count_filled_lines(), 2);

        assert_eq!(field.remove_filled_lines(), 2);
        assert_eq!(field.count_filled_lines(), 0);
        assert!(field.cell(3, 1));
        assert!(field.cell(7, 2));
        for y in 3..19 {
            assert_eq!(field.row(y), 0b1000_0000_0001);
        }
    }

    #[test]
    fn test_remove_filled_lines_noop_without_lines() {
        let mut field = standard();
        field.stamp_row(1, 0b0110);
        let before = field.clone();
        assert_eq!(field.remove_filled_lines(), 0);
        assert_eq!(field, before);
    }

    #[test]
    fn test_count_spots() {
        let mut field = standard();
        assert_eq!(field.count_spots(), 0);
        // A roof over two empty cells in column 4.
        field.stamp_row(3, 1 << 4);
        assert_eq!(field.count_spots(), 2);
        // Filling one of them removes one spot.
        field.stamp_row(1, 1 << 4);
        assert_eq!(field.count_spots(), 1);
        // Blocks on the floor alone are not spots.
        field.stamp_row(1, 1 << 8);
        assert_eq!(field.count_spots(), 1);
    }

    #[test]
    fn test_start_game_clears_playfield() {
        let mut field = standard();
        field.stamp_row(4, u32::MAX);
        field.start_game();
        assert_eq!(field, standard());
    }

    #[test]
    fn test_with_piece_leaves_source_untouched() {
        let field = standard();
        let piece = field.piece_factory().spawn(Shape::L).move_y(-15);
        let stamped = field.with_piece(&piece);
        assert_ne!(stamped, field);
        assert!(field.can_place(&piece));
        assert!(!stamped.can_place(&piece));
    }

    #[test]
    fn test_gravity_accessors() {
        let mut field = standard();
        assert_eq!(field.gravity(), 10);
        field.set_gravity(25);
        assert_eq!(field.gravity(), 25);
    }
}
