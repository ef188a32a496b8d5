//! Piece catalogue - tetromino bitmaps, rotation counts and edge offsets
//!
//! Every shape has four rotation slots of a 4x4 local bitmap. Row 0 is the
//! bottom of the bounding box; bit 3 of a row is the leftmost local column.
//! A piece at position `x` occupies field bits `x..x + 4`, so increasing `x`
//! moves it to the left and `rotate(+1)` turns it counter-clockwise.
//!
//! Shapes with symmetry only use the first `rot_count` slots; the remaining
//! slots repeat the low ones.

use tetcon_types::{Pos, Shape, Size, PIECE_WIDTH};

use crate::rng::Xorshift128;

/// Local occupied-cell rows, bottom-up.
pub type PieceBitmap = [u32; PIECE_WIDTH as usize];

const EMPTY: PieceBitmap = [0; 4];

#[rustfmt::skip]
const BITMAPS: [[PieceBitmap; 4]; 7] = [
    // I
    [[0x0, 0x0, 0xF, 0x0], [0x2, 0x2, 0x2, 0x2], [0x0, 0x0, 0xF, 0x0], [0x2, 0x2, 0x2, 0x2]],
    // O
    [[0x6, 0x6, 0x0, 0x0], [0x6, 0x6, 0x0, 0x0], [0x6, 0x6, 0x0, 0x0], [0x6, 0x6, 0x0, 0x0]],
    // S
    [[0xC, 0x6, 0x0, 0x0], [0x4, 0xC, 0x8, 0x0], [0xC, 0x6, 0x0, 0x0], [0x4, 0xC, 0x8, 0x0]],
    // Z
    [[0x6, 0xC, 0x0, 0x0], [0x4, 0x6, 0x2, 0x0], [0x6, 0xC, 0x0, 0x0], [0x4, 0x6, 0x2, 0x0]],
    // J
    [[0x2, 0xE, 0x0, 0x0], [0x4, 0x4, 0x6, 0x0], [0xE, 0x8, 0x0, 0x0], [0xC, 0x4, 0x4, 0x0]],
    // L
    [[0x8, 0xE, 0x0, 0x0], [0x6, 0x4, 0x4, 0x0], [0xE, 0x2, 0x0, 0x0], [0x4, 0x4, 0xC, 0x0]],
    // T
    [[0x4, 0xE, 0x0, 0x0], [0x4, 0x6, 0x4, 0x0], [0xE, 0x4, 0x0, 0x0], [0x4, 0xC, 0x4, 0x0]],
];

const ROT_COUNT: [u8; 7] = [2, 1, 2, 2, 4, 4, 4];

/// Offset from the reference Y that puts the highest occupied row just below
/// the ceiling.
#[rustfmt::skip]
const TOP_OFS: [[i32; 4]; 7] = [
    [-2, -3, -2, -3],
    [-2, -2, -2, -2],
    [-2, -3, -2, -3],
    [-2, -3, -2, -3],
    [-2, -3, -2, -3],
    [-2, -3, -2, -3],
    [-2, -3, -2, -3],
];

/// Negated index of the leftmost occupied local column, minus one.
#[rustfmt::skip]
const LEFT_OFS: [[i32; 4]; 7] = [
    [-4, -2, -4, -2],
    [-3, -3, -3, -3],
    [-4, -4, -4, -4],
    [-4, -3, -4, -3],
    [-4, -3, -4, -4],
    [-4, -3, -4, -4],
    [-4, -3, -4, -4],
];

/// Negated index of the rightmost occupied local column.
#[rustfmt::skip]
const RIGHT_OFS: [[i32; 4]; 7] = [
    [ 0, -1,  0, -1],
    [-1, -1, -1, -1],
    [-1, -2, -1, -2],
    [-1, -1, -1, -1],
    [-1, -1, -1, -2],
    [-1, -1, -1, -2],
    [-1, -1, -1, -2],
];

#[inline]
fn slot(shape: Shape, rot: u8) -> Option<(usize, usize)> {
    if shape.is_void() || rot >= 4 {
        return None;
    }
    Some((shape.index(), rot as usize))
}

/// Occupied-cell bitmap for `(shape, rot)`. Empty for invalid input.
pub fn bitmap(shape: Shape, rot: u8) -> PieceBitmap {
    slot(shape, rot).map_or(EMPTY, |(s, r)| BITMAPS[s][r])
}

/// Number of distinct rotation states (0 for `Void`).
pub fn rot_count(shape: Shape) -> u8 {
    if shape.is_void() {
        return 0;
    }
    ROT_COUNT[shape.index()]
}

pub fn top_ofs(shape: Shape, rot: u8) -> i32 {
    slot(shape, rot).map_or(0, |(s, r)| TOP_OFS[s][r])
}

pub fn left_ofs(shape: Shape, rot: u8) -> i32 {
    slot(shape, rot).map_or(0, |(s, r)| LEFT_OFS[s][r])
}

pub fn right_ofs(shape: Shape, rot: u8) -> i32 {
    slot(shape, rot).map_or(0, |(s, r)| RIGHT_OFS[s][r])
}

/// A shape in a rotation state at a field position.
///
/// Pieces are small `Copy` values; every transform returns a new piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece {
    pub shape: Shape,
    pub rot: u8,
    pub pos: Pos,
}

impl Piece {
    pub fn new(shape: Shape, rot: u8, pos: Pos) -> Self {
        Self { shape, rot, pos }
    }

    pub fn is_void(&self) -> bool {
        self.shape.is_void()
    }

    pub fn bitmap(&self) -> PieceBitmap {
        bitmap(self.shape, self.rot)
    }

    pub fn rot_count(&self) -> u8 {
        rot_count(self.shape)
    }

    pub fn top_ofs(&self) -> i32 {
        top_ofs(self.shape, self.rot)
    }

    pub fn left_ofs(&self) -> i32 {
        left_ofs(self.shape, self.rot)
    }

    pub fn right_ofs(&self) -> i32 {
        right_ofs(self.shape, self.rot)
    }

    /// Shift by `dx` columns (positive = left).
    #[must_use]
    pub fn move_x(&self, dx: i32) -> Self {
        self.moved(Pos::new(dx, 0))
    }

    /// Shift by `dy` rows (positive = up).
    #[must_use]
    pub fn move_y(&self, dy: i32) -> Self {
        self.moved(Pos::new(0, dy))
    }

    #[must_use]
    pub fn moved(&self, delta: Pos) -> Self {
        Self {
            pos: self.pos + delta,
            ..*self
        }
    }

    /// Turn by `steps` (positive = left), wrapping modulo the rotation count.
    #[must_use]
    pub fn rotate(&self, steps: i32) -> Self {
        let count = i32::from(self.rot_count());
        if count == 0 {
            return *self;
        }
        let rot = (i32::from(self.rot) + steps).rem_euclid(count);
        Self {
            rot: rot as u8,
            ..*self
        }
    }
}

/// Creates pieces for one field size.
///
/// The spawn position depends on the bordered field size, so every piece that
/// is randomized or invalidated goes through a factory built for that field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceFactory {
    field_size: Size,
}

impl PieceFactory {
    pub fn new(field_size: Size) -> Self {
        Self { field_size }
    }

    pub fn field_size(&self) -> Size {
        self.field_size
    }

    /// Horizontally centered spawn position on the ceiling row. The line piece
    /// spawns one row lower so that it sits flush with the ceiling.
    pub fn spawn_pos(&self, shape: Shape) -> Pos {
        let x = (self.field_size.x - PIECE_WIDTH) / 2;
        let y = self.field_size.y - 1;
        if shape == Shape::I {
            Pos::new(x, y - 1)
        } else {
            Pos::new(x, y)
        }
    }

    /// A spawn-positioned piece in rotation 0.
    pub fn spawn(&self, shape: Shape) -> Piece {
        Piece::new(shape, 0, self.spawn_pos(shape))
    }

    /// Draw a uniformly random shape.
    pub fn randomize(&self, rng: &mut Xorshift128) -> Piece {
        self.spawn(Shape::from_index(rng.next_range(Shape::COUNT)))
    }

    /// The "no piece" sentinel.
    pub fn invalid(&self) -> Piece {
        self.spawn(Shape::Void)
    }
}
