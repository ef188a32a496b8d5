//! Shared value types for the tetcon referee.
//!
//! Everything here is plain data with no dependencies, so the same vocabulary can
//! be used by the simulation core, the contest controller, the console view and
//! any decision routine.
//!
//! # Coordinates
//!
//! Playfields are *bordered*: a playable area of `W x H` cells is stored as
//! `(W + 2) x (H + 2)` so that walls, floor and ceiling are ordinary occupied
//! cells.
//!
//! - **X** counts columns from the right border (`x = 0`) towards the left.
//! - **Y** counts rows from the floor (`y = 0`) upwards.
//!
//! # Engine constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `PIECE_WIDTH` | 4 | Side of a piece's local bitmap |
//! | `FIELD_WIDTH_MAX` | 30 | Widest playable field (fits one `u32` per row) |
//! | `FIELD_HEIGHT_MAX` | 4096 | Tallest playable field |
//! | `GRAVITY_UNIT` | 10 | Gravity coefficient for one row per frame ("1G") |
//! | `LAND_BONUS_FRAME` | 10 | Landing grace frames before a resting piece locks |
//! | `PENALTY_ON_EXCEPTION` | 100 | Penalty for a faulting decision routine |
//! | `PIECES_PER_ROUND` | 1000 | Piece quota of one round |
//!
//! # Examples
//!
//! ```
//! use tetcon_types::{Event, Pos, Shape};
//!
//! let requested = Event::MOVE_L | Event::ROT_L;
//! assert!(requested.contains(Event::MOVE_L));
//! assert_eq!(requested.feedback(), Event::MOVE_L_BLOCKED | Event::ROT_L_BLOCKED);
//!
//! assert_eq!(Shape::from_str("t"), Some(Shape::T));
//! assert_eq!(Pos::new(1, 2) + Pos::new(3, 4), Pos::new(4, 6));
//! ```

pub mod event;

pub use event::Event;

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Side length of the local piece bitmap (4x4).
pub const PIECE_WIDTH: i32 = 4;

/// Widest playable field. Bordered rows must fit into 32 bits.
pub const FIELD_WIDTH_MAX: i32 = 30;

/// Tallest playable field.
pub const FIELD_HEIGHT_MAX: i32 = 4096;

/// Gravity coefficient of one row per frame.
pub const GRAVITY_UNIT: u32 = 10;

/// Frames a resting piece may still be steered before it locks.
pub const LAND_BONUS_FRAME: u32 = 10;

/// Penalty charged when a decision routine faults.
pub const PENALTY_ON_EXCEPTION: u32 = 100;

/// Number of pieces that make up one round.
pub const PIECES_PER_ROUND: u32 = 1000;

/// Integer position in bordered field coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Integer extent. For fields this is the bordered size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub x: i32,
    pub y: i32,
}

impl Size {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

macro_rules! impl_pair_ops {
    ($ty:ident) => {
        impl Add for $ty {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self::new(self.x + rhs.x, self.y + rhs.y)
            }
        }

        impl Sub for $ty {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self::new(self.x - rhs.x, self.y - rhs.y)
            }
        }

        impl AddAssign for $ty {
            fn add_assign(&mut self, rhs: Self) {
                self.x += rhs.x;
                self.y += rhs.y;
            }
        }

        impl SubAssign for $ty {
            fn sub_assign(&mut self, rhs: Self) {
                self.x -= rhs.x;
                self.y -= rhs.y;
            }
        }

        impl Neg for $ty {
            type Output = Self;
            fn neg(self) -> Self {
                Self::new(-self.x, -self.y)
            }
        }
    };
}

impl_pair_ops!(Pos);
impl_pair_ops!(Size);

/// The seven tetromino figures plus the `Void` sentinel ("no piece").
///
/// The discriminant is the catalogue index, so the order is fixed:
/// `I, O, S, Z, J, L, T, Void`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Shape {
    I = 0,
    O = 1,
    S = 2,
    Z = 3,
    J = 4,
    L = 5,
    T = 6,
    #[default]
    Void = 7,
}

impl Shape {
    /// Playable shapes in catalogue order.
    pub const ALL: [Shape; 7] = [
        Shape::I,
        Shape::O,
        Shape::S,
        Shape::Z,
        Shape::J,
        Shape::L,
        Shape::T,
    ];

    /// Number of playable shapes.
    pub const COUNT: u32 = 7;

    /// Map a catalogue index to a shape. Anything outside `0..7` is `Void`.
    ///
    /// ```
    /// use tetcon_types::Shape;
    ///
    /// assert_eq!(Shape::from_index(0), Shape::I);
    /// assert_eq!(Shape::from_index(6), Shape::T);
    /// assert_eq!(Shape::from_index(42), Shape::Void);
    /// ```
    pub fn from_index(index: u32) -> Self {
        Self::ALL.get(index as usize).copied().unwrap_or(Shape::Void)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_void(self) -> bool {
        self == Shape::Void
    }

    /// Parse a shape letter (case-insensitive). `Void` has no letter.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(Shape::I),
            "o" => Some(Shape::O),
            "s" => Some(Shape::S),
            "z" => Some(Shape::Z),
            "j" => Some(Shape::J),
            "l" => Some(Shape::L),
            "t" => Some(Shape::T),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::I => "i",
            Shape::O => "o",
            Shape::S => "s",
            Shape::Z => "z",
            Shape::J => "j",
            Shape::L => "l",
            Shape::T => "t",
            Shape::Void => "-",
        }
    }
}
