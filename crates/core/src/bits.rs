//! Bitmask helpers shared by the field and the piece catalogue.
//!
//! Field rows are `u32` words where bit 0 is the rightmost (border) column.

/// Single-bit mask for `index` in `0..32`, else 0.
#[inline]
pub const fn bit_of(index: i32) -> u32 {
    if index >= 0 && index < 32 {
        1 << index
    } else {
        0
    }
}

/// Mask of the low `width` bits (clamped to `0..=32`).
#[inline]
pub const fn mask_of(width: i32) -> u32 {
    if width <= 0 {
        0
    } else if width >= 32 {
        u32::MAX
    } else {
        (1 << width) - 1
    }
}

/// Logical shift: left for positive `count`, right for negative.
///
/// This is how a piece's local bitmap is moved to its field column.
#[inline]
pub const fn shift(bitmap: u32, count: i32) -> u32 {
    if count >= 32 || count <= -32 {
        0
    } else if count > 0 {
        bitmap << count
    } else if count < 0 {
        bitmap >> -count
    } else {
        bitmap
    }
}

/// Number of set bits within the low `width` bits.
#[inline]
pub const fn pop_count(bitmap: u32, width: i32) -> u32 {
    (bitmap & mask_of(width)).count_ones()
}
