//! Meta-segment stencils and the digit table
//!
//! A meta-segment is one segment of the giant numeral. Each one is drawn by
//! lighting a fixed set of small segments across the grid; the stencil for
//! a meta-segment is a full 6x6 grid of cell patterns.

use crate::buffer::{DIGIT_X, DIGIT_Y};

/// Number of meta-segments (a..g and the decimal point)
pub const META_SEGMENT_COUNT: usize = 8;

/// Stencil for one meta-segment, indexed `[y][x]`
pub type Stencil = [[u8; DIGIT_X]; DIGIT_Y];

/// Stencils indexed by meta-segment: a, b, c, d, e, f, g, *
pub const META_SEGMENT_TABLE: [Stencil; META_SEGMENT_COUNT] = [
    // a
    [
        [0x00, 0x21, 0x3B, 0x3B, 0x3B, 0x00],
        [0x00, 0x00, 0x80, 0x80, 0x80, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    ],
    // b
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x71, 0x1E],
        [0x00, 0x00, 0x00, 0x00, 0xE2, 0x8E],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    ],
    // c
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x31, 0x1A],
        [0x00, 0x00, 0x00, 0x00, 0xE3, 0x8E],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    ],
    // d
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x01, 0x11, 0x11, 0x00, 0x00],
        [0x00, 0xC0, 0xC6, 0xC6, 0x04, 0x00],
    ],
    // e
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x21, 0x1A, 0x00, 0x00, 0x00, 0x00],
        [0xF3, 0x8E, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    ],
    // f
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x21, 0xFF, 0x00, 0x00, 0x00, 0x00],
        [0x61, 0xCE, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    ],
    // g
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x01, 0x11, 0x11, 0x00, 0x00],
        [0x00, 0x40, 0xC6, 0xC6, 0x84, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    ],
    // *
    [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        [0x00, 0x00, 0x00, 0x00, 0x00, 0xC6],
    ],
];

/// Meta-segment mask per digit; bit 7 is segment a, bit 0 the decimal point
pub const NUMBER_SEGMENT_TABLE: [u8; 16] = [
    0xFC, // 0
    0x60, // 1
    0xDA, // 2
    0xF2, // 3
    0x66, // 4
    0xB6, // 5
    0xBE, // 6
    0xE4, // 7
    0xFE, // 8
    0xF6, // 9
    0xEE, // A
    0x3E, // b
    0x1A, // c
    0x7A, // d
    0x9E, // E
    0x8E, // F
];

/// Bit in a segment mask for meta-segment `segment` (0 = a, 7 = *)
pub const fn segment_bit(segment: usize) -> u8 {
    0x80 >> segment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stencils_are_disjoint() {
        for y in 0..DIGIT_Y {
            for x in 0..DIGIT_X {
                let mut seen = 0u8;
                for stencil in &META_SEGMENT_TABLE {
                    assert_eq!(seen & stencil[y][x], 0, "overlap at ({x}, {y})");
                    seen |= stencil[y][x];
                }
            }
        }
    }

    #[test]
    fn test_every_stencil_lights_something() {
        for stencil in &META_SEGMENT_TABLE {
            assert!(stencil.iter().flatten().any(|&cell| cell != 0));
        }
    }

    #[test]
    fn test_decimal_digits_never_light_point() {
        for mask in &NUMBER_SEGMENT_TABLE[..10] {
            assert_eq!(mask & segment_bit(7), 0);
        }
    }

    #[test]
    fn test_segment_bit() {
        assert_eq!(segment_bit(0), 0x80);
        assert_eq!(segment_bit(6), 0x02);
        assert_eq!(segment_bit(7), 0x01);
    }
}
