//! Grid to HT16K33 RAM encoding
//!
//! Each unit drives two grid rows, i.e. 12 digits. Its display RAM is laid
//! out by segment plane rather than by digit, so cell patterns have to be
//! scattered bit by bit:
//!
//! ```text
//!  RAM   | ROW0 1 ... 7 | 8 ... 11  12 ... 15
//! -------+--------------+-------------------
//!  00/01 | a  a ... a   | a ... a   -  ...  -
//!  02/03 | b  b ... b   | b ... b   -  ...  -
//!   ...  |              |
//!  0E/0F | *  * ... *   | * ... *   -  ...  -
//! ```
//!
//! Digit `d` of a unit is grid cell `(d % 6, 2 * unit + d / 6)`. Digits 0-7
//! sit in the even byte of each plane at bit `d`, digits 8-11 in the odd
//! byte at bit `d - 8`. Bits 4-7 of the odd bytes are never driven.

use crate::buffer::{DisplayBuffer, DIGIT_X, DIGIT_Y};

/// Number of HT16K33 units in the building
pub const UNIT_COUNT: usize = 3;

/// Size of one unit's display RAM image
pub const UNIT_RAM_SIZE: usize = 16;

/// Digits wired to each unit
pub const DIGITS_PER_UNIT: usize = 12;

/// Grid rows driven by each unit
pub const ROWS_PER_UNIT: usize = 2;

/// Segment planes per digit
const PLANE_COUNT: usize = 8;

/// Digits covered by the even byte of a plane
const DIGITS_PER_BYTE: usize = 8;

const _: () = assert!(UNIT_COUNT * ROWS_PER_UNIT == DIGIT_Y);
const _: () = assert!(ROWS_PER_UNIT * DIGIT_X == DIGITS_PER_UNIT);
const _: () = assert!(PLANE_COUNT * 2 == UNIT_RAM_SIZE);

/// One unit's display RAM contents
pub type UnitImage = [u8; UNIT_RAM_SIZE];

/// Encode the whole grid into one RAM image per unit
pub fn encode_units(buffer: &DisplayBuffer) -> [UnitImage; UNIT_COUNT] {
    core::array::from_fn(|unit| encode_unit(buffer, unit))
}

/// Encode the two grid rows owned by `unit`
pub fn encode_unit(buffer: &DisplayBuffer, unit: usize) -> UnitImage {
    assert!(unit < UNIT_COUNT, "unit out of range: {}", unit);
    let mut image = [0u8; UNIT_RAM_SIZE];
    for row in 0..ROWS_PER_UNIT {
        for x in 0..DIGIT_X {
            let digit = row * DIGIT_X + x;
            scatter_digit(&mut image, digit, buffer.pattern(x, unit * ROWS_PER_UNIT + row));
        }
    }
    image
}

/// Set the bits of `pattern` for `digit` in every segment plane
fn scatter_digit(image: &mut UnitImage, digit: usize, pattern: u8) {
    assert!(digit < DIGITS_PER_UNIT, "digit out of range: {}", digit);
    let (half, bit) = if digit < DIGITS_PER_BYTE {
        (0, digit)
    } else {
        (1, digit - DIGITS_PER_BYTE)
    };

    for plane in 0..PLANE_COUNT {
        if pattern & (0x80 >> plane) != 0 {
            image[plane * 2 + half] |= 1 << bit;
        }
    }
}
