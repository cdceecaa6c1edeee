//! Logical display grid
//!
//! Each cell holds the segment pattern of one 7-segment digit. Bits map to
//! segments a, b, c, d, e, f, g, * from bit 7 down to bit 0.
//!
//! Coordinates are always derived from fixed-size iteration inside the
//! crate, so an out-of-range coordinate is a logic error and panics.

use skyline_protocol::PATTERN_SIZE;

/// Grid width in digits
pub const DIGIT_X: usize = 6;

/// Grid height in digits
pub const DIGIT_Y: usize = 6;

/// Number of cells, also the serialized size
pub const CELL_COUNT: usize = DIGIT_X * DIGIT_Y;

const _: () = assert!(CELL_COUNT == PATTERN_SIZE);

/// Logical grid of segment patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayBuffer {
    cells: [[u8; DIGIT_X]; DIGIT_Y],
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayBuffer {
    /// Create a blank grid
    pub const fn new() -> Self {
        Self {
            cells: [[0; DIGIT_X]; DIGIT_Y],
        }
    }

    fn cell_mut(&mut self, x: usize, y: usize) -> &mut u8 {
        assert!(x < DIGIT_X, "x out of range: {}", x);
        assert!(y < DIGIT_Y, "y out of range: {}", y);
        &mut self.cells[y][x]
    }

    /// Read one cell
    pub fn pattern(&self, x: usize, y: usize) -> u8 {
        assert!(x < DIGIT_X && y < DIGIT_Y, "cell out of range: ({}, {})", x, y);
        self.cells[y][x]
    }

    /// Overwrite one cell
    pub fn set_pattern(&mut self, x: usize, y: usize, pattern: u8) {
        *self.cell_mut(x, y) = pattern;
    }

    /// Light the segments in `pattern`, keeping the others
    pub fn or_pattern(&mut self, x: usize, y: usize, pattern: u8) {
        *self.cell_mut(x, y) |= pattern;
    }

    /// Turn off the segments in `pattern`, keeping the others
    pub fn and_pattern(&mut self, x: usize, y: usize, pattern: u8) {
        *self.cell_mut(x, y) &= !pattern;
    }

    /// Turn every segment off
    pub fn clear(&mut self) {
        self.cells = [[0x00; DIGIT_X]; DIGIT_Y];
    }

    /// Turn every segment on
    pub fn fill(&mut self) {
        self.cells = [[0xFF; DIGIT_X]; DIGIT_Y];
    }

    /// Complement every cell
    pub fn reverse(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            *cell = !*cell;
        }
    }

    /// Load the grid from its row-major serialized form
    pub fn set_pattern_all(&mut self, bytes: &[u8; CELL_COUNT]) {
        for (row, chunk) in self.cells.iter_mut().zip(bytes.chunks_exact(DIGIT_X)) {
            row.copy_from_slice(chunk);
        }
    }

    /// Serialize the grid row-major
    pub fn get_pattern_all(&self) -> [u8; CELL_COUNT] {
        let mut bytes = [0u8; CELL_COUNT];
        for (chunk, row) in bytes.chunks_exact_mut(DIGIT_X).zip(self.cells.iter()) {
            chunk.copy_from_slice(row);
        }
        bytes
    }

    /// Borrow the grid rows
    pub fn rows(&self) -> &[[u8; DIGIT_X]; DIGIT_Y] {
        &self.cells
    }
}
