//! Meta-digit rendering
//!
//! Draws a single numeral across the whole building. Each lit meta-segment
//! overlays its stencil onto the grid: ORed in for normal polarity, or
//! punched out of a lit field for reverse polarity.

use crate::buffer::{DisplayBuffer, DIGIT_X, DIGIT_Y};
use crate::stencil::{segment_bit, META_SEGMENT_COUNT, META_SEGMENT_TABLE, NUMBER_SEGMENT_TABLE};

/// Display polarity for meta-digit rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderMode {
    /// Lit numeral on a dark field
    #[default]
    Normal,
    /// Dark numeral punched out of a lit field
    Reverse,
}

impl RenderMode {
    /// The other polarity
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Normal => RenderMode::Reverse,
            RenderMode::Reverse => RenderMode::Normal,
        }
    }
}

impl DisplayBuffer {
    /// Overlay meta-digit `digit` in normal polarity
    ///
    /// Does not clear the grid first. `digit` indexes the 16-entry digit
    /// table (0-9, A-F); larger values panic.
    pub fn set_meta_number_pattern(&mut self, digit: u8) {
        self.draw_meta_number(digit, RenderMode::Normal);
    }

    /// Overlay meta-digit `digit` with the given polarity
    ///
    /// Segments are scanned from a (bit 7) down to the decimal point.
    pub fn draw_meta_number(&mut self, digit: u8, mode: RenderMode) {
        let digit = digit as usize;
        assert!(digit < NUMBER_SEGMENT_TABLE.len(), "meta digit out of range: {}", digit);
        let mask = NUMBER_SEGMENT_TABLE[digit];

        for segment in 0..META_SEGMENT_COUNT {
            if mask & segment_bit(segment) == 0 {
                continue;
            }
            let stencil = &META_SEGMENT_TABLE[segment];
            for y in 0..DIGIT_Y {
                for x in 0..DIGIT_X {
                    match mode {
                        RenderMode::Normal => self.or_pattern(x, y, stencil[y][x]),
                        RenderMode::Reverse => self.and_pattern(x, y, stencil[y][x]),
                    }
                }
            }
        }
    }

    /// Replace the grid with meta-digit `digit`
    ///
    /// Clears (normal) or fills (reverse) the background before drawing.
    pub fn show_meta_number(&mut self, digit: u8, mode: RenderMode) {
        match mode {
            RenderMode::Normal => self.clear(),
            RenderMode::Reverse => self.fill(),
        }
        self.draw_meta_number(digit, mode);
    }
}
