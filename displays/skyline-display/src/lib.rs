//! Display engine for the Skyline building
//!
//! The building is a 6x6 grid of 7-segment digits driven by three HT16K33
//! units, two grid rows per unit. This crate provides:
//! - [`DisplayBuffer`]: the logical grid and its mutation primitives
//! - Meta-digit rendering: one giant numeral drawn across the whole grid,
//!   using the small segments as macro pixels
//! - [`encode_units`]: the scatter from grid cells into each unit's RAM image
//! - [`Building`]: a buffer bound to the physical units
//!
//! # Data Flow
//!
//! ```text
//! DisplayBuffer ──encode_units──▶ [UnitImage; 3] ──DisplayUnits──▶ HT16K33 x3
//!       │
//!       └──get_pattern_all──▶ 36 bytes ──▶ WireFrame
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

#[macro_use]
mod fmt;

pub mod buffer;
pub mod building;
pub mod encoder;
pub mod meta;
pub mod stencil;
pub mod units;

// Re-export key types
pub use buffer::{DisplayBuffer, CELL_COUNT, DIGIT_X, DIGIT_Y};
pub use building::{Building, DEFAULT_BRIGHTNESS, MAX_BRIGHTNESS};
pub use encoder::{encode_units, UnitImage, DIGITS_PER_UNIT, UNIT_COUNT, UNIT_RAM_SIZE};
pub use meta::RenderMode;
pub use units::DisplayUnits;
