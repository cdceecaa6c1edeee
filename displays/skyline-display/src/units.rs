//! LED driver unit interface
//!
//! Defines the contract between the building and the physical driver chips.
//! Units are addressed by index (0..UNIT_COUNT); mapping an index to a bus
//! address is the implementation's business.

use crate::encoder::UnitImage;

/// Bank of LED driver units sharing one bus
///
/// Only [`Building`](crate::Building) calls into this trait, so the bus is
/// never written from anywhere else.
pub trait DisplayUnits {
    /// Bus error type
    type Error;

    /// Bring up a unit (oscillator on, display on)
    fn init_unit(&mut self, unit: usize) -> Result<(), Self::Error>;

    /// Set a unit's dimming level (0-15)
    fn set_brightness(&mut self, unit: usize, level: u8) -> Result<(), Self::Error>;

    /// Write a unit's complete display RAM
    fn set_display(&mut self, unit: usize, image: &UnitImage) -> Result<(), Self::Error>;
}
