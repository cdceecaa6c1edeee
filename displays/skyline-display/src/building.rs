//! Display buffer bound to the physical units
//!
//! A [`Building`] only exists after its units have been brought up, so
//! every mutation and update happens on initialized hardware.

use crate::buffer::DisplayBuffer;
use crate::encoder::{encode_units, UNIT_COUNT};
use crate::units::DisplayUnits;

/// Highest valid brightness level
pub const MAX_BRIGHTNESS: u8 = 15;

/// Brightness applied to every unit at bring-up
pub const DEFAULT_BRIGHTNESS: u8 = 4;

/// The building: logical grid plus the units that show it
pub struct Building<U> {
    buffer: DisplayBuffer,
    units: U,
    brightness: u8,
}

impl<U: DisplayUnits> Building<U> {
    /// Bring up every unit and bind it to a blank grid
    pub fn initialize(mut units: U) -> Result<Self, U::Error> {
        for unit in 0..UNIT_COUNT {
            units.init_unit(unit)?;
            units.set_brightness(unit, DEFAULT_BRIGHTNESS)?;
        }

        Ok(Self {
            buffer: DisplayBuffer::new(),
            units,
            brightness: DEFAULT_BRIGHTNESS,
        })
    }

    /// Set every unit's brightness
    ///
    /// Levels above [`MAX_BRIGHTNESS`] are logged and ignored; the current
    /// level stays in effect.
    pub fn set_brightness(&mut self, level: u8) -> Result<(), U::Error> {
        if level > MAX_BRIGHTNESS {
            warn!("brightness range error! ({})", level);
            return Ok(());
        }

        for unit in 0..UNIT_COUNT {
            self.units.set_brightness(unit, level)?;
        }
        self.brightness = level;
        Ok(())
    }

    /// Current brightness level
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Borrow the logical grid
    pub fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    /// Mutably borrow the logical grid
    ///
    /// Changes reach the hardware on the next [`update`](Self::update).
    pub fn buffer_mut(&mut self) -> &mut DisplayBuffer {
        &mut self.buffer
    }

    /// Push the grid to every unit
    pub fn update(&mut self) -> Result<(), U::Error> {
        let images = encode_units(&self.buffer);
        debug!("display update: {} units", UNIT_COUNT);
        for (unit, image) in images.iter().enumerate() {
            self.units.set_display(unit, image)?;
        }
        Ok(())
    }

    /// Borrow the unit bank
    pub fn units(&self) -> &U {
        &self.units
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;
    use crate::encoder::UnitImage;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Init(usize),
        Brightness(usize, u8),
        Display(usize, UnitImage),
    }

    #[derive(Default)]
    struct MockUnits {
        calls: Vec<Call>,
        fail_on_init: bool,
    }

    impl DisplayUnits for MockUnits {
        type Error = ();

        fn init_unit(&mut self, unit: usize) -> Result<(), ()> {
            if self.fail_on_init {
                return Err(());
            }
            self.calls.push(Call::Init(unit));
            Ok(())
        }

        fn set_brightness(&mut self, unit: usize, level: u8) -> Result<(), ()> {
            self.calls.push(Call::Brightness(unit, level));
            Ok(())
        }

        fn set_display(&mut self, unit: usize, image: &UnitImage) -> Result<(), ()> {
            self.calls.push(Call::Display(unit, *image));
            Ok(())
        }
    }

    #[test]
    fn test_initialize_brings_up_every_unit() {
        let building = Building::initialize(MockUnits::default()).unwrap();
        assert_eq!(
            building.units().calls,
            vec![
                Call::Init(0),
                Call::Brightness(0, DEFAULT_BRIGHTNESS),
                Call::Init(1),
                Call::Brightness(1, DEFAULT_BRIGHTNESS),
                Call::Init(2),
                Call::Brightness(2, DEFAULT_BRIGHTNESS),
            ]
        );
        assert_eq!(building.brightness(), DEFAULT_BRIGHTNESS);
    }

    #[test]
    fn test_initialize_propagates_bus_error() {
        let units = MockUnits {
            fail_on_init: true,
            ..Default::default()
        };
        assert!(Building::initialize(units).is_err());
    }

    #[test]
    fn test_brightness_out_of_range_is_ignored() {
        let mut building = Building::initialize(MockUnits::default()).unwrap();
        let before = building.units().calls.len();

        building.set_brightness(16).unwrap();
        building.set_brightness(0xFF).unwrap();

        assert_eq!(building.units().calls.len(), before);
        assert_eq!(building.brightness(), DEFAULT_BRIGHTNESS);
    }

    #[test]
    fn test_brightness_applies_to_all_units() {
        let mut building = Building::initialize(MockUnits::default()).unwrap();
        building.set_brightness(MAX_BRIGHTNESS).unwrap();

        let tail = &building.units().calls[6..];
        assert_eq!(
            tail,
            &[
                Call::Brightness(0, 15),
                Call::Brightness(1, 15),
                Call::Brightness(2, 15),
            ]
        );
        assert_eq!(building.brightness(), 15);
    }

    #[test]
    fn test_update_writes_one_image_per_unit() {
        let mut building = Building::initialize(MockUnits::default()).unwrap();
        building.buffer_mut().set_pattern(0, 0, 0x80);
        building.buffer_mut().set_pattern(0, 4, 0x80);
        building.update().unwrap();

        let displays: Vec<_> = building
            .units()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Display(unit, image) => Some((*unit, *image)),
                _ => None,
            })
            .collect();

        assert_eq!(displays.len(), UNIT_COUNT);
        assert_eq!(displays[0].1[0], 0x01);
        assert_eq!(displays[1].1, [0u8; 16]);
        assert_eq!(displays[2].1[0], 0x01);
    }
}
