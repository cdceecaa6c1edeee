//! HT16K33 LED Driver
//!
//! Driver for a chain of HT16K33 RAM-mapping LED controllers on one I2C bus.
//! Unit `n` answers at `BASE_ADDRESS + n` (address pins strapped per unit).

use skyline_display::{DisplayUnits, UnitImage, UNIT_COUNT};
use skyline_hal::I2cBus;

/// I2C address of the first unit
pub const BASE_ADDRESS: u8 = 0x70;

/// HT16K33 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_DATA_ADDRESS: u8 = 0x00;
    pub const SYSTEM_SETUP: u8 = 0x20;
    pub const OSCILLATOR_ON: u8 = 0x01;
    pub const DISPLAY_SETUP: u8 = 0x80;
    pub const DISPLAY_ON: u8 = 0x01;
    pub const BLINK_OFF: u8 = 0x00;
    pub const DIMMING_SET: u8 = 0xE0;
}

/// Bank of HT16K33 units sharing one bus
pub struct Ht16k33<I2C> {
    i2c: I2C,
}

impl<I2C: I2cBus> Ht16k33<I2C> {
    /// Create a driver for `UNIT_COUNT` units starting at [`BASE_ADDRESS`]
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Bus address of a unit
    pub fn address(unit: usize) -> u8 {
        assert!(unit < UNIT_COUNT, "unit out of range: {}", unit);
        BASE_ADDRESS + unit as u8
    }

    /// Send a single-byte command
    fn command(&mut self, unit: usize, cmd: u8) -> Result<(), I2C::Error> {
        self.i2c.write(Self::address(unit), &[cmd])
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2cBus> DisplayUnits for Ht16k33<I2C> {
    type Error = I2C::Error;

    fn init_unit(&mut self, unit: usize) -> Result<(), Self::Error> {
        self.command(unit, cmd::SYSTEM_SETUP | cmd::OSCILLATOR_ON)?;
        self.command(unit, cmd::DISPLAY_SETUP | cmd::DISPLAY_ON | cmd::BLINK_OFF)
    }

    fn set_brightness(&mut self, unit: usize, level: u8) -> Result<(), Self::Error> {
        self.command(unit, cmd::DIMMING_SET | (level & 0x0F))
    }

    fn set_display(&mut self, unit: usize, image: &UnitImage) -> Result<(), Self::Error> {
        let mut data = [0u8; 1 + core::mem::size_of::<UnitImage>()];
        data[0] = cmd::DISPLAY_DATA_ADDRESS;
        data[1..].copy_from_slice(image);
        self.i2c.write(Self::address(unit), &data)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use skyline_display::Building;
    use std::vec;
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingBus {
        writes: Vec<(u8, Vec<u8>)>,
    }

    impl I2cBus for RecordingBus {
        type Error = ();

        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), ()> {
            self.writes.push((address, data.to_vec()));
            Ok(())
        }
    }

    #[test]
    fn test_unit_addresses() {
        assert_eq!(Ht16k33::<RecordingBus>::address(0), 0x70);
        assert_eq!(Ht16k33::<RecordingBus>::address(2), 0x72);
    }

    #[test]
    fn test_init_sequence() {
        let mut driver = Ht16k33::new(RecordingBus::default());
        driver.init_unit(1).unwrap();
        driver.set_brightness(1, 4).unwrap();

        let bus = driver.release();
        assert_eq!(
            bus.writes,
            vec![(0x71, vec![0x21]), (0x71, vec![0x81]), (0x71, vec![0xE4])]
        );
    }

    #[test]
    fn test_display_write_prefixes_ram_address() {
        let mut driver = Ht16k33::new(RecordingBus::default());
        let image: UnitImage = core::array::from_fn(|i| i as u8 + 1);
        driver.set_display(2, &image).unwrap();

        let bus = driver.release();
        let (address, data) = &bus.writes[0];
        assert_eq!(*address, 0x72);
        assert_eq!(data.len(), 17);
        assert_eq!(data[0], 0x00);
        assert_eq!(&data[1..], &image);
    }

    #[test]
    fn test_building_update_over_bus() {
        let mut bus = RecordingBus::default();
        let mut building = Building::initialize(Ht16k33::new(&mut bus)).unwrap();
        building.buffer_mut().set_pattern(0, 0, 0x80);
        building.update().unwrap();
        drop(building);

        // 3 units x (setup, display on, dimming) + 3 RAM writes
        assert_eq!(bus.writes.len(), 12);
        let (address, data) = &bus.writes[9];
        assert_eq!(*address, 0x70);
        assert_eq!(data[1], 0x01);
    }
}
