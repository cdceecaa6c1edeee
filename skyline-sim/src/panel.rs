//! Simulated HT16K33 bank and ASCII rendering
//!
//! [`SimBus`] decodes the command bytes the driver puts on the bus and keeps
//! each unit's state, so what gets drawn is what a real panel would show.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use skyline_display::{DIGITS_PER_UNIT, DIGIT_X, DIGIT_Y, UNIT_COUNT, UNIT_RAM_SIZE};
use skyline_drivers::ht16k33::BASE_ADDRESS;
use skyline_hal::I2cBus;
use thiserror::Error;

/// Bus errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimBusError {
    #[error("no device at address {0:#04x}")]
    Nack(u8),
    #[error("unsupported transfer: {0} bytes starting with {1:#04x}")]
    Unsupported(usize, u8),
}

/// State of one HT16K33
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitState {
    pub oscillator: bool,
    pub display_on: bool,
    pub brightness: u8,
    pub ram: [u8; UNIT_RAM_SIZE],
}

impl UnitState {
    /// Segment pattern of one digit, gathered back from the planes
    pub fn digit_pattern(&self, digit: usize) -> u8 {
        let (half, bit) = if digit < 8 { (0, digit) } else { (1, digit - 8) };
        (0..8).fold(0u8, |pattern, plane| {
            if self.ram[plane * 2 + half] & (1 << bit) != 0 {
                pattern | (0x80 >> plane)
            } else {
                pattern
            }
        })
    }
}

/// All units of one building
pub type Panel = [UnitState; UNIT_COUNT];

/// I2C bus with three simulated HT16K33 units attached
#[derive(Clone, Default)]
pub struct SimBus {
    panel: Rc<RefCell<Panel>>,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the units
    pub fn panel(&self) -> Panel {
        *self.panel.borrow()
    }
}

impl I2cBus for SimBus {
    type Error = SimBusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), SimBusError> {
        let unit = address
            .checked_sub(BASE_ADDRESS)
            .map(usize::from)
            .filter(|&unit| unit < UNIT_COUNT)
            .ok_or(SimBusError::Nack(address))?;
        let mut panel = self.panel.borrow_mut();
        let state = &mut panel[unit];

        match data {
            [0x00, ram @ ..] if ram.len() == UNIT_RAM_SIZE => state.ram.copy_from_slice(ram),
            [cmd] if cmd & 0xF0 == 0x20 => state.oscillator = cmd & 0x01 != 0,
            [cmd] if cmd & 0xF0 == 0x80 => state.display_on = cmd & 0x01 != 0,
            [cmd] if cmd & 0xF0 == 0xE0 => state.brightness = cmd & 0x0F,
            _ => {
                return Err(SimBusError::Unsupported(
                    data.len(),
                    data.first().copied().unwrap_or(0),
                ))
            }
        }
        Ok(())
    }
}

/// Grid cell patterns as the units display them
pub fn grid(panel: &Panel) -> [[u8; DIGIT_X]; DIGIT_Y] {
    let mut grid = [[0u8; DIGIT_X]; DIGIT_Y];
    for (unit, state) in panel.iter().enumerate() {
        if !(state.oscillator && state.display_on) {
            continue;
        }
        for digit in 0..DIGITS_PER_UNIT {
            let y = unit * (DIGIT_Y / UNIT_COUNT) + digit / DIGIT_X;
            grid[y][digit % DIGIT_X] = state.digit_pattern(digit);
        }
    }
    grid
}

/// Draw a grid as three text lines per row
pub fn render(grid: &[[u8; DIGIT_X]; DIGIT_Y]) -> String {
    let lit = |pattern: u8, bit: u8, c: char| if pattern & bit != 0 { c } else { ' ' };
    let mut out = String::new();
    for row in grid {
        let mut lines = [String::new(), String::new(), String::new()];
        for &p in row {
            let _ = write!(lines[0], " {}  ", lit(p, 0x80, '_'));
            let _ = write!(
                lines[1],
                "{}{}{} ",
                lit(p, 0x04, '|'),
                lit(p, 0x02, '_'),
                lit(p, 0x40, '|')
            );
            let _ = write!(
                lines[2],
                "{}{}{}{}",
                lit(p, 0x08, '|'),
                lit(p, 0x10, '_'),
                lit(p, 0x20, '|'),
                lit(p, 0x01, '.')
            );
        }
        for line in lines {
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyline_display::{encode_units, Building, DisplayBuffer, RenderMode};
    use skyline_drivers::Ht16k33;

    #[test]
    fn test_unknown_address_nacks() {
        let mut bus = SimBus::new();
        assert_eq!(bus.write(0x73, &[0x21]), Err(SimBusError::Nack(0x73)));
        assert_eq!(bus.write(0x10, &[0x21]), Err(SimBusError::Nack(0x10)));
        assert_eq!(
            bus.write(0x70, &[0x00, 1, 2]),
            Err(SimBusError::Unsupported(3, 0x00))
        );
    }

    #[test]
    fn test_building_round_trips_through_units() {
        let bus = SimBus::new();
        let mut building = Building::initialize(Ht16k33::new(bus.clone())).unwrap();
        building.buffer_mut().show_meta_number(5, RenderMode::Reverse);
        building.update().unwrap();

        let panel = bus.panel();
        assert!(panel.iter().all(|u| u.oscillator && u.display_on && u.brightness == 4));
        assert_eq!(&grid(&panel), building.buffer().rows());

        let images = encode_units(building.buffer());
        for (state, image) in panel.iter().zip(images.iter()) {
            assert_eq!(&state.ram, image);
        }
    }

    #[test]
    fn test_dark_units_show_nothing() {
        let mut panel = Panel::default();
        panel[0].ram = [0xFF; UNIT_RAM_SIZE];
        assert_eq!(grid(&panel), DisplayBuffer::new().rows().clone());
    }

    #[test]
    fn test_render_single_cell() {
        let mut cells = [[0u8; DIGIT_X]; DIGIT_Y];
        // Digit 8 with point
        cells[0][0] = 0xFF;
        let text = render(&cells);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), DIGIT_Y * 3);
        assert_eq!(lines[0], " _");
        assert_eq!(lines[1], "|_|");
        assert_eq!(lines[2], "|_|.");
        assert!(lines[3..].iter().all(|l| l.is_empty()));
    }
}
