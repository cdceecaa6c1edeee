//! Receiver-side frame dispatch
//!
//! Every valid frame fully overwrites the local grid, applies the carried
//! brightness and refreshes the units. Ordering is not enforced: the last
//! frame handled wins. Gaps in the sampling counter are only reported.

use skyline_display::{Building, DisplayUnits};
use skyline_hal::MacAddress;
use skyline_protocol::WireFrame;

/// Receiver counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceiveStats {
    /// Frames decoded and applied
    pub accepted: u32,
    /// Datagrams rejected by the decoder
    pub dropped: u32,
    /// Frames whose counter did not follow the previous one
    pub gaps: u32,
    /// Display bus failures while applying a frame
    pub bus_errors: u32,
}

/// Mirrors the master's building from incoming frames
pub struct FrameReceiver<U> {
    building: Building<U>,
    last_sampling_number: Option<u8>,
    stats: ReceiveStats,
}

impl<U: DisplayUnits> FrameReceiver<U> {
    pub fn new(building: Building<U>) -> Self {
        Self {
            building,
            last_sampling_number: None,
            stats: ReceiveStats::default(),
        }
    }

    /// Handle one datagram; malformed ones are dropped without touching
    /// the display
    pub fn on_frame(&mut self, from: &MacAddress, bytes: &[u8]) {
        let frame = match WireFrame::decode(bytes) {
            Ok(frame) => frame,
            Err(e) => {
                trace!("Dropped {} bytes from {}: {:?}", bytes.len(), from, e);
                self.stats.dropped = self.stats.dropped.wrapping_add(1);
                return;
            }
        };

        if let Some(previous) = self.last_sampling_number {
            let expected = previous.wrapping_add(1);
            if frame.sampling_number != expected {
                debug!(
                    "Sampling gap: expected {}, got {}",
                    expected,
                    frame.sampling_number
                );
                self.stats.gaps = self.stats.gaps.wrapping_add(1);
            }
        }
        self.last_sampling_number = Some(frame.sampling_number);
        self.stats.accepted = self.stats.accepted.wrapping_add(1);
        trace!("Received {} from {}", frame.sampling_number, from);

        self.building.buffer_mut().set_pattern_all(&frame.pattern);
        if self.apply(frame.brightness).is_err() {
            warn!("Display update failed for frame {}", frame.sampling_number);
            self.stats.bus_errors = self.stats.bus_errors.wrapping_add(1);
        }
    }

    /// The grid is pushed even when the brightness write fails; the first
    /// error is returned
    fn apply(&mut self, brightness: u8) -> Result<(), U::Error> {
        let dimmed = if brightness != self.building.brightness() {
            self.building.set_brightness(brightness)
        } else {
            Ok(())
        };
        let updated = self.building.update();
        dimmed.and(updated)
    }

    /// Counter of the last accepted frame
    pub fn last_sampling_number(&self) -> Option<u8> {
        self.last_sampling_number
    }

    pub fn stats(&self) -> ReceiveStats {
        self.stats
    }

    pub fn building(&self) -> &Building<U> {
        &self.building
    }
}
