//! Display synchronization
//!
//! The master renders, pushes the grid to its own units and broadcasts it;
//! receivers overwrite their grid with whatever valid frame arrives last.
//!
//! ```text
//! master:   input ─▶ render ─▶ encode ─┬─▶ HT16K33
//!                                      └─▶ broadcast ─ ─ ─▶ receiver:
//!                                            decode ─▶ overwrite ─▶ HT16K33
//! ```

pub mod link;
pub mod master;
pub mod receiver;

pub use link::{deliver, InboundChannel, InboundFrame, SharedReceiver, MAX_DATAGRAM_SIZE};
pub use master::{BroadcastReport, MasterEvent, MasterState, SyncScheduler};
pub use receiver::{FrameReceiver, ReceiveStats};

use skyline_hal::Radio;

/// Synchronization errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError<E> {
    /// Radio stack failed to come up; the node must restart
    RadioInit,
    /// Display bus error
    Display(E),
}

/// Bring up the radio stack
///
/// Failure is unrecoverable for the node's wireless role. The caller is
/// expected to restart the node.
pub fn init_radio<R: Radio, E>(radio: &mut R) -> Result<(), SyncError<E>> {
    match radio.init() {
        Ok(()) => {
            info!("Radio init success");
            Ok(())
        }
        Err(_) => {
            error!("Radio init failed");
            Err(SyncError::RadioInit)
        }
    }
}
