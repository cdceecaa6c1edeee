//! Radio callback plumbing
//!
//! Receive callbacks run in the radio stack's context. They either queue the
//! datagram for the main loop ([`deliver`] into an [`InboundChannel`]) or
//! dispatch immediately through a [`SharedReceiver`], which serializes
//! access to the building against the main loop.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use heapless::Vec;
use skyline_display::DisplayUnits;
use skyline_hal::MacAddress;

use super::receiver::FrameReceiver;

/// Largest datagram the radio hands over
pub const MAX_DATAGRAM_SIZE: usize = 250;

/// Datagram queued by the receive callback
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InboundFrame {
    pub from: MacAddress,
    pub data: Vec<u8, MAX_DATAGRAM_SIZE>,
}

impl InboundFrame {
    /// Copy a datagram; `None` if it exceeds [`MAX_DATAGRAM_SIZE`]
    pub fn new(from: MacAddress, bytes: &[u8]) -> Option<Self> {
        Vec::from_slice(bytes).ok().map(|data| Self { from, data })
    }
}

/// Queue between the receive callback and the main loop
pub type InboundChannel<M, const N: usize> = Channel<M, InboundFrame, N>;

/// Queue a datagram from the receive callback without blocking
///
/// Returns `false` if the datagram was dropped (queue full or oversized).
pub fn deliver<M: RawMutex, const N: usize>(
    channel: &InboundChannel<M, N>,
    from: &MacAddress,
    bytes: &[u8],
) -> bool {
    let Some(frame) = InboundFrame::new(*from, bytes) else {
        trace!("Oversized datagram from {}: {}", from, bytes.len());
        return false;
    };
    match channel.try_send(frame) {
        Ok(()) => true,
        Err(_) => {
            warn!("Inbound queue full, frame from {} dropped", from);
            false
        }
    }
}

impl<U: DisplayUnits> FrameReceiver<U> {
    /// Handle every queued datagram; returns how many were taken
    pub fn drain<M: RawMutex, const N: usize>(&mut self, channel: &InboundChannel<M, N>) -> usize {
        let mut handled = 0;
        while let Ok(frame) = channel.try_receive() {
            self.on_frame(&frame.from, &frame.data);
            handled += 1;
        }
        handled
    }
}

/// Receiver shared between the radio callback and the main loop
pub struct SharedReceiver<M: RawMutex, U> {
    inner: Mutex<M, RefCell<FrameReceiver<U>>>,
}

impl<M: RawMutex, U: DisplayUnits> SharedReceiver<M, U> {
    pub fn new(receiver: FrameReceiver<U>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(receiver)),
        }
    }

    /// Dispatch a datagram under the lock
    pub fn on_frame(&self, from: &MacAddress, bytes: &[u8]) {
        self.inner
            .lock(|receiver| receiver.borrow_mut().on_frame(from, bytes));
    }

    /// Run `f` with exclusive access to the receiver
    pub fn with<T>(&self, f: impl FnOnce(&mut FrameReceiver<U>) -> T) -> T {
        self.inner.lock(|receiver| f(&mut *receiver.borrow_mut()))
    }

    pub fn into_inner(self) -> FrameReceiver<U> {
        self.inner.into_inner().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use skyline_display::{Building, DisplayBuffer, RenderMode, UnitImage};
    use skyline_protocol::WireFrame;

    const MASTER: MacAddress = MacAddress([0x24, 0x0A, 0xC4, 0, 0, 1]);

    struct NullUnits;

    impl DisplayUnits for NullUnits {
        type Error = ();

        fn init_unit(&mut self, _unit: usize) -> Result<(), ()> {
            Ok(())
        }

        fn set_brightness(&mut self, _unit: usize, _level: u8) -> Result<(), ()> {
            Ok(())
        }

        fn set_display(&mut self, _unit: usize, _image: &UnitImage) -> Result<(), ()> {
            Ok(())
        }
    }

    fn receiver() -> FrameReceiver<NullUnits> {
        FrameReceiver::new(Building::initialize(NullUnits).unwrap())
    }

    fn frame(digit: u8, sampling_number: u8) -> [u8; 64] {
        let mut buffer = DisplayBuffer::new();
        buffer.show_meta_number(digit, RenderMode::Normal);
        WireFrame::new(sampling_number, 4, buffer.get_pattern_all()).encode()
    }

    #[test]
    fn test_queue_then_drain() {
        let channel: InboundChannel<NoopRawMutex, 4> = Channel::new();
        assert!(deliver(&channel, &MASTER, &frame(1, 0)));
        assert!(deliver(&channel, &MASTER, &frame(2, 1)));

        let mut rx = receiver();
        assert_eq!(rx.drain(&channel), 2);
        assert_eq!(rx.last_sampling_number(), Some(1));
        assert_eq!(rx.drain(&channel), 0);
    }

    #[test]
    fn test_full_queue_drops() {
        let channel: InboundChannel<NoopRawMutex, 1> = Channel::new();
        assert!(deliver(&channel, &MASTER, &frame(1, 0)));
        assert!(!deliver(&channel, &MASTER, &frame(2, 1)));

        let mut rx = receiver();
        assert_eq!(rx.drain(&channel), 1);
        assert_eq!(rx.last_sampling_number(), Some(0));
    }

    #[test]
    fn test_oversized_datagram_rejected() {
        let channel: InboundChannel<NoopRawMutex, 1> = Channel::new();
        let bytes = [0u8; MAX_DATAGRAM_SIZE + 1];
        assert!(!deliver(&channel, &MASTER, &bytes));
        assert!(InboundFrame::new(MASTER, &bytes[..MAX_DATAGRAM_SIZE]).is_some());
    }

    #[test]
    fn test_shared_receiver_dispatch() {
        let shared: SharedReceiver<NoopRawMutex, _> = SharedReceiver::new(receiver());
        shared.on_frame(&MASTER, &frame(6, 42));
        shared.on_frame(&MASTER, &[0u8; 10]);

        let stats = shared.with(|rx| rx.stats());
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.dropped, 1);

        let rx = shared.into_inner();
        let mut expected = DisplayBuffer::new();
        expected.show_meta_number(6, RenderMode::Normal);
        assert_eq!(rx.building().buffer(), &expected);
    }
}
