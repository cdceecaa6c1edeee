//! Master-side scheduler
//!
//! Drives the master node from a non-blocking polling loop. Each cycle
//! renders the current scene, pushes it to the local units, broadcasts it
//! to every paired receiver and schedules the next cycle. The interval is
//! re-derived every cycle from the operator's analog level, so the refresh
//! rate follows the knob.

use skyline_display::{Building, DisplayUnits, RenderMode, MAX_BRIGHTNESS};
use skyline_hal::{MacAddress, NetworkScanner, Radio, SendStatus};
use skyline_protocol::{WireFrame, FRAME_SIZE};

use super::{init_radio, SyncError};
use crate::config::NodeConfig;
use crate::input::{ClickGesture, ControlInput, ControlSample};
use crate::peers::PeerRegistry;

/// Number of decimal digits the operator cycles through
const DIGIT_COUNT: u8 = 10;

/// Master states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MasterState {
    /// Radio not yet brought up
    Uninitialized,
    /// Discovering and pairing receivers
    Scanning,
    /// Waiting for the next update or rescan
    Ready,
    /// Applying input and drawing the scene
    Render,
    /// Writing the units and building the frame
    Encode,
    /// Sending the frame to every peer
    Broadcast,
    /// Advancing the counter and arming the next deadline
    ScheduleNext,
}

/// Events driving [`MasterState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MasterEvent {
    /// Radio stack is up
    RadioReady,
    /// Scan and pairing finished
    ScanComplete,
    /// Rescan deadline passed
    RescanDue,
    /// Update deadline passed
    UpdateDue,
    /// Scene drawn
    Rendered,
    /// Units written, frame built
    Encoded,
    /// Frame sent to every peer
    Broadcasted,
    /// Next deadline armed
    Scheduled,
}

impl MasterState {
    /// Process an event and return the next state
    pub fn transition(self, event: MasterEvent) -> Self {
        use MasterEvent::*;
        use MasterState::*;

        match (self, event) {
            (Uninitialized, RadioReady) => Scanning,
            (Scanning, ScanComplete) => Ready,
            (Ready, RescanDue) => Scanning,
            (Ready, UpdateDue) => Render,
            (Render, Rendered) => Encode,
            (Encode, Encoded) => Broadcast,
            (Broadcast, Broadcasted) => ScheduleNext,
            (ScheduleNext, Scheduled) => Ready,

            // Default: stay in current state
            _ => self,
        }
    }

    /// Check if an update cycle is in progress
    pub fn in_cycle(&self) -> bool {
        matches!(
            self,
            MasterState::Render
                | MasterState::Encode
                | MasterState::Broadcast
                | MasterState::ScheduleNext
        )
    }
}

/// Outcome of the last broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BroadcastReport {
    /// Sampling number carried by the frame
    pub sampling_number: u8,
    /// Datagrams accepted by the radio
    pub sent: usize,
    /// Datagrams the radio refused
    pub failed: usize,
}

/// Whether `deadline` has been reached on a wrapping millisecond clock
fn is_due(now_ms: u32, deadline_ms: u32) -> bool {
    (now_ms.wrapping_sub(deadline_ms) as i32) >= 0
}

/// Master node: owns the building, the radio and the peer registry
pub struct SyncScheduler<U, R, S, const N: usize> {
    config: NodeConfig,
    state: MasterState,
    building: Building<U>,
    radio: R,
    scanner: S,
    registry: PeerRegistry<N>,
    sampling_number: u8,
    digit: u8,
    mode: RenderMode,
    /// Out-of-range brightness request already reported
    rejected_brightness: Option<u8>,
    next_update_ms: u32,
    next_scan_ms: u32,
    last_broadcast: BroadcastReport,
}

impl<U, R, S, const N: usize> SyncScheduler<U, R, S, N>
where
    U: DisplayUnits,
    R: Radio,
    S: NetworkScanner,
{
    /// Assemble a master node; nothing runs until [`start`](Self::start)
    pub fn new(config: NodeConfig, building: Building<U>, radio: R, scanner: S) -> Self {
        let registry = PeerRegistry::new(config.channel);
        Self {
            config,
            state: MasterState::Uninitialized,
            building,
            radio,
            scanner,
            registry,
            sampling_number: 0,
            digit: 0,
            mode: RenderMode::Normal,
            rejected_brightness: None,
            next_update_ms: 0,
            next_scan_ms: 0,
            last_broadcast: BroadcastReport::default(),
        }
    }

    /// Bring up the radio and arm the first scan and update
    pub fn start(&mut self, now_ms: u32) -> Result<(), SyncError<U::Error>> {
        assert_eq!(self.state, MasterState::Uninitialized, "scheduler started twice");
        init_radio(&mut self.radio)?;
        self.building
            .set_brightness(self.config.initial_brightness)
            .map_err(SyncError::Display)?;

        self.next_scan_ms = now_ms;
        self.next_update_ms = now_ms;
        self.advance(MasterEvent::RadioReady);
        Ok(())
    }

    /// Run whatever is due at `now_ms`; never blocks beyond one scan
    pub fn poll<I: ControlInput>(
        &mut self,
        now_ms: u32,
        input: &mut I,
    ) -> Result<(), SyncError<U::Error>> {
        assert_ne!(self.state, MasterState::Uninitialized, "scheduler polled before start");

        if self.state == MasterState::Ready && is_due(now_ms, self.next_scan_ms) {
            self.advance(MasterEvent::RescanDue);
        }
        if self.state == MasterState::Scanning {
            self.scan_peers(now_ms);
            self.advance(MasterEvent::ScanComplete);
        }
        if self.state == MasterState::Ready && is_due(now_ms, self.next_update_ms) {
            self.advance(MasterEvent::UpdateDue);
            return self.run_cycle(now_ms, input);
        }
        Ok(())
    }

    fn advance(&mut self, event: MasterEvent) {
        let next = self.state.transition(event);
        trace!("{:?} --{:?}--> {:?}", self.state, event, next);
        self.state = next;
    }

    fn scan_peers(&mut self, now_ms: u32) {
        match self
            .registry
            .scan(&mut self.scanner, self.config.ssid_prefix.as_str())
        {
            Ok(summary) if summary.matched > 0 => {
                info!("{} peer(s) found, processing", summary.matched);
                self.registry.pair_candidates(&mut self.radio);
            }
            Ok(_) => {}
            Err(_) => warn!("Scan failed"),
        }
        self.next_scan_ms = now_ms.wrapping_add(self.config.rescan_interval_ms);
    }

    /// One full cycle; the bus error, if any, is reported after the cycle
    /// has been completed and the next one armed
    fn run_cycle<I: ControlInput>(
        &mut self,
        now_ms: u32,
        input: &mut I,
    ) -> Result<(), SyncError<U::Error>> {
        let sample = input.sample();

        let rendered = self.render(&sample);
        self.advance(MasterEvent::Rendered);

        let (frame, updated) = self.encode();
        self.advance(MasterEvent::Encoded);

        self.broadcast(&frame);
        self.advance(MasterEvent::Broadcasted);

        self.schedule_next(now_ms, sample.level);
        self.advance(MasterEvent::Scheduled);

        rendered.and(updated).map_err(SyncError::Display)
    }

    fn render(&mut self, sample: &ControlSample) -> Result<(), U::Error> {
        match sample.click {
            Some(ClickGesture::Single) => self.digit = (self.digit + 1) % DIGIT_COUNT,
            Some(ClickGesture::Double) => self.mode = self.mode.toggled(),
            Some(ClickGesture::Long) => self.digit = 0,
            None => {}
        }

        self.building
            .buffer_mut()
            .show_meta_number(self.digit, self.mode);

        let requested = sample.brightness;
        if requested > MAX_BRIGHTNESS {
            if self.rejected_brightness != Some(requested) {
                warn!("brightness range error! ({})", requested);
                self.rejected_brightness = Some(requested);
            }
            return Ok(());
        }
        self.rejected_brightness = None;

        if requested != self.building.brightness() {
            self.building.set_brightness(requested)?;
        }
        Ok(())
    }

    fn encode(&mut self) -> ([u8; FRAME_SIZE], Result<(), U::Error>) {
        let updated = self.building.update();
        let frame = WireFrame::new(
            self.sampling_number,
            self.building.brightness(),
            self.building.buffer().get_pattern_all(),
        );
        (frame.encode(), updated)
    }

    fn broadcast(&mut self, frame: &[u8; FRAME_SIZE]) {
        let mut report = BroadcastReport {
            sampling_number: self.sampling_number,
            ..Default::default()
        };

        if self.registry.is_empty() {
            debug!("No peer to send to");
        }
        for (i, peer) in self.registry.peers().iter().enumerate() {
            if i == 0 {
                debug!("Sending: {}", self.sampling_number);
            }
            match self.radio.send(&peer.address, frame) {
                Ok(()) => {
                    report.sent += 1;
                    debug!("Send to {}: Success", peer.address);
                }
                Err(e) => {
                    report.failed += 1;
                    warn!("Send to {}: {:?}", peer.address, e);
                }
            }
        }
        self.last_broadcast = report;
    }

    fn schedule_next(&mut self, now_ms: u32, level: u16) {
        self.sampling_number = self.sampling_number.wrapping_add(1);
        self.next_update_ms = now_ms.wrapping_add(self.config.update_interval_ms(level));
    }

    /// Delivery callback from the radio; informational only
    pub fn on_send_complete(&self, to: &MacAddress, status: SendStatus) {
        match status {
            SendStatus::Success => debug!("Last packet sent to {}: Delivery Success", to),
            SendStatus::Fail => debug!("Last packet sent to {}: Delivery Fail", to),
        }
    }

    /// Current state
    pub fn state(&self) -> MasterState {
        self.state
    }

    /// Counter the next frame will carry
    pub fn sampling_number(&self) -> u8 {
        self.sampling_number
    }

    /// Resume the counter from a known value
    pub fn set_sampling_number(&mut self, sampling_number: u8) {
        self.sampling_number = sampling_number;
    }

    /// Digit currently shown
    pub fn digit(&self) -> u8 {
        self.digit
    }

    /// Show another decimal digit from the next cycle on
    pub fn set_digit(&mut self, digit: u8) {
        assert!(digit < DIGIT_COUNT, "digit out of range: {}", digit);
        self.digit = digit;
    }

    /// Current polarity
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Switch polarity from the next cycle on
    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    /// Deadline of the next update cycle
    pub fn next_update_ms(&self) -> u32 {
        self.next_update_ms
    }

    /// Local building
    pub fn building(&self) -> &Building<U> {
        &self.building
    }

    /// Peer registry
    pub fn registry(&self) -> &PeerRegistry<N> {
        &self.registry
    }

    /// Radio
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// Outcome of the most recent broadcast
    pub fn last_broadcast(&self) -> BroadcastReport {
        self.last_broadcast
    }
}
