//! In-memory radio
//!
//! Every node's radio shares one [`Ether`]. Datagrams sent to a receiver go
//! straight into its inbound queue, the way a receive callback would queue
//! them; the sender's delivery reports are collected for the main loop.

use std::cell::RefCell;
use std::rc::Rc;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use heapless::String;
use skyline_core::sync::{deliver, InboundChannel};
use skyline_hal::radio::MAX_SSID_LEN;
use skyline_hal::{
    MacAddress, NetworkScanner, PeerError, PeerInfo, Radio, ScanRecord, SendError, SendStatus,
};
use thiserror::Error;

/// Depth of each node's inbound queue
pub const INBOX_DEPTH: usize = 8;

/// Inbound queue of one simulated node
pub type Inbox = InboundChannel<NoopRawMutex, INBOX_DEPTH>;

/// Radio stack errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AirError {
    #[error("radio stack failed to start")]
    InitFailed,
}

/// A node visible on air
pub struct Station {
    pub mac: MacAddress,
    pub ssid: String<MAX_SSID_LEN>,
    pub rssi: i8,
    pub inbox: Inbox,
}

/// Shared medium
#[derive(Default)]
pub struct Ether {
    stations: Vec<Station>,
    reports: Vec<(MacAddress, SendStatus)>,
    loss_every: u32,
    transmitted: u32,
}

impl Ether {
    pub fn new(loss_every: u32) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            loss_every,
            ..Default::default()
        }))
    }

    /// Put a station on air; returns its index
    pub fn join(&mut self, mac: MacAddress, ssid: String<MAX_SSID_LEN>, rssi: i8) -> usize {
        self.stations.push(Station {
            mac,
            ssid,
            rssi,
            inbox: Inbox::new(),
        });
        self.stations.len() - 1
    }

    pub fn station(&self, index: usize) -> &Station {
        &self.stations[index]
    }

    /// Delivery reports since the last call
    pub fn take_reports(&mut self) -> Vec<(MacAddress, SendStatus)> {
        std::mem::take(&mut self.reports)
    }

    fn transmit(&mut self, from: &MacAddress, to: &MacAddress, data: &[u8]) {
        self.transmitted = self.transmitted.wrapping_add(1);
        let lost = self.loss_every != 0 && self.transmitted % self.loss_every == 0;
        let delivered = !lost
            && self
                .stations
                .iter()
                .find(|s| s.mac == *to)
                .is_some_and(|s| deliver(&s.inbox, from, data));
        if lost {
            log::trace!("air: datagram {} to {} lost", self.transmitted, to);
        }
        let status = if delivered {
            SendStatus::Success
        } else {
            SendStatus::Fail
        };
        self.reports.push((*to, status));
    }
}

/// One node's radio
pub struct SimRadio {
    ether: Rc<RefCell<Ether>>,
    mac: MacAddress,
    peers: Vec<PeerInfo>,
    peer_limit: usize,
    initialized: bool,
    fail_init: bool,
}

impl SimRadio {
    pub fn new(ether: Rc<RefCell<Ether>>, mac: MacAddress, peer_limit: usize) -> Self {
        Self {
            ether,
            mac,
            peers: Vec::new(),
            peer_limit,
            initialized: false,
            fail_init: false,
        }
    }

    /// Make [`Radio::init`] fail
    pub fn fail_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn mac(&self) -> MacAddress {
        self.mac
    }
}

impl Radio for SimRadio {
    type Error = AirError;

    fn init(&mut self) -> Result<(), AirError> {
        if self.fail_init {
            return Err(AirError::InitFailed);
        }
        self.initialized = true;
        Ok(())
    }

    fn add_peer(&mut self, peer: &PeerInfo) -> Result<(), PeerError> {
        if !self.initialized {
            return Err(PeerError::NotInitialized);
        }
        if self.peers.iter().any(|p| p.address == peer.address) {
            return Err(PeerError::AlreadyExists);
        }
        if self.peers.len() >= self.peer_limit {
            return Err(PeerError::Full);
        }
        self.peers.push(*peer);
        Ok(())
    }

    fn send(&mut self, to: &MacAddress, data: &[u8]) -> Result<(), SendError> {
        if !self.initialized {
            return Err(SendError::NotInitialized);
        }
        if data.is_empty() {
            return Err(SendError::InvalidArgument);
        }
        if !self.peers.iter().any(|p| p.address == *to) {
            return Err(SendError::NotFound);
        }
        self.ether.borrow_mut().transmit(&self.mac, to, data);
        Ok(())
    }
}

/// Scanner listing every other station on air
pub struct SimScanner {
    ether: Rc<RefCell<Ether>>,
    own: MacAddress,
}

impl SimScanner {
    pub fn new(ether: Rc<RefCell<Ether>>, own: MacAddress) -> Self {
        Self { ether, own }
    }
}

impl NetworkScanner for SimScanner {
    type Error = AirError;

    fn scan<F: FnMut(&ScanRecord)>(&mut self, mut visit: F) -> Result<usize, AirError> {
        let ether = self.ether.borrow();
        let mut visible = 0;
        for station in ether.stations.iter().filter(|s| s.mac != self.own) {
            visit(&ScanRecord {
                ssid: station.ssid.clone(),
                bssid: station.mac,
                rssi: station.rssi,
            });
            visible += 1;
        }
        Ok(visible)
    }
}
