//! Peer discovery and pairing
//!
//! Receivers advertise a name containing a known prefix. The master scans,
//! keeps the matching nodes as candidates, and pairs each candidate with the
//! radio stack. Both lists are fixed-capacity; overflow is dropped, never
//! grown.

use core::fmt::Write;

use heapless::{String, Vec};
use skyline_hal::radio::MAX_SSID_LEN;
use skyline_hal::{MacAddress, NetworkScanner, PeerError, PeerInfo, Radio};

/// Peer table size of the current radio stack
pub const ESP_NOW_PEER_MAX: usize = 15;

/// Peer table size of the first-generation nodes
pub const LEGACY_PEER_MAX: usize = 20;

/// Outcome of a pairing attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PairStatus {
    /// Newly registered
    Paired,
    /// Already in the registry, nothing done
    AlreadyPaired,
    /// Radio stack not initialized
    NotInitialized,
    /// Radio rejected the peer description
    InvalidArgument,
    /// Registry or radio peer table is full
    ListFull,
    /// Radio ran out of memory
    OutOfMemory,
    /// Radio already knew the peer; adopted into the registry
    AlreadyExists,
    /// Unclassified radio failure
    Unknown,
}

impl PairStatus {
    /// Whether the peer ends up registered
    pub fn is_paired(&self) -> bool {
        matches!(
            self,
            PairStatus::Paired | PairStatus::AlreadyPaired | PairStatus::AlreadyExists
        )
    }

    /// Whether the operator needs to hear about this outcome
    ///
    /// These mean the registry or the radio stack is exhausted or
    /// misconfigured; rescanning will not fix them.
    pub fn is_operator_visible(&self) -> bool {
        matches!(
            self,
            PairStatus::NotInitialized | PairStatus::ListFull | PairStatus::OutOfMemory
        )
    }
}

impl From<PeerError> for PairStatus {
    fn from(e: PeerError) -> Self {
        match e {
            PeerError::NotInitialized => PairStatus::NotInitialized,
            PeerError::InvalidArgument => PairStatus::InvalidArgument,
            PeerError::Full => PairStatus::ListFull,
            PeerError::NoMemory => PairStatus::OutOfMemory,
            PeerError::AlreadyExists => PairStatus::AlreadyExists,
            PeerError::Unknown => PairStatus::Unknown,
        }
    }
}

/// Result of one discovery scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanSummary {
    /// Nodes seen by the radio
    pub visible: usize,
    /// Nodes whose name matched the prefix
    pub matched: usize,
    /// Matching nodes that did not fit the candidate list
    pub dropped: usize,
}

/// Bounded set of receiver nodes
#[derive(Debug, Clone)]
pub struct PeerRegistry<const N: usize> {
    channel: u8,
    /// Matches from the latest scan, in discovery order
    candidates: Vec<PeerInfo, N>,
    /// Candidates registered with the radio; broadcast targets
    paired: Vec<PeerInfo, N>,
}

impl<const N: usize> PeerRegistry<N> {
    /// Create an empty registry for peers on `channel`
    pub const fn new(channel: u8) -> Self {
        Self {
            channel,
            candidates: Vec::new(),
            paired: Vec::new(),
        }
    }

    /// Replace the candidate list with the nodes advertising `prefix`
    ///
    /// Discovery order is kept. Matches beyond capacity are dropped. Peers
    /// that are no longer candidates stop being broadcast targets. A failed
    /// scan empties the candidates but keeps the paired peers.
    pub fn scan<S: NetworkScanner>(
        &mut self,
        scanner: &mut S,
        prefix: &str,
    ) -> Result<ScanSummary, S::Error> {
        self.candidates.clear();
        let channel = self.channel;
        let candidates = &mut self.candidates;
        let mut matched = 0;
        let mut dropped = 0;

        let visible = scanner.scan(|record| {
            trace!("{}: {} ({})", record.ssid.as_str(), record.bssid, record.rssi);
            if !record.ssid.contains(prefix) {
                return;
            }
            if candidates.iter().any(|peer| peer.address == record.bssid) {
                return;
            }
            matched += 1;
            if candidates.push(PeerInfo::new(record.bssid, channel)).is_err() {
                dropped += 1;
            }
        })?;

        let summary = ScanSummary {
            visible,
            matched,
            dropped,
        };

        let candidates = &self.candidates;
        self.paired.retain(|peer| {
            let present = candidates.iter().any(|c| c.address == peer.address);
            if !present {
                info!("Peer {} gone, unpaired", peer.address);
            }
            present
        });

        if summary.visible == 0 {
            info!("No devices found");
        } else {
            info!("Found {} devices, {} matching", summary.visible, summary.matched);
        }
        if summary.matched == 0 {
            info!("No peer found, trying again");
        }

        Ok(summary)
    }

    /// Make sure `address` is registered with the radio
    ///
    /// Idempotent: an address already in the registry is reported as
    /// [`PairStatus::AlreadyPaired`] without touching the radio. A full
    /// registry reports [`PairStatus::ListFull`] without touching it either.
    pub fn ensure_paired<R: Radio>(&mut self, radio: &mut R, address: MacAddress) -> PairStatus {
        let status = self.try_pair(radio, address);
        if status.is_operator_visible() {
            warn!("Pairing {}: {:?}", address, status);
        } else {
            info!("Pairing {}: {:?}", address, status);
        }
        status
    }

    fn try_pair<R: Radio>(&mut self, radio: &mut R, address: MacAddress) -> PairStatus {
        if self.is_paired(&address) {
            return PairStatus::AlreadyPaired;
        }
        if self.paired.is_full() {
            return PairStatus::ListFull;
        }

        let peer = PeerInfo::new(address, self.channel);
        let status = match radio.add_peer(&peer) {
            Ok(()) => PairStatus::Paired,
            Err(e) => PairStatus::from(e),
        };
        if status.is_paired() {
            // Capacity was checked above
            let _ = self.paired.push(peer);
        }
        status
    }

    /// Pair every candidate from the latest scan
    ///
    /// Returns the number of candidates that are paired afterwards.
    pub fn pair_candidates<R: Radio>(&mut self, radio: &mut R) -> usize {
        let mut paired = 0;
        for i in 0..self.candidates.len() {
            let address = self.candidates[i].address;
            if self.ensure_paired(radio, address).is_paired() {
                paired += 1;
            }
        }
        paired
    }

    /// Whether `address` is registered
    pub fn is_paired(&self, address: &MacAddress) -> bool {
        self.paired.iter().any(|peer| peer.address == *address)
    }

    /// Registered peers
    pub fn peers(&self) -> &[PeerInfo] {
        &self.paired
    }

    /// Candidates from the latest scan
    pub fn candidates(&self) -> &[PeerInfo] {
        &self.candidates
    }

    /// Number of registered peers
    pub fn len(&self) -> usize {
        self.paired.len()
    }

    /// Whether no peer is registered
    pub fn is_empty(&self) -> bool {
        self.paired.is_empty()
    }

    /// Maximum number of peers
    pub const fn capacity(&self) -> usize {
        N
    }
}

/// Name a receiver advertises: `<prefix>:<mac>`
pub fn advertised_name(prefix: &str, mac: &MacAddress) -> String<MAX_SSID_LEN> {
    let mut name = String::new();
    // Overlong prefixes are cut off at capacity
    let _ = write!(name, "{}:{}", prefix, mac);
    name
}
