//! Point-to-multipoint radio abstractions
//!
//! Models a connectionless datagram radio with a small peer table, as found
//! on low-power Wi-Fi chips: nodes advertise a name, the sender scans for
//! them, registers them as peers and then fires datagrams at each peer.
//! Delivery is best effort; nothing here retries.

use core::fmt;

use heapless::String;

/// Length of a radio hardware address
pub const MAC_LEN: usize = 6;

/// Maximum advertised name length
pub const MAX_SSID_LEN: usize = 32;

/// Radio hardware address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacAddress(pub [u8; MAC_LEN]);

impl MacAddress {
    /// Create an address from raw bytes
    pub const fn new(bytes: [u8; MAC_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes
    pub const fn octets(&self) -> &[u8; MAC_LEN] {
        &self.0
    }

    /// Parse a colon separated address (`"aa:bb:cc:dd:ee:ff"`)
    ///
    /// Hex digits may be upper or lower case; each group holds one or two
    /// digits. Returns `None` unless exactly six groups are present.
    pub fn parse(text: &str) -> Option<Self> {
        let mut bytes = [0u8; MAC_LEN];
        let mut groups = text.split(':');
        for byte in bytes.iter_mut() {
            let group = groups.next()?;
            if group.is_empty() || group.len() > 2 {
                return None;
            }
            *byte = u8::from_str_radix(group, 16).ok()?;
        }
        if groups.next().is_some() {
            return None;
        }
        Some(Self(bytes))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// Peer table entry handed to the radio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeerInfo {
    /// Peer hardware address
    pub address: MacAddress,
    /// Radio channel the peer listens on
    pub channel: u8,
    /// Link-layer encryption (always off for Skyline links)
    pub encrypt: bool,
}

impl PeerInfo {
    /// Unencrypted peer on the given channel
    pub const fn new(address: MacAddress, channel: u8) -> Self {
        Self {
            address,
            channel,
            encrypt: false,
        }
    }
}

/// One node seen during a network scan
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanRecord {
    /// Advertised name
    pub ssid: String<MAX_SSID_LEN>,
    /// Hardware address of the advertising node
    pub bssid: MacAddress,
    /// Signal strength in dBm
    pub rssi: i8,
}

/// Errors from registering a peer with the radio stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeerError {
    /// Radio stack not initialized
    NotInitialized,
    /// Invalid peer description
    InvalidArgument,
    /// Peer table full
    Full,
    /// Out of memory
    NoMemory,
    /// Peer already registered
    AlreadyExists,
    /// Unclassified failure
    Unknown,
}

/// Errors from submitting a datagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError {
    /// Radio stack not initialized
    NotInitialized,
    /// Invalid address or payload
    InvalidArgument,
    /// Internal stack error
    Internal,
    /// Out of memory
    NoMemory,
    /// Destination is not a registered peer
    NotFound,
    /// Unclassified failure
    Unknown,
}

/// Delivery status reported after a send completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendStatus {
    /// Link layer acknowledged the datagram
    Success,
    /// Datagram was not acknowledged
    Fail,
}

/// Datagram radio
///
/// Reception is not part of this trait: the platform delivers inbound
/// datagrams through its own callback, which forwards the raw bytes to the
/// frame receiver.
pub trait Radio {
    /// Error type for stack bring-up
    type Error;

    /// Bring up the datagram stack
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Register a peer in the stack's peer table
    fn add_peer(&mut self, peer: &PeerInfo) -> Result<(), PeerError>;

    /// Submit a datagram to a registered peer
    ///
    /// Returns once the datagram is queued; the delivery outcome arrives
    /// later as a [`SendStatus`].
    fn send(&mut self, to: &MacAddress, data: &[u8]) -> Result<(), SendError>;
}

/// Network scanner
pub trait NetworkScanner {
    /// Error type for scan failures
    type Error;

    /// Run a blocking scan and visit every record in discovery order
    ///
    /// Returns the number of records visited. Records are released when the
    /// call returns.
    fn scan<F: FnMut(&ScanRecord)>(&mut self, visit: F) -> Result<usize, Self::Error>;
}
