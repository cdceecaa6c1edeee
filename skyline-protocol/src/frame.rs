//! Frame encoding and decoding for the Skyline synchronization link.
//!
//! Frame format (64 bytes, no padding):
//! - MAGIC (4 bytes): ASCII `7SEG`
//! - VERSION (1 byte): protocol version, currently 1
//! - SAMPLING (1 byte): sender's wrapping frame counter
//! - BRIGHTNESS (1 byte): 0-15
//! - RESERVED (1 byte): zero
//! - PATTERN (36 bytes): display cells, row-major 6x6
//! - RESERVED (20 bytes): zero

/// Frame magic bytes
pub const FRAME_MAGIC: [u8; 4] = *b"7SEG";

/// Current protocol version
pub const PROTOCOL_VERSION: u8 = 1;

/// Number of display cell bytes carried per frame
pub const PATTERN_SIZE: usize = 36;

/// Complete frame size
pub const FRAME_SIZE: usize = 64;

const VERSION_OFFSET: usize = 4;
const SAMPLING_OFFSET: usize = 5;
const BRIGHTNESS_OFFSET: usize = 6;
const PATTERN_OFFSET: usize = 8;

const _: () = assert!(PATTERN_OFFSET + PATTERN_SIZE + 20 == FRAME_SIZE);

/// Errors that can occur while decoding a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Datagram is not exactly [`FRAME_SIZE`] bytes
    InvalidLength,
    /// First four bytes are not [`FRAME_MAGIC`]
    BadMagic,
}

/// A decoded or constructed synchronization frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WireFrame {
    /// Protocol version (carried, not validated)
    pub version: u8,
    /// Sender's frame counter, wraps mod 256
    pub sampling_number: u8,
    /// Display brightness; range is enforced by the consumer
    pub brightness: u8,
    /// Display cells, row-major
    pub pattern: [u8; PATTERN_SIZE],
}

impl WireFrame {
    /// Create a frame for the current protocol version
    pub const fn new(sampling_number: u8, brightness: u8, pattern: [u8; PATTERN_SIZE]) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            sampling_number,
            brightness,
            pattern,
        }
    }

    /// Encode this frame into its 64-byte wire form
    ///
    /// Reserved bytes are always zero.
    pub fn encode(&self) -> [u8; FRAME_SIZE] {
        let mut buffer = [0u8; FRAME_SIZE];
        buffer[..VERSION_OFFSET].copy_from_slice(&FRAME_MAGIC);
        buffer[VERSION_OFFSET] = self.version;
        buffer[SAMPLING_OFFSET] = self.sampling_number;
        buffer[BRIGHTNESS_OFFSET] = self.brightness;
        buffer[PATTERN_OFFSET..PATTERN_OFFSET + PATTERN_SIZE].copy_from_slice(&self.pattern);
        buffer
    }

    /// Decode a received datagram
    ///
    /// Only the length and magic are checked. Field values are passed
    /// through untouched; an out-of-range brightness is the display's
    /// problem, not the codec's.
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() != FRAME_SIZE {
            return Err(FrameError::InvalidLength);
        }
        if bytes[..VERSION_OFFSET] != FRAME_MAGIC {
            return Err(FrameError::BadMagic);
        }

        let mut pattern = [0u8; PATTERN_SIZE];
        pattern.copy_from_slice(&bytes[PATTERN_OFFSET..PATTERN_OFFSET + PATTERN_SIZE]);

        Ok(Self {
            version: bytes[VERSION_OFFSET],
            sampling_number: bytes[SAMPLING_OFFSET],
            brightness: bytes[BRIGHTNESS_OFFSET],
            pattern,
        })
    }
}
