//! Node configuration
//!
//! One configuration describes a node in either role. It can be persisted
//! as postcard binary data (flash) or loaded from TOML by host tools.

use heapless::String;
use skyline_display::MAX_BRIGHTNESS;
use skyline_hal::radio::MAX_SSID_LEN;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name prefix receivers advertise and the master filters on
pub const DEFAULT_SSID_PREFIX: &str = "Slave";

/// Radio channel shared by all nodes
pub const DEFAULT_CHANNEL: u8 = 1;

/// Maximum serialized config size
pub const MAX_CONFIG_SIZE: usize = 64;

/// Node role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NodeRole {
    /// Renders locally and broadcasts frames
    #[default]
    Master,
    /// Mirrors the master's frames
    Receiver,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Discovery prefix is empty (would match every node)
    EmptyPrefix,
    /// Base update interval is zero
    ZeroInterval,
    /// Initial brightness above the display maximum
    BrightnessRange,
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
}

/// Node configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NodeConfig {
    /// Node role
    pub role: NodeRole,
    /// Substring the master looks for in advertised names
    pub ssid_prefix: String<MAX_SSID_LEN>,
    /// Radio channel for peers
    pub channel: u8,
    /// Fixed part of the master's update interval
    pub base_interval_ms: u32,
    /// Milliseconds added per unit of analog level
    pub level_step_ms: u32,
    /// Interval between peer scans on the master
    pub rescan_interval_ms: u32,
    /// Brightness applied once the node is up
    pub initial_brightness: u8,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let mut ssid_prefix = String::new();
        let _ = ssid_prefix.push_str(DEFAULT_SSID_PREFIX);
        Self {
            role: NodeRole::Master,
            ssid_prefix,
            channel: DEFAULT_CHANNEL,
            base_interval_ms: 100,
            level_step_ms: 1,
            rescan_interval_ms: 5000,
            initial_brightness: 4,
        }
    }
}

impl NodeConfig {
    /// Check values the scheduler relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ssid_prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        if self.base_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.initial_brightness > MAX_BRIGHTNESS {
            return Err(ConfigError::BrightnessRange);
        }
        Ok(())
    }

    /// Master update interval for an analog level
    pub fn update_interval_ms(&self, level: u16) -> u32 {
        self.base_interval_ms
            .saturating_add(u32::from(level).saturating_mul(self.level_step_ms))
    }

    /// Serialize into `buf` as postcard bytes
    #[cfg(feature = "serde")]
    pub fn to_postcard<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize from postcard bytes
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)
    }
}
