//! Skyline Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the display and
//! synchronization logic is written against. Board support code implements
//! them for a concrete chip; the host simulator implements them in memory.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  skyline-core / skyline-display         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  skyline-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ board support │       │  skyline-sim  │
//! │  (firmware)   │       │   (in-memory) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - I2C bus shared by the LED driver units
//! - [`radio::Radio`] - Point-to-multipoint datagram radio
//! - [`radio::NetworkScanner`] - Discovery of advertising nodes

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod radio;

// Re-export key traits at crate root for convenience
pub use i2c::I2cBus;
pub use radio::{
    MacAddress, NetworkScanner, PeerError, PeerInfo, Radio, ScanRecord, SendError, SendStatus,
};
