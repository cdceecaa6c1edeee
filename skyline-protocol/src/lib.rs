//! Skyline Synchronization Protocol
//!
//! This crate defines the datagram the master node broadcasts to keep the
//! receiver nodes' displays identical to its own. Every datagram carries the
//! complete display state, so a receiver only ever needs the latest frame.
//!
//! # Frame Layout
//!
//! ```text
//! ┌───────┬─────────┬──────────┬────────────┬──────┬───────────┬──────────┐
//! │ MAGIC │ VERSION │ SAMPLING │ BRIGHTNESS │ RSVD │ PATTERN   │ RSVD     │
//! │ 4B    │ 1B      │ 1B       │ 1B         │ 1B   │ 36B       │ 20B      │
//! └───────┴─────────┴──────────┴────────────┴──────┴───────────┴──────────┘
//! ```
//!
//! The frame is always exactly 64 bytes. There is no checksum: the radio's
//! link layer already drops corrupted datagrams, and the magic guards
//! against foreign traffic on the same channel.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod frame;

pub use frame::{FrameError, WireFrame, FRAME_MAGIC, FRAME_SIZE, PATTERN_SIZE, PROTOCOL_VERSION};
