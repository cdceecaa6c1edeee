//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the display traits for
//! the chips used in the building:
//!
//! - HT16K33 16x8 LED matrix driver (one per pair of grid rows)

#![no_std]
#![deny(unsafe_code)]

pub mod ht16k33;

pub use ht16k33::Ht16k33;
