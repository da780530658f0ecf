//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in trellis-core for LED/keyscan matrix controllers:
//!
//! - HT16K33 16x8 LED driver with 13x3 key scan (Adafruit Trellis)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod matrix;

pub use matrix::ht16k33::Ht16k33;
pub use trellis_core::traits::{Device, Keypad, LedMatrix, TrellisExt};
