//! Board-agnostic core logic for HT16K33-style LED/keyscan matrices
//!
//! This crate holds everything that does not touch the bus:
//!
//! - Layout tables mapping logical pad indices to register bits
//! - The display RAM mirror used to stage LED changes
//! - The key-scan snapshot pair used for press/release edge detection
//! - Device configuration and error types
//! - Matrix and keypad capability traits

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod display;
pub mod error;
pub mod keys;
pub mod layout;
pub mod traits;

pub use config::{BlinkRate, DeviceConfig, DEFAULT_ADDRESS, MAX_BRIGHTNESS};
pub use display::DisplayBuffer;
pub use error::{Step, TransportError};
pub use keys::{KeyList, KeyState};
pub use layout::{
    ButtonLayout, Layout, LayoutError, LedLayout, RegisterAddress, Slot, TRELLIS_BUTTON_LAYOUT,
    TRELLIS_LED_LAYOUT,
};

#[cfg(feature = "serde")]
pub use error::ConfigError;
