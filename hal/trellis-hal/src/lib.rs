//! Trellis Hardware Abstraction Layer
//!
//! This crate defines the register-bus trait that the matrix drivers are
//! written against. Chip-specific HALs (or any `embedded-hal` I2C
//! implementation through [`i2c::EmbeddedHalI2c`]) provide the transport.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  trellis-drivers (Ht16k33, ...)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  trellis-hal (this crate - I2cBus)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │  host mocks / │
//! │  I2c impls    │       │  custom buses │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - I2C bus operations

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod i2c;

pub use i2c::{EmbeddedHalI2c, I2cBus};
