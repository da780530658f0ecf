//! Hardware abstraction traits
//!
//! These traits define the interface between application logic and a
//! concrete matrix controller driver.

pub mod device;
pub mod matrix;

pub use device::Device;
pub use matrix::{Keypad, LedMatrix, TrellisExt};
