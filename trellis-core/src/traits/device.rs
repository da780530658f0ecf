//! Generic device capability

use core::fmt;

/// A bus peripheral with a printable identity
///
/// The `Display` output names the chip and where it lives on the bus.
pub trait Device: fmt::Display {
    /// Stop the device
    ///
    /// Never fails. The default does nothing, which is correct for chips
    /// whose bus is owned by the caller.
    fn halt(&mut self) {}
}
