//! In-memory mirror of the display RAM
//!
//! LED changes are staged here and only reach the chip when the driver
//! flushes the buffer. Batching many `set_led` calls into one flush keeps
//! bus traffic to a single transaction.

use crate::layout::{LedLayout, DISPLAY_BUFFER_LEN};

/// Display RAM mirror
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayBuffer {
    bytes: [u8; DISPLAY_BUFFER_LEN],
    layout: LedLayout,
}

impl DisplayBuffer {
    /// Create an all-off buffer using the given LED layout
    pub const fn new(layout: LedLayout) -> Self {
        Self {
            bytes: [0; DISPLAY_BUFFER_LEN],
            layout,
        }
    }

    /// Turn one LED on or off in the buffer
    ///
    /// Indices above 15 fold to LED 0. Last write wins.
    pub fn set_led(&mut self, idx: u8, on: bool) {
        let addr = self.layout.map(idx);
        if on {
            self.bytes[addr.offset()] |= addr.mask();
        } else {
            self.bytes[addr.offset()] &= !addr.mask();
        }
    }

    /// Whether the buffer has this LED on
    pub fn is_lit(&self, idx: u8) -> bool {
        let addr = self.layout.map(idx);
        self.bytes[addr.offset()] & addr.mask() != 0
    }

    /// Turn every LED off
    pub fn clear(&mut self) {
        self.bytes = [0; DISPLAY_BUFFER_LEN];
    }

    /// Raw register contents, in display RAM order
    pub const fn as_bytes(&self) -> &[u8; DISPLAY_BUFFER_LEN] {
        &self.bytes
    }

    /// The LED layout in use
    pub const fn layout(&self) -> &LedLayout {
        &self.layout
    }
}
