//! Logical index to register-bit layout mapping
//!
//! The HT16K33 exposes LEDs and keys as bits in small register blocks. Which
//! bit belongs to which pad depends on how the board is wired, so each board
//! supplies a 16-entry table per direction (LED output and key input).
//!
//! Tables are validated once when they are built. After that every lookup is
//! infallible and always lands inside the target buffer.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of addressable pads (LEDs or keys) on the grid
pub const KEY_COUNT: usize = 16;

/// Highest valid logical index
pub const MAX_INDEX: u8 = (KEY_COUNT - 1) as u8;

/// Display RAM mirror size in bytes
pub const DISPLAY_BUFFER_LEN: usize = 8;

/// Key-scan RAM mirror size in bytes
pub const KEY_BUFFER_LEN: usize = 6;

/// One physical wire position: a byte in the register block and a bit in it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Slot {
    /// Byte offset in the register block
    pub offset: u8,
    /// Bit position within the byte (0-7)
    pub bit: u8,
}

impl Slot {
    /// Create a new slot
    pub const fn new(offset: u8, bit: u8) -> Self {
        Self { offset, bit }
    }
}

/// A resolved (byte offset, bit mask) pair
///
/// Only produced by [`Layout::map`], so the offset is always in bounds for
/// the buffer the layout was built for and the mask has exactly one bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterAddress {
    offset: u8,
    mask: u8,
}

impl RegisterAddress {
    /// Byte offset into the register block
    pub const fn offset(&self) -> usize {
        self.offset as usize
    }

    /// Single-bit mask within the byte
    pub const fn mask(&self) -> u8 {
        self.mask
    }
}

/// Errors raised when building a layout from a custom table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutError {
    /// Entry points past the end of the register block
    OffsetOutOfRange {
        /// Logical index of the bad entry
        index: u8,
    },
    /// Entry names a bit outside 0-7
    BitOutOfRange {
        /// Logical index of the bad entry
        index: u8,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffsetOutOfRange { index } => {
                write!(f, "layout entry {} has an out-of-range byte offset", index)
            }
            Self::BitOutOfRange { index } => {
                write!(f, "layout entry {} has a bit position above 7", index)
            }
        }
    }
}

/// Board layout table for a register block of `N` bytes
///
/// Out-of-range logical indices (above [`MAX_INDEX`]) fold to index 0
/// rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "[Slot; KEY_COUNT]", into = "[Slot; KEY_COUNT]")
)]
pub struct Layout<const N: usize> {
    slots: [Slot; KEY_COUNT],
}

/// Layout for the 8-byte display RAM
pub type LedLayout = Layout<DISPLAY_BUFFER_LEN>;

/// Layout for the 6-byte key-scan RAM
pub type ButtonLayout = Layout<KEY_BUFFER_LEN>;

impl<const N: usize> Layout<N> {
    /// Build a layout from a constant table
    ///
    /// # Panics
    ///
    /// Panics if any entry is out of range. In a `const` item this is a
    /// compile error; use [`Layout::try_new`] for tables built at runtime.
    pub const fn new(slots: [Slot; KEY_COUNT]) -> Self {
        match Self::try_new(slots) {
            Ok(layout) => layout,
            Err(LayoutError::OffsetOutOfRange { .. }) => {
                panic!("layout entry has an out-of-range byte offset")
            }
            Err(LayoutError::BitOutOfRange { .. }) => {
                panic!("layout entry has a bit position above 7")
            }
        }
    }

    /// Build a layout, checking every entry against the register block size
    pub const fn try_new(slots: [Slot; KEY_COUNT]) -> Result<Self, LayoutError> {
        let mut i = 0;
        while i < KEY_COUNT {
            let slot = slots[i];
            if slot.offset as usize >= N {
                return Err(LayoutError::OffsetOutOfRange { index: i as u8 });
            }
            if slot.bit > 7 {
                return Err(LayoutError::BitOutOfRange { index: i as u8 });
            }
            i += 1;
        }
        Ok(Self { slots })
    }

    /// Resolve a logical index to its register address
    ///
    /// Indices above [`MAX_INDEX`] resolve like index 0.
    pub const fn map(&self, idx: u8) -> RegisterAddress {
        let idx = if idx > MAX_INDEX { 0 } else { idx };
        let slot = self.slots[idx as usize];
        RegisterAddress {
            offset: slot.offset,
            mask: 1 << slot.bit,
        }
    }

    /// The raw table
    pub const fn slots(&self) -> &[Slot; KEY_COUNT] {
        &self.slots
    }
}

impl<const N: usize> TryFrom<[Slot; KEY_COUNT]> for Layout<N> {
    type Error = LayoutError;

    fn try_from(slots: [Slot; KEY_COUNT]) -> Result<Self, Self::Error> {
        Self::try_new(slots)
    }
}

impl<const N: usize> From<Layout<N>> for [Slot; KEY_COUNT] {
    fn from(layout: Layout<N>) -> Self {
        layout.slots
    }
}

/// LED wiring of the Adafruit Trellis 4x4 keypad
///
/// See <https://learn.adafruit.com/adafruit-trellis-diy-open-source-led-keypad/downloads>
pub const TRELLIS_LED_LAYOUT: LedLayout = Layout::new([
    Slot::new(7, 2),
    Slot::new(6, 7),
    Slot::new(6, 5),
    Slot::new(6, 4),
    Slot::new(5, 0),
    Slot::new(5, 1),
    Slot::new(4, 3),
    Slot::new(4, 4),
    Slot::new(2, 6),
    Slot::new(3, 3),
    Slot::new(2, 1),
    Slot::new(2, 0),
    Slot::new(1, 6),
    Slot::new(1, 5),
    Slot::new(1, 4),
    Slot::new(0, 2),
]);

/// Key wiring of the Adafruit Trellis 4x4 keypad
pub const TRELLIS_BUTTON_LAYOUT: ButtonLayout = Layout::new([
    // row 1
    Slot::new(0, 7),
    Slot::new(0, 4),
    Slot::new(0, 2),
    Slot::new(2, 2),
    // row 2
    Slot::new(0, 5),
    Slot::new(0, 6),
    Slot::new(0, 0),
    Slot::new(0, 1),
    // row 3
    Slot::new(0, 3),
    Slot::new(1, 0),
    Slot::new(3, 0),
    Slot::new(2, 1),
    // row 4
    Slot::new(1, 3),
    Slot::new(1, 2),
    Slot::new(1, 1),
    Slot::new(3, 1),
]);
