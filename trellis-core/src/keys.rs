//! Key-scan state and edge detection
//!
//! Two consecutive snapshots of the key RAM are kept. Press and release
//! transitions are derived by comparing them on every query; nothing is
//! cached between calls.

use heapless::Vec;

use crate::layout::{ButtonLayout, KEY_BUFFER_LEN, KEY_COUNT, MAX_INDEX};

/// Logical indices reported by the list queries
pub type KeyList = Vec<u8, KEY_COUNT>;

/// Current and previous key-scan snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyState {
    current: [u8; KEY_BUFFER_LEN],
    previous: [u8; KEY_BUFFER_LEN],
    layout: ButtonLayout,
}

impl KeyState {
    /// Create a tracker with both snapshots zeroed
    pub const fn new(layout: ButtonLayout) -> Self {
        Self {
            current: [0; KEY_BUFFER_LEN],
            previous: [0; KEY_BUFFER_LEN],
            layout,
        }
    }

    /// Take a new snapshot
    ///
    /// The current snapshot becomes the previous one before `read` runs.
    /// `read` fills a scratch buffer which only replaces the current
    /// snapshot on success; on error the current snapshot keeps its old
    /// contents.
    pub fn scan<E, F>(&mut self, read: F) -> Result<(), E>
    where
        F: FnOnce(&mut [u8; KEY_BUFFER_LEN]) -> Result<(), E>,
    {
        self.previous = self.current;

        let mut fresh = [0u8; KEY_BUFFER_LEN];
        read(&mut fresh)?;
        self.current = fresh;
        Ok(())
    }

    /// Key is down as of the latest scan
    pub fn is_pressed(&self, idx: u8) -> bool {
        Self::test(&self.layout, &self.current, idx)
    }

    /// Key was down as of the scan before the latest one
    pub fn was_pressed(&self, idx: u8) -> bool {
        Self::test(&self.layout, &self.previous, idx)
    }

    /// Key went from down to up between the last two scans
    pub fn was_just_released(&self, idx: u8) -> bool {
        self.was_pressed(idx) && !self.is_pressed(idx)
    }

    /// Key went from up to down between the last two scans
    pub fn was_just_pressed(&self, idx: u8) -> bool {
        self.is_pressed(idx) && !self.was_pressed(idx)
    }

    /// All keys currently down, in index order
    pub fn pressed(&self) -> KeyList {
        self.collect(|idx| self.is_pressed(idx))
    }

    /// All keys released since the previous scan, in index order
    pub fn just_released(&self) -> KeyList {
        self.collect(|idx| self.was_just_released(idx))
    }

    /// All keys pressed since the previous scan, in index order
    pub fn just_pressed(&self) -> KeyList {
        self.collect(|idx| self.was_just_pressed(idx))
    }

    /// Raw latest snapshot
    pub const fn current(&self) -> &[u8; KEY_BUFFER_LEN] {
        &self.current
    }

    /// Raw previous snapshot
    pub const fn previous(&self) -> &[u8; KEY_BUFFER_LEN] {
        &self.previous
    }

    /// The button layout in use
    pub const fn layout(&self) -> &ButtonLayout {
        &self.layout
    }

    fn test(layout: &ButtonLayout, snapshot: &[u8; KEY_BUFFER_LEN], idx: u8) -> bool {
        // Unlike LEDs, keys past the grid never fold onto key 0
        if idx > MAX_INDEX {
            return false;
        }
        let addr = layout.map(idx);
        snapshot[addr.offset()] & addr.mask() != 0
    }

    fn collect(&self, mut pick: impl FnMut(u8) -> bool) -> KeyList {
        let mut keys = KeyList::new();
        for idx in 0..=MAX_INDEX {
            if pick(idx) {
                // Capacity equals the key count
                keys.push(idx).ok();
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TRELLIS_BUTTON_LAYOUT;
    use proptest::prelude::*;

    fn load(state: &mut KeyState, bytes: [u8; KEY_BUFFER_LEN]) {
        state
            .scan::<(), _>(|buf| {
                *buf = bytes;
                Ok(())
            })
            .unwrap();
    }

    /// Snapshot with exactly the given keys down
    fn snapshot(keys: &[u8]) -> [u8; KEY_BUFFER_LEN] {
        let mut bytes = [0u8; KEY_BUFFER_LEN];
        for &idx in keys {
            let addr = TRELLIS_BUTTON_LAYOUT.map(idx);
            bytes[addr.offset()] |= addr.mask();
        }
        bytes
    }

    #[test]
    fn test_starts_released() {
        let state = KeyState::new(TRELLIS_BUTTON_LAYOUT);
        for idx in 0..=MAX_INDEX {
            assert!(!state.is_pressed(idx));
            assert!(!state.was_pressed(idx));
            assert!(!state.was_just_released(idx));
        }
    }

    #[test]
    fn test_press_then_release() {
        let mut state = KeyState::new(TRELLIS_BUTTON_LAYOUT);

        load(&mut state, snapshot(&[4]));
        assert!(state.is_pressed(4));
        assert!(state.was_just_pressed(4));
        assert!(!state.was_just_released(4));

        load(&mut state, snapshot(&[]));
        assert!(!state.is_pressed(4));
        assert!(state.was_pressed(4));
        assert!(state.was_just_released(4));

        // A third idle scan clears the edge
        load(&mut state, snapshot(&[]));
        assert!(!state.was_just_released(4));
    }

    #[test]
    fn test_held_key_has_no_edge() {
        let mut state = KeyState::new(TRELLIS_BUTTON_LAYOUT);
        load(&mut state, snapshot(&[7]));
        load(&mut state, snapshot(&[7]));

        assert!(state.is_pressed(7));
        assert!(state.was_pressed(7));
        assert!(!state.was_just_pressed(7));
        assert!(!state.was_just_released(7));
    }

    #[test]
    fn test_out_of_range_is_never_pressed() {
        let mut state = KeyState::new(TRELLIS_BUTTON_LAYOUT);
        load(&mut state, [0xFF; KEY_BUFFER_LEN]);
        load(&mut state, [0xFF; KEY_BUFFER_LEN]);

        assert!(state.is_pressed(0));
        assert!(!state.is_pressed(16));
        assert!(!state.was_pressed(16));
        assert!(!state.was_just_released(16));
    }

    #[test]
    fn test_failed_scan_keeps_current() {
        let mut state = KeyState::new(TRELLIS_BUTTON_LAYOUT);
        load(&mut state, snapshot(&[1]));

        let result = state.scan(|buf| {
            buf[0] = 0xAA;
            Err("nack")
        });

        assert_eq!(result, Err("nack"));
        assert_eq!(state.current(), &snapshot(&[1]));
        assert_eq!(state.previous(), &snapshot(&[1]));
        assert!(!state.was_just_released(1));
    }

    #[test]
    fn test_lists() {
        let mut state = KeyState::new(TRELLIS_BUTTON_LAYOUT);
        load(&mut state, snapshot(&[0, 5, 15]));
        load(&mut state, snapshot(&[5, 9]));

        assert_eq!(state.pressed().as_slice(), &[5, 9]);
        assert_eq!(state.just_released().as_slice(), &[0, 15]);
        assert_eq!(state.just_pressed().as_slice(), &[9]);
    }

    proptest! {
        #[test]
        fn prop_edges_follow_two_snapshots(
            b1 in any::<[u8; KEY_BUFFER_LEN]>(),
            b2 in any::<[u8; KEY_BUFFER_LEN]>(),
        ) {
            let mut state = KeyState::new(TRELLIS_BUTTON_LAYOUT);
            load(&mut state, b1);
            load(&mut state, b2);

            for idx in 0..=MAX_INDEX {
                let addr = TRELLIS_BUTTON_LAYOUT.map(idx);
                let in_b1 = b1[addr.offset()] & addr.mask() != 0;
                let in_b2 = b2[addr.offset()] & addr.mask() != 0;

                prop_assert_eq!(state.was_pressed(idx), in_b1);
                prop_assert_eq!(state.is_pressed(idx), in_b2);
                prop_assert_eq!(state.was_just_released(idx), in_b1 && !in_b2);
            }
        }
    }
}
