//! LED matrix and keypad traits
//!
//! Both halves follow a stage-then-flush model: LED changes are buffered
//! until [`LedMatrix::write_display`], and key queries only look at the
//! snapshots taken by [`Keypad::read_keys`].

use crate::layout::MAX_INDEX;

/// LED output side of a matrix controller
pub trait LedMatrix {
    /// Error type for bus transactions
    type Error;

    /// Stage one LED on or off. No bus traffic.
    fn set_led(&mut self, idx: u8, on: bool);

    /// Whether the staged state has this LED on
    fn is_lit(&self, idx: u8) -> bool;

    /// Send the staged state to the chip
    fn write_display(&mut self) -> Result<(), Self::Error>;

    /// Turn every LED off and flush
    fn clear_all(&mut self) -> Result<(), Self::Error>;

    /// Flip one LED in the staged state
    fn toggle_led(&mut self, idx: u8) {
        let lit = self.is_lit(idx);
        self.set_led(idx, !lit);
    }
}

/// Key input side of a matrix controller
pub trait Keypad {
    /// Error type for bus transactions
    type Error;

    /// Take a new key snapshot from the chip
    fn read_keys(&mut self) -> Result<(), Self::Error>;

    /// Key is down as of the latest snapshot
    fn is_pressed(&self, idx: u8) -> bool;

    /// Key was down as of the snapshot before the latest one
    fn was_pressed(&self, idx: u8) -> bool;

    /// Key went from down to up between the last two snapshots
    fn was_just_released(&self, idx: u8) -> bool {
        self.was_pressed(idx) && !self.is_pressed(idx)
    }

    /// Key went from up to down between the last two snapshots
    fn was_just_pressed(&self, idx: u8) -> bool {
        self.is_pressed(idx) && !self.was_pressed(idx)
    }
}

/// Helpers for boards that pair every key with an LED
pub trait TrellisExt<E>: LedMatrix<Error = E> + Keypad<Error = E> {
    /// Scan the keys and toggle the LED of every key released since the
    /// previous scan
    ///
    /// Flushes the display only when something changed. Returns the number
    /// of LEDs toggled.
    fn toggle_on_release(&mut self) -> Result<u8, E> {
        self.read_keys()?;

        let mut toggled = 0;
        for idx in 0..=MAX_INDEX {
            if self.was_just_released(idx) {
                self.toggle_led(idx);
                toggled += 1;
            }
        }

        if toggled > 0 {
            self.write_display()?;
        }
        Ok(toggled)
    }

    /// Mirror the key state onto the LEDs: lit while held
    fn follow_keys(&mut self) -> Result<(), E> {
        self.read_keys()?;

        let mut changed = false;
        for idx in 0..=MAX_INDEX {
            let held = self.is_pressed(idx);
            if self.is_lit(idx) != held {
                self.set_led(idx, held);
                changed = true;
            }
        }

        if changed {
            self.write_display()?;
        }
        Ok(())
    }
}

// Blanket implementation for every combined matrix
impl<E, T> TrellisExt<E> for T where T: LedMatrix<Error = E> + Keypad<Error = E> {}
