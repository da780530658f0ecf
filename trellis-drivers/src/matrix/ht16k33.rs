//! HT16K33 RAM-mapping 16x8 LED controller with key scan
//!
//! The HT16K33 drives up to 128 LEDs from 16 bytes of display RAM and
//! scans up to 39 keys into 6 bytes of key RAM. On the Adafruit Trellis
//! only 16 LEDs and 16 keys are wired, so the driver mirrors the first 8
//! bytes of display RAM and all 6 bytes of key RAM.
//!
//! # Bus transactions
//!
//! Every command is a single byte written to the chip:
//! - Open: `0x21` (oscillator on), `0x81` (display on, no blink),
//!   `0xEF` (full brightness), `0xA1` (INT output, active low), then a
//!   display flush of the cleared buffer
//! - Display flush: `[0x00, d0..d7]`
//! - Key scan: write `[0x40]`, read 6 bytes (repeated start)
//!
//! Datasheet: <http://www.holtek.com.tw/productdetail/-/vg/HT16K33>
//!
//! # Concurrency
//!
//! The driver is blocking and owns its buffers. To drive one chip from
//! several threads, wrap the whole `Ht16k33` in a mutex.

use core::fmt;

use trellis_core::config::{BlinkRate, DeviceConfig};
use trellis_core::display::DisplayBuffer;
use trellis_core::error::{Step, TransportError};
use trellis_core::keys::KeyState;
use trellis_core::layout::DISPLAY_BUFFER_LEN;
use trellis_core::traits::{Device, Keypad, LedMatrix};
use trellis_hal::I2cBus;

/// HT16K33 command bytes
pub mod cmd {
    /// Display RAM base pointer
    pub const DISPLAY_RAM: u8 = 0x00;
    /// Key RAM base pointer
    pub const KEY_RAM: u8 = 0x40;
    /// System setup
    pub const SYSTEM_SETUP: u8 = 0x20;
    /// System setup flag: internal oscillator on
    pub const OSCILLATOR_ON: u8 = 0x01;
    /// Display setup
    pub const DISPLAY_SETUP: u8 = 0x80;
    /// Display setup flag: display on
    pub const DISPLAY_ON: u8 = 0x01;
    /// ROW/INT pin setup
    pub const ROW_INT_SET: u8 = 0xA0;
    /// ROW/INT flag: pin is the key interrupt output, active low
    pub const INT_ACTIVE_LOW: u8 = 0x01;
    /// Dimming set, low nibble is the level
    pub const DIMMING_SET: u8 = 0xE0;
}

/// Build the display setup command
pub const fn display_setup(on: bool, blink: BlinkRate) -> u8 {
    let on = if on { cmd::DISPLAY_ON } else { 0 };
    cmd::DISPLAY_SETUP | on | (blink.bits() << 1)
}

/// Build the dimming command, clamping the level to 0-15
pub const fn dimming(level: u8) -> u8 {
    let level = if level > 0x0F { 0x0F } else { level };
    cmd::DIMMING_SET | level
}

type Result<T, E> = core::result::Result<T, TransportError<E>>;

/// Tag a bus error with the step that raised it
fn fail<E>(step: Step) -> impl FnOnce(E) -> TransportError<E> {
    move |source| {
        #[cfg(feature = "defmt")]
        defmt::warn!("ht16k33: {} failed", step);
        TransportError::new(step, source)
    }
}

/// HT16K33 driver
///
/// Construction runs the start-up sequence, so a value of this type is
/// always an initialized chip.
pub struct Ht16k33<B> {
    bus: B,
    config: DeviceConfig,
    display: DisplayBuffer,
    keys: KeyState,
}

impl<B: I2cBus> Ht16k33<B> {
    /// Open the chip with the given configuration
    ///
    /// Turns on the oscillator, enables the display, sets brightness,
    /// enables the key interrupt and clears the display. Stops at the first
    /// failing transaction; no device is returned in that case.
    pub fn new(bus: B, config: DeviceConfig) -> Result<Self, B::Error> {
        let mut dev = Self {
            bus,
            config,
            display: DisplayBuffer::new(config.led_layout),
            keys: KeyState::new(config.button_layout),
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("ht16k33: connecting to address {=u8:#x}", dev.address());

        dev.init()?;
        dev.clear_all()?;
        Ok(dev)
    }

    /// Open the chip at 0x70 with the Trellis layouts
    pub fn with_defaults(bus: B) -> Result<Self, B::Error> {
        Self::new(bus, DeviceConfig::default())
    }

    fn init(&mut self) -> Result<(), B::Error> {
        self.command(Step::Oscillator, cmd::SYSTEM_SETUP | cmd::OSCILLATOR_ON)?;
        self.command(Step::DisplaySetup, display_setup(true, self.config.blink))?;
        self.command(Step::Brightness, dimming(self.config.brightness_level()))?;
        self.command(Step::Interrupt, cmd::ROW_INT_SET | cmd::INT_ACTIVE_LOW)
    }

    /// Send a single command byte
    fn command(&mut self, step: Step, byte: u8) -> Result<(), B::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("ht16k33: {} <- {=u8:#x}", step, byte);

        let address = self.address();
        self.bus
            .write(address, &[byte])
            .map_err(fail(step))
    }

    /// Change the dimming level (0-15, clamped)
    pub fn set_brightness(&mut self, level: u8) -> Result<(), B::Error> {
        self.command(Step::Brightness, dimming(level))?;
        self.config.brightness = level;
        Ok(())
    }

    /// Change the blink rate
    pub fn set_blink(&mut self, blink: BlinkRate) -> Result<(), B::Error> {
        self.command(Step::DisplaySetup, display_setup(true, blink))?;
        self.config.blink = blink;
        Ok(())
    }

    /// Resolved 7-bit bus address
    pub fn address(&self) -> u8 {
        self.config.resolved_address()
    }

    /// Active configuration
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Staged display state
    pub fn display(&self) -> &DisplayBuffer {
        &self.display
    }

    /// Key snapshots
    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    /// Give the bus back
    ///
    /// The chip keeps whatever it was last told to show.
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: I2cBus> LedMatrix for Ht16k33<B> {
    type Error = TransportError<B::Error>;

    fn set_led(&mut self, idx: u8, on: bool) {
        self.display.set_led(idx, on);
    }

    fn is_lit(&self, idx: u8) -> bool {
        self.display.is_lit(idx)
    }

    fn write_display(&mut self) -> Result<(), B::Error> {
        let mut frame = [0u8; DISPLAY_BUFFER_LEN + 1];
        frame[0] = cmd::DISPLAY_RAM;
        frame[1..].copy_from_slice(self.display.as_bytes());

        let address = self.address();
        self.bus
            .write(address, &frame)
            .map_err(fail(Step::DisplayWrite))
    }

    /// The buffer stays cleared even if the flush fails
    fn clear_all(&mut self) -> Result<(), B::Error> {
        self.display.clear();
        self.write_display()
    }
}

impl<B: I2cBus> Keypad for Ht16k33<B> {
    type Error = TransportError<B::Error>;

    fn read_keys(&mut self) -> Result<(), B::Error> {
        let address = self.address();
        let bus = &mut self.bus;
        self.keys
            .scan(|buf| bus.write_read(address, &[cmd::KEY_RAM], buf))
            .map_err(fail(Step::KeyScan))
    }

    fn is_pressed(&self, idx: u8) -> bool {
        self.keys.is_pressed(idx)
    }

    fn was_pressed(&self, idx: u8) -> bool {
        self.keys.was_pressed(idx)
    }
}

impl<B> fmt::Display for Ht16k33<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ht16k33{{{:#04x}}}", self.config.resolved_address())
    }
}

// Halt is a no-op: the bus belongs to the caller
impl<B> Device for Ht16k33<B> {}
