//! Device configuration
//!
//! Every option has a default matching the Adafruit Trellis board, so
//! `DeviceConfig::default()` is enough for the reference hardware.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::error::ConfigError;
use crate::layout::{ButtonLayout, LedLayout, TRELLIS_BUTTON_LAYOUT, TRELLIS_LED_LAYOUT};

/// Default 7-bit bus address (all address pins low)
pub const DEFAULT_ADDRESS: u8 = 0x70;

/// Highest dimming level (16/16 duty)
pub const MAX_BRIGHTNESS: u8 = 15;

/// Upper bound on an encoded configuration
pub const MAX_CONFIG_SIZE: usize = 96;

/// Display blink rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BlinkRate {
    /// Steady display
    #[default]
    Off,
    /// 2 Hz
    TwoHz,
    /// 1 Hz
    OneHz,
    /// 0.5 Hz
    HalfHz,
}

impl BlinkRate {
    /// Value of the B1/B0 field in the display setup command
    pub const fn bits(self) -> u8 {
        match self {
            BlinkRate::Off => 0,
            BlinkRate::TwoHz => 1,
            BlinkRate::OneHz => 2,
            BlinkRate::HalfHz => 3,
        }
    }
}

/// Matrix controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// 7-bit bus address; 0 means "unset" and resolves to [`DEFAULT_ADDRESS`]
    pub address: u8,
    /// LED index to display RAM bit table
    pub led_layout: LedLayout,
    /// Key index to key RAM bit table
    pub button_layout: ButtonLayout,
    /// Dimming level 0-15, clamped when applied
    pub brightness: u8,
    /// Blink rate applied at start-up
    pub blink: BlinkRate,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceConfig {
    /// Configuration for the reference board
    pub const fn new() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            led_layout: TRELLIS_LED_LAYOUT,
            button_layout: TRELLIS_BUTTON_LAYOUT,
            brightness: MAX_BRIGHTNESS,
            blink: BlinkRate::Off,
        }
    }

    /// Override the bus address
    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Override the LED table
    pub const fn with_led_layout(mut self, layout: LedLayout) -> Self {
        self.led_layout = layout;
        self
    }

    /// Override the key table
    pub const fn with_button_layout(mut self, layout: ButtonLayout) -> Self {
        self.button_layout = layout;
        self
    }

    /// Override the start-up brightness
    pub const fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    /// Override the start-up blink rate
    pub const fn with_blink(mut self, blink: BlinkRate) -> Self {
        self.blink = blink;
        self
    }

    /// Bus address to use, with 0 mapped to the default
    pub const fn resolved_address(&self) -> u8 {
        if self.address == 0 {
            DEFAULT_ADDRESS
        } else {
            self.address
        }
    }

    /// Brightness clamped to the chip's range
    pub const fn brightness_level(&self) -> u8 {
        if self.brightness > MAX_BRIGHTNESS {
            MAX_BRIGHTNESS
        } else {
            self.brightness
        }
    }

    /// Decode a configuration stored with [`DeviceConfig::to_postcard`]
    ///
    /// Layout tables are validated while decoding.
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)
    }

    /// Encode into `buf`, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn to_postcard<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeviceConfig::default();
        assert_eq!(config.resolved_address(), 0x70);
        assert_eq!(config.led_layout, TRELLIS_LED_LAYOUT);
        assert_eq!(config.button_layout, TRELLIS_BUTTON_LAYOUT);
        assert_eq!(config.brightness_level(), 15);
        assert_eq!(config.blink, BlinkRate::Off);
    }

    #[test]
    fn test_zero_address_resolves_to_default() {
        let config = DeviceConfig::new().with_address(0);
        assert_eq!(config.resolved_address(), DEFAULT_ADDRESS);

        let config = DeviceConfig::new().with_address(0x72);
        assert_eq!(config.resolved_address(), 0x72);
    }

    #[test]
    fn test_brightness_is_clamped() {
        let config = DeviceConfig::new().with_brightness(200);
        assert_eq!(config.brightness_level(), MAX_BRIGHTNESS);

        let config = DeviceConfig::new().with_brightness(3);
        assert_eq!(config.brightness_level(), 3);
    }

    #[test]
    fn test_blink_bits() {
        assert_eq!(BlinkRate::Off.bits(), 0);
        assert_eq!(BlinkRate::TwoHz.bits(), 1);
        assert_eq!(BlinkRate::OneHz.bits(), 2);
        assert_eq!(BlinkRate::HalfHz.bits(), 3);
    }

    #[cfg(feature = "serde")]
    mod postcard_blob {
        use super::*;
        use crate::layout::KEY_COUNT;

        #[test]
        fn test_stored_config_is_restored() {
            let config = DeviceConfig::new()
                .with_address(0x71)
                .with_blink(BlinkRate::OneHz)
                .with_brightness(4);

            let mut buf = [0u8; MAX_CONFIG_SIZE];
            let used = config.to_postcard(&mut buf).unwrap().len();

            assert_eq!(DeviceConfig::from_postcard(&buf[..used]), Ok(config));
        }

        #[test]
        fn test_invalid_table_is_rejected() {
            let mut buf = [0u8; MAX_CONFIG_SIZE];
            let used = DeviceConfig::new().to_postcard(&mut buf).unwrap().len();

            // Address byte, then 16 (offset, bit) pairs for the LED table.
            // Point LED 0 past the end of display RAM.
            assert_eq!(buf[1], 7);
            buf[1] = 8;

            assert_eq!(
                DeviceConfig::from_postcard(&buf[..used]),
                Err(ConfigError::Deserialize)
            );
        }

        #[test]
        fn test_short_buffer_fails() {
            let mut buf = [0u8; KEY_COUNT];
            assert_eq!(
                DeviceConfig::new().to_postcard(&mut buf).map(|b| b.len()),
                Err(ConfigError::Serialize)
            );

            // The full encoding fits the advertised bound
            let mut buf = [0u8; MAX_CONFIG_SIZE];
            assert!(DeviceConfig::new().to_postcard(&mut buf).is_ok());
        }
    }
}
