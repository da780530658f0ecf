//! Error types shared by the matrix drivers

/// Bus transaction that was in flight when a transport error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Turning on the internal oscillator
    Oscillator,
    /// Display on/off and blink setup
    DisplaySetup,
    /// Dimming level
    Brightness,
    /// ROW/INT pin configuration
    Interrupt,
    /// Display RAM flush
    DisplayWrite,
    /// Key RAM read
    KeyScan,
}

/// Failure reported by the underlying bus
///
/// The bus error is kept verbatim. No retry has been attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportError<E> {
    /// What the driver was doing
    pub step: Step,
    /// Error returned by the bus
    pub source: E,
}

impl<E> TransportError<E> {
    /// Wrap a bus error
    pub const fn new(step: Step, source: E) -> Self {
        Self { step, source }
    }
}

/// Configuration blob errors
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Blob could not be decoded (including invalid layout tables)
    Deserialize,
    /// Output buffer too small or value not encodable
    Serialize,
}
