//! I2C bus abstractions
//!
//! The matrix controllers only ever need two transaction shapes: a plain
//! write, and a write followed by a read under a repeated start.

/// I2C bus master
///
/// Every call blocks until the transfer completes or the transport reports
/// a failure. Implementations must not retry on their own.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// This is commonly used to write a register address then read data.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, data)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        (**self).write_read(address, write_data, read_buf)
    }
}

/// Adapter exposing any blocking `embedded-hal` I2C master as an [`I2cBus`]
///
/// The bus error is passed through untouched.
#[derive(Debug)]
pub struct EmbeddedHalI2c<I> {
    inner: I,
}

impl<I> EmbeddedHalI2c<I> {
    /// Wrap an `embedded-hal` I2C peripheral
    pub const fn new(inner: I) -> Self {
        Self { inner }
    }

    /// Get access to the wrapped peripheral
    pub fn inner(&self) -> &I {
        &self.inner
    }

    /// Consume the adapter and return the wrapped peripheral
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: embedded_hal::i2c::I2c> I2cBus for EmbeddedHalI2c<I> {
    type Error = I::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write(address, data)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.inner.write_read(address, write_data, read_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    #[test]
    fn test_adapter_forwards_write() {
        let expectations = [I2cTransaction::write(0x70, vec![0x21])];
        let mut bus = EmbeddedHalI2c::new(I2cMock::new(&expectations));

        bus.write(0x70, &[0x21]).unwrap();

        bus.into_inner().done();
    }

    #[test]
    fn test_adapter_forwards_write_read() {
        let expectations = [I2cTransaction::write_read(
            0x70,
            vec![0x40],
            vec![1, 2, 3, 4, 5, 6],
        )];
        let mut bus = EmbeddedHalI2c::new(I2cMock::new(&expectations));

        let mut buf = [0u8; 6];
        bus.write_read(0x70, &[0x40], &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4, 5, 6]);

        bus.into_inner().done();
    }

    #[test]
    fn test_adapter_passes_error_through() {
        let expectations =
            [I2cTransaction::write(0x71, vec![0x81]).with_error(ErrorKind::Other)];
        let mut bus = EmbeddedHalI2c::new(I2cMock::new(&expectations));

        assert_eq!(bus.write(0x71, &[0x81]), Err(ErrorKind::Other));

        bus.into_inner().done();
    }

    #[test]
    fn test_mut_ref_is_a_bus() {
        fn flush<B: I2cBus>(mut bus: B) -> Result<(), B::Error> {
            bus.write(0x70, &[0x00])
        }

        let expectations = [I2cTransaction::write(0x70, vec![0x00])];
        let mut bus = EmbeddedHalI2c::new(I2cMock::new(&expectations));

        flush(&mut bus).unwrap();

        bus.into_inner().done();
    }
}
