//! Hardware transport over embedded-hal SPI
//!
//! Uses the blocking SpiBus trait with manual chip select control. Timing
//! comes from embassy-time so that transfer spacing is measured on the
//! system clock.

use crate::config::spi::FRAME_LEN;
use crate::transport::traits::{Transport, TransportError};
use embassy_time::{block_for, Duration, Instant};
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// SCL3300 transport on an SPI bus with a dedicated CSB pin
///
/// The bus must be configured for SPI mode 0, MSB first.
pub struct HalTransport<Spi, Cs>
where
    Spi: SpiBus,
    Cs: OutputPin,
{
    spi: Spi,
    cs: Cs,
}

impl<Spi, Cs> HalTransport<Spi, Cs>
where
    Spi: SpiBus,
    Cs: OutputPin,
{
    /// Create a new transport, CSB is driven high (idle)
    ///
    /// Fails if the chip select pin cannot be driven.
    pub fn new(spi: Spi, mut cs: Cs) -> Result<Self, TransportError> {
        cs.set_high().map_err(|_| TransportError::Bus)?;
        Ok(Self { spi, cs })
    }

    /// Release the bus and pin
    pub fn release(self) -> (Spi, Cs) {
        (self.spi, self.cs)
    }
}

impl<Spi, Cs> Transport for HalTransport<Spi, Cs>
where
    Spi: SpiBus,
    Cs: OutputPin,
{
    fn exchange(
        &mut self,
        tx: &[u8; FRAME_LEN],
        rx: &mut [u8; FRAME_LEN],
    ) -> Result<usize, TransportError> {
        self.cs.set_low().map_err(|_| TransportError::Bus)?;
        let result = self
            .spi
            .transfer(rx, tx)
            .and_then(|_| self.spi.flush())
            .map_err(|_| TransportError::Bus);
        // CSB goes high even after a failed transfer
        let released = self.cs.set_high().map_err(|_| TransportError::Bus);
        result?;
        released?;
        Ok(FRAME_LEN)
    }

    fn now_micros(&self) -> u64 {
        Instant::now().as_micros()
    }

    fn wait_until_micros(&mut self, deadline_us: u64) {
        let now = Instant::now().as_micros();
        if now < deadline_us {
            block_for(Duration::from_micros(deadline_us - now));
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(ms as u64));
    }
}
