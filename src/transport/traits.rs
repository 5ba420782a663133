//! SPI transport trait for abstraction and testability
//!
//! The driver owns one transport for its lifetime and performs every exchange
//! through it. The trait also supplies the clock used to space transfers, so
//! a host implementation can sleep instead of busy-waiting.

use crate::config::spi::FRAME_LEN;

/// Errors reported by a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// SPI peripheral or chip-select failure
    Bus,
    /// Exchange did not complete in time
    Timeout,
}

/// Blocking full-duplex frame exchange
pub trait Transport {
    /// Clock out `tx` while clocking in `rx`, with chip select asserted
    ///
    /// Returns the number of bytes exchanged.
    fn exchange(
        &mut self,
        tx: &[u8; FRAME_LEN],
        rx: &mut [u8; FRAME_LEN],
    ) -> Result<usize, TransportError>;

    /// Monotonic time in microseconds
    fn now_micros(&self) -> u64;

    /// Return no earlier than `deadline_us` on the [`Transport::now_micros`] clock
    fn wait_until_micros(&mut self, deadline_us: u64);

    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}
