//! Device and bus configuration constants for the SCL3300 inclinometer

use crate::device::state::OperationMode;

/// SPI bus parameters
pub mod spi {
    /// Every frame is 32 bits, MSB first
    pub const FRAME_LEN: usize = 4;

    /// Minimum time between SPI cycles with CSB high (TLH)
    ///
    /// Output data is corrupted if consecutive requests are closer than this.
    pub const MIN_TRANSFER_INTERVAL_US: u64 = 10;

    /// Recommended clock is 2-4 MHz for best noise performance, SPI mode 0
    pub const FREQUENCY_HZ: u32 = 4_000_000;
}

/// Fixed device identity
pub mod device {
    /// WHOAMI component identification register value
    pub const WHO_AM_I: u8 = 0xC1;

    /// Appended to the decimal serial number
    pub const SERIAL_NUMBER_SUFFIX: &str = "B33";

    /// Decimal u32 plus suffix
    pub const SERIAL_NUMBER_LEN: usize = 16;
}

/// Startup sequence timing
pub mod startup {
    /// Memory reading and signal path settling after wake-up or reset
    pub const RESET_SETTLE_MS: u32 = 1;

    pub const MODE_1_SETTLE_MS: u32 = 25;
    pub const MODE_2_SETTLE_MS: u32 = 15;
    /// Modes 3 and 4 (inclination modes)
    pub const MODE_3_4_SETTLE_MS: u32 = 100;

    /// Reads of STATUS after the first one needed to observe the cleared value
    pub const STATUS_CLEAR_READS: usize = 3;
}

/// Self-test output monitoring
pub mod self_test {
    /// Number of full read cycles sampled by the monitor
    pub const DEFAULT_RUNS: u32 = 100;

    /// Example STO thresholds in LSB, per mode
    pub const MODE_1_THRESHOLD: i16 = 1800;
    pub const MODE_2_THRESHOLD: i16 = 900;
    pub const MODE_3_4_THRESHOLD: i16 = 3600;
}

/// Firmware sequencing on the ESP32-S3 board
pub mod firmware {
    /// Pause between the normal-operation and self-test sequences
    pub const SEQUENCE_PAUSE_MS: u64 = 5000;

    /// Status LED flash length
    pub const LED_FLASH_MS: u64 = 50;

    /// Longer flash signalling a failed sequence
    pub const LED_FAULT_FLASH_MS: u64 = 500;
}

/// Runtime configuration for the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Operation mode selected by the startup sequence
    pub startup_mode: OperationMode,
    /// Read cycles sampled by the self-test monitor
    pub self_test_runs: u32,
    /// Minimum spacing between physical transfers
    pub min_transfer_interval_us: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            startup_mode: OperationMode::Mode4,
            self_test_runs: self_test::DEFAULT_RUNS,
            min_transfer_interval_us: spi::MIN_TRANSFER_INTERVAL_US,
        }
    }
}
