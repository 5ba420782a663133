//! Device state tracked by the driver

use crate::commands::{Command, MemoryBank};
use crate::config::{self_test, startup};

/// Measurement mode written to the MODE register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// 1.2 g full-scale, 40 Hz, hardware default
    Mode1,
    /// 2.4 g full-scale, 70 Hz
    Mode2,
    /// Inclination mode, 10 Hz
    Mode3,
    /// Inclination mode, 10 Hz, low noise
    Mode4,
}

impl OperationMode {
    /// Mode from the two MODE bits of the command register
    pub fn from_register(bits: u16) -> Self {
        match bits & 0b11 {
            0 => Self::Mode1,
            1 => Self::Mode2,
            2 => Self::Mode3,
            _ => Self::Mode4,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Self::Mode1 => 1,
            Self::Mode2 => 2,
            Self::Mode3 => 3,
            Self::Mode4 => 4,
        }
    }

    pub fn command(self) -> Command {
        match self {
            Self::Mode1 => Command::ChangeToMode1,
            Self::Mode2 => Command::ChangeToMode2,
            Self::Mode3 => Command::ChangeToMode3,
            Self::Mode4 => Command::ChangeToMode4,
        }
    }

    /// Acceleration sensitivity in LSB/g
    pub fn sensitivity(self) -> f64 {
        match self {
            Self::Mode1 => 6000.0,
            Self::Mode2 => 3000.0,
            Self::Mode3 | Self::Mode4 => 12000.0,
        }
    }

    /// Self-test output limit in LSB, either sign
    pub fn sto_threshold(self) -> i16 {
        match self {
            Self::Mode1 => self_test::MODE_1_THRESHOLD,
            Self::Mode2 => self_test::MODE_2_THRESHOLD,
            Self::Mode3 | Self::Mode4 => self_test::MODE_3_4_THRESHOLD,
        }
    }

    /// Signal path settling time after selecting this mode
    pub fn settle_ms(self) -> u32 {
        match self {
            Self::Mode1 => startup::MODE_1_SETTLE_MS,
            Self::Mode2 => startup::MODE_2_SETTLE_MS,
            Self::Mode3 | Self::Mode4 => startup::MODE_3_4_SETTLE_MS,
        }
    }
}

/// State of the device as last commanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceState {
    /// Bank selected by the last SELBANK frame the device received
    pub bank: MemoryBank,
    pub mode: OperationMode,
    pub powered_down: bool,
    pub angles_enabled: bool,
    /// Completion time of the previous exchange
    pub last_transfer_us: Option<u64>,
}

impl DeviceState {
    /// Power-on state: bank 0, mode 1, powered up
    pub const fn new() -> Self {
        Self {
            bank: MemoryBank::Bank0,
            mode: OperationMode::Mode1,
            powered_down: false,
            angles_enabled: false,
            last_transfer_us: None,
        }
    }

    /// State after a successful software reset
    pub fn reset(&mut self) {
        self.mode = OperationMode::Mode1;
        self.powered_down = false;
        self.angles_enabled = false;
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}
