//! Error classifications and register flag reasons

use core::fmt;

use crate::device::state::OperationMode;
use crate::transport::TransportError;

/// Every failure the driver can report
///
/// The status-register variants correspond one-to-one with bits 0..9 of the
/// STATUS summary register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Command frame invalid or had an incorrect frame CRC
    InvalidCommandFrame,
    /// Transport exchanged fewer bytes than a full frame
    IncorrectByteCount,
    /// Transport failed to complete the exchange
    Bus,
    /// Response frame CRC did not match
    BadChecksum,
    /// Response address differs from the issued command
    InvalidResponseFrame,
    /// Response read/write bit differs from the issued command
    ReadWriteMismatch,
    /// Return status reports start-up in progress
    StartupInProgress,
    /// Return status reports self-test running
    SelfTestRunning,
    /// Self-test output beyond the mode threshold
    StoThresholdExceeded,
    /// Self-test output exceeded its threshold in most monitored cycles
    StoComponentFailure,

    // STATUS summary reasons, bit 0 first
    PinContinuity,
    ModeChanged,
    PoweredDown,
    NonVolatileMemory,
    SafeVoltageLevelsExceeded,
    TemperatureSignalSaturated,
    AccelerationSignalSaturated,
    ClockError,
    DigitalBlockType2,
    DigitalBlockType1,

    /// WHOAMI did not return the component identifier
    IdentityMismatch { received: u8 },
}

impl SensorError {
    /// Fixed human-readable description
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidCommandFrame => "SPI command frame invalid or has incorrect frame CRC",
            Self::IncorrectByteCount => "SPI command frame - incorrect number of bytes transmitted",
            Self::Bus => "SPI transport failure",
            Self::BadChecksum => "SPI response frame checksum failure",
            Self::InvalidResponseFrame => {
                "SPI response frame ADDRESS does not match transmitted command frame"
            }
            Self::ReadWriteMismatch => {
                "SPI response frame READ/WRITE does not match transmitted command frame"
            }
            Self::StartupInProgress => "Return status indicates start-up is in progress",
            Self::SelfTestRunning => "Return status indicates self-test is running",
            Self::StoThresholdExceeded => "Self-test output signal exceeds threshold",
            Self::StoComponentFailure => {
                "Component failure - STO signal has exceeded threshold multiple times"
            }
            Self::PinContinuity => "Component internal connection error",
            Self::ModeChanged => "Operation mode changed - if unrequested, SW or HW reset needed",
            Self::PoweredDown => "Device in powered down mode - SW or HW reset needed",
            Self::NonVolatileMemory => "Error in non-volatile memory - SW or HW reset needed",
            Self::SafeVoltageLevelsExceeded => {
                "Start-up indication or external voltage levels too extreme - SW or HW reset needed"
            }
            Self::TemperatureSignalSaturated => {
                "Temperature signal path saturated - external temperatures too extreme"
            }
            Self::AccelerationSignalSaturated => {
                "Acceleration signal path saturated - acceleration too high, readings not usable"
            }
            Self::ClockError => "Clock error - SW or HW reset needed",
            Self::DigitalBlockType2 => "Digital block error type 2 - SW or HW reset needed",
            Self::DigitalBlockType1 => "Digital block error type 1 - SW or HW reset needed",
            Self::IdentityMismatch { .. } => {
                "WHOAMI component identification incorrect - SPI communication not working"
            }
        }
    }

    /// Whether a software reset is the prescribed recovery
    pub fn requires_reset(&self) -> bool {
        matches!(
            self,
            Self::ModeChanged
                | Self::PoweredDown
                | Self::NonVolatileMemory
                | Self::SafeVoltageLevelsExceeded
                | Self::ClockError
                | Self::DigitalBlockType2
                | Self::DigitalBlockType1
        )
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdentityMismatch { received } => {
                write!(f, "{} (received 0x{:02X})", self.message(), received)
            }
            _ => f.write_str(self.message()),
        }
    }
}

impl From<TransportError> for SensorError {
    fn from(_: TransportError) -> Self {
        Self::Bus
    }
}

/// Reasons reported by the ERR_FLAG1 register, one per bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFlag1Reason {
    NoError,
    /// Error in non-volatile memory (bit 0)
    Mem,
    /// Signal saturated at C2V, bits 1..=10
    AfeSaturation(u8),
    /// Signal saturated at A2D (bit 11)
    AdcSaturation,
    /// Reserved, bits 12..=15
    Reserved(u8),
}

impl ErrorFlag1Reason {
    /// Reason for a single set bit position
    pub fn from_bit(bit: u8) -> Self {
        match bit {
            0 => Self::Mem,
            1..=10 => Self::AfeSaturation(bit),
            11 => Self::AdcSaturation,
            _ => Self::Reserved(bit),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::NoError => "No errors present",
            Self::Mem => "Error in non-volatile memory",
            Self::AfeSaturation(_) => "Signal saturated at C2V",
            Self::AdcSaturation => "Signal saturated at A2D",
            Self::Reserved(_) => "Reserved",
        }
    }
}

impl fmt::Display for ErrorFlag1Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AfeSaturation(bit) | Self::Reserved(bit) => {
                write!(f, "{} - bit {}", self.description(), bit)
            }
            _ => f.write_str(self.description()),
        }
    }
}

/// Reasons reported by the ERR_FLAG2 register, one per bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFlag2Reason {
    NoError,
    Clock,
    TemperatureSaturation,
    AnalogPower2,
    ReferenceVoltage,
    DigitalPower,
    AnalogPower,
    MemoryCrc,
    PowerDown,
    ModeChange,
    SupplyVoltage,
    AnalogGround,
    AExternalCapacitor,
    DExternalCapacitor,
    /// Reserved, bits 6, 10 and 15
    Reserved(u8),
}

impl ErrorFlag2Reason {
    /// Reason for a single set bit position
    pub fn from_bit(bit: u8) -> Self {
        match bit {
            0 => Self::Clock,
            1 => Self::TemperatureSaturation,
            2 => Self::AnalogPower2,
            3 => Self::ReferenceVoltage,
            4 => Self::DigitalPower,
            5 => Self::AnalogPower,
            7 => Self::MemoryCrc,
            8 => Self::PowerDown,
            9 => Self::ModeChange,
            11 => Self::SupplyVoltage,
            12 => Self::AnalogGround,
            13 => Self::AExternalCapacitor,
            14 => Self::DExternalCapacitor,
            _ => Self::Reserved(bit),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::NoError => "No errors present",
            Self::Clock => "Clock error",
            Self::TemperatureSaturation => "Temperature signal path saturated",
            Self::AnalogPower2 => "Analog power error 2",
            Self::ReferenceVoltage => "Reference voltage error",
            Self::DigitalPower => "Digital power error - SW or HW reset needed",
            Self::AnalogPower => "Analog power error",
            Self::MemoryCrc => "Memory CRC check failed",
            Self::PowerDown => "Device in power down mode",
            Self::ModeChange => "Operation mode changed by user",
            Self::SupplyVoltage => "Supply voltage error",
            Self::AnalogGround => "Analog ground connection error",
            Self::AExternalCapacitor => "A - external capacitor connection error",
            Self::DExternalCapacitor => "D - external capacitor connection error",
            Self::Reserved(_) => "Reserved",
        }
    }

    /// Digital power errors are cleared only by a reset
    pub fn requires_reset(&self) -> bool {
        matches!(self, Self::DigitalPower)
    }
}

impl fmt::Display for ErrorFlag2Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reserved(bit) => write!(f, "{} - bit {}", self.description(), bit),
            _ => f.write_str(self.description()),
        }
    }
}

/// One field of the MODE/command register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandRegisterField {
    /// Bits 1..0, always present
    Mode(OperationMode),
    /// Bit 2
    PowerDown,
    /// Bit 5
    SoftwareReset,
    /// Bits 3, 4, 6 and 7
    FactoryUse(u8),
    /// Bits 8..=15
    Reserved(u8),
}

impl fmt::Display for CommandRegisterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mode(mode) => {
                let number = mode.number();
                write!(f, "MODE_{} -> SCL3300 operation mode {}", number, number)
            }
            Self::PowerDown => f.write_str("PD -> power down"),
            Self::SoftwareReset => f.write_str("SW_RST -> software reset"),
            Self::FactoryUse(bit) => write!(f, "FACTORY_USE -> factory use - bit {}", bit),
            Self::Reserved(bit) => write!(f, "RESERVED -> reserved - bit {}", bit),
        }
    }
}
