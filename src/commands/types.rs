//! Closed set of commands the driver may transmit
//!
//! Each variant maps to exactly one pre-computed frame in
//! [`crate::commands::registry`]. Transmitting anything outside this set is
//! forbidden by the device and can corrupt its internal state, so the transmit
//! path only accepts a [`Command`].

use crate::commands::registry::frames;
use crate::protocol::Frame;

/// Register bank selected by SELBANK
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryBank {
    /// Default bank, normal operation registers
    Bank0 = 0,
    /// Serial number and bank-select registers
    Bank1 = 1,
}

impl MemoryBank {
    pub fn from_bits(bits: u16) -> Self {
        if bits & 1 == 1 {
            Self::Bank1
        } else {
            Self::Bank0
        }
    }

    /// Command selecting this bank
    pub fn select_command(self) -> Command {
        match self {
            Self::Bank0 => Command::SwitchToBank0,
            Self::Bank1 => Command::SwitchToBank1,
        }
    }
}

/// Legal SPI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ReadAccelerationX,
    ReadAccelerationY,
    ReadAccelerationZ,
    ReadSelfTestOutput,
    EnableAngleOutputs,
    ReadAngleX,
    ReadAngleY,
    ReadAngleZ,
    ReadTemperature,
    ReadStatusSummary,
    ReadErrorFlag1,
    ReadErrorFlag2,
    ReadCommand,
    ChangeToMode1,
    ChangeToMode2,
    ChangeToMode3,
    ChangeToMode4,
    SetPowerDownMode,
    /// Same frame as [`Command::ChangeToMode1`]
    WakeUpFromPowerDown,
    SoftwareReset,
    ReadWhoAmI,
    ReadSerial1,
    ReadSerial2,
    ReadCurrentBank,
    SwitchToBank0,
    SwitchToBank1,
}

impl Command {
    /// Every legal command
    pub const ALL: [Command; 26] = [
        Command::ReadAccelerationX,
        Command::ReadAccelerationY,
        Command::ReadAccelerationZ,
        Command::ReadSelfTestOutput,
        Command::EnableAngleOutputs,
        Command::ReadAngleX,
        Command::ReadAngleY,
        Command::ReadAngleZ,
        Command::ReadTemperature,
        Command::ReadStatusSummary,
        Command::ReadErrorFlag1,
        Command::ReadErrorFlag2,
        Command::ReadCommand,
        Command::ChangeToMode1,
        Command::ChangeToMode2,
        Command::ChangeToMode3,
        Command::ChangeToMode4,
        Command::SetPowerDownMode,
        Command::WakeUpFromPowerDown,
        Command::SoftwareReset,
        Command::ReadWhoAmI,
        Command::ReadSerial1,
        Command::ReadSerial2,
        Command::ReadCurrentBank,
        Command::SwitchToBank0,
        Command::SwitchToBank1,
    ];

    /// The pre-computed frame for this command
    pub const fn frame(self) -> Frame {
        match self {
            Self::ReadAccelerationX => frames::READ_ACC_X,
            Self::ReadAccelerationY => frames::READ_ACC_Y,
            Self::ReadAccelerationZ => frames::READ_ACC_Z,
            Self::ReadSelfTestOutput => frames::READ_STO,
            Self::EnableAngleOutputs => frames::ENABLE_ANGLE_OUTPUTS,
            Self::ReadAngleX => frames::READ_ANG_X,
            Self::ReadAngleY => frames::READ_ANG_Y,
            Self::ReadAngleZ => frames::READ_ANG_Z,
            Self::ReadTemperature => frames::READ_TEMPERATURE,
            Self::ReadStatusSummary => frames::READ_STATUS_SUMMARY,
            Self::ReadErrorFlag1 => frames::READ_ERR_FLAG1,
            Self::ReadErrorFlag2 => frames::READ_ERR_FLAG2,
            Self::ReadCommand => frames::READ_COMMAND,
            Self::ChangeToMode1 => frames::CHANGE_TO_MODE_1,
            Self::ChangeToMode2 => frames::CHANGE_TO_MODE_2,
            Self::ChangeToMode3 => frames::CHANGE_TO_MODE_3,
            Self::ChangeToMode4 => frames::CHANGE_TO_MODE_4,
            Self::SetPowerDownMode => frames::SET_POWER_DOWN_MODE,
            Self::WakeUpFromPowerDown => frames::WAKE_UP_FROM_POWER_DOWN,
            Self::SoftwareReset => frames::SOFTWARE_RESET,
            Self::ReadWhoAmI => frames::READ_WHO_AM_I,
            Self::ReadSerial1 => frames::READ_SERIAL_1,
            Self::ReadSerial2 => frames::READ_SERIAL_2,
            Self::ReadCurrentBank => frames::READ_CURRENT_BANK,
            Self::SwitchToBank0 => frames::SWITCH_TO_BANK_0,
            Self::SwitchToBank1 => frames::SWITCH_TO_BANK_1,
        }
    }

    /// Name used in log messages
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReadAccelerationX => "READ_ACCELERATION_X_AXIS",
            Self::ReadAccelerationY => "READ_ACCELERATION_Y_AXIS",
            Self::ReadAccelerationZ => "READ_ACCELERATION_Z_AXIS",
            Self::ReadSelfTestOutput => "READ_SELF_TEST_OUTPUT",
            Self::EnableAngleOutputs => "ENABLE_ANGLE_OUTPUTS",
            Self::ReadAngleX => "READ_ANGLE_X_AXIS",
            Self::ReadAngleY => "READ_ANGLE_Y_AXIS",
            Self::ReadAngleZ => "READ_ANGLE_Z_AXIS",
            Self::ReadTemperature => "READ_TEMPERATURE",
            Self::ReadStatusSummary => "READ_STATUS_SUMMARY",
            Self::ReadErrorFlag1 => "READ_ERROR_FLAG_1",
            Self::ReadErrorFlag2 => "READ_ERROR_FLAG_2",
            Self::ReadCommand => "READ_COMMAND",
            Self::ChangeToMode1 => "CHANGE_TO_MODE_1",
            Self::ChangeToMode2 => "CHANGE_TO_MODE_2",
            Self::ChangeToMode3 => "CHANGE_TO_MODE_3",
            Self::ChangeToMode4 => "CHANGE_TO_MODE_4",
            Self::SetPowerDownMode => "SET_POWER_DOWN_MODE",
            Self::WakeUpFromPowerDown => "WAKE_UP_FROM_POWER_DOWN_MODE",
            Self::SoftwareReset => "SOFTWARE_RESET",
            Self::ReadWhoAmI => "READ_WHO_AM_I",
            Self::ReadSerial1 => "READ_SERIAL_1",
            Self::ReadSerial2 => "READ_SERIAL_2",
            Self::ReadCurrentBank => "READ_CURRENT_BANK",
            Self::SwitchToBank0 => "SWITCH_TO_BANK_0",
            Self::SwitchToBank1 => "SWITCH_TO_BANK_1",
        }
    }

    /// Bank selected by this command, if it is a SELBANK write
    pub fn selected_bank(self) -> Option<MemoryBank> {
        match self {
            Self::SwitchToBank0 => Some(MemoryBank::Bank0),
            Self::SwitchToBank1 => Some(MemoryBank::Bank1),
            _ => None,
        }
    }
}
