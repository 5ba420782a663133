//! Decoding of multi-bit status and error registers
//!
//! STATUS, ERR_FLAG1 and ERR_FLAG2 report a single reason even when several
//! bits are set: the lowest set bit wins. Callers needing every active flag
//! must inspect the raw value. The command register is different and lists
//! every set field.

use heapless::Vec;

use crate::device::state::OperationMode;
use crate::status::types::{CommandRegisterField, ErrorFlag1Reason, ErrorFlag2Reason, SensorError};

/// STATUS summary reasons for bits 0..9, highest priority first
const STATUS_REASONS: [SensorError; 10] = [
    SensorError::PinContinuity,
    SensorError::ModeChanged,
    SensorError::PoweredDown,
    SensorError::NonVolatileMemory,
    SensorError::SafeVoltageLevelsExceeded,
    SensorError::TemperatureSignalSaturated,
    SensorError::AccelerationSignalSaturated,
    SensorError::ClockError,
    SensorError::DigitalBlockType2,
    SensorError::DigitalBlockType1,
];

/// Command register bits that are reported individually
mod command_bits {
    pub const MODE_MASK: u16 = 0x0003;
    pub const PD: u8 = 2;
    pub const SW_RST: u8 = 5;
    pub const FACTORY_USE: [u8; 4] = [3, 4, 6, 7];
}

fn lowest_set_bit(bits: u16) -> Option<u8> {
    if bits == 0 {
        None
    } else {
        Some(bits.trailing_zeros() as u8)
    }
}

/// Decode the STATUS summary register into its highest-priority reason
///
/// Bits 10..15 are unused and ignored.
pub fn decode_status_summary(bits: u16) -> Result<(), SensorError> {
    match STATUS_REASONS
        .iter()
        .enumerate()
        .find(|&(bit, _)| bits & (1 << bit) != 0)
    {
        Some((_, reason)) => Err(*reason),
        None => Ok(()),
    }
}

/// Decode ERR_FLAG1 by its lowest set bit
pub fn decode_error_flag1(bits: u16) -> ErrorFlag1Reason {
    lowest_set_bit(bits).map_or(ErrorFlag1Reason::NoError, ErrorFlag1Reason::from_bit)
}

/// Decode ERR_FLAG2 by its lowest set bit
pub fn decode_error_flag2(bits: u16) -> ErrorFlag2Reason {
    lowest_set_bit(bits).map_or(ErrorFlag2Reason::NoError, ErrorFlag2Reason::from_bit)
}

/// List every field set in a command register value
///
/// The operation mode is always reported, a raw value of zero reads as mode 1.
pub fn describe_command_register(value: u16) -> Vec<CommandRegisterField, 16> {
    let mut fields = Vec::new();
    let _ = fields.push(CommandRegisterField::Mode(OperationMode::from_register(
        value & command_bits::MODE_MASK,
    )));

    for bit in 2..16u8 {
        if value & (1 << bit) == 0 {
            continue;
        }
        let field = match bit {
            command_bits::PD => CommandRegisterField::PowerDown,
            command_bits::SW_RST => CommandRegisterField::SoftwareReset,
            b if command_bits::FACTORY_USE.contains(&b) => CommandRegisterField::FactoryUse(b),
            b => CommandRegisterField::Reserved(b),
        };
        let _ = fields.push(field);
    }
    fields
}
