//! Pre-computed command frames
//!
//! Frames are literal byte constants copied from the datasheet command table
//! so that each one, CRC included, can be checked against the document by eye.

use crate::commands::types::Command;
use crate::protocol::Frame;

/// Datasheet command frames, `[OP+RS, DATA hi, DATA lo, CRC]`
pub mod frames {
    use crate::protocol::Frame;

    pub const READ_ACC_X: Frame = Frame::from_bytes([0x04, 0x00, 0x00, 0xF7]);
    pub const READ_ACC_Y: Frame = Frame::from_bytes([0x08, 0x00, 0x00, 0xFD]);
    pub const READ_ACC_Z: Frame = Frame::from_bytes([0x0C, 0x00, 0x00, 0xFB]);
    pub const READ_STO: Frame = Frame::from_bytes([0x10, 0x00, 0x00, 0xE9]);
    pub const ENABLE_ANGLE_OUTPUTS: Frame = Frame::from_bytes([0xB0, 0x00, 0x1F, 0x6F]);
    pub const READ_ANG_X: Frame = Frame::from_bytes([0x24, 0x00, 0x00, 0xC7]);
    pub const READ_ANG_Y: Frame = Frame::from_bytes([0x28, 0x00, 0x00, 0xCD]);
    pub const READ_ANG_Z: Frame = Frame::from_bytes([0x2C, 0x00, 0x00, 0xCB]);
    pub const READ_TEMPERATURE: Frame = Frame::from_bytes([0x14, 0x00, 0x00, 0xEF]);
    pub const READ_STATUS_SUMMARY: Frame = Frame::from_bytes([0x18, 0x00, 0x00, 0xE5]);
    pub const READ_ERR_FLAG1: Frame = Frame::from_bytes([0x1C, 0x00, 0x00, 0xE3]);
    pub const READ_ERR_FLAG2: Frame = Frame::from_bytes([0x20, 0x00, 0x00, 0xC1]);
    pub const READ_COMMAND: Frame = Frame::from_bytes([0x34, 0x00, 0x00, 0xDF]);
    pub const CHANGE_TO_MODE_1: Frame = Frame::from_bytes([0xB4, 0x00, 0x00, 0x1F]);
    pub const CHANGE_TO_MODE_2: Frame = Frame::from_bytes([0xB4, 0x00, 0x01, 0x02]);
    pub const CHANGE_TO_MODE_3: Frame = Frame::from_bytes([0xB4, 0x00, 0x02, 0x25]);
    pub const CHANGE_TO_MODE_4: Frame = Frame::from_bytes([0xB4, 0x00, 0x03, 0x38]);
    pub const SET_POWER_DOWN_MODE: Frame = Frame::from_bytes([0xB4, 0x00, 0x04, 0x6B]);
    pub const WAKE_UP_FROM_POWER_DOWN: Frame = Frame::from_bytes([0xB4, 0x00, 0x00, 0x1F]);
    pub const SOFTWARE_RESET: Frame = Frame::from_bytes([0xB4, 0x00, 0x20, 0x98]);
    pub const READ_WHO_AM_I: Frame = Frame::from_bytes([0x40, 0x00, 0x00, 0x91]);
    pub const READ_SERIAL_1: Frame = Frame::from_bytes([0x64, 0x00, 0x00, 0xA7]);
    pub const READ_SERIAL_2: Frame = Frame::from_bytes([0x68, 0x00, 0x00, 0xAD]);
    pub const READ_CURRENT_BANK: Frame = Frame::from_bytes([0x7C, 0x00, 0x00, 0xB3]);
    pub const SWITCH_TO_BANK_0: Frame = Frame::from_bytes([0xFC, 0x00, 0x00, 0x73]);
    pub const SWITCH_TO_BANK_1: Frame = Frame::from_bytes([0xFC, 0x00, 0x01, 0x6E]);
}

/// Whether `frame` is one of the legal command frames
pub fn is_legal(frame: &Frame) -> bool {
    Command::ALL.iter().any(|command| command.frame() == *frame)
}
