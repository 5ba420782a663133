//! 32-bit SPI frame codec
//!
//! # Frame Format
//!
//! Every command (MOSI) and response (MISO) is one 32-bit word sent MSB first:
//! ```text
//!  31   30..26   25..24   23..8   7..0
//! [RW]  [ADDR]   [RS]     [DATA]  [CRC]
//! ```
//!
//! - `RW`: 1 for write, 0 for read
//! - `ADDR`: register address (5 bits)
//! - `RS`: return status, only meaningful in responses
//! - `DATA`: register contents
//! - `CRC`: CRC-8 over bits 31..8, see [`crate::protocol::crc`]
//!
//! Decoding never fails. A garbled word decodes to garbage fields and is
//! rejected later by the checksum or address comparison.

use crate::config::spi::FRAME_LEN;
use crate::protocol::crc::calculate_crc;

/// Bit positions and masks of the frame fields
pub mod field {
    pub const RW_SHIFT: u32 = 31;
    pub const ADDRESS_SHIFT: u32 = 26;
    pub const ADDRESS_MASK: u32 = 0x1F;
    pub const RS_SHIFT: u32 = 24;
    pub const RS_MASK: u32 = 0x03;
    pub const DATA_SHIFT: u32 = 8;
    pub const DATA_MASK: u32 = 0xFFFF;
    pub const CRC_MASK: u32 = 0xFF;

    /// Read/write bit, `true` for a write
    pub const fn read_write(word: u32) -> bool {
        (word >> RW_SHIFT) & 1 == 1
    }

    pub const fn address(word: u32) -> u8 {
        ((word >> ADDRESS_SHIFT) & ADDRESS_MASK) as u8
    }

    pub const fn return_status(word: u32) -> u8 {
        ((word >> RS_SHIFT) & RS_MASK) as u8
    }

    pub const fn data(word: u32) -> u16 {
        ((word >> DATA_SHIFT) & DATA_MASK) as u16
    }

    pub const fn checksum(word: u32) -> u8 {
        (word & CRC_MASK) as u8
    }
}

/// Return status carried in bits 25..24 of every response
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnStatus {
    /// Start-up in progress (0b00)
    StartupInProgress = 0,
    /// Normal operation, no flags (0b01)
    NormalOperation = 1,
    /// Self-test running (0b10, reserved)
    SelfTestRunning = 2,
    /// Error flags active in STATUS or previous command had a bad CRC (0b11)
    Error = 3,
}

impl ReturnStatus {
    /// Convert the two RS bits, higher bits are ignored
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::StartupInProgress,
            1 => Self::NormalOperation,
            2 => Self::SelfTestRunning,
            _ => Self::Error,
        }
    }
}

/// One 4-byte frame as it travels on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    pub const fn from_bytes(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn from_word(word: u32) -> Self {
        Self(word.to_be_bytes())
    }

    /// Assemble a frame from its fields and append the computed CRC
    pub fn encode(write: bool, address: u8, status: ReturnStatus, data: u16) -> Self {
        let word = ((write as u32) << field::RW_SHIFT)
            | (((address as u32) & field::ADDRESS_MASK) << field::ADDRESS_SHIFT)
            | ((status as u32) << field::RS_SHIFT)
            | ((data as u32) << field::DATA_SHIFT);
        let prefix = word.to_be_bytes();
        let crc = calculate_crc(&[prefix[0], prefix[1], prefix[2]]);
        Self::from_word(word | crc as u32)
    }

    pub const fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    pub const fn word(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// The three bytes covered by the CRC
    pub const fn crc_prefix(&self) -> [u8; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    /// Whether the stored CRC byte matches the recomputed one
    pub fn has_valid_crc(&self) -> bool {
        calculate_crc(&self.crc_prefix()) == self.0[3]
    }

    pub fn decode(&self) -> DecodedFrame {
        let word = self.word();
        DecodedFrame {
            write: field::read_write(word),
            address: field::address(word),
            return_status: ReturnStatus::from_bits(field::return_status(word)),
            data: field::data(word),
            checksum: field::checksum(word),
        }
    }
}

/// Fields of a frame after bit extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedFrame {
    pub write: bool,
    pub address: u8,
    pub return_status: ReturnStatus,
    pub data: u16,
    pub checksum: u8,
}

impl DecodedFrame {
    /// DATA reinterpreted as two's complement, for signed channels
    pub fn data_signed(&self) -> i16 {
        self.data as i16
    }
}
