//! CRC-8 for SPI frames
//!
//! The checksum covers the upper 24 bits of a frame (RW, ADDR, RS and DATA)
//! and is carried in the lowest byte. Polynomial 0x1D, seed 0xFF, MSB first,
//! result inverted. That is CRC-8/SAE-J1850, computed with the table-driven
//! `crc` crate. The bit-serial datasheet form is kept for cross-checking.

use crc::{Crc, CRC_8_SAE_J1850};

const CRC: Crc<u8> = Crc::<u8>::new(&CRC_8_SAE_J1850);

/// Generator polynomial, x^8 + x^4 + x^3 + x^2 + 1
pub const POLYNOMIAL: u8 = 0x1D;

/// Accumulator seed
pub const SEED: u8 = 0xFF;

/// Calculate the frame CRC over the three prefix bytes
pub fn calculate_crc(prefix: &[u8; 3]) -> u8 {
    CRC.checksum(prefix)
}

/// Bit-serial CRC over bits 31..8 of `word`, as given in the datasheet
pub fn calculate_crc_serial(word: u32) -> u8 {
    let mut crc = SEED;
    for bit_index in (8..32).rev() {
        let bit = ((word >> bit_index) & 1) as u8;
        let feedback = (crc >> 7) ^ bit;
        crc <<= 1;
        if feedback != 0 {
            crc ^= POLYNOMIAL;
        }
    }
    !crc
}
