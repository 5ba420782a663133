pub mod crc;
pub mod frame;

pub use frame::{DecodedFrame, Frame, ReturnStatus};
