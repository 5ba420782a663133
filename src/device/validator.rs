//! Response frame validation
//!
//! Checks run in a fixed order and the first failure is reported:
//! checksum, return status (ERROR, then the reserved self-test value),
//! address, then read/write bit.

use crate::commands::Command;
use crate::protocol::{Frame, ReturnStatus};
use crate::status::SensorError;

/// Validate the response answering `command` and return its DATA field
pub fn validate_response(command: Command, response: &Frame) -> Result<u16, SensorError> {
    if !response.has_valid_crc() {
        return Err(SensorError::BadChecksum);
    }

    let issued = command.frame().decode();
    let received = response.decode();

    if received.return_status == ReturnStatus::Error {
        // STATUS reads report ERROR until the start-up flags are cleared
        return Err(if command == Command::ReadStatusSummary {
            SensorError::StartupInProgress
        } else {
            SensorError::InvalidCommandFrame
        });
    }

    // Reserved status, DATA is not a register value
    if received.return_status == ReturnStatus::SelfTestRunning {
        return Err(SensorError::SelfTestRunning);
    }

    if command == Command::ReadStatusSummary && received.return_status != ReturnStatus::NormalOperation {
        log::warn!(
            "STATUS read with return status {:?}, start-up not performed correctly",
            received.return_status
        );
    }

    if received.address != issued.address {
        return Err(SensorError::InvalidResponseFrame);
    }

    if received.write != issued.write {
        return Err(SensorError::ReadWriteMismatch);
    }

    Ok(received.data)
}
