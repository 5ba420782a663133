pub mod decoder;
pub mod types;

pub use decoder::{
    decode_error_flag1, decode_error_flag2, decode_status_summary, describe_command_register,
};
pub use types::{CommandRegisterField, ErrorFlag1Reason, ErrorFlag2Reason, SensorError};
