pub mod driver;
pub mod readings;
pub mod state;
pub mod validator;

pub use driver::{format_serial_number, NormalOperationReport, Scl3300, SerialNumber};
pub use readings::{Axis, Channel, Readings, TemperatureScale};
pub use self_test::{SelfTestMonitor, SelfTestSummary};
pub use state::{DeviceState, OperationMode};
pub use validator::validate_response;
