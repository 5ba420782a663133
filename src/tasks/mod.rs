//! Embassy tasks module
//!
//! Contains the async tasks for the firmware, organised by functionality.

pub mod led;
pub mod sensor;

pub use led::{led_task, LedReceiver, LedSender, LedSignal, LED_CHANNEL};
pub use sensor::{sensor_task, SensorDriver};
