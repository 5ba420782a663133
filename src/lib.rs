#![cfg_attr(not(test), no_std)]

pub mod commands;
pub mod config;
pub mod device;
pub mod protocol;
pub mod status;
pub mod transport;

pub use device::Scl3300;
pub use status::SensorError;

// These modules depend on esp-hal and embassy, only available with the embedded feature
#[cfg(feature = "embedded")]
pub mod logger;
#[cfg(feature = "embedded")]
pub mod tasks;
