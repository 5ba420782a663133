pub mod traits;

#[cfg(feature = "embedded")]
pub mod driver;

#[cfg(test)]
pub mod mock;

pub use traits::{Transport, TransportError};
