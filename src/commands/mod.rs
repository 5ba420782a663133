pub mod registry;
pub mod types;

pub use registry::is_legal;
pub use types::{Command, MemoryBank};
