// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod gateway;
pub mod logging;
pub mod navigator;
pub mod types;

pub use gateway::*;
pub use logging::*;
pub use navigator::*;
pub use types::*;
