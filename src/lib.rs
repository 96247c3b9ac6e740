//! autohop: timed writes into another process's memory driven by a polled flag

pub mod config;
pub mod core;
pub mod hop;
pub mod input;
pub mod memory;
pub mod process;
#[cfg(windows)]
pub mod windows;

// Re-export main types from core module
pub use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId, TransferDirection};

pub use hop::{HopState, PollConfig, PollLoop, TickStats};
pub use memory::{ProcessMemory, SafeAccess, SafeMemoryAccess};

// Re-export core directly for full access
pub use crate::core::*;
