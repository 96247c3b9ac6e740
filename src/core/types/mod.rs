//! Core type definitions for autohop
//!
//! Address wrapper and the error types shared by the memory layer,
//! the poll loop and the platform bindings.

mod address;
mod error;

pub use address::Address;
pub use error::{MemoryError, MemoryResult, TransferDirection};

pub type ProcessId = u32;
