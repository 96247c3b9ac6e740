//! Core module containing fundamental types and the byte codec
//!
//! This module provides the building blocks used throughout autohop:
//! address handling, error types, and the little-endian integer codec
//! that shapes every payload moved across the process boundary.

pub mod codec;
pub mod types;

pub use types::{Address, MemoryError, MemoryResult, TransferDirection};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

#[cfg(not(target_endian = "little"))]
compile_error!("autohop assumes a little-endian host");
