//! Custom error types for autohop

use super::Address;
use std::fmt;
use std::io;
use thiserror::Error;

/// Direction of a cross-process copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    Read,
    Write,
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferDirection::Read => write!(f, "read"),
            TransferDirection::Write => write!(f, "write"),
        }
    }
}

/// Main error type for memory operations
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Failed to {direction} memory at {address}: {source}")]
    TransferFailed {
        direction: TransferDirection,
        address: Address,
        #[source]
        source: io::Error,
    },

    #[error("Partial {direction} at {address}: requested {requested} bytes, transferred {transferred}")]
    PartialTransfer {
        direction: TransferDirection,
        address: Address,
        requested: usize,
        transferred: usize,
    },

    #[error("Zero-length {0} is not supported")]
    EmptyTransfer(TransferDirection),

    #[error("Memory protection error: {0}")]
    ProtectionError(String),

    #[error("Unsupported integer width: {0} bytes")]
    UnsupportedWidth(usize),

    #[error("Buffer too small: expected {expected}, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },

    #[error("Pointer chain broken at level {level}: {reason}")]
    PointerChainBroken { level: usize, reason: String },

    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Windows API: {0}")]
    WindowsApi(String),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Result type alias for memory operations
pub type MemoryResult<T> = Result<T, MemoryError>;

impl MemoryError {
    /// Creates a transfer error carrying the OS error untouched
    pub fn transfer_failed(direction: TransferDirection, address: Address, source: io::Error) -> Self {
        MemoryError::TransferFailed {
            direction,
            address,
            source,
        }
    }

    /// Creates a short-transfer error
    pub fn partial_transfer(
        direction: TransferDirection,
        address: Address,
        requested: usize,
        transferred: usize,
    ) -> Self {
        MemoryError::PartialTransfer {
            direction,
            address,
            requested,
            transferred,
        }
    }

    /// Creates a pointer chain broken error
    pub fn pointer_chain_broken(level: usize, reason: impl Into<String>) -> Self {
        MemoryError::PointerChainBroken {
            level,
            reason: reason.into(),
        }
    }

    /// Creates a buffer too small error
    pub fn buffer_too_small(expected: usize, actual: usize) -> Self {
        MemoryError::BufferTooSmall { expected, actual }
    }

    /// True for the failures raised by a cross-process copy
    pub fn is_transfer_error(&self) -> bool {
        matches!(
            self,
            MemoryError::TransferFailed { .. } | MemoryError::PartialTransfer { .. }
        )
    }
}
