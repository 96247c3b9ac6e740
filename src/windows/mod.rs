//! Windows API layer
//!
//! Thin wrappers around the Windows calls autohop needs: opening the
//! target, reading, writing and reprotecting its memory, finding a process
//! and module by name, and sampling the keyboard. All unsafe FFI lives here.

pub mod bindings;
pub mod types;

pub use bindings::{kernel32, psapi, toolhelp, user32};
pub use types::Handle;
