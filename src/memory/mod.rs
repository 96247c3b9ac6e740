//! Protected cross-process memory access
//!
//! This module provides:
//! - The `ProcessMemory` seam implemented by real and simulated targets
//! - Scoped protection relax/restore
//! - Raw transfers that treat short copies as failures
//! - `SafeAccess`, the composition the rest of the crate goes through

mod protection;
pub mod safe;
pub mod simulated;
mod target;
mod transfer;

pub use protection::ProtectionFlags;
pub use safe::{SafeAccess, SafeMemoryAccess};
pub use simulated::{ProtectionEvent, SimulatedProcess};
pub use target::ProcessMemory;
pub use transfer::TransferResult;
