//! Attaching to the target process
//!
//! Finds the target by executable name, opens it with the access the memory
//! layer needs and resolves the base of the module the offsets are relative
//! to. The handle opened here is owned by `AttachedProcess` and outlives
//! every memory operation that borrows it.

#[cfg(windows)]
pub mod handle;
#[cfg(windows)]
pub mod modules;

#[cfg(windows)]
pub use handle::{ProcessAccess, ProcessHandle};

use crate::core::types::Address;

/// A module loaded in the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: String,
    pub base_address: Address,
    pub size: usize,
}

impl ModuleInfo {
    /// Case-insensitive name comparison
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

#[cfg(windows)]
mod attach {
    use super::{modules, ModuleInfo, ProcessHandle};
    use crate::core::types::{MemoryError, MemoryResult, ProcessId};
    use crate::windows::bindings::toolhelp;
    use tracing::info;

    /// The target, opened and with its module base resolved
    #[derive(Debug)]
    pub struct AttachedProcess {
        pub handle: ProcessHandle,
        pub module: ModuleInfo,
    }

    /// Find the PID of the first process whose executable name matches
    pub fn find_process_id(name: &str) -> MemoryResult<ProcessId> {
        toolhelp::snapshot_processes()?
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.pid)
            .ok_or_else(|| MemoryError::ProcessNotFound(name.to_string()))
    }

    /// Open `process_name` and resolve `module_name` inside it
    pub fn attach(process_name: &str, module_name: &str) -> MemoryResult<AttachedProcess> {
        let pid = find_process_id(process_name)?;
        let handle = ProcessHandle::open_for_read_write(pid)?;
        let module = modules::find_module(&handle, module_name)?;

        info!(
            pid,
            module = %module.name,
            base = %module.base_address,
            "attached to {}",
            process_name
        );
        Ok(AttachedProcess { handle, module })
    }
}

#[cfg(windows)]
pub use attach::{attach, find_process_id, AttachedProcess};
