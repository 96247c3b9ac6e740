//! Module lookup in the target process

use super::{ModuleInfo, ProcessHandle};
use crate::core::types::{Address, MemoryError, MemoryResult};
use crate::windows::bindings::psapi;
use tracing::debug;

/// Enumerate modules loaded in the process
pub fn enumerate_modules(handle: &ProcessHandle) -> MemoryResult<Vec<ModuleInfo>> {
    let mut modules = Vec::new();

    unsafe {
        for module in psapi::enum_process_modules(handle.raw())? {
            let name = match psapi::get_module_base_name(handle.raw(), module) {
                Ok(name) => name,
                Err(_) => continue,
            };
            let info = match psapi::get_module_information(handle.raw(), module) {
                Ok(info) => info,
                Err(_) => continue,
            };

            modules.push(ModuleInfo {
                name,
                base_address: Address::new(info.lpBaseOfDll as usize),
                size: info.SizeOfImage as usize,
            });
        }
    }

    Ok(modules)
}

/// Find a module by name (case-insensitive)
pub fn find_module(handle: &ProcessHandle, name: &str) -> MemoryResult<ModuleInfo> {
    let modules = enumerate_modules(handle)?;
    debug!(pid = handle.pid(), count = modules.len(), "enumerated modules");

    modules
        .into_iter()
        .find(|m| m.name_matches(name))
        .ok_or_else(|| MemoryError::ModuleNotFound(name.to_string()))
}
