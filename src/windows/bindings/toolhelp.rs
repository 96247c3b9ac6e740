//! ToolHelp32 bindings for process lookup

use crate::core::types::{MemoryError, MemoryResult, ProcessId};
use crate::windows::types::Handle;
use std::mem;
use winapi::shared::minwindef::FALSE;
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
use winapi::um::tlhelp32::{
    CreateToolhelp32Snapshot, Process32First, Process32Next, PROCESSENTRY32, TH32CS_SNAPPROCESS,
};

/// A running process as seen by a snapshot
#[derive(Debug, Clone)]
pub struct ProcessEntry {
    pub pid: ProcessId,
    pub name: String,
}

/// Snapshot every running process
pub fn snapshot_processes() -> MemoryResult<Vec<ProcessEntry>> {
    let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) };
    if snapshot.is_null() || snapshot == INVALID_HANDLE_VALUE {
        return Err(MemoryError::WindowsApi(
            "Failed to create process snapshot".to_string(),
        ));
    }
    let snapshot = Handle::new(snapshot);

    let mut processes = Vec::new();
    unsafe {
        let mut entry: PROCESSENTRY32 = mem::zeroed();
        entry.dwSize = mem::size_of::<PROCESSENTRY32>() as u32;

        let mut more = Process32First(snapshot.raw(), &mut entry);
        while more != FALSE {
            let name_bytes = &entry.szExeFile;
            let len = name_bytes
                .iter()
                .position(|&c| c == 0)
                .unwrap_or(name_bytes.len());
            let name: Vec<u8> = name_bytes[..len].iter().map(|&c| c as u8).collect();

            processes.push(ProcessEntry {
                pid: entry.th32ProcessID,
                name: String::from_utf8_lossy(&name).into_owned(),
            });

            more = Process32Next(snapshot.raw(), &mut entry);
        }
    }

    Ok(processes)
}
