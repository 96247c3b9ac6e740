//! User32.dll bindings for keyboard sampling

use winapi::um::winuser::GetAsyncKeyState;

/// True while the virtual key is held down
pub fn is_key_down(virtual_key: i32) -> bool {
    unsafe { (GetAsyncKeyState(virtual_key) as u16) & 0x8000 != 0 }
}
