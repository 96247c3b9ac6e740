//! Sampling of the external control input

use std::collections::VecDeque;

/// A boolean input sampled once per tick
pub trait InputSource {
    /// Whether the control input is currently held
    fn is_active(&mut self) -> bool;
}

impl<F: FnMut() -> bool> InputSource for F {
    fn is_active(&mut self) -> bool {
        self()
    }
}

/// Replays a fixed sequence of samples, then repeats the last one
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    samples: VecDeque<bool>,
    last: bool,
}

impl ScriptedInput {
    pub fn new(samples: impl IntoIterator<Item = bool>) -> Self {
        ScriptedInput {
            samples: samples.into_iter().collect(),
            last: false,
        }
    }
}

impl InputSource for ScriptedInput {
    fn is_active(&mut self) -> bool {
        if let Some(next) = self.samples.pop_front() {
            self.last = next;
        }
        self.last
    }
}

/// Physical key state via `GetAsyncKeyState`
#[cfg(windows)]
#[derive(Debug, Clone, Copy)]
pub struct KeyState {
    virtual_key: i32,
}

#[cfg(windows)]
impl KeyState {
    pub fn new(virtual_key: i32) -> Self {
        KeyState { virtual_key }
    }
}

#[cfg(windows)]
impl InputSource for KeyState {
    fn is_active(&mut self) -> bool {
        crate::windows::bindings::user32::is_key_down(self.virtual_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_repeats_last_sample() {
        let mut input = ScriptedInput::new([true, false, true]);
        assert!(input.is_active());
        assert!(!input.is_active());
        assert!(input.is_active());
        assert!(input.is_active());
    }

    #[test]
    fn test_empty_script_is_inactive() {
        let mut input = ScriptedInput::default();
        assert!(!input.is_active());
    }

    #[test]
    fn test_closure_input() {
        let mut calls = 0;
        let mut input = || {
            calls += 1;
            calls % 2 == 0
        };
        assert!(!InputSource::is_active(&mut input));
        assert!(InputSource::is_active(&mut input));
    }
}
