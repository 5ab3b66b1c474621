//! Mock key emulator for unit and integration testing.
//!
//! The real emulator presses keys on the machine running the tests, which is
//! both invisible to assertions and disruptive.  [`MockKeyEmulator`] only
//! records each call, in order, so tests can check exactly how many times the
//! key went down and up.
//!
//! # Usage in tests
//!
//! ```ignore
//! let mock = Arc::new(MockKeyEmulator::new());
//! let mut actuator = KeyActuator::new(mock.clone(), KeyIdentifier::default());
//!
//! actuator.press();
//!
//! assert_eq!(mock.key_down_count(), 1);
//! ```

use std::sync::{Mutex, PoisonError};

use ptt_core::KeyIdentifier;

use crate::application::actuator::{EmulationError, KeyEmulator};

/// A mock emulator that records all calls without performing OS API calls.
#[derive(Default)]
pub struct MockKeyEmulator {
    /// `(is_down, key)` for every call, in call order.
    events: Mutex<Vec<(bool, KeyIdentifier)>>,
    /// When `true`, every call returns an `EmulationError::Platform` after
    /// recording it.
    should_fail: bool,
}

impl MockKeyEmulator {
    /// Creates a mock with no recorded events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock whose every call fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// All recorded `(is_down, key)` pairs.
    pub fn events(&self) -> Vec<(bool, KeyIdentifier)> {
        self.lock().clone()
    }

    /// Number of key-down calls so far.
    pub fn key_down_count(&self) -> usize {
        self.lock().iter().filter(|(down, _)| *down).count()
    }

    /// Number of key-up calls so far.
    pub fn key_up_count(&self) -> usize {
        self.lock().iter().filter(|(down, _)| !*down).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(bool, KeyIdentifier)>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, down: bool, key: KeyIdentifier) -> Result<(), EmulationError> {
        self.lock().push((down, key));
        if self.should_fail {
            return Err(EmulationError::Platform("mock failure".into()));
        }
        Ok(())
    }
}

impl KeyEmulator for MockKeyEmulator {
    fn key_down(&self, key: KeyIdentifier) -> Result<(), EmulationError> {
        self.record(true, key)
    }

    fn key_up(&self, key: KeyIdentifier) -> Result<(), EmulationError> {
        self.record(false, key)
    }
}
