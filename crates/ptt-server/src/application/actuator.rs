//! Key actuation: the seam between PTT policy and the OS keyboard.
//!
//! The application layer talks to a [`KeyEmulator`] trait object; the real
//! implementation and a recording mock live in
//! `infrastructure::key_emulation`.  [`KeyActuator`] wraps one emulator and
//! one configured key and makes press/release idempotent, so redundant "on"
//! commands from several browsers never double-fire the key.

use std::sync::Arc;

use ptt_core::{ConfigurationError, KeyIdentifier};
use thiserror::Error;
use tracing::{debug, error};

/// Error type for key emulation.
#[derive(Debug, Error)]
pub enum EmulationError {
    #[error("platform error: {0}")]
    Platform(String),
    #[error(transparent)]
    UnsupportedKey(#[from] ConfigurationError),
    #[error("key emulation worker is not running")]
    WorkerGone,
}

/// Platform-agnostic key event injection.
pub trait KeyEmulator: Send + Sync {
    /// Emits a key-down event for `key`.
    fn key_down(&self, key: KeyIdentifier) -> Result<(), EmulationError>;

    /// Emits a key-up event for `key`.
    fn key_up(&self, key: KeyIdentifier) -> Result<(), EmulationError>;
}

/// Holds or lets go of exactly one configured key.
///
/// Tracks the last state applied to the OS and skips calls that would repeat
/// it.  Emulation failures are logged and not returned: whether the OS
/// accepts key events at all is checked once when the emulator is built.
pub struct KeyActuator {
    emulator: Arc<dyn KeyEmulator>,
    key: KeyIdentifier,
    down: bool,
}

impl KeyActuator {
    /// Creates an actuator for `key`, initially up.
    pub fn new(emulator: Arc<dyn KeyEmulator>, key: KeyIdentifier) -> Self {
        Self {
            emulator,
            key,
            down: false,
        }
    }

    /// The configured key.
    pub fn key(&self) -> KeyIdentifier {
        self.key
    }

    /// `true` while the key is held.
    pub fn is_down(&self) -> bool {
        self.down
    }

    /// Emits key-down unless the key is already down.
    pub fn press(&mut self) {
        if self.down {
            return;
        }
        self.down = true;
        match self.emulator.key_down(self.key) {
            Ok(()) => debug!("key down: {}", self.key),
            Err(e) => error!("failed to press {}: {e}", self.key),
        }
    }

    /// Emits key-up unless the key is already up.
    pub fn release(&mut self) {
        if !self.down {
            return;
        }
        self.down = false;
        match self.emulator.key_up(self.key) {
            Ok(()) => debug!("key up: {}", self.key),
            Err(e) => error!("failed to release {}: {e}", self.key),
        }
    }
}
