//! The shared push-to-talk state and its transition rule.
//!
//! There is exactly one [`PttState`] per process no matter how many browsers
//! are connected: all of them drive the same physical key.  The transition
//! rule is deliberately tiny so it can be reused by the session registry, the
//! local control path, and the tests without any I/O.
//!
//! # Transition table
//!
//! | Current    | Command | Next       | Key call    | Broadcast  |
//! |------------|---------|------------|-------------|------------|
//! | `Released` | `On`    | `Pressed`  | `press()`   | `ptt_on`   |
//! | `Pressed`  | `Off`   | `Released` | `release()` | `ptt_off`  |
//! | `Pressed`  | `On`    | (absorbed) | none        | none       |
//! | `Released` | `Off`   | (absorbed) | none        | none       |

use std::fmt;

/// Logical state of the simulated push-to-talk key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PttState {
    /// The key is up.  Initial state, and the safe state to fall back to.
    #[default]
    Released,
    /// The key is held down; the voice application is transmitting.
    Pressed,
}

/// A request to change the [`PttState`], from a browser or from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PttCommand {
    /// Hold the key down.
    On,
    /// Let the key go.
    Off,
}

impl PttState {
    /// Returns the state `command` would move to, or `None` when the command
    /// repeats the current state and must be absorbed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ptt_core::{PttCommand, PttState};
    ///
    /// assert_eq!(PttState::Released.transition(PttCommand::On), Some(PttState::Pressed));
    /// assert_eq!(PttState::Pressed.transition(PttCommand::On), None);
    /// ```
    pub fn transition(self, command: PttCommand) -> Option<PttState> {
        let target = PttState::from(command);
        if target == self {
            None
        } else {
            Some(target)
        }
    }

    /// Returns `true` while the key is held.
    pub fn is_pressed(self) -> bool {
        matches!(self, PttState::Pressed)
    }
}

impl From<PttCommand> for PttState {
    fn from(command: PttCommand) -> Self {
        match command {
            PttCommand::On => PttState::Pressed,
            PttCommand::Off => PttState::Released,
        }
    }
}

impl fmt::Display for PttState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PttState::Released => f.write_str("OFF"),
            PttState::Pressed => f.write_str("ON"),
        }
    }
}
