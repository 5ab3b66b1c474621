//! Key emulation backends.
//!
//! [`EnigoKeyEmulator`] injects real OS key events on Windows, macOS and
//! Linux/X11.  [`MockKeyEmulator`] records calls in memory for tests.

pub mod enigo_emulator;
pub mod mock;

pub use enigo_emulator::EnigoKeyEmulator;
pub use mock::MockKeyEmulator;
