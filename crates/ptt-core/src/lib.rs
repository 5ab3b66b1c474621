//! # ptt-core
//!
//! Shared library for Remote PTT containing the push-to-talk state machine,
//! the JSON control protocol spoken by browsers, the key identifier tables,
//! and the `config.json` schema.
//!
//! It has zero dependencies on OS input APIs, sockets, or async runtimes.
//!
//! # Architecture overview
//!
//! Remote PTT lets someone who is not sitting at the PC hold a push-to-talk
//! key on it from a browser.  Every connected browser shares one simulated
//! key: any of them can press it, any of them can release it, and every one
//! of them is told when it changes.
//!
//! - **`domain`** – The two-state [`PttState`] and the pure transition rule
//!   that absorbs repeated commands.
//!
//! - **`protocol`** – The JSON frames exchanged over the control channel and
//!   a fail-soft parser that classifies inbound text as a valid command or a
//!   rejected payload.
//!
//! - **`keymap`** – Resolution of configuration strings such as `caps_lock`
//!   to a canonical USB HID usage id, and from there to the native code of
//!   the platform the server runs on.
//!
//! - **`config`** – The on-disk configuration record with its defaults and
//!   validation.

pub mod config;
pub mod domain;
pub mod keymap;
pub mod protocol;

pub use config::{ConfigError, PttConfig};
pub use domain::ptt::{PttCommand, PttState};
pub use keymap::{ConfigurationError, HidKeyCode, KeyIdentifier};
pub use protocol::messages::{parse_client_message, Inbound, RejectReason, ServerStatus};
