//! Application layer for ptt-server.
//!
//! The application layer owns the PTT policy: it knows *what* happens when a
//! browser presses, releases, joins, or vanishes, but delegates *how* keys
//! are emulated and frames are delivered to the infrastructure layer.
//!
//! # Responsibilities
//!
//! - Idempotent press/release over one configured key ([`KeyActuator`])
//! - Tracking sessions and the shared state ([`SessionRegistry`])
//! - Serialising every state change through one task ([`ControlService`])
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or listening for connections (that is infrastructure)
//! - OS keyboard APIs (behind the [`KeyEmulator`] trait)
//! - WebSocket framing (handled by tokio-tungstenite)

pub mod actuator;
pub mod control;
pub mod registry;

pub use actuator::{EmulationError, KeyActuator, KeyEmulator};
pub use control::{ControlError, ControlEvent, ControlHandle, ControlService, StatusSnapshot};
pub use registry::{Departure, SessionId, SessionRegistry};
