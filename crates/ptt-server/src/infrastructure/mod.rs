//! Infrastructure layer for ptt-server.
//!
//! The infrastructure layer handles all I/O: the two listeners browsers talk
//! to, the OS key injection, and the interactive setup on the terminal.
//!
//! # Responsibilities
//!
//! - Serving the static PTT page over HTTP
//! - Accepting WebSocket control sessions and keeping them alive
//! - Injecting key down/up events into the host OS
//! - Discovering the LAN address shown in startup output
//! - Writing `config.json` from the setup wizard
//! - Reading local PTT test commands from the server's terminal
//!
//! # What does NOT belong here?
//!
//! - The PTT state machine and wire format (that is `ptt-core`)
//! - Session bookkeeping and broadcast rules (that is the application layer)

pub mod http_server;
pub mod key_emulation;
pub mod lan;
pub mod local_console;
pub mod setup_wizard;
pub mod ws_server;

pub use http_server::{bind_http_listener, serve_static_assets};
pub use ws_server::{bind_control_listener, serve_control_channel};
