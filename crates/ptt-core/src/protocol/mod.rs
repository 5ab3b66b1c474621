//! Browser-facing control channel protocol.
//!
//! Frames are UTF-8 JSON objects carried as WebSocket text messages.

pub mod messages;

pub use messages::{parse_client_message, ClientCommand, Inbound, RejectReason, ServerStatus};
