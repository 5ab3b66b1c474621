//! ptt-server library crate.
//!
//! This crate runs the Remote PTT relay: browsers on the LAN open a
//! WebSocket control channel and press or release one keyboard key on the
//! host, which a voice application picks up as its push-to-talk key.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Browser (JSON over WebSocket)          Browser (HTTP GET)
//!         ↕                                      ↕
//! [ptt-server]
//!   ├── domain/            ServerConfig
//!   ├── application/
//!   │     ├── actuator/    KeyEmulator seam + idempotent KeyActuator
//!   │     ├── registry/    Sessions + the single shared PttState
//!   │     └── control/     ControlService task and its ControlHandle
//!   └── infrastructure/
//!         ├── ws_server/     Control channel accept loop (tokio-tungstenite)
//!         ├── http_server/   Static page server (axum)
//!         ├── key_emulation/ enigo-backed emulator + recording mock
//!         └── setup_wizard/  Interactive config.json writer
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `ptt-core`, plus tokio channels.
//!   It never touches a socket or the OS keyboard directly.
//! - `infrastructure` depends on all other layers plus `tokio`,
//!   `tungstenite`, `axum` and `enigo`.

/// Domain layer: runtime configuration (no I/O).
pub mod domain;

/// Application layer: PTT policy, session bookkeeping, key actuation.
pub mod application;

/// Infrastructure layer: sockets, static assets, OS key events, setup wizard.
pub mod infrastructure;
