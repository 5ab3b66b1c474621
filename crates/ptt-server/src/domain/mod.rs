//! Domain layer for ptt-server.
//!
//! Pure configuration types with no dependencies on I/O, networking, or
//! async runtimes.  The PTT state machine itself lives in `ptt-core`.

pub mod config;

pub use config::ServerConfig;
