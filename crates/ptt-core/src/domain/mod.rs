//! Domain entities for Remote PTT.
//!
//! This module contains pure business logic with no OS or network dependencies.

pub mod ptt;

pub use ptt::{PttCommand, PttState};
