//! vrosplit - split DVD-RAM camcorder recordings into one file per clip
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod report;
pub mod split;
pub mod status;
