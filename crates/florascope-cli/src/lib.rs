//! Florascope CLI
//!
//! Argument parsing and plain-text rendering for the `florascope` binary.

pub mod cli;
pub mod render;
