#![forbid(unsafe_code)]

//! # SIGAID CLI
//!
//! The `sigaid` binary plus the in-process testing harness the end-to-end
//! suite drives. The CLI consumes the SDK crates exactly as a user would.

/// The command definitions and their implementations.
pub mod commands;
/// In-process gateway harness for end-to-end tests.
pub mod testing;
