//! `padron-validator` library crate.
//!
//! Wires the pure logic of `padron_core` to concrete file formats, fuzzy
//! matching, environment configuration and logging. The binary entrypoint
//! lives in `main.rs`; modules are public for integration testing.

pub mod codec;
pub mod config;
pub mod error;
pub mod matcher;
pub mod session;
