//! Shared helpers for the docqa HTTP server.
//!
//! The binary in `main.rs` wires these into the router; they live here so
//! integration tests can exercise them directly.

pub mod cors;
pub mod responses;
