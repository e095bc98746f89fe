//! Shared utilities for the rp package manager.
//!
//! This crate provides the cross-cutting concerns used by the other rp
//! crates: the unified application error type and Cargo-style status lines.

pub mod errors;
pub mod progress;
