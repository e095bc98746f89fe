//! Core data types for the rp package manager.
//!
//! This crate defines the plain records shared by the registry, the resolver
//! and the command-line front end: package descriptors as published in the
//! catalog, the catalog file format, resolution modes, and the global
//! configuration.
//!
//! This crate is intentionally free of resolution logic and network I/O.

/// Runtime name looked up in a descriptor's `engines` table by default.
pub const DEFAULT_ENGINE_NAME: &str = "ringojs";

pub mod catalog;
pub mod config;
pub mod descriptor;
pub mod mode;
