//! Shared utilities for extver.
//!
//! This crate provides cross-cutting concerns used by all other extver crates:
//! the unified error type, filesystem helpers, external process spawning,
//! and Cargo-style status lines.

pub mod errors;
pub mod fs;
pub mod process;
pub mod progress;
