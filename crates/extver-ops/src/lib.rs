//! High-level operations: version resolution, reference rewriting, descriptor
//! writing, the two-pass propagation engine, and the `apply`/`plan` commands
//! built on them.

pub mod ops_apply;
pub mod ops_config;
pub mod ops_plan;
pub mod ops_propagate;
pub mod ops_resolve;
pub mod ops_rewrite;
pub mod ops_write;
