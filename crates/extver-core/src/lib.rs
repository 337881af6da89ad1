//! Core data types for extver.
//!
//! This crate defines the model the propagation engine works on: coordinate
//! keys and the coordinate map, the exclusion set, modules with their
//! dependencies and build steps, pre-release version rules, run
//! configuration, and the editable XML element tree descriptors are loaded into.
//!
//! Nothing here touches the network or spawns processes.

pub mod config;
pub mod coordinate;
pub mod coordinate_map;
pub mod exclusion;
pub mod module;
pub mod version;
pub mod xml;
