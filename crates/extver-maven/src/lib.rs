//! Maven descriptor handling: POM parsing, module graph enumeration,
//! descriptor load/save and output file placement.

pub mod descriptor;
pub mod pom;
pub mod reactor;
