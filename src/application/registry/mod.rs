//! Command registry and its search locations.

mod location;
#[allow(clippy::module_inception)]
mod registry;

pub use location::{Artifact, CommandCatalog, CommandLocation};
pub use registry::{CommandRegistry, Discovery};
