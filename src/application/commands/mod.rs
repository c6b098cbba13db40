//! Built-in system commands.

mod generic;
mod generic_message;

pub use generic::GenericCommand;
pub use generic_message::GenericMessageCommand;

use crate::domain::command::factory;

use super::registry::CommandCatalog;

/// Id of the location holding the built-in commands.
pub const BUILTIN_LOCATION: &str = "builtin";

/// Location holding `generic` and `genericmessage`.
pub fn builtin_catalog() -> CommandCatalog {
    CommandCatalog::new(BUILTIN_LOCATION)
        .with_command(factory(|| GenericCommand))
        .with_command(factory(|| GenericMessageCommand))
}
