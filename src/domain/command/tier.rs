//! Command privilege tiers.
//!
//! Represents the authorization level a command is registered under.

use serde::{Deserialize, Serialize};

/// Privilege tier of a command.
///
/// Ordered by precedence: `System > Admin > User`. When the same name is
/// available at several tiers, resolution picks the highest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandTier {
    /// General-purpose commands, available to every sender.
    User,

    /// Commands reserved for privileged senders.
    Admin,

    /// Framework-internal commands (fallbacks, update-type handlers).
    System,
}

impl CommandTier {
    /// All tiers, highest precedence first.
    pub const PRECEDENCE: [CommandTier; 3] =
        [CommandTier::System, CommandTier::Admin, CommandTier::User];

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            CommandTier::System => "System",
            CommandTier::Admin => "Admin",
            CommandTier::User => "User",
        }
    }

    /// Module segment used in conventional command references.
    pub fn module(&self) -> &'static str {
        match self {
            CommandTier::System => "system_commands",
            CommandTier::Admin => "admin_commands",
            CommandTier::User => "user_commands",
        }
    }

    /// Tiers to search, highest precedence first.
    ///
    /// `Admin` is only searched when the caller is privileged.
    pub fn search_order(include_admin: bool) -> Vec<CommandTier> {
        Self::PRECEDENCE
            .into_iter()
            .filter(|tier| include_admin || *tier != CommandTier::Admin)
            .collect()
    }
}

impl std::fmt::Display for CommandTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
