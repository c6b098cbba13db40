//! CommandResolver - name to command instance, highest tier first.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::domain::command::naming::normalize;
use crate::domain::command::{Command, CommandTier};

use super::registry::CommandRegistry;

/// Resolves command names for one dispatch cycle.
///
/// Tiers are searched System, then Admin (only when `include_admin`), then
/// User. An implementation is accepted only under the tier it declares.
/// Hits are cached for the lifetime of the resolver.
pub struct CommandResolver<'a> {
    registry: &'a CommandRegistry,
    include_admin: bool,
    cache: HashMap<String, Arc<dyn Command>>,
}

impl<'a> CommandResolver<'a> {
    pub fn new(registry: &'a CommandRegistry, include_admin: bool) -> Self {
        Self {
            registry,
            include_admin,
            cache: HashMap::new(),
        }
    }

    /// The command serving `name`, if any tier provides one.
    pub fn resolve(&mut self, name: &str) -> Option<Arc<dyn Command>> {
        let key = normalize(name);
        if let Some(command) = self.cache.get(&key) {
            return Some(Arc::clone(command));
        }

        let command = self.lookup(&key)?;
        self.cache.insert(key, Arc::clone(&command));
        Some(command)
    }

    fn lookup(&self, name: &str) -> Option<Arc<dyn Command>> {
        if name.is_empty() {
            return None;
        }
        for tier in CommandTier::search_order(self.include_admin) {
            let Some(command) = self.registry.instantiate(tier, name) else {
                continue;
            };
            if command.tier() == tier {
                return Some(command);
            }
            debug!(
                command = name,
                tier = %tier,
                declared = %command.tier(),
                "command declares another tier, skipping"
            );
        }
        None
    }
}
