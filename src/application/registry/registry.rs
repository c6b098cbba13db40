//! CommandRegistry - search locations plus explicit registrations.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::errors::RegistryError;
use crate::application::resolver::CommandResolver;
use crate::domain::command::naming::{
    command_name_from_reference, conventional_reference, normalize, DEFAULT_NAMESPACE,
};
use crate::domain::command::{Command, CommandFactory, CommandTier};

use super::{Artifact, CommandLocation};

/// Commands found by [`CommandRegistry::discover`].
#[derive(Default)]
pub struct Discovery {
    /// Usable commands keyed by lower-cased name.
    pub commands: BTreeMap<String, Arc<dyn Command>>,

    /// Locations that could not be scanned.
    pub errors: Vec<RegistryError>,
}

impl Discovery {
    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }
}

/// Where commands come from.
///
/// Explicit registrations are keyed by `(tier, name)`; a second
/// registration for the same key replaces the first. Locations are
/// searched in order for conventional references when no explicit entry
/// exists.
#[derive(Default)]
pub struct CommandRegistry {
    locations: Vec<Arc<dyn CommandLocation>>,
    explicit: HashMap<(CommandTier, String), CommandFactory>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a search location at the front (`prepend`) or the back.
    pub fn add_location(
        &mut self,
        location: Arc<dyn CommandLocation>,
        prepend: bool,
    ) -> Result<(), RegistryError> {
        if self.locations.iter().any(|l| l.id() == location.id()) {
            return Err(RegistryError::LocationExists(location.id().to_string()));
        }
        if prepend {
            self.locations.insert(0, location);
        } else {
            self.locations.push(location);
        }
        Ok(())
    }

    /// Adds several locations, keeping their relative order.
    pub fn add_locations(
        &mut self,
        locations: impl IntoIterator<Item = Arc<dyn CommandLocation>>,
        prepend: bool,
    ) -> Result<(), RegistryError> {
        let mut locations: Vec<_> = locations.into_iter().collect();
        if prepend {
            locations.reverse();
        }
        for location in locations {
            self.add_location(location, prepend)?;
        }
        Ok(())
    }

    /// Ids of the registered locations, in search order.
    pub fn location_ids(&self) -> Vec<&str> {
        self.locations.iter().map(|l| l.id()).collect()
    }

    /// Registers the command behind `reference`, searching every location.
    ///
    /// Returns the `(tier, name)` key it was filed under.
    pub fn register(&mut self, reference: &str) -> Result<(CommandTier, String), RegistryError> {
        let artifact = self
            .locations
            .iter()
            .find_map(|location| location.load(reference))
            .ok_or_else(|| RegistryError::NotLoadable(reference.to_string()))?;

        match artifact {
            Artifact::Command(factory) => Ok(self.register_command(factory)),
            Artifact::Foreign => Err(RegistryError::NotACommand(reference.to_string())),
        }
    }

    /// Registers a command factory under the tier and name its instances declare.
    pub fn register_command(&mut self, factory: CommandFactory) -> (CommandTier, String) {
        let command = factory();
        let key = (command.tier(), normalize(command.name()));
        debug!(command = %key.1, tier = %key.0, "command registered");
        self.explicit.insert(key.clone(), factory);
        key
    }

    /// Whether an explicit registration exists for `(tier, name)`.
    pub fn is_registered(&self, tier: CommandTier, name: &str) -> bool {
        self.explicit.contains_key(&(tier, normalize(name)))
    }

    /// Builds the implementation available for `name` at `tier`.
    ///
    /// The explicit entry wins; otherwise each location is asked for the
    /// conventional reference. The caller checks the declared tier.
    pub fn instantiate(&self, tier: CommandTier, name: &str) -> Option<Arc<dyn Command>> {
        let name = normalize(name);
        if let Some(factory) = self.explicit.get(&(tier, name.clone())) {
            return Some(factory());
        }

        self.locations.iter().find_map(|location| {
            let namespace = location.namespace().unwrap_or(DEFAULT_NAMESPACE);
            let reference = conventional_reference(namespace, tier, &name);
            match location.load(&reference)? {
                Artifact::Command(factory) => Some(factory()),
                Artifact::Foreign => None,
            }
        })
    }

    /// Scans every location and resolves each `*Command` artifact found.
    ///
    /// A name seen in an earlier location is not looked at again. A
    /// location that fails to scan is logged and reported in
    /// [`Discovery::errors`]. Explicit registrations are included.
    pub fn discover(&self, include_admin: bool) -> Discovery {
        let mut resolver = CommandResolver::new(self, include_admin);
        let mut discovery = Discovery::default();

        for location in &self.locations {
            let references = match location.scan() {
                Ok(references) => references,
                Err(err) => {
                    warn!(location = location.id(), error = %err, "command location scan failed");
                    discovery.errors.push(err);
                    continue;
                }
            };

            for reference in references {
                let Some(name) = command_name_from_reference(&reference) else {
                    continue;
                };
                if discovery.commands.contains_key(&name) {
                    continue;
                }
                if !matches!(location.load(&reference), Some(Artifact::Command(_))) {
                    debug!(reference = %reference, "artifact is not a command");
                    continue;
                }
                if let Some(command) = resolver.resolve(&name) {
                    discovery.commands.insert(name, command);
                }
            }
        }

        let explicit_names: Vec<String> = self.explicit.keys().map(|(_, name)| name.clone()).collect();
        for name in explicit_names {
            if discovery.commands.contains_key(&name) {
                continue;
            }
            if let Some(command) = resolver.resolve(&name) {
                discovery.commands.insert(name, command);
            }
        }

        discovery
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::registry::CommandCatalog;
    use crate::domain::command::{factory, CommandContext, ExecutionResult};
    use crate::domain::foundation::DomainError;
    use async_trait::async_trait;

    struct Named {
        name: &'static str,
        tier: CommandTier,
        usage: &'static str,
    }

    #[async_trait]
    impl Command for Named {
        fn name(&self) -> &str {
            self.name
        }

        fn tier(&self) -> CommandTier {
            self.tier
        }

        fn usage(&self) -> &str {
            self.usage
        }

        async fn execute(&self, _ctx: &CommandContext<'_>) -> Result<ExecutionResult, DomainError> {
            Ok(ExecutionResult::success(self.tier.display_name()))
        }
    }

    fn named(name: &'static str, tier: CommandTier) -> CommandFactory {
        factory(move || Named { name, tier, usage: "/x" })
    }

    struct BrokenLocation;

    impl CommandLocation for BrokenLocation {
        fn id(&self) -> &str {
            "broken"
        }

        fn scan(&self) -> Result<Vec<String>, RegistryError> {
            Err(RegistryError::location_scan("broken", "permission denied"))
        }

        fn load(&self, _reference: &str) -> Option<Artifact> {
            None
        }
    }

    #[test]
    fn duplicate_location_is_rejected() {
        let mut registry = CommandRegistry::new();
        registry.add_location(Arc::new(CommandCatalog::new("a")), false).unwrap();
        let err = registry
            .add_location(Arc::new(CommandCatalog::new("a")), false)
            .unwrap_err();
        assert!(matches!(err, RegistryError::LocationExists(id) if id == "a"));
    }

    #[test]
    fn prepend_and_append_control_search_order() {
        let mut registry = CommandRegistry::new();
        registry.add_location(Arc::new(CommandCatalog::new("b")), false).unwrap();
        registry.add_location(Arc::new(CommandCatalog::new("c")), false).unwrap();
        registry.add_location(Arc::new(CommandCatalog::new("a")), true).unwrap();
        assert_eq!(registry.location_ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn add_locations_prepends_as_a_block() {
        let mut registry = CommandRegistry::new();
        registry.add_location(Arc::new(CommandCatalog::new("z")), false).unwrap();
        let block: Vec<Arc<dyn CommandLocation>> = vec![
            Arc::new(CommandCatalog::new("x")),
            Arc::new(CommandCatalog::new("y")),
        ];
        registry.add_locations(block, true).unwrap();
        assert_eq!(registry.location_ids(), vec!["x", "y", "z"]);
    }

    #[test]
    fn explicit_registration_overwrites_same_key() {
        let mut registry = CommandRegistry::new();
        registry.register_command(factory(|| Named { name: "Echo", tier: CommandTier::User, usage: "/echo" }));
        registry.register_command(factory(|| Named { name: "echo", tier: CommandTier::User, usage: "/echo v2" }));

        let command = registry.instantiate(CommandTier::User, "ECHO").unwrap();
        assert_eq!(command.usage(), "/echo v2");
    }

    #[test]
    fn register_by_reference_loads_from_locations() {
        let mut registry = CommandRegistry::new();
        let catalog = CommandCatalog::new("plugins").with_command(named("weather", CommandTier::User));
        registry.add_location(Arc::new(catalog), false).unwrap();

        let key = registry
            .register("telegram_dispatch::commands::user_commands::WeatherCommand")
            .unwrap();
        assert_eq!(key, (CommandTier::User, "weather".to_string()));
        assert!(registry.is_registered(CommandTier::User, "Weather"));
    }

    #[test]
    fn register_rejects_unknown_and_foreign_references() {
        let mut registry = CommandRegistry::new();
        let catalog = CommandCatalog::new("plugins")
            .with_artifact("acme::user_commands::HelperCommand", Artifact::Foreign);
        registry.add_location(Arc::new(catalog), false).unwrap();

        assert!(matches!(
            registry.register("acme::user_commands::MissingCommand"),
            Err(RegistryError::NotLoadable(_))
        ));
        assert!(matches!(
            registry.register("acme::user_commands::HelperCommand"),
            Err(RegistryError::NotACommand(_))
        ));
    }

    #[test]
    fn discovery_keeps_first_location_and_reports_scan_failures() {
        let mut registry = CommandRegistry::new();
        registry.add_location(Arc::new(BrokenLocation), false).unwrap();
        registry
            .add_location(
                Arc::new(CommandCatalog::new("first").with_command(named("help", CommandTier::User))),
                false,
            )
            .unwrap();
        registry
            .add_location(
                Arc::new(
                    CommandCatalog::new("second")
                        .with_command(named("help", CommandTier::User))
                        .with_command(named("start", CommandTier::User))
                        .with_artifact("telegram_dispatch::commands::user_commands::Util", Artifact::Foreign)
                        .with_artifact("telegram_dispatch::commands::user_commands::StubCommand", Artifact::Foreign),
                ),
                false,
            )
            .unwrap();

        let discovery = registry.discover(false);
        assert_eq!(discovery.names(), vec!["help", "start"]);
        assert_eq!(discovery.errors.len(), 1);
    }

    #[test]
    fn discovery_skips_admin_commands_for_unprivileged_callers() {
        let mut registry = CommandRegistry::new();
        registry.register_command(named("ban", CommandTier::Admin));
        registry.register_command(named("help", CommandTier::User));

        assert_eq!(registry.discover(false).names(), vec!["help"]);
        assert_eq!(registry.discover(true).names(), vec!["ban", "help"]);
    }
}
