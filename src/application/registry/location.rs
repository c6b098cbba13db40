//! Command locations - sources the registry searches for command artifacts.

use std::collections::BTreeMap;

use crate::domain::command::naming::{conventional_reference, DEFAULT_NAMESPACE};
use crate::domain::command::CommandFactory;

use crate::application::errors::RegistryError;

/// Something a location holds under a reference.
#[derive(Clone)]
pub enum Artifact {
    /// Builds a command implementation.
    Command(CommandFactory),

    /// Present under a `*Command` name but not a command implementation.
    Foreign,
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Artifact::Command(_) => f.write_str("Artifact::Command"),
            Artifact::Foreign => f.write_str("Artifact::Foreign"),
        }
    }
}

/// A source of command artifacts keyed by reference.
pub trait CommandLocation: Send + Sync {
    /// Unique identifier; the registry rejects a second location with the same id.
    fn id(&self) -> &str;

    /// Namespace used to build conventional references, when it overrides the default.
    fn namespace(&self) -> Option<&str> {
        None
    }

    /// References of every artifact in this location.
    fn scan(&self) -> Result<Vec<String>, RegistryError>;

    /// Loads the artifact behind `reference`.
    fn load(&self, reference: &str) -> Option<Artifact>;
}

/// In-process location populated at startup.
#[derive(Debug, Clone)]
pub struct CommandCatalog {
    id: String,
    namespace: Option<String>,
    artifacts: BTreeMap<String, Artifact>,
}

impl CommandCatalog {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            namespace: None,
            artifacts: BTreeMap::new(),
        }
    }

    /// Builder: override the namespace of conventional references.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Builder: add a command under its conventional reference.
    pub fn with_command(mut self, factory: CommandFactory) -> Self {
        let command = factory();
        let reference = conventional_reference(
            self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE),
            command.tier(),
            command.name(),
        );
        self.artifacts.insert(reference, Artifact::Command(factory));
        self
    }

    /// Builder: add an artifact under an explicit reference.
    pub fn with_artifact(mut self, reference: impl Into<String>, artifact: Artifact) -> Self {
        self.artifacts.insert(reference.into(), artifact);
        self
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl CommandLocation for CommandCatalog {
    fn id(&self) -> &str {
        &self.id
    }

    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn scan(&self) -> Result<Vec<String>, RegistryError> {
        Ok(self.artifacts.keys().cloned().collect())
    }

    fn load(&self, reference: &str) -> Option<Artifact> {
        self.artifacts.get(reference).cloned()
    }
}
