//! Errors raised by the dispatch engine.

use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Errors from command location management and explicit registration.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("Command location '{0}' is already registered")]
    LocationExists(String),

    #[error("Could not scan command location '{location}': {reason}")]
    LocationScan { location: String, reason: String },

    #[error("'{0}' does not resolve to a loadable command")]
    NotLoadable(String),

    #[error("'{0}' is not a command implementation")]
    NotACommand(String),
}

impl RegistryError {
    pub fn location_scan(location: impl Into<String>, reason: impl Into<String>) -> Self {
        RegistryError::LocationScan {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the dispatcher and its ingestion frontends.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Bot username is not defined")]
    MissingBotUsername,

    #[error("Bot id is not defined")]
    MissingBotId,

    #[error("Input is empty")]
    EmptyInput,

    #[error("Invalid update payload: {0}")]
    InvalidPayload(String),

    #[error("Generic command missing")]
    GenericCommandMissing,

    #[error("No command(s) provided")]
    NoCommandsProvided,

    #[error("No bot API client configured")]
    TransportNotConfigured,

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Collaborator(#[from] DomainError),
}

impl DispatchError {
    /// Configuration errors that must abort startup or the current cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DispatchError::MissingBotUsername
                | DispatchError::MissingBotId
                | DispatchError::GenericCommandMissing
                | DispatchError::TransportNotConfigured
                | DispatchError::Registry(_)
        )
    }

    /// Input errors rejected before any dispatch state is entered.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DispatchError::EmptyInput | DispatchError::InvalidPayload(_)
        )
    }
}
