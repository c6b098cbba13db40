//! BotApi port - Outbound calls to the messaging platform.
//!
//! The dispatcher only fetches batches through this port; sending is left
//! to commands.

use async_trait::async_trait;

use crate::domain::command::ExecutionResult;
use crate::domain::foundation::DomainError;
use crate::domain::update::Update;

/// Parameters of a `getUpdates` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetUpdatesRequest {
    /// First update id to return; acknowledges everything below it.
    pub offset: Option<i64>,

    /// Maximum number of updates to return.
    pub limit: Option<u32>,

    /// Long-poll timeout in seconds.
    pub timeout: Option<u64>,
}

impl GetUpdatesRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the offset.
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Builder: set the batch limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Builder: set the long-poll timeout.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Port for the transport collaborator.
///
/// A non-ok response from the platform is reported as an `Err` with
/// `ErrorCode::TransportError`.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Fetch a batch of updates, in ascending id order.
    async fn get_updates(&self, request: GetUpdatesRequest) -> Result<Vec<Update>, DomainError>;

    /// Send a text message to a chat.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<ExecutionResult, DomainError>;

    /// Register the webhook URL the platform pushes updates to.
    async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
    ) -> Result<ExecutionResult, DomainError>;

    /// Remove the webhook so updates can be pulled again.
    async fn delete_webhook(&self) -> Result<ExecutionResult, DomainError>;
}
