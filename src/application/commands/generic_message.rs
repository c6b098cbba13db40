//! Target for messages that route to no specific command.

use async_trait::async_trait;

use crate::domain::command::{
    Command, CommandContext, CommandTier, ExecutionResult, GENERIC_MESSAGE_COMMAND,
};
use crate::domain::foundation::DomainError;

#[derive(Debug, Clone, Copy, Default)]
pub struct GenericMessageCommand;

#[async_trait]
impl Command for GenericMessageCommand {
    fn name(&self) -> &str {
        GENERIC_MESSAGE_COMMAND
    }

    fn tier(&self) -> CommandTier {
        CommandTier::System
    }

    fn usage(&self) -> &str {
        ""
    }

    fn description(&self) -> &str {
        "Handle generic message"
    }

    async fn execute(&self, _ctx: &CommandContext<'_>) -> Result<ExecutionResult, DomainError> {
        Ok(ExecutionResult::empty())
    }
}
