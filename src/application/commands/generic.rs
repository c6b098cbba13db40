//! Fallback command for unresolved or disabled commands.

use async_trait::async_trait;

use crate::domain::command::{Command, CommandContext, CommandTier, ExecutionResult, GENERIC_COMMAND};
use crate::domain::foundation::DomainError;

/// Tells the sender an explicit command does not exist; otherwise a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericCommand;

#[async_trait]
impl Command for GenericCommand {
    fn name(&self) -> &str {
        GENERIC_COMMAND
    }

    fn tier(&self) -> CommandTier {
        CommandTier::System
    }

    fn usage(&self) -> &str {
        ""
    }

    fn description(&self) -> &str {
        "Handles generic commands or is executed by default when a command is not found"
    }

    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<ExecutionResult, DomainError> {
        let Some(command) = ctx.command_token() else {
            return Ok(ExecutionResult::empty());
        };

        let text = format!("Command /{} not found.. :(", command);
        ctx.reply(&text).await?;
        Ok(ExecutionResult::success(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::BotIdentity;
    use crate::domain::update::Update;
    use serde_json::json;

    #[tokio::test]
    async fn unknown_command_is_reported_as_handled() {
        let update = Update::from_value(json!({
            "update_id": 1,
            "message": {
                "message_id": 1,
                "from": {"id": 42, "first_name": "Ann"},
                "chat": {"id": 42, "type": "private"},
                "text": "/ban 7"
            }
        }))
        .unwrap();
        let bot = BotIdentity::new("bot").unwrap();
        let ctx = CommandContext::new(&update, &bot);

        let result = GenericCommand.execute(&ctx).await.unwrap();
        assert!(result.is_ok());
        assert_eq!(result.description(), Some("Command /ban not found.. :("));
    }

    #[tokio::test]
    async fn non_command_update_is_noop() {
        let update = Update::from_value(json!({"update_id": 2})).unwrap();
        let bot = BotIdentity::new("bot").unwrap();
        let result = GenericCommand.execute(&CommandContext::new(&update, &bot)).await.unwrap();
        assert_eq!(result, ExecutionResult::empty());
    }

    #[test]
    fn is_fallback_only() {
        assert!(GenericCommand.is_fallback_only());
    }
}
