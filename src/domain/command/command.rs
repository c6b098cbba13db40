//! The command capability and its two-phase execution protocol.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::foundation::DomainError;

use super::{CommandContext, CommandTier, ExecutionResult};

/// Outcome of the pre-execution phase.
#[derive(Debug, Clone, PartialEq)]
pub enum PreExecution {
    /// Guards passed; run [`Command::execute`].
    Proceed,

    /// The pre-phase concluded the cycle with this result.
    Conclude(ExecutionResult),
}

/// A named, independently dispatchable unit of behavior.
///
/// Implementations declare their own tier; the resolver only accepts an
/// implementation under the tier it declares.
///
/// # Example
///
/// ```ignore
/// struct PingCommand;
///
/// #[async_trait]
/// impl Command for PingCommand {
///     fn name(&self) -> &str { "ping" }
///     fn tier(&self) -> CommandTier { CommandTier::User }
///     fn usage(&self) -> &str { "/ping" }
///
///     async fn execute(&self, ctx: &CommandContext<'_>) -> Result<ExecutionResult, DomainError> {
///         ctx.reply("pong").await
///     }
/// }
/// ```
#[async_trait]
pub trait Command: Send + Sync {
    /// Command name, matched case-insensitively.
    fn name(&self) -> &str;

    /// Tier this implementation belongs to.
    fn tier(&self) -> CommandTier;

    /// Usage string. Empty means the command is only a fallback target and
    /// is never selected for an explicit `/command` message.
    fn usage(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    /// Disabled commands are skipped in favor of the generic command.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Whether the command needs a connected update store to run.
    fn requires_store(&self) -> bool {
        false
    }

    /// Whether the command may only run in a private chat.
    fn is_private_only(&self) -> bool {
        false
    }

    /// True for placeholder commands that only serve as fallback targets.
    fn is_fallback_only(&self) -> bool {
        self.usage().is_empty()
    }

    /// Pre-execution phase: tier, store and chat-type guards.
    ///
    /// Returning [`PreExecution::Conclude`] ends the cycle without calling
    /// [`Command::execute`].
    async fn pre_execute(&self, ctx: &CommandContext<'_>) -> Result<PreExecution, DomainError> {
        if self.tier() == CommandTier::Admin && !ctx.is_admin() {
            warn!(command = self.name(), "admin command refused for unprivileged sender");
            return Ok(PreExecution::Conclude(ExecutionResult::denied()));
        }

        if self.requires_store() && !ctx.store_connected().await {
            debug!(command = self.name(), "no update store connected");
            return Ok(PreExecution::Conclude(self.execute_without_store(ctx).await?));
        }

        if self.is_private_only() && !ctx.chat().is_some_and(|chat| chat.is_private()) {
            let Some(sender) = ctx.update().sender() else {
                return Ok(PreExecution::Conclude(ExecutionResult::empty()));
            };
            let text = format!(
                "/{} command is only available in a private chat.\n(`{}`)",
                self.name(),
                ctx.message().and_then(|m| m.text.as_deref()).unwrap_or_default()
            );
            let result = ctx.send_to(sender.id.value(), &text).await?;
            return Ok(PreExecution::Conclude(result));
        }

        Ok(PreExecution::Proceed)
    }

    /// Main execution phase.
    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<ExecutionResult, DomainError>;

    /// Runs instead of [`Command::execute`] when a required store is missing.
    async fn execute_without_store(
        &self,
        ctx: &CommandContext<'_>,
    ) -> Result<ExecutionResult, DomainError> {
        let text = format!(
            "Sorry no database connection, unable to execute \"{}\" command.",
            self.name()
        );
        ctx.reply(&text).await?;
        Ok(ExecutionResult::failure(text))
    }
}

/// Builds a fresh command instance.
pub type CommandFactory = Arc<dyn Fn() -> Arc<dyn Command> + Send + Sync>;

/// Wraps a constructor into a [`CommandFactory`].
pub fn factory<C, F>(build: F) -> CommandFactory
where
    C: Command + 'static,
    F: Fn() -> C + Send + Sync + 'static,
{
    Arc::new(move || Arc::new(build()) as Arc<dyn Command>)
}

/// Runs both phases: `execute` only when `pre_execute` proceeds.
pub async fn run_two_phase(
    command: &dyn Command,
    ctx: &CommandContext<'_>,
) -> Result<ExecutionResult, DomainError> {
    match command.pre_execute(ctx).await? {
        PreExecution::Proceed => command.execute(ctx).await,
        PreExecution::Conclude(result) => Ok(result),
    }
}
