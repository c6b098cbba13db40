//! Dispatcher - runs one update through filter, classification,
//! deduplication, resolution and two-phase execution.
//!
//! Owns the configured collaborators and the session state (last update id,
//! last result). Configure it with the `&mut self` setters, then share it
//! behind an `Arc` with the ingestion frontends.

mod ingestion;
mod session;

pub use ingestion::NO_DATABASE_MESSAGE;
pub use session::SessionState;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::application::admin::AdminAuthority;
use crate::application::classifier::UpdateClassifier;
use crate::application::commands::builtin_catalog;
use crate::application::dedup::{Admission, DeduplicationGuard};
use crate::application::errors::DispatchError;
use crate::application::registry::{CommandLocation, CommandRegistry, Discovery};
use crate::application::resolver::CommandResolver;
use crate::domain::command::naming::normalize;
use crate::domain::command::{
    run_two_phase, Command, CommandContext, CommandFactory, CommandTier, ExecutionResult,
    GENERIC_COMMAND, GENERIC_MESSAGE_COMMAND,
};
use crate::domain::dispatch::{filter, DispatchStage, FilterContext, FilterDecision, UpdateFilter};
use crate::domain::foundation::{BotIdentity, UpdateId, UserId};
use crate::domain::update::Update;
use crate::ports::{BotApi, UpdateStore};

use session::Cycle;

/// The dispatch engine.
pub struct Dispatcher {
    bot: BotIdentity,
    registry: CommandRegistry,
    admins: AdminAuthority,
    store: Option<Arc<dyn UpdateStore>>,
    api: Option<Arc<dyn BotApi>>,
    filter: Option<Box<dyn UpdateFilter>>,
    dedup: DeduplicationGuard,
    command_config: HashMap<String, Value>,
    custom_input: Option<String>,
    getupdates_without_database: bool,
    session: Mutex<SessionState>,
}

impl Dispatcher {
    /// Creates a dispatcher for the bot named `username`.
    pub fn new(username: &str) -> Result<Self, DispatchError> {
        let bot = BotIdentity::new(username).map_err(|_| DispatchError::MissingBotUsername)?;
        Ok(Self {
            bot,
            registry: CommandRegistry::new(),
            admins: AdminAuthority::new(),
            store: None,
            api: None,
            filter: None,
            dedup: DeduplicationGuard::new(None),
            command_config: HashMap::new(),
            custom_input: None,
            getupdates_without_database: false,
            session: Mutex::new(SessionState::default()),
        })
    }

    /// Builder: the bot's numeric id, needed by [`Dispatcher::run_commands`].
    pub fn with_bot_id(mut self, id: UserId) -> Self {
        self.bot = self.bot.with_id(id);
        self
    }

    /// Builder: the persistence collaborator.
    pub fn with_store(mut self, store: Arc<dyn UpdateStore>) -> Self {
        self.dedup = DeduplicationGuard::new(Some(Arc::clone(&store)));
        self.store = Some(store);
        self
    }

    /// Builder: the transport collaborator.
    pub fn with_api(mut self, api: Arc<dyn BotApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Builder: install an update filter.
    pub fn with_filter(mut self, filter: impl UpdateFilter + 'static) -> Self {
        self.set_filter(filter);
        self
    }

    /// Builder: append the built-in `generic` and `genericmessage` commands.
    pub fn with_builtin_commands(mut self) -> Result<Self, DispatchError> {
        self.add_location(Arc::new(builtin_catalog()), false)?;
        Ok(self)
    }

    /// Builder: allow pulling updates without a connected store.
    pub fn with_getupdates_without_database(mut self, enabled: bool) -> Self {
        self.getupdates_without_database = enabled;
        self
    }

    // ════════════════════════════════════════════════════════════════════
    // Configuration
    // ════════════════════════════════════════════════════════════════════

    pub fn set_filter(&mut self, filter: impl UpdateFilter + 'static) {
        self.filter = Some(Box::new(filter));
    }

    pub fn add_location(
        &mut self,
        location: Arc<dyn CommandLocation>,
        prepend: bool,
    ) -> Result<(), DispatchError> {
        Ok(self.registry.add_location(location, prepend)?)
    }

    pub fn add_locations(
        &mut self,
        locations: impl IntoIterator<Item = Arc<dyn CommandLocation>>,
        prepend: bool,
    ) -> Result<(), DispatchError> {
        Ok(self.registry.add_locations(locations, prepend)?)
    }

    /// Registers the command behind `reference`; see [`CommandRegistry::register`].
    pub fn register(&mut self, reference: &str) -> Result<(CommandTier, String), DispatchError> {
        Ok(self.registry.register(reference)?)
    }

    pub fn register_command(&mut self, factory: CommandFactory) -> (CommandTier, String) {
        self.registry.register_command(factory)
    }

    pub fn enable_admin(&mut self, id: i64) -> bool {
        self.admins.enable(id)
    }

    pub fn enable_admins(&mut self, ids: impl IntoIterator<Item = i64>) {
        self.admins.enable_many(ids);
    }

    /// Sets the configuration handed to `command` through its context.
    pub fn set_command_config(&mut self, command: &str, config: Value) {
        self.command_config.insert(normalize(command), config);
    }

    pub fn command_config(&self, command: &str) -> Option<&Value> {
        self.command_config.get(&normalize(command))
    }

    /// Batch the pull frontend processes instead of calling the transport.
    pub fn set_custom_input(&mut self, input: impl Into<String>) {
        self.custom_input = Some(input.into());
    }

    pub fn custom_input(&self) -> Option<&str> {
        self.custom_input.as_deref()
    }

    pub fn set_getupdates_without_database(&mut self, enabled: bool) {
        self.getupdates_without_database = enabled;
    }

    // ════════════════════════════════════════════════════════════════════
    // Inspection
    // ════════════════════════════════════════════════════════════════════

    pub fn bot(&self) -> &BotIdentity {
        &self.bot
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn admins(&self) -> &AdminAuthority {
        &self.admins
    }

    pub fn api(&self) -> Option<&Arc<dyn BotApi>> {
        self.api.as_ref()
    }

    /// Whether a store is configured and reachable.
    pub async fn store_connected(&self) -> bool {
        match &self.store {
            Some(store) => store.is_connected().await,
            None => false,
        }
    }

    pub async fn session(&self) -> SessionState {
        self.session.lock().await.clone()
    }

    pub async fn last_result(&self) -> Option<ExecutionResult> {
        self.session.lock().await.last_result.clone()
    }

    pub async fn last_update_id(&self) -> Option<UpdateId> {
        self.session.lock().await.last_update_id
    }

    pub async fn last_stage(&self) -> Option<DispatchStage> {
        self.session.lock().await.last_stage
    }

    /// Every usable command across locations and explicit registrations.
    pub fn discover_commands(&self) -> Discovery {
        self.registry.discover(true)
    }

    /// Resolves `name` as it would be for `update`.
    ///
    /// Without an update the admin tier is searched.
    pub fn resolve(&self, name: &str, update: Option<&Update>) -> Option<Arc<dyn Command>> {
        let include_admin = update.map_or(true, |u| self.admins.is_admin(None, Some(u)));
        CommandResolver::new(&self.registry, include_admin).resolve(name)
    }

    /// Command name `update` would be dispatched to.
    pub fn classify(&self, update: &Update) -> String {
        let include_admin = self.admins.is_admin(None, Some(update));
        let mut resolver = CommandResolver::new(&self.registry, include_admin);
        UpdateClassifier::new(&self.bot).classify(update, &mut resolver)
    }

    // ════════════════════════════════════════════════════════════════════
    // Dispatch
    // ════════════════════════════════════════════════════════════════════

    /// Runs one dispatch cycle for `update`.
    ///
    /// Filter denials and unresolved commands are recovered here; a missing
    /// generic command and collaborator failures are returned as errors.
    pub async fn dispatch(&self, update: &Update) -> Result<ExecutionResult, DispatchError> {
        self.session.lock().await.last_update_id = Some(update.update_id);

        let mut cycle = Cycle::new(update.update_id);
        let outcome = self.run_cycle(update, &mut cycle).await;
        self.finish(&cycle, &outcome).await;
        outcome
    }

    /// Executes the command `name` for `update`, skipping filter and
    /// deduplication.
    pub async fn execute_command(
        &self,
        name: &str,
        update: &Update,
    ) -> Result<ExecutionResult, DispatchError> {
        let is_admin = self.admins.is_admin(None, Some(update));
        let mut resolver = CommandResolver::new(&self.registry, is_admin);
        let mut cycle = Cycle::direct(update.update_id);
        let outcome = self
            .execute_with(name, update, &mut resolver, is_admin, false, &mut cycle)
            .await;
        self.finish(&cycle, &outcome).await;
        outcome
    }

    /// Runs each `/command` text as if the bot had sent it in a private chat.
    ///
    /// No filter or deduplication applies and the admin tier is searched.
    pub async fn run_commands(&self, commands: &[&str]) -> Result<Vec<ExecutionResult>, DispatchError> {
        if commands.is_empty() {
            return Err(DispatchError::NoCommandsProvided);
        }
        let bot_id = self.bot.id().ok_or(DispatchError::MissingBotId)?;

        let mut results = Vec::with_capacity(commands.len());
        for text in commands {
            let update = self.synthesize(bot_id, text)?;
            let name = update
                .command_token(self.bot.username())
                .map(normalize)
                .unwrap_or_default();

            let mut resolver = CommandResolver::new(&self.registry, true);
            let mut cycle = Cycle::direct(update.update_id);
            let outcome = self
                .execute_with(&name, &update, &mut resolver, true, true, &mut cycle)
                .await;
            self.finish(&cycle, &outcome).await;
            results.push(outcome?);
        }
        Ok(results)
    }

    async fn run_cycle(&self, update: &Update, cycle: &mut Cycle) -> Result<ExecutionResult, DispatchError> {
        let update_id = update.update_id.value();
        let sender_is_admin = self.admins.is_admin(None, Some(update));

        // 1. Filter
        if let Some(hook) = &self.filter {
            let ctx = FilterContext {
                bot: &self.bot,
                sender_is_admin,
            };
            if let FilterDecision::Denied(reason) = filter::evaluate(hook.as_ref(), update, &ctx) {
                debug!(update_id, reason = %reason, "update rejected by filter");
                cycle.enter(DispatchStage::Rejected);
                return Ok(ExecutionResult::denied());
            }
        }
        cycle.enter(DispatchStage::Filtered);

        // 2. Classify
        let mut resolver = CommandResolver::new(&self.registry, sender_is_admin);
        let command = UpdateClassifier::new(&self.bot).classify(update, &mut resolver);
        debug!(update_id, command = %command, "update classified");
        cycle.enter(DispatchStage::Classified);

        // 3. Deduplicate, recording fresh updates
        match self.dedup.admit(update).await {
            Ok(Admission::Fresh) => cycle.enter(DispatchStage::DeduplicationChecked),
            Ok(Admission::Duplicate) => {
                cycle.enter(DispatchStage::Duplicate);
                return Ok(ExecutionResult::empty());
            }
            Err(err) => {
                cycle.enter(DispatchStage::Error);
                return Err(err.into());
            }
        }

        // 4. Resolve and execute; unhandled explicit commands go to generic
        let explicit = update.command_token(self.bot.username()).is_some();
        let command = if explicit && command == GENERIC_MESSAGE_COMMAND {
            debug!(update_id, "explicit command has no handler, routing to generic");
            GENERIC_COMMAND.to_string()
        } else {
            command
        };
        self.execute_with(&command, update, &mut resolver, sender_is_admin, false, cycle)
            .await
    }

    async fn execute_with(
        &self,
        name: &str,
        update: &Update,
        resolver: &mut CommandResolver<'_>,
        is_admin: bool,
        run_commands: bool,
        cycle: &mut Cycle,
    ) -> Result<ExecutionResult, DispatchError> {
        let update_id = update.update_id.value();

        let command = match usable(resolver, name) {
            Some(command) => {
                cycle.enter(DispatchStage::Resolved);
                command
            }
            None if name == GENERIC_COMMAND => {
                cycle.enter(DispatchStage::Error);
                error!(update_id, "generic command missing");
                return Err(DispatchError::GenericCommandMissing);
            }
            None => {
                debug!(update_id, command = name, "command unavailable, falling back to generic");
                cycle.enter(DispatchStage::Fallback);
                match usable(resolver, GENERIC_COMMAND) {
                    Some(command) => command,
                    None => {
                        cycle.enter(DispatchStage::Error);
                        error!(update_id, "generic command missing");
                        return Err(DispatchError::GenericCommandMissing);
                    }
                }
            }
        };

        cycle.enter(DispatchStage::Executing);
        let ctx = CommandContext::new(update, &self.bot)
            .with_admin(is_admin)
            .with_run_commands(run_commands)
            .with_config(self.command_config(command.name()))
            .with_api(self.api.as_deref())
            .with_store(self.store.as_deref());

        match run_two_phase(command.as_ref(), &ctx).await {
            Ok(result) => {
                cycle.enter(DispatchStage::Completed);
                Ok(result)
            }
            Err(err) => {
                warn!(update_id, command = command.name(), error = %err, "command failed");
                cycle.enter(DispatchStage::Error);
                Err(err.into())
            }
        }
    }

    async fn finish(&self, cycle: &Cycle, outcome: &Result<ExecutionResult, DispatchError>) {
        let mut session = self.session.lock().await;
        session.last_stage = Some(cycle.stage());
        if let Ok(result) = outcome {
            session.last_result = Some(result.clone());
        }
    }

    fn synthesize(&self, bot_id: UserId, text: &str) -> Result<Update, DispatchError> {
        let payload = json!({
            "update_id": 0,
            "message": {
                "message_id": 0,
                "date": Utc::now().timestamp(),
                "from": {
                    "id": bot_id.value(),
                    "is_bot": true,
                    "first_name": self.bot.username(),
                    "username": self.bot.username(),
                },
                "chat": {"id": bot_id.value(), "type": "private"},
                "text": text,
            }
        });
        Update::from_value(payload).map_err(|e| DispatchError::InvalidPayload(e.to_string()))
    }
}

fn usable(resolver: &mut CommandResolver<'_>, name: &str) -> Option<Arc<dyn Command>> {
    resolver.resolve(name).filter(|command| command.is_enabled())
}
