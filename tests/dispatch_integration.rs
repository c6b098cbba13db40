//! Integration tests for the dispatch engine.
//!
//! Drive the public API end to end with in-memory collaborators:
//! 1. Unknown explicit commands fall back to the generic command
//! 2. Redelivered updates are acknowledged without re-running commands
//! 3. The pull frontend refuses to run without a database
//! 4. A denying filter stops every update before resolution
//! 5. Tier precedence, admin probing and fallback-only commands

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use telegram_dispatch::adapters::InMemoryUpdateStore;
use telegram_dispatch::application::{
    AdminAuthority, Dispatcher, GenericCommand, NO_DATABASE_MESSAGE,
};
use telegram_dispatch::domain::command::{
    factory, Command, CommandContext, CommandTier, ExecutionResult,
};
use telegram_dispatch::domain::dispatch::{DispatchStage, FilterContext, FilterDecision, FilterError};
use telegram_dispatch::domain::foundation::{DomainError, UserId};
use telegram_dispatch::domain::update::Update;
use telegram_dispatch::ports::{BotApi, GetUpdatesRequest};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Command with a configurable name, tier and usage that counts executions.
struct CountingCommand {
    name: &'static str,
    tier: CommandTier,
    usage: &'static str,
    runs: Arc<AtomicUsize>,
}

#[async_trait]
impl Command for CountingCommand {
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
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(ExecutionResult::success(format!("{} ran", self.name)))
    }
}

fn register_counting(
    dispatcher: &mut Dispatcher,
    name: &'static str,
    tier: CommandTier,
    usage: &'static str,
) -> Arc<AtomicUsize> {
    let runs = Arc::new(AtomicUsize::new(0));
    let shared = runs.clone();
    dispatcher.register_command(factory(move || CountingCommand {
        name,
        tier,
        usage,
        runs: shared.clone(),
    }));
    runs
}

/// Transport double counting every call.
#[derive(Default)]
struct CountingApi {
    calls: AtomicUsize,
}

#[async_trait]
impl BotApi for CountingApi {
    async fn get_updates(&self, _request: GetUpdatesRequest) -> Result<Vec<Update>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn send_message(&self, _chat_id: i64, _text: &str) -> Result<ExecutionResult, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ExecutionResult::empty())
    }

    async fn set_webhook(&self, _url: &str, _secret: Option<&str>) -> Result<ExecutionResult, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ExecutionResult::empty())
    }

    async fn delete_webhook(&self) -> Result<ExecutionResult, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ExecutionResult::empty())
    }
}

fn message_update(update_id: i64, sender: i64, text: &str) -> Update {
    Update::from_value(json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "date": 1_700_000_000,
            "from": {"id": sender, "is_bot": false, "first_name": "Tester"},
            "chat": {"id": sender, "type": "private"},
            "text": text
        }
    }))
    .expect("valid update")
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new("DispatchBot").expect("username is set")
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn unknown_admin_command_falls_back_to_generic() {
    let mut dispatcher = dispatcher().with_builtin_commands().expect("builtins install");
    dispatcher.enable_admin(42);

    let update = message_update(1, 42, "/ban");
    assert_eq!(dispatcher.classify(&update), "genericmessage");

    let result = dispatcher.dispatch(&update).await.expect("dispatch succeeds");

    assert!(result.is_ok());
    assert_eq!(result.description(), Some("Command /ban not found.. :("));
    assert_eq!(dispatcher.last_stage().await, Some(DispatchStage::Completed));
}

#[tokio::test]
async fn generic_alone_reports_unknown_command() {
    let mut dispatcher = dispatcher();
    dispatcher.register_command(factory(|| GenericCommand));

    let result = dispatcher.dispatch(&message_update(2, 7, "/ban")).await.unwrap();

    assert_eq!(result.description(), Some("Command /ban not found.. :("));
}

#[tokio::test]
async fn redelivered_update_runs_command_once() {
    let mut dispatcher = dispatcher().with_store(Arc::new(InMemoryUpdateStore::new()));
    let runs = register_counting(&mut dispatcher, "echo", CommandTier::User, "/echo");

    let update = message_update(100, 7, "/echo");
    let first = dispatcher.dispatch(&update).await.unwrap();
    let second = dispatcher.dispatch(&update).await.unwrap();

    assert_eq!(first.description(), Some("echo ran"));
    assert_eq!(second, ExecutionResult::empty());
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(dispatcher.last_stage().await, Some(DispatchStage::Duplicate));
}

#[tokio::test]
async fn pull_without_database_makes_no_transport_call() {
    let api = Arc::new(CountingApi::default());
    let dispatcher = dispatcher()
        .with_builtin_commands()
        .unwrap()
        .with_api(api.clone());

    let result = dispatcher.handle_get_updates(Some(10), None).await.unwrap();

    assert!(!result.is_ok());
    assert_eq!(result.description(), Some(NO_DATABASE_MESSAGE));
    assert!(result.description().unwrap_or_default().contains("database"));
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn blocking_filter_denies_every_update() {
    let mut dispatcher = dispatcher().with_builtin_commands().unwrap().with_filter(
        |_: &Update, _: &FilterContext<'_>| -> Result<FilterDecision, FilterError> {
            Ok(FilterDecision::denied_because("blocked"))
        },
    );
    let runs = register_counting(&mut dispatcher, "echo", CommandTier::User, "/echo");

    for (id, text) in [(1, "/echo"), (2, "hello"), (3, "/unknown")] {
        let result = dispatcher.dispatch(&message_update(id, 7, text)).await.unwrap();
        assert_eq!(result, ExecutionResult::denied());
        assert_eq!(dispatcher.last_stage().await, Some(DispatchStage::Rejected));
    }
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Properties
// =============================================================================

#[tokio::test]
async fn higher_tier_shadows_lower_tiers() {
    let mut dispatcher = dispatcher();
    dispatcher.enable_admin(42);
    let user = register_counting(&mut dispatcher, "stats", CommandTier::User, "/stats");
    let admin = register_counting(&mut dispatcher, "stats", CommandTier::Admin, "/stats");

    let from_user = message_update(1, 7, "/stats");
    let from_admin = message_update(2, 42, "/stats");

    let resolved = dispatcher.resolve("stats", Some(&from_user)).unwrap();
    assert_eq!(resolved.tier(), CommandTier::User);
    let resolved = dispatcher.resolve("stats", Some(&from_admin)).unwrap();
    assert_eq!(resolved.tier(), CommandTier::Admin);

    let system = register_counting(&mut dispatcher, "stats", CommandTier::System, "/stats");
    for update in [&from_user, &from_admin] {
        let resolved = dispatcher.resolve("stats", Some(update)).unwrap();
        assert_eq!(resolved.tier(), CommandTier::System);
        dispatcher.dispatch(update).await.unwrap();
    }

    assert_eq!(system.load(Ordering::SeqCst), 2);
    assert_eq!(admin.load(Ordering::SeqCst), 0);
    assert_eq!(user.load(Ordering::SeqCst), 0);
}

#[test]
fn admin_probe_uses_any_sender_of_the_update() {
    let mut admins = AdminAuthority::default();
    admins.enable(42);

    let callback = |sender: i64| -> Update {
        Update::from_value(json!({
            "update_id": 5,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": sender, "is_bot": false, "first_name": "Tester"},
                "chat_instance": "ci",
                "data": "press"
            }
        }))
        .unwrap()
    };

    assert!(admins.is_admin(None, Some(&callback(42))));
    assert!(!admins.is_admin(None, Some(&callback(7))));
    assert!(!admins.is_admin(None, None));
    assert!(admins.is_admin(UserId::new(42).ok(), None));
}

#[tokio::test]
async fn empty_usage_command_is_only_reachable_by_fallback() {
    let mut dispatcher = dispatcher().with_builtin_commands().unwrap();
    let runs = register_counting(&mut dispatcher, "placeholder", CommandTier::User, "");

    let update = message_update(9, 7, "/placeholder");
    assert_eq!(dispatcher.classify(&update), "genericmessage");

    let result = dispatcher.dispatch(&update).await.unwrap();
    assert_eq!(result.description(), Some("Command /placeholder not found.. :("));
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    let direct = dispatcher.execute_command("placeholder", &update).await.unwrap();
    assert_eq!(direct.description(), Some("placeholder ran"));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn run_commands_executes_as_the_bot() {
    let mut dispatcher = dispatcher().with_bot_id(UserId::new(999).unwrap());
    let runs = register_counting(&mut dispatcher, "cleanup", CommandTier::Admin, "/cleanup");

    let results = dispatcher.run_commands(&["/cleanup", "/cleanup"]).await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(ExecutionResult::is_ok));
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn webhook_payload_is_dispatched_like_a_pushed_update() {
    let dispatcher = dispatcher()
        .with_builtin_commands()
        .unwrap()
        .with_store(Arc::new(InMemoryUpdateStore::new()));

    let body: Value = message_update(77, 7, "hi").raw().clone();
    let payload = serde_json::to_vec(&body).unwrap();

    assert!(dispatcher.handle_webhook(&payload).await.unwrap());
    assert!(dispatcher.handle_webhook(&payload).await.unwrap());
    assert_eq!(dispatcher.last_update_id().await.map(|id| id.value()), Some(77));
    assert_eq!(dispatcher.last_stage().await, Some(DispatchStage::Duplicate));
}
