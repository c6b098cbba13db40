//! telegram-dispatch binary: serves the webhook or polls `getUpdates`.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use telegram_dispatch::adapters::{
    webhook_router, InMemoryUpdateStore, PollingRunner, PostgresUpdateStore, TelegramApi,
    WebhookAppState,
};
use telegram_dispatch::config::{AppConfig, LogFormat, RunMode};
use telegram_dispatch::domain::foundation::UserId;
use telegram_dispatch::ports::{BotApi, UpdateStore};
use telegram_dispatch::Dispatcher;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!(error = %err, "telegram-dispatch stopped");
        eprintln!("telegram-dispatch: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let api: Arc<dyn BotApi> = Arc::new(TelegramApi::with_base_url(
        config.bot.token.clone(),
        &config.bot.api_base_url,
    ));
    let store: Arc<dyn UpdateStore> = match &config.database {
        Some(database) => Arc::new(PostgresUpdateStore::connect(database).await?),
        None => {
            info!("no database configured, deduplicating in memory");
            Arc::new(InMemoryUpdateStore::new())
        }
    };

    let mut dispatcher = Dispatcher::new(&config.bot.username)?
        .with_builtin_commands()?
        .with_store(store)
        .with_api(api.clone())
        .with_getupdates_without_database(config.bot.getupdates_without_database);
    if let Some(id) = config.bot.id {
        dispatcher = dispatcher.with_bot_id(UserId::new(id)?);
    }
    dispatcher.enable_admins(config.bot.admin_ids()?);

    let discovery = dispatcher.discover_commands();
    info!(
        bot = dispatcher.bot().username(),
        commands = ?discovery.names(),
        admins = dispatcher.admins().list().len(),
        "dispatcher ready"
    );
    let dispatcher = Arc::new(dispatcher);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
        }
        let _ = shutdown_tx.send(true);
    });

    match config.server.mode {
        RunMode::Webhook => serve_webhook(&config, dispatcher, api, shutdown_rx).await,
        RunMode::Polling => {
            if let Err(err) = api.delete_webhook().await {
                warn!(error = %err, "could not remove webhook before polling");
            }
            let runner = PollingRunner::with_config(dispatcher, config.polling.runner_config());
            runner.run(shutdown_rx).await?;
            Ok(())
        }
    }
}

async fn serve_webhook(
    config: &AppConfig,
    dispatcher: Arc<Dispatcher>,
    api: Arc<dyn BotApi>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), BoxError> {
    if let Some(url) = &config.bot.webhook_url {
        let secret = config.bot.webhook_secret.as_ref().map(|s| s.expose_secret().as_str());
        let result = api.set_webhook(url, secret).await?;
        info!(url = %url, ok = result.is_ok(), "webhook registered");
    }

    let mut state = WebhookAppState::new(dispatcher);
    if let Some(secret) = &config.bot.webhook_secret {
        state = state.with_secret_token(secret.clone());
    }
    let app = webhook_router(state, &config.server.webhook_path, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, path = %config.server.webhook_path, "webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while shutdown.changed().await.is_ok() {
                if *shutdown.borrow() {
                    break;
                }
            }
        })
        .await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.server.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
