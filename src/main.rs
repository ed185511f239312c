//! Avangard Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Update;
use teloxide::utils::command::BotCommands as TeloxideBotCommands;
use tracing::{error, info, warn};

use avangard::{
    api::{self, ApiState},
    config::Settings,
    database::{create_pool, run_migrations},
    handlers::{commands, messages},
    services::ServiceFactory,
    state::StateStorage,
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<(), avangard::AvangardError> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;

    // Initialize logging; the guard keeps the file writer alive
    let _log_guard = logging::init_logging(&settings.logging)?;

    settings.validate()?;

    info!("Starting Avangard registration bot...");

    // Initialize database connection
    info!("Connecting to database...");
    let pool = create_pool(&settings.database).await?;
    run_migrations(&pool).await?;

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(pool.clone(), &settings)?;
    let state_storage = StateStorage::new();

    // Start the HTTP API alongside the bot
    let api_state = ApiState {
        registration: services.registration.clone(),
        api_key: settings.api.key.clone(),
    };
    let api_port = settings.api.port;
    let api_server = tokio::spawn(async move {
        if let Err(err) = api::server::serve(api_port, api_state).await {
            error!(error = %err, "API server terminated");
        }
    });

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);

    info!("Setting up bot handlers...");
    let handler = create_handler();

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![Arc::new(services), Arc::new(state_storage)])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Avangard bot is ready, starting polling...");
    dispatcher.dispatch().await;

    // Scoped teardown: the API task and the pool are released even though
    // the dispatcher exited first
    api_server.abort();
    pool.close().await;
    info!("Connection to database closed.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry().branch(
        Update::filter_message()
            .branch(
                dptree::entry()
                    .filter_command::<BotCommand>()
                    .endpoint(handle_commands),
            )
            .branch(dptree::endpoint(handle_messages)),
    )
}

#[derive(TeloxideBotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Avangard Bot Commands")]
enum BotCommand {
    #[command(description = "Begin registration")]
    Start,
    #[command(description = "Sync this group's admin list (admin only)")]
    Group,
    #[command(description = "Refresh your shared-chat list")]
    Update,
    #[command(rename = "reset_key", description = "Rotate your access key")]
    ResetKey,
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: BotCommand,
    services: Arc<ServiceFactory>,
    state_storage: Arc<StateStorage>,
) -> HandlerResult {
    let services = (*services).clone();
    let state_storage = (*state_storage).clone();

    let result = match cmd {
        BotCommand::Start => commands::start::handle_start(bot, msg, services, state_storage).await,
        BotCommand::Group => commands::group::handle_group(bot, msg, services).await,
        BotCommand::Update => commands::update::handle_update(bot, msg, services).await,
        BotCommand::ResetKey => commands::reset_key::handle_reset_key(bot, msg, services).await,
    };

    if let Err(err) = result {
        error!(error = %err, "Error handling command");
        return Err(err.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
    state_storage: Arc<StateStorage>,
) -> HandlerResult {
    let services = (*services).clone();
    let state_storage = (*state_storage).clone();

    if let Err(err) = messages::handle_message(bot, msg, services, state_storage).await {
        error!(error = %err, "Error handling message");
        return Err(err.into());
    }

    Ok(())
}
