//! /start command handler

use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::{debug, error, info};

use crate::services::ServiceFactory;
use crate::state::{RegistrationContext, StateStorage};
use crate::utils::errors::{AvangardError, Result};

/// Handle /start: snapshot the caller's shared chats, open a registration
/// context and prompt for a nickname.
pub async fn handle_start(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    state_storage: StateStorage,
) -> Result<()> {
    let user = msg
        .from
        .as_ref()
        .ok_or_else(|| AvangardError::InvalidInput("No user in message".to_string()))?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    debug!(user_id = user_id, chat_id = ?chat_id, "Processing /start command");

    // The snapshot is taken once, here; the nickname step reuses it as-is.
    let common_chats = match services.groups.chats_for_member(user_id).await {
        Ok(chats) => chats,
        Err(err) => {
            error!(user_id = user_id, error = %err, "Failed to snapshot common chats");
            bot.send_message(chat_id, "Could not look up your chats, please try again later.")
                .await?;
            return Ok(());
        }
    };

    info!(
        user_id = user_id,
        chats = common_chats.len(),
        "Registration flow started"
    );
    state_storage.save_context(RegistrationContext::new(user_id, common_chats));

    bot.send_message(chat_id, "Enter your desired nickname (3-32 characters):")
        .await?;

    Ok(())
}
