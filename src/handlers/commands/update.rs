//! /update command handler
//!
//! Recomputes the caller's shared-chat list and persists it to their user
//! row. Only touches existing users; the update is not an upsert.

use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::{debug, error, info};

use crate::services::ServiceFactory;
use crate::utils::errors::{AvangardError, Result};

pub async fn handle_update(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let user = msg
        .from
        .as_ref()
        .ok_or_else(|| AvangardError::InvalidInput("No user in message".to_string()))?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    debug!(user_id = user_id, "Processing /update command");

    let result = async {
        let common_chats = services.groups.chats_for_member(user_id).await?;
        services.users.update_chats(user_id, &common_chats).await
    }
    .await;

    match result {
        Ok(true) => {
            info!(user_id = user_id, "Chat list updated");
            bot.send_message(chat_id, "Chat list updated!").await?;
        }
        Ok(false) => {
            bot.send_message(chat_id, "Nothing to update.").await?;
        }
        Err(err) => {
            error!(user_id = user_id, error = %err, "Failed to update chat list");
            bot.send_message(chat_id, "Failed to update the chat list.")
                .await?;
        }
    }

    Ok(())
}
