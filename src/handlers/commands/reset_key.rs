//! /reset_key command handler
//!
//! Proxies to the HTTP API's reset endpoint so the credential contract is
//! the same as for any external caller.

use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::{debug, error, warn};

use crate::services::ServiceFactory;
use crate::utils::errors::{AvangardError, Result};

pub async fn handle_reset_key(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let user = msg
        .from
        .as_ref()
        .ok_or_else(|| AvangardError::InvalidInput("No user in message".to_string()))?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    debug!(user_id = user_id, "Processing /reset_key command");

    match services.api_client.reset_key(user_id).await {
        Ok(new_key) => {
            bot.send_message(chat_id, format!("New access key: {new_key}"))
                .await?;
        }
        Err(AvangardError::Upstream { status, body }) => {
            warn!(user_id = user_id, status = status, "Key reset rejected");
            bot.send_message(chat_id, format!("Error: {body}")).await?;
        }
        Err(err) => {
            error!(user_id = user_id, error = %err, "Key reset failed");
            bot.send_message(chat_id, "Something went wrong while resetting the key.")
                .await?;
        }
    }

    Ok(())
}
