//! Message handlers module
//!
//! Free text is either consumed as the pending nickname of an in-progress
//! registration or archived to the message log.

use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::{debug, error, info, warn};

use crate::models::message::NewMessage;
use crate::models::user::validate_nickname;
use crate::services::ServiceFactory;
use crate::state::{RegistrationContext, StateStorage};
use crate::utils::errors::{AvangardError, Result};

/// Handle incoming text messages.
pub async fn handle_message(
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
    let Some(text) = msg.text().map(str::to_owned) else {
        return Ok(());
    };

    // Command-shaped text is never a nickname and never archived; commands
    // the dispatcher does not recognize are simply ignored here.
    if is_command_text(&text) {
        debug!(user_id = user_id, "Ignoring unrecognized command");
        return Ok(());
    }

    debug!(user_id = user_id, chat_id = ?msg.chat.id, "Processing message");

    if let Some(context) = state_storage.load_context(user_id) {
        return process_registration(bot, msg, &text, context, services, state_storage).await;
    }

    archive_message(bot, msg, &text, services).await
}

/// True for text that is a bot command (known or not).
fn is_command_text(text: &str) -> bool {
    text.starts_with('/')
}

/// Consume the pending nickname and drive the downstream registration.
///
/// The context survives every failure path; only a successful registration
/// discards it. The user may simply send another nickname to retry.
async fn process_registration(
    bot: Bot,
    msg: Message,
    text: &str,
    context: RegistrationContext,
    services: ServiceFactory,
    state_storage: StateStorage,
) -> Result<()> {
    let user_id = context.user_id;
    let chat_id = msg.chat.id;
    let nickname = text.trim();

    if validate_nickname(nickname).is_err() {
        debug!(user_id = user_id, "Nickname length out of bounds, reprompting");
        bot.send_message(chat_id, "Invalid nickname length (3-32 characters).")
            .await?;
        return Ok(());
    }

    match services
        .api_client
        .create_user(user_id, nickname, &context.common_chats)
        .await
    {
        Ok(raw_key) => {
            state_storage.delete_context(user_id);
            info!(user_id = user_id, "Registration completed");
            bot.send_message(
                chat_id,
                format!("Registration complete!\nAccess key: {raw_key}"),
            )
            .await?;
        }
        Err(AvangardError::Upstream { status, body }) => {
            warn!(
                user_id = user_id,
                status = status,
                "Registration rejected upstream"
            );
            bot.send_message(chat_id, format!("Error: {body}")).await?;
        }
        Err(err) => {
            error!(user_id = user_id, error = %err, "Registration call failed");
            bot.send_message(chat_id, "Could not reach the registration server.")
                .await?;
        }
    }

    Ok(())
}

/// Append an idle free-text message to the archive.
async fn archive_message(
    bot: Bot,
    msg: Message,
    text: &str,
    services: ServiceFactory,
) -> Result<()> {
    let user_id = msg
        .from
        .as_ref()
        .map(|user| user.id.0 as i64)
        .unwrap_or_default();

    let record = NewMessage {
        message_id: msg.id.0,
        user_id,
        chat_id: msg.chat.id.0,
        text: text.to_string(),
    };

    match services.messages.archive(record).await {
        Ok(archived) => {
            info!(
                user_id = user_id,
                message_id = archived.id,
                "Message archived"
            );
        }
        Err(err) => {
            error!(user_id = user_id, error = %err, "Failed to archive message");
            bot.send_message(msg.chat.id, "Failed to save the message.")
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_shaped_text_is_never_a_nickname() {
        // A length-valid command must still be excluded from the flow.
        assert!(is_command_text("/help"));
        assert!(validate_nickname("/help").is_ok());

        assert!(is_command_text("/start"));
        assert!(is_command_text("/unknown_command"));
    }

    #[test]
    fn plain_text_passes_through() {
        assert!(!is_command_text("dancer"));
        assert!(!is_command_text("a/b"));
        assert!(!is_command_text(""));
    }
}
