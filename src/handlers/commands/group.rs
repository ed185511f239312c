//! /group command handler
//!
//! Snapshots the chat's administrator list into storage. Restricted to
//! group chats and to callers whose admin status is confirmed against the
//! live chat-membership API, never a cached copy.

use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::{debug, error, info};

use crate::models::group::GroupMember;
use crate::services::ServiceFactory;
use crate::utils::errors::{AvangardError, Result};

pub async fn handle_group(bot: Bot, msg: Message, services: ServiceFactory) -> Result<()> {
    let user = msg
        .from
        .as_ref()
        .ok_or_else(|| AvangardError::InvalidInput("No user in message".to_string()))?;

    let chat = &msg.chat;
    let user_id = user.id.0 as i64;

    debug!(user_id = user_id, chat_id = ?chat.id, "Processing /group command");

    if !chat.is_group() && !chat.is_supergroup() {
        bot.send_message(chat.id, "This command is only available in groups.")
            .await?;
        return Ok(());
    }

    let member = bot.get_chat_member(chat.id, user.id).await?;
    if !member.is_privileged() {
        bot.send_message(chat.id, "Administrator rights required.")
            .await?;
        return Ok(());
    }

    let administrators = bot.get_chat_administrators(chat.id).await?;
    let members: Vec<GroupMember> = administrators
        .iter()
        .filter(|admin| !admin.user.is_bot)
        .map(|admin| GroupMember {
            user_id: admin.user.id.0 as i64,
            username: admin
                .user
                .username
                .clone()
                .unwrap_or_else(|| admin.user.full_name()),
            full_name: admin.user.full_name(),
        })
        .collect();

    let title = chat.title().unwrap_or_default().to_string();

    match services.groups.upsert(chat.id.0, &title, &members).await {
        Ok((group, inserted)) => {
            let action = if inserted { "added" } else { "updated" };
            info!(
                chat_id = group.chat_id,
                admins = group.members.len(),
                action = action,
                "Group snapshot synced"
            );
            bot.send_message(
                chat.id,
                format!(
                    "Group {action}!\nTitle: {}\nAdministrators: {}",
                    group.title,
                    group.members.len()
                ),
            )
            .await?;
        }
        Err(err) => {
            error!(chat_id = chat.id.0, error = %err, "Failed to sync group");
            bot.send_message(chat.id, "Failed to sync the group.")
                .await?;
        }
    }

    Ok(())
}
