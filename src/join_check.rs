//! The "I have joined" button under the access prompt.

use crate::context::BotContext;
use crate::error::HandlerError;
use crate::onboarding::add_bot_keyboard;
use teloxide::types::{ChatId, MessageId, UserId};

pub const JOINED_TEXT: &str =
    "✅ Thank you for joining!\nYou can now add me to a group or channel:";

pub const NOT_JOINED_ALERT: &str =
    "❌ You haven't joined the channel yet. Please join and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinCheckOutcome {
    /// Membership confirmed, prompt replaced with the add-bot keyboard.
    Confirmed,
    /// Still not a member, alert shown.
    NotJoined,
}

/// Handle a press of the join-check button by `user`.
///
/// `origin` is the message carrying the button; it is edited in place once
/// membership is confirmed. The press is answered on every path.
pub async fn on_join_check(
    ctx: &BotContext,
    query_id: &str,
    user: UserId,
    origin: Option<(ChatId, MessageId)>,
) -> Result<JoinCheckOutcome, HandlerError> {
    if !ctx.membership.check(user).await.grants_access() {
        ctx.client
            .answer_callback(query_id, Some(NOT_JOINED_ALERT))
            .await?;
        return Ok(JoinCheckOutcome::NotJoined);
    }

    ctx.client.answer_callback(query_id, None).await?;

    match origin {
        Some((chat, message)) => {
            let username = ctx.client.bot_username().await?;
            ctx.client
                .edit_with_keyboard(chat, message, JOINED_TEXT, add_bot_keyboard(&username)?)
                .await?;
        }
        None => tracing::debug!("Join check from user {} without an editable message", user),
    }

    Ok(JoinCheckOutcome::Confirmed)
}
