//! `/start` in private chats: deferred-notification flush and the
//! channel-membership gate.

use crate::config::ChannelRef;
use crate::context::BotContext;
use crate::error::HandlerError;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, UserId};
use url::Url;

/// Callback data of the "I have joined" button.
pub const JOIN_CHECK_DATA: &str = "check_join";

pub const WELCOME_TEXT: &str = "🌟 Welcome!\n\n\
    You are a member of our main channel and can now use the bot.\n\n\
    Add me to a group or channel using the buttons below:";

pub const ACCESS_REQUIRED_TEXT: &str = "🔒 Access Required\n\n\
    To use this bot, you must first join our main channel.\n\n\
    Please join the channel and then click 'I Have Joined ✅'.";

/// Keyboard with "add to group" and "add to channel" deep links.
pub fn add_bot_keyboard(bot_username: &str) -> Result<InlineKeyboardMarkup, url::ParseError> {
    let group_url = Url::parse(&format!("https://t.me/{}?startgroup=true", bot_username))?;
    let channel_url = Url::parse(&format!("https://t.me/{}?startchannel=true", bot_username))?;

    Ok(InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::url("➕ Add to Group ➕", group_url),
        InlineKeyboardButton::url("📢 Add to Channel 📢", channel_url),
    ]]))
}

/// Two-step keyboard: join the channel, then confirm.
pub fn join_prompt_keyboard(channel: &ChannelRef) -> Result<InlineKeyboardMarkup, url::ParseError> {
    let buttons = vec![
        vec![InlineKeyboardButton::url(
            format!("1. Join {}", channel),
            Url::parse(&channel.url())?,
        )],
        vec![InlineKeyboardButton::callback(
            "2. I Have Joined ✅",
            JOIN_CHECK_DATA,
        )],
    ];

    Ok(InlineKeyboardMarkup::new(buttons))
}

/// Send everything queued for `user`. The queue is emptied up front, so each
/// message gets exactly one attempt.
pub async fn deliver_pending(ctx: &BotContext, user: UserId) -> usize {
    let queued = ctx.pending.take_all(user).await;
    if queued.is_empty() {
        return 0;
    }

    tracing::info!(
        "Delivering {} pending notification(s) to user {}",
        queued.len(),
        user
    );

    let mut delivered = 0;
    for text in &queued {
        match ctx.client.send_text(ChatId::from(user), text).await {
            Ok(()) => delivered += 1,
            Err(e) => tracing::warn!("Could not send pending notification to {}: {}", user, e),
        }
    }
    delivered
}

/// Handle `/start` from `user` in the private chat `chat`.
pub async fn on_start(ctx: &BotContext, chat: ChatId, user: UserId) -> Result<(), HandlerError> {
    deliver_pending(ctx, user).await;

    if ctx.membership.check(user).await.grants_access() {
        let username = ctx.client.bot_username().await?;
        ctx.client
            .send_with_keyboard(chat, WELCOME_TEXT, add_bot_keyboard(&username)?)
            .await?;
    } else {
        let keyboard = join_prompt_keyboard(ctx.membership.channel())?;
        ctx.client
            .send_with_keyboard(chat, ACCESS_REQUIRED_TEXT, keyboard)
            .await?;
    }

    Ok(())
}
