//! Abstraction over the Telegram Bot API calls the handlers make.
//!
//! Handlers only talk to [`BotClient`], so they can be driven by a fake in
//! tests while production uses [`telegram::TelegramClient`].

pub mod telegram;

use crate::config::ChannelRef;
use async_trait::async_trait;
use teloxide::types::{ChatId, ChatMemberStatus, InlineKeyboardMarkup, MessageId, UserId};
use teloxide::{ApiError, RequestError};

pub use telegram::TelegramClient;

/// Outbound Bot API operations used by the bot.
#[async_trait]
pub trait BotClient: Send + Sync {
    /// Look up a user's membership status in a channel.
    async fn chat_member_status(
        &self,
        channel: &ChannelRef,
        user: UserId,
    ) -> Result<ChatMemberStatus, RequestError>;

    /// Send a plain text message.
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<(), RequestError>;

    /// Send a text message with an inline keyboard attached.
    async fn send_with_keyboard(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), RequestError>;

    /// Replace the text and keyboard of an existing message.
    async fn edit_with_keyboard(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), RequestError>;

    /// Acknowledge a button press, optionally showing an alert to the presser.
    async fn answer_callback(&self, query_id: &str, alert: Option<&str>)
        -> Result<(), RequestError>;

    /// The bot's own username, without `@`.
    async fn bot_username(&self) -> Result<String, RequestError>;

    /// Set a single emoji as the message's reaction.
    async fn set_reaction(
        &self,
        chat: ChatId,
        message: MessageId,
        emoji: &str,
    ) -> Result<(), RequestError>;
}

/// How a failed direct message should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// Telegram refused the recipient: blocked, never started, chat not found.
    Unreachable,
    /// Anything else (network, decoding, migration).
    Other,
}

impl DeliveryFailure {
    pub fn classify(err: &RequestError) -> Self {
        match err {
            RequestError::Api(_) => DeliveryFailure::Unreachable,
            _ => DeliveryFailure::Other,
        }
    }
}

/// Whether an error came from Telegram rejecting the request, as opposed to
/// the request never completing.
pub fn is_api_rejection(err: &RequestError) -> bool {
    matches!(err, RequestError::Api(_))
}

/// True when the API error means the bot can't write to that user at all.
pub fn is_blocked(err: &RequestError) -> bool {
    matches!(
        err,
        RequestError::Api(
            ApiError::BotBlocked
                | ApiError::CantInitiateConversation
                | ApiError::UserDeactivated
        )
    )
}
