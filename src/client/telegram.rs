//! [`BotClient`] backed by a teloxide [`Bot`].

use super::BotClient;
use crate::config::ChannelRef;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, ChatMemberStatus, InlineKeyboardMarkup, MessageId, ReactionType, UserId,
};
use teloxide::RequestError;

/// Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl BotClient for TelegramClient {
    async fn chat_member_status(
        &self,
        channel: &ChannelRef,
        user: UserId,
    ) -> Result<ChatMemberStatus, RequestError> {
        let member = self.bot.get_chat_member(channel.recipient(), user).await?;
        Ok(member.kind.status())
    }

    async fn send_text(&self, chat: ChatId, text: &str) -> Result<(), RequestError> {
        self.bot.send_message(chat, text).await?;
        Ok(())
    }

    async fn send_with_keyboard(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), RequestError> {
        self.bot
            .send_message(chat, text)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }

    async fn edit_with_keyboard(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), RequestError> {
        self.bot
            .edit_message_text(chat, message, text)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }

    async fn answer_callback(
        &self,
        query_id: &str,
        alert: Option<&str>,
    ) -> Result<(), RequestError> {
        let request = self.bot.answer_callback_query(query_id);
        match alert {
            Some(text) => request.text(text).show_alert(true).await?,
            None => request.await?,
        };
        Ok(())
    }

    async fn bot_username(&self) -> Result<String, RequestError> {
        let me = self.bot.get_me().await?;
        Ok(me.username().to_string())
    }

    async fn set_reaction(
        &self,
        chat: ChatId,
        message: MessageId,
        emoji: &str,
    ) -> Result<(), RequestError> {
        self.bot
            .set_message_reaction(chat, message)
            .reaction(vec![ReactionType::Emoji {
                emoji: emoji.to_string(),
            }])
            .is_big(false)
            .await?;
        Ok(())
    }
}
