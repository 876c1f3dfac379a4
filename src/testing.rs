//! Recording fake of [`BotClient`] for handler tests.

use crate::client::BotClient;
use crate::config::ChannelRef;
use crate::context::BotContext;
use crate::pending::InMemoryPendingStore;
use crate::reactor::AutoReactor;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use teloxide::types::{ChatId, ChatMemberStatus, InlineKeyboardMarkup, MessageId, UserId};
use teloxide::{ApiError, RequestError};

/// Failure a scripted call should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Telegram API rejection ("Forbidden: bot was blocked by the user").
    Blocked,
    /// Telegram API rejection ("Bad Request: chat not found").
    ChatNotFound,
    /// Non-API failure (chat migrated to a supergroup).
    Migrated,
}

impl Failure {
    fn to_error(self) -> RequestError {
        match self {
            Failure::Blocked => RequestError::Api(ApiError::BotBlocked),
            Failure::ChatNotFound => RequestError::Api(ApiError::ChatNotFound),
            Failure::Migrated => RequestError::MigrateToChatId(ChatId(-1001)),
        }
    }
}

/// An outbound call observed by the fake.
#[derive(Debug, Clone)]
pub enum Call {
    SendText {
        chat: ChatId,
        text: String,
    },
    SendKeyboard {
        chat: ChatId,
        text: String,
        keyboard: InlineKeyboardMarkup,
    },
    Edit {
        chat: ChatId,
        message: MessageId,
        text: String,
        keyboard: InlineKeyboardMarkup,
    },
    Answer {
        query_id: String,
        alert: Option<String>,
    },
    React {
        chat: ChatId,
        message: MessageId,
        emoji: String,
    },
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    member_statuses: HashMap<UserId, ChatMemberStatus>,
    membership_lookups: usize,
    send_failures: HashMap<ChatId, Failure>,
    failing_texts: HashMap<String, Failure>,
    reaction_results: VecDeque<Option<Failure>>,
}

pub struct FakeClient {
    username: String,
    state: Mutex<State>,
}

impl Default for FakeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeClient {
    pub fn new() -> Self {
        Self {
            username: "react_bot".to_string(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn set_member_status(&self, user: UserId, status: ChatMemberStatus) {
        self.state
            .lock()
            .unwrap()
            .member_statuses
            .insert(user, status);
    }

    /// Every send to `chat` fails.
    pub fn fail_sends_to(&self, chat: ChatId, failure: Failure) {
        self.state
            .lock()
            .unwrap()
            .send_failures
            .insert(chat, failure);
    }

    /// Sends whose text equals `text` fail.
    pub fn fail_text(&self, text: &str, failure: Failure) {
        self.state
            .lock()
            .unwrap()
            .failing_texts
            .insert(text.to_string(), failure);
    }

    /// Queue the outcome of the next reaction attempts, `None` meaning success.
    /// Attempts beyond the script succeed.
    pub fn script_reactions(&self, results: Vec<Option<Failure>>) {
        self.state.lock().unwrap().reaction_results = results.into();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn membership_lookups(&self) -> usize {
        self.state.lock().unwrap().membership_lookups
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::SendText { text, .. } | Call::SendKeyboard { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Emoji of every reaction attempt, successful or not.
    pub fn reaction_attempts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::React { emoji, .. } => Some(emoji),
                _ => None,
            })
            .collect()
    }

    fn record_send(&self, call: Call, chat: ChatId, text: &str) -> Result<(), RequestError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        let failure = state
            .send_failures
            .get(&chat)
            .or_else(|| state.failing_texts.get(text))
            .copied();
        match failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BotClient for FakeClient {
    async fn chat_member_status(
        &self,
        _channel: &ChannelRef,
        user: UserId,
    ) -> Result<ChatMemberStatus, RequestError> {
        let mut state = self.state.lock().unwrap();
        state.membership_lookups += 1;
        state
            .member_statuses
            .get(&user)
            .copied()
            .ok_or(RequestError::Api(ApiError::ChatNotFound))
    }

    async fn send_text(&self, chat: ChatId, text: &str) -> Result<(), RequestError> {
        let call = Call::SendText {
            chat,
            text: text.to_string(),
        };
        self.record_send(call, chat, text)
    }

    async fn send_with_keyboard(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), RequestError> {
        let call = Call::SendKeyboard {
            chat,
            text: text.to_string(),
            keyboard,
        };
        self.record_send(call, chat, text)
    }

    async fn edit_with_keyboard(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), RequestError> {
        self.state.lock().unwrap().calls.push(Call::Edit {
            chat,
            message,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn answer_callback(
        &self,
        query_id: &str,
        alert: Option<&str>,
    ) -> Result<(), RequestError> {
        self.state.lock().unwrap().calls.push(Call::Answer {
            query_id: query_id.to_string(),
            alert: alert.map(str::to_string),
        });
        Ok(())
    }

    async fn bot_username(&self) -> Result<String, RequestError> {
        Ok(self.username.clone())
    }

    async fn set_reaction(
        &self,
        chat: ChatId,
        message: MessageId,
        emoji: &str,
    ) -> Result<(), RequestError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::React {
            chat,
            message,
            emoji: emoji.to_string(),
        });
        match state.reaction_results.pop_front().flatten() {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

/// Context wired to a fake client and an in-memory store, with no retry delay.
pub fn context(client: &Arc<FakeClient>) -> (BotContext, Arc<InMemoryPendingStore>) {
    let store = Arc::new(InMemoryPendingStore::new());
    let ctx = BotContext::new(
        client.clone(),
        store.clone(),
        ChannelRef::parse("Unix_Bots").unwrap(),
    )
    .with_reactor(AutoReactor::new().with_retry_delay(Duration::ZERO));
    (ctx, store)
}
