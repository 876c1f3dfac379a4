//! Reaction Gate Bot library.
//!
//! A Telegram bot that reacts to new posts in the chats it is added to,
//! gates private-chat usage behind membership of a configured channel, and
//! notifies whoever added it to a chat, queueing that notice until they start
//! a private conversation when needed.

pub mod bot;
pub mod chat_addition;
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod join_check;
pub mod membership;
pub mod onboarding;
pub mod pending;
pub mod reactor;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use client::{BotClient, TelegramClient};
pub use config::{ChannelRef, Config};
pub use context::BotContext;
pub use membership::{MembershipChecker, MembershipStatus};
pub use pending::{InMemoryPendingStore, PendingStore};
pub use reactor::AutoReactor;
