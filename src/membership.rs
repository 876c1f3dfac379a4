//! Channel membership checks gating private-chat usage.

use crate::client::{is_api_rejection, BotClient};
use crate::config::ChannelRef;
use std::sync::Arc;
use teloxide::types::{ChatMemberStatus, UserId};

/// A user's standing in the mandatory channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipStatus {
    /// Member, administrator or creator.
    Member,
    NotMember,
    /// The lookup failed.
    Unknown,
}

impl MembershipStatus {
    pub fn from_status(status: ChatMemberStatus) -> Self {
        match status {
            ChatMemberStatus::Owner | ChatMemberStatus::Administrator | ChatMemberStatus::Member => {
                MembershipStatus::Member
            }
            ChatMemberStatus::Restricted | ChatMemberStatus::Left | ChatMemberStatus::Banned => {
                MembershipStatus::NotMember
            }
        }
    }

    /// Whether the user may use channel-gated features. `Unknown` fails closed.
    pub fn grants_access(self) -> bool {
        self == MembershipStatus::Member
    }
}

/// Looks up users in the configured channel.
#[derive(Clone)]
pub struct MembershipChecker {
    client: Arc<dyn BotClient>,
    channel: ChannelRef,
}

impl MembershipChecker {
    pub fn new(client: Arc<dyn BotClient>, channel: ChannelRef) -> Self {
        Self { client, channel }
    }

    pub fn channel(&self) -> &ChannelRef {
        &self.channel
    }

    pub async fn check(&self, user: UserId) -> MembershipStatus {
        match self.client.chat_member_status(&self.channel, user).await {
            Ok(status) => MembershipStatus::from_status(status),
            Err(e) if is_api_rejection(&e) => {
                tracing::warn!(
                    "Telegram rejected membership lookup for user {} in {}: {}",
                    user,
                    self.channel,
                    e
                );
                MembershipStatus::Unknown
            }
            Err(e) => {
                tracing::error!("Membership lookup failed for user {}: {}", user, e);
                MembershipStatus::Unknown
            }
        }
    }
}
