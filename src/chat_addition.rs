//! Confirmation to whoever added the bot to a group or channel.
//!
//! The bot's own status changes arrive as `my_chat_member` updates. Only an
//! addition (from outside the chat into member/administrator) produces a
//! notice. When the adder has never opened a private chat with the bot the
//! notice is queued until their next `/start`.

use crate::client::{is_blocked, DeliveryFailure};
use crate::context::BotContext;
use teloxide::types::{Chat, ChatId, ChatMemberStatus, ChatMemberUpdated, UserId};

/// The bot's standing in a chat, as far as addition detection cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participation {
    NotParticipant,
    Member,
    Administrator,
}

impl Participation {
    /// Only plain members and administrators count as participating.
    pub fn from_status(status: ChatMemberStatus) -> Self {
        match status {
            ChatMemberStatus::Member => Participation::Member,
            ChatMemberStatus::Administrator => Participation::Administrator,
            _ => Participation::NotParticipant,
        }
    }
}

/// What a status change means for the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Addition,
    Removal,
    Promotion,
    Demotion,
    NoOp,
}

impl Transition {
    pub fn between(old: Participation, new: Participation) -> Self {
        use Participation::*;

        match (old, new) {
            (NotParticipant, Member | Administrator) => Transition::Addition,
            (Member | Administrator, NotParticipant) => Transition::Removal,
            (Member, Administrator) => Transition::Promotion,
            (Administrator, Member) => Transition::Demotion,
            (NotParticipant, NotParticipant) | (Member, Member) | (Administrator, Administrator) => {
                Transition::NoOp
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    pub fn of(chat: &Chat) -> Self {
        if chat.is_channel() {
            ChatKind::Channel
        } else if chat.is_supergroup() {
            ChatKind::Supergroup
        } else if chat.is_group() {
            ChatKind::Group
        } else {
            ChatKind::Private
        }
    }
}

/// A change of the bot's membership in some chat.
#[derive(Debug, Clone)]
pub struct ChatMembershipTransition {
    pub chat_id: ChatId,
    pub chat_kind: ChatKind,
    pub chat_title: Option<String>,
    /// Whoever changed the bot's status.
    pub actor: UserId,
    pub old: Participation,
    pub new: Participation,
}

impl ChatMembershipTransition {
    pub fn from_update(update: &ChatMemberUpdated) -> Self {
        Self {
            chat_id: update.chat.id,
            chat_kind: ChatKind::of(&update.chat),
            chat_title: update.chat.title().map(str::to_string),
            actor: update.from.id,
            old: Participation::from_status(update.old_chat_member.kind.status()),
            new: Participation::from_status(update.new_chat_member.kind.status()),
        }
    }

    pub fn transition(&self) -> Transition {
        Transition::between(self.old, self.new)
    }

    fn title(&self) -> &str {
        self.chat_title.as_deref().unwrap_or("this chat")
    }
}

/// Confirmation text for an addition, or `None` when nothing should be sent.
pub fn compose_notice(event: &ChatMembershipTransition) -> Option<String> {
    if event.transition() != Transition::Addition {
        return None;
    }

    match event.chat_kind {
        ChatKind::Group | ChatKind::Supergroup => Some(format!(
            "✅ Thanks for adding me to the group '{}'!\n\n\
             I'll automatically react to new messages there. My bro 😎",
            event.title()
        )),
        ChatKind::Channel if event.new == Participation::Administrator => Some(format!(
            "📢 Thanks for adding me to the channel '{}'!\n\n\
             I'll automatically react to new posts there. For best results, \
             please ensure I have 'Add Reactions' permission.",
            event.title()
        )),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeOutcome {
    /// Not an addition the adder needs to hear about.
    Ignored,
    Delivered,
    /// Adder unreachable, notice queued for their next `/start`.
    Deferred,
    /// Delivery failed for another reason; notice discarded.
    Dropped,
}

pub async fn on_bot_membership_changed(
    ctx: &BotContext,
    event: &ChatMembershipTransition,
) -> NoticeOutcome {
    let actor = event.actor;
    let Some(notice) = compose_notice(event) else {
        return NoticeOutcome::Ignored;
    };

    tracing::info!(
        "Bot was added to {:?} '{}' ({}) by {}",
        event.chat_kind,
        event.title(),
        event.chat_id.0,
        actor
    );

    match ctx.client.send_text(ChatId::from(actor), &notice).await {
        Ok(()) => {
            tracing::info!("Sent confirmation to user {} for '{}'", actor, event.title());
            NoticeOutcome::Delivered
        }
        Err(e) if DeliveryFailure::classify(&e) == DeliveryFailure::Unreachable => {
            if is_blocked(&e) {
                tracing::warn!("User {} blocked the bot, storing pending notification", actor);
            } else {
                tracing::warn!(
                    "Couldn't message user {} ({}), storing pending notification",
                    actor,
                    e
                );
            }
            ctx.pending.append(actor, notice).await;
            NoticeOutcome::Deferred
        }
        Err(e) => {
            tracing::error!("Unexpected error sending confirmation to {}: {}", actor, e);
            NoticeOutcome::Dropped
        }
    }
}
