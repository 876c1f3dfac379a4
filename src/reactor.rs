//! Automatic emoji reactions to new messages and channel posts.

use crate::client::BotClient;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;
use teloxide::types::{ChatId, Message, MessageId};
use teloxide::RequestError;

pub const PRIMARY_REACTIONS: [&str; 15] = [
    "👍", "❤️", "🔥", "🎉", "👏", "🤩", "💯", "🙏", "💘", "😘", "🤗", "🆒", "😇", "⚡", "🫡",
];

pub const FALLBACK_REACTIONS: [&str; 5] = ["👌", "😁", "❤️‍🔥", "🥰", "💋"];

/// Distinct emoji tried per message.
pub const MAX_ATTEMPTS: usize = 3;

/// Pause between a failed attempt and the next candidate.
pub const RETRY_DELAY: Duration = Duration::from_millis(300);

/// Result of a single `setMessageReaction` call.
#[derive(Debug)]
pub enum AttemptResult {
    Applied,
    /// Worth trying another emoji.
    Retryable(RequestError),
    /// Further attempts on this message cannot succeed.
    Fatal(RequestError),
}

impl AttemptResult {
    pub fn from_response(response: Result<(), RequestError>) -> Self {
        match response {
            Ok(()) => AttemptResult::Applied,
            // The chat moved or the API answered with something undecodable
            Err(e @ (RequestError::MigrateToChatId(_) | RequestError::InvalidJson { .. })) => {
                AttemptResult::Fatal(e)
            }
            Err(e) => AttemptResult::Retryable(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionOutcome {
    Applied(String),
    /// Every candidate failed with a retryable error.
    Exhausted { attempts: usize },
    /// Stopped early on a fatal error.
    Aborted { attempts: usize },
}

/// The parts of a message that decide whether it gets a reaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageTraits<'a> {
    pub text: Option<&'a str>,
    pub via_bot: bool,
    pub membership_notice: bool,
}

impl<'a> MessageTraits<'a> {
    pub fn of(msg: &'a Message) -> Self {
        Self {
            text: msg.text(),
            via_bot: msg.via_bot.is_some(),
            membership_notice: msg.new_chat_members().is_some()
                || msg.left_chat_member().is_some(),
        }
    }

    /// Commands, inline-bot messages and join/leave notices are skipped.
    pub fn qualifies(&self) -> bool {
        let is_command = self.text.is_some_and(|text| text.starts_with('/'));
        !(is_command || self.via_bot || self.membership_notice)
    }
}

#[derive(Debug, Clone)]
pub struct AutoReactor {
    palette: Vec<&'static str>,
    max_attempts: usize,
    retry_delay: Duration,
}

impl Default for AutoReactor {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoReactor {
    pub fn new() -> Self {
        Self {
            palette: PRIMARY_REACTIONS
                .iter()
                .chain(FALLBACK_REACTIONS.iter())
                .copied()
                .collect(),
            max_attempts: MAX_ATTEMPTS,
            retry_delay: RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn palette(&self) -> &[&'static str] {
        &self.palette
    }

    /// Up to `MAX_ATTEMPTS` distinct emoji in random order.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<&'static str> {
        self.palette
            .choose_multiple(rng, self.max_attempts)
            .copied()
            .collect()
    }

    /// React to a message with a freshly sampled emoji.
    pub async fn react(
        &self,
        client: &dyn BotClient,
        chat: ChatId,
        message: MessageId,
    ) -> ReactionOutcome {
        let candidates = self.sample(&mut rand::thread_rng());
        self.react_with(client, chat, message, &candidates).await
    }

    /// Try `candidates` in order until one sticks.
    pub async fn react_with(
        &self,
        client: &dyn BotClient,
        chat: ChatId,
        message: MessageId,
        candidates: &[&str],
    ) -> ReactionOutcome {
        tracing::info!(
            "New message {} in chat {}. Attempting to react.",
            message.0,
            chat.0
        );

        let mut attempts = 0;
        for emoji in candidates.iter().take(self.max_attempts) {
            attempts += 1;
            let response = client.set_reaction(chat, message, emoji).await;

            match AttemptResult::from_response(response) {
                AttemptResult::Applied => {
                    tracing::info!("Reacted with '{}' in chat {}", emoji, chat.0);
                    return ReactionOutcome::Applied(emoji.to_string());
                }
                AttemptResult::Retryable(e) => {
                    tracing::warn!("Could not react with '{}' in chat {}: {}", emoji, chat.0, e);
                    tokio::time::sleep(self.retry_delay).await;
                }
                AttemptResult::Fatal(e) => {
                    tracing::error!("Giving up on reactions in chat {}: {}", chat.0, e);
                    return ReactionOutcome::Aborted { attempts };
                }
            }
        }

        tracing::error!(
            "Failed to react to message {} in chat {} after {} attempt(s)",
            message.0,
            chat.0,
            attempts
        );
        ReactionOutcome::Exhausted { attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, Failure, FakeClient};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn reactor() -> AutoReactor {
        AutoReactor::new().with_retry_delay(Duration::ZERO)
    }

    #[test]
    fn test_palette_is_primary_then_fallback() {
        let reactor = reactor();
        assert_eq!(reactor.palette().len(), 20);
        assert_eq!(reactor.palette()[0], "👍");
        assert_eq!(reactor.palette()[15], "👌");

        let unique: HashSet<_> = reactor.palette().iter().collect();
        assert_eq!(unique.len(), 20);
    }

    #[test]
    fn test_sample_is_distinct_and_bounded() {
        let reactor = reactor();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = reactor.sample(&mut rng);

            assert_eq!(sample.len(), MAX_ATTEMPTS);
            let unique: HashSet<_> = sample.iter().collect();
            assert_eq!(unique.len(), sample.len());
            assert!(sample.iter().all(|e| reactor.palette().contains(e)));
        }
    }

    #[test]
    fn test_message_traits() {
        let plain = MessageTraits {
            text: Some("hello"),
            ..Default::default()
        };
        assert!(plain.qualifies());

        let media = MessageTraits::default();
        assert!(media.qualifies());

        let command = MessageTraits {
            text: Some("/foo"),
            ..Default::default()
        };
        assert!(!command.qualifies());

        let inline = MessageTraits {
            text: Some("result"),
            via_bot: true,
            ..Default::default()
        };
        assert!(!inline.qualifies());

        let joined = MessageTraits {
            membership_notice: true,
            ..Default::default()
        };
        assert!(!joined.qualifies());
    }

    #[tokio::test]
    async fn test_first_success_stops() {
        let client = FakeClient::new();

        let outcome = reactor()
            .react_with(&client, ChatId(-1), MessageId(9), &["🔥", "👌"])
            .await;

        assert_eq!(outcome, ReactionOutcome::Applied("🔥".to_string()));
        match client.calls().as_slice() {
            [Call::React {
                chat,
                message,
                emoji,
            }] => {
                assert_eq!(*chat, ChatId(-1));
                assert_eq!(*message, MessageId(9));
                assert_eq!(emoji, "🔥");
            }
            other => panic!("unexpected calls {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_retryable_failure_moves_on() {
        let client = FakeClient::new();
        client.script_reactions(vec![Some(Failure::ChatNotFound), None]);

        let outcome = reactor()
            .react_with(&client, ChatId(-1), MessageId(9), &["🔥", "👌", "💯"])
            .await;

        assert_eq!(outcome, ReactionOutcome::Applied("👌".to_string()));
        assert_eq!(client.reaction_attempts(), vec!["🔥", "👌"]);
    }

    #[tokio::test]
    async fn test_all_candidates_fail() {
        let client = FakeClient::new();
        client.script_reactions(vec![Some(Failure::ChatNotFound); 3]);

        let outcome = reactor()
            .react_with(&client, ChatId(-1), MessageId(9), &["🔥", "👌", "💯"])
            .await;

        assert_eq!(outcome, ReactionOutcome::Exhausted { attempts: 3 });
        assert_eq!(client.reaction_attempts().len(), 3);
    }

    #[tokio::test]
    async fn test_fatal_failure_aborts() {
        let client = FakeClient::new();
        client.script_reactions(vec![Some(Failure::Migrated)]);

        let outcome = reactor()
            .react_with(&client, ChatId(-1), MessageId(9), &["🔥", "👌", "💯"])
            .await;

        assert_eq!(outcome, ReactionOutcome::Aborted { attempts: 1 });
        assert_eq!(client.reaction_attempts(), vec!["🔥"]);
    }

    #[tokio::test]
    async fn test_never_more_than_three_attempts() {
        let client = FakeClient::new();
        client.script_reactions(vec![Some(Failure::ChatNotFound); 5]);

        let outcome = reactor()
            .react_with(&client, ChatId(-1), MessageId(9), &["👍", "❤️", "🔥", "🎉", "👏"])
            .await;

        assert_eq!(outcome, ReactionOutcome::Exhausted { attempts: 3 });
        assert_eq!(client.reaction_attempts().len(), 3);
    }

    #[tokio::test]
    async fn test_react_samples_from_palette() {
        let client = FakeClient::new();
        let reactor = reactor();

        let outcome = reactor.react(&client, ChatId(-1), MessageId(1)).await;

        match outcome {
            ReactionOutcome::Applied(emoji) => {
                assert!(reactor.palette().iter().any(|p| *p == emoji))
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(client.reaction_attempts().len(), 1);
    }
}
