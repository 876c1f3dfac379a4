//! Shared state handed to every update handler.

use crate::client::BotClient;
use crate::config::ChannelRef;
use crate::membership::MembershipChecker;
use crate::pending::PendingStore;
use crate::reactor::AutoReactor;
use std::sync::Arc;

#[derive(Clone)]
pub struct BotContext {
    pub client: Arc<dyn BotClient>,
    pub pending: Arc<dyn PendingStore>,
    pub membership: MembershipChecker,
    pub reactor: AutoReactor,
}

impl BotContext {
    pub fn new(
        client: Arc<dyn BotClient>,
        pending: Arc<dyn PendingStore>,
        channel: ChannelRef,
    ) -> Self {
        Self {
            membership: MembershipChecker::new(client.clone(), channel),
            client,
            pending,
            reactor: AutoReactor::new(),
        }
    }

    pub fn with_reactor(mut self, reactor: AutoReactor) -> Self {
        self.reactor = reactor;
        self
    }
}
