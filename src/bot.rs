//! Long-running bot: update routing and startup.

use crate::chat_addition::{self, ChatMembershipTransition};
use crate::client::{BotClient, TelegramClient};
use crate::config::Config;
use crate::context::BotContext;
use crate::error::HandlerError;
use crate::join_check;
use crate::onboarding::{self, JOIN_CHECK_DATA};
use crate::pending::{InMemoryPendingStore, PendingStore};
use crate::reactor::MessageTraits;
use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatMemberUpdated};
use teloxide::utils::command::BotCommands;

type HandlerResult = Result<(), HandlerError>;

/// Available bot commands.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Check channel membership and get the add-bot links")]
    Start,
}

/// Handle /start in a private chat.
async fn start_handler(ctx: BotContext, msg: Message) -> HandlerResult {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    onboarding::on_start(&ctx, msg.chat.id, user.id).await
}

/// Handle a press of the "I have joined" button.
async fn join_check_handler(ctx: BotContext, query: CallbackQuery) -> HandlerResult {
    let origin = query.message.as_ref().map(|msg| (msg.chat().id, msg.id()));
    join_check::on_join_check(&ctx, &query.id, query.from.id, origin).await?;
    Ok(())
}

/// Handle a change of the bot's own membership in a chat.
async fn my_chat_member_handler(ctx: BotContext, update: ChatMemberUpdated) -> HandlerResult {
    let event = ChatMembershipTransition::from_update(&update);
    chat_addition::on_bot_membership_changed(&ctx, &event).await;
    Ok(())
}

/// React to any new message or channel post that isn't a command.
async fn reaction_handler(ctx: BotContext, msg: Message) -> HandlerResult {
    if !MessageTraits::of(&msg).qualifies() {
        return Ok(());
    }
    ctx.reactor
        .react(ctx.client.as_ref(), msg.chat.id, msg.id)
        .await;
    Ok(())
}

/// Update routing. Branches are tried in order and the first match wins.
pub fn schema() -> UpdateHandler<HandlerError> {
    let start = Update::filter_message()
        .filter(|msg: Message| msg.chat.is_private())
        .filter_command::<Command>()
        .endpoint(start_handler);

    let join_check = Update::filter_callback_query()
        .filter(|query: CallbackQuery| query.data.as_deref() == Some(JOIN_CHECK_DATA))
        .endpoint(join_check_handler);

    dptree::entry()
        .branch(start)
        .branch(join_check)
        .branch(Update::filter_my_chat_member().endpoint(my_chat_member_handler))
        .branch(Update::filter_message().endpoint(reaction_handler))
        .branch(Update::filter_channel_post().endpoint(reaction_handler))
}

/// Main entry point for the bot. Blocks until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let bot = Bot::new(&config.bot_token);

    let client: Arc<dyn BotClient> = Arc::new(TelegramClient::new(bot.clone()));
    let pending: Arc<dyn PendingStore> = Arc::new(InMemoryPendingStore::new());
    let ctx = BotContext::new(client, pending, config.channel.clone());

    tracing::info!("Starting bot (mandatory channel {})...", config.channel);

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![ctx])
        .default_handler(|update| async move {
            tracing::trace!("Unhandled update {:?}", update.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Exception while handling an update",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("Bot stopped");
    Ok(())
}
