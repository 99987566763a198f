pub mod message;

use std::collections::HashSet;
use std::sync::Arc;

use teloxide::{dispatching::UpdateHandler, prelude::*};

use crate::bot::commands::{is_manual_command, Command};
use crate::services::announcer::Announcer;

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

/// Everything command handlers need besides the bot itself.
#[derive(Clone)]
pub struct BotContext {
    pub announcer: Announcer,
    pub admins: Arc<HashSet<i64>>,
    /// Channel name shown in the /start greeting.
    pub channel_name: String,
}

impl BotContext {
    /// Admin rights follow the private chat the command is sent from.
    pub fn is_admin(&self, chat_id: i64) -> bool {
        self.admins.contains(&chat_id)
    }
}

pub struct BotHandler {
    pub ctx: BotContext,
}

impl BotHandler {
    pub fn new(ctx: BotContext) -> Self {
        Self { ctx }
    }

    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        let ctx_manual = self.ctx.clone();
        let ctx_command = self.ctx.clone();

        Update::filter_message()
            .branch(
                dptree::filter(|msg: Message| msg.text().is_some_and(is_manual_command)).endpoint(
                    move |bot: Bot, msg: Message| {
                        let ctx = ctx_manual.clone();
                        async move { crate::bot::commands::manual::handle_manual(bot, msg, &ctx).await }
                    },
                ),
            )
            .branch(
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let ctx = ctx_command.clone();
                        async move { message::command_handler(bot, msg, cmd, ctx).await }
                    }),
            )
    }
}
