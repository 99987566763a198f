use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::Command;
use crate::bot::handlers::{BotContext, HandlerResult};

pub fn start_text(channel_name: &str) -> String {
    format!("سلام!\nاطلاع رسانی کانتست‌ها داخل {} انجام میشه.", channel_name)
}

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: BotContext,
) -> HandlerResult {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string()).await?;
        }
        Command::Start => {
            bot.send_message(msg.chat.id, start_text(&ctx.channel_name)).await?;
        }
        // Listed for /help only; BotHandler::schema routes /manual before filter_command.
        Command::Manual => {}
    }
    Ok(())
}
