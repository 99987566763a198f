use teloxide::prelude::*;

use crate::bot::handlers::{BotContext, HandlerResult};
use crate::utils::logging::{
    log_command_denied, log_command_start, log_command_success, log_validation_error,
};
use crate::utils::validation::parse_manual_contest;

pub const DONE_REPLY: &str = "انجام شد";

pub async fn handle_manual(bot: Bot, msg: Message, ctx: &BotContext) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    let user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or(0);
    let username = msg.from().and_then(|u| u.username.as_deref()).unwrap_or("unknown");

    if !ctx.is_admin(chat_id) {
        log_command_denied("manual", username, user_id, chat_id);
        return Ok(());
    }
    log_command_start("manual", username, user_id, chat_id);

    let text = msg.text().unwrap_or_default();
    let contest = match parse_manual_contest(text) {
        Ok(contest) => contest,
        Err(e) => {
            log_validation_error("manual", &e.to_string(), username, user_id, chat_id);
            bot.send_message(msg.chat.id, format!("❌ {}", e)).await?;
            return Ok(());
        }
    };

    ctx.announcer
        .announce_manual(&contest, chrono::Utc::now())
        .await?;

    bot.send_message(msg.chat.id, DONE_REPLY).await?;
    log_command_success("manual", username, user_id, chat_id, Some(&contest.event));
    Ok(())
}
