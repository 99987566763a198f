pub mod manual;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Contest announcer commands:")]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Announce a contest by hand (admins only): event, href, start and end on separate lines")]
    Manual,
}

/// Whether `text` is a `/manual` command, with or without a bot mention.
///
/// The body sits on the following lines, which the regular command parser
/// does not accept, so these messages are routed by hand.
pub fn is_manual_command(text: &str) -> bool {
    let head = text.lines().next().unwrap_or_default();
    let word = head.split_whitespace().next().unwrap_or_default();
    let name = word.split('@').next().unwrap_or_default();
    name.eq_ignore_ascii_case("/manual")
}
