use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, Recipient};

/// Where announcements and alarms are posted.
#[async_trait]
pub trait ChannelPublisher: Send + Sync {
    /// Posts a message and returns its id, the reply target for later alarms.
    async fn send(&self, text: &str, silent: bool) -> Result<i32>;

    async fn reply(&self, to_message_id: i32, text: &str) -> Result<i32>;
}

/// Posts to a Telegram channel or chat.
#[derive(Clone)]
pub struct TelegramPublisher {
    bot: Bot,
    channel: Recipient,
}

impl TelegramPublisher {
    pub fn new(bot: Bot, channel: Recipient) -> Self {
        Self { bot, channel }
    }
}

#[async_trait]
impl ChannelPublisher for TelegramPublisher {
    async fn send(&self, text: &str, silent: bool) -> Result<i32> {
        let message = self
            .bot
            .send_message(self.channel.clone(), text)
            .disable_web_page_preview(true)
            .disable_notification(silent)
            .await?;
        Ok(message.id.0)
    }

    async fn reply(&self, to_message_id: i32, text: &str) -> Result<i32> {
        let message = self
            .bot
            .send_message(self.channel.clone(), text)
            .reply_to_message_id(MessageId(to_message_id))
            .disable_web_page_preview(true)
            .await?;
        Ok(message.id.0)
    }
}
