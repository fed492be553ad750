use crate::types::{FeedItem, InlineKeyboard, MessageRef, Result, Topic, UserId};
use async_trait::async_trait;

/// Trait for pulling headlines for one topic from an external news source
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Human-readable name for this source
    fn source_name(&self) -> String;

    /// Fetch up to `limit` of the most recent items matching the topic's query
    async fn fetch_topic(&self, topic: Topic, limit: usize) -> Result<Vec<FeedItem>>;
}

/// Outbound side of the chat platform.
#[async_trait]
pub trait BotTransport: Send + Sync {
    /// Send a formatted text message
    async fn send_text(&self, chat: UserId, text: &str) -> Result<()>;

    /// Send a message carrying an inline keyboard
    async fn send_menu(&self, chat: UserId, text: &str, keyboard: &InlineKeyboard) -> Result<MessageRef>;

    /// Replace the keyboard of an already sent menu
    async fn update_menu(&self, message: &MessageRef, keyboard: &InlineKeyboard) -> Result<()>;

    /// Replace the text of an already sent menu, removing its keyboard
    async fn replace_text(&self, message: &MessageRef, text: &str) -> Result<()>;

    /// Acknowledge a button press, optionally with a short notice
    async fn answer_interaction(&self, interaction_id: &str, notice: Option<&str>) -> Result<()>;
}
