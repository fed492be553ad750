pub use interfaces::defs::{
    Action, Article, FeedItem, InlineButton, InlineKeyboard, Interaction, MessageRef, Topic,
    UserId,
};

/// Most articles a single digest may carry.
pub const MAX_DIGEST_ARTICLES: usize = 8;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub base_url: String,
    pub language: String,
    pub region: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "News-Digest-Bot/1.0".to_string(),
            timeout_seconds: 15,
            max_feed_size_mb: 10,
            base_url: "https://news.google.com".to_string(),
            language: "en-US".to_string(),
            region: "US".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub api_url: String,
    pub poll_timeout_seconds: u64,
}

impl TelegramConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: "https://api.telegram.org".to_string(),
            poll_timeout_seconds: 30,
        }
    }
}

/// Incoming user event, already stripped of transport details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Command { user: UserId, command: Command },
    Interaction(Interaction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Reconfigure,
    News,
    Help,
}

impl Command {
    /// Parses message text such as `/start`, `/news@SomeBot` or `/settings now`.
    /// Anything that is not a known command reads as `Help`.
    pub fn parse(text: &str) -> Command {
        let word = text.split_whitespace().next().unwrap_or("");
        let name = word
            .strip_prefix('/')
            .map(|name| name.split('@').next().unwrap_or(name))
            .unwrap_or("");
        match name.to_ascii_lowercase().as_str() {
            "start" => Command::Start,
            "reconfigure" | "settings" => Command::Reconfigure,
            "news" => Command::News,
            _ => Command::Help,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Telegram API error: {description}")]
    Telegram { description: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
