// Shared fixtures for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use news_digest_bot::{
    BotError, BotTransport, DailySchedule, DigestFetcher, DigestRenderer, Dispatcher, FeedItem,
    InlineKeyboard, MessageRef, NewsSource, PreferenceStore, Result, SessionStore, Topic, UserId,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// 19 October 2026, `hour`:`minute` UTC
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, hour, minute, 0).unwrap()
}

pub fn item(title: &str, published_at: DateTime<Utc>) -> FeedItem {
    FeedItem {
        title: title.to_string(),
        link: format!("https://news.example.com/{}", title.to_lowercase().replace(' ', "-")),
        published_at: Some(published_at),
    }
}

/// `count` items for `topic`, one minute apart, newest first, ending at `latest`.
pub fn items_for(topic: Topic, count: usize, latest: DateTime<Utc>) -> Vec<FeedItem> {
    (0..count)
        .map(|i| item(&format!("{} story {}", topic, i), latest - chrono::Duration::minutes(i as i64)))
        .collect()
}

/// Serves canned answers per topic and records every request.
#[derive(Default)]
pub struct ScriptedSource {
    answers: HashMap<Topic, Vec<FeedItem>>,
    failing: HashSet<Topic>,
    pub requests: Mutex<Vec<(Topic, usize)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, topic: Topic, items: Vec<FeedItem>) -> Self {
        self.answers.insert(topic, items);
        self
    }

    pub fn failing(mut self, topic: Topic) -> Self {
        self.failing.insert(topic);
        self
    }

    pub fn requests(&self) -> Vec<(Topic, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsSource for ScriptedSource {
    fn source_name(&self) -> String {
        "scripted".to_string()
    }

    async fn fetch_topic(&self, topic: Topic, limit: usize) -> Result<Vec<FeedItem>> {
        self.requests.lock().unwrap().push((topic, limit));
        if self.failing.contains(&topic) {
            return Err(BotError::General(format!("{} feed unavailable", topic)));
        }
        Ok(self.answers.get(&topic).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text { chat: UserId, text: String },
    Menu { chat: UserId, text: String, keyboard: InlineKeyboard },
    MenuUpdate { message: MessageRef, keyboard: InlineKeyboard },
    TextReplaced { message: MessageRef, text: String },
    Answer { id: String, notice: Option<String> },
}

/// Transport that records everything instead of talking to a chat platform.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<Sent>>,
    stale_menus: bool,
    unreachable: HashSet<UserId>,
    next_message_id: Mutex<i64>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// In-place edits fail as if the menu message were too old to edit.
    pub fn with_stale_menus(mut self) -> Self {
        self.stale_menus = true;
        self
    }

    /// Deliveries to `user` fail.
    pub fn unreachable(mut self, user: UserId) -> Self {
        self.unreachable.insert(user);
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts_to(&self, user: UserId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { chat, text } if chat == user => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    fn record(&self, sent: Sent) {
        self.sent.lock().unwrap().push(sent);
    }

    fn check_reachable(&self, chat: UserId) -> Result<()> {
        if self.unreachable.contains(&chat) {
            return Err(BotError::Telegram {
                description: "Forbidden: bot was blocked by the user".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BotTransport for RecordingTransport {
    async fn send_text(&self, chat: UserId, text: &str) -> Result<()> {
        self.check_reachable(chat)?;
        self.record(Sent::Text {
            chat,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_menu(&self, chat: UserId, text: &str, keyboard: &InlineKeyboard) -> Result<MessageRef> {
        self.check_reachable(chat)?;
        self.record(Sent::Menu {
            chat,
            text: text.to_string(),
            keyboard: keyboard.clone(),
        });
        let mut next = self.next_message_id.lock().unwrap();
        *next += 1;
        Ok(MessageRef {
            chat,
            message_id: *next,
        })
    }

    async fn update_menu(&self, message: &MessageRef, keyboard: &InlineKeyboard) -> Result<()> {
        if self.stale_menus {
            return Err(BotError::Telegram {
                description: "Bad Request: message can't be edited".to_string(),
            });
        }
        self.record(Sent::MenuUpdate {
            message: message.clone(),
            keyboard: keyboard.clone(),
        });
        Ok(())
    }

    async fn replace_text(&self, message: &MessageRef, text: &str) -> Result<()> {
        if self.stale_menus {
            return Err(BotError::Telegram {
                description: "Bad Request: message can't be edited".to_string(),
            });
        }
        self.record(Sent::TextReplaced {
            message: message.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn answer_interaction(&self, interaction_id: &str, notice: Option<&str>) -> Result<()> {
        self.record(Sent::Answer {
            id: interaction_id.to_string(),
            notice: notice.map(str::to_string),
        });
        Ok(())
    }
}

pub struct Harness {
    pub dispatcher: Dispatcher,
    pub transport: Arc<RecordingTransport>,
    pub source: Arc<ScriptedSource>,
}

pub fn harness(source: ScriptedSource, transport: RecordingTransport) -> Harness {
    let source = Arc::new(source);
    let transport = Arc::new(transport);
    let dispatcher = Dispatcher::new(
        PreferenceStore::new(),
        SessionStore::new(),
        DigestFetcher::new(source.clone()),
        DigestRenderer::new(&DailySchedule::default()),
        transport.clone(),
    );
    Harness {
        dispatcher,
        transport,
        source,
    }
}
