use chrono::{DateTime, Utc};
use std::fmt;

/// Identity of one end user. For private chats this is also the chat to
/// deliver into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of news categories a user may subscribe to.
///
/// Declaration order is the menu order and the order a committed
/// selection is stored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    Technology,
    Business,
    Sports,
    Science,
    Health,
    Entertainment,
    Politics,
    Crypto,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::Technology,
        Topic::Business,
        Topic::Sports,
        Topic::Science,
        Topic::Health,
        Topic::Entertainment,
        Topic::Politics,
        Topic::Crypto,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Topic::Technology => "Technology",
            Topic::Business => "Business",
            Topic::Sports => "Sports",
            Topic::Science => "Science",
            Topic::Health => "Health",
            Topic::Entertainment => "Entertainment",
            Topic::Politics => "Politics",
            Topic::Crypto => "Crypto",
        }
    }

    /// Search query sent to the feed source for this topic.
    pub fn query(&self) -> &'static str {
        self.label()
    }

    pub fn from_label(label: &str) -> Option<Topic> {
        let label = label.trim();
        Topic::ALL
            .into_iter()
            .find(|topic| topic.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One raw entry returned by a feed source.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// A headline selected for a digest.
#[derive(Clone, Debug, PartialEq)]
pub struct Article {
    pub topic: Topic,
    pub heading: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
}

impl Article {
    /// Entries without a publish date rank below everything dated.
    pub fn from_feed_item(topic: Topic, item: FeedItem) -> Self {
        Self {
            topic,
            heading: item.title,
            url: item.link,
            published_at: item.published_at.unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }
}

const TOGGLE_PREFIX: &str = "toggle:";
const COMMIT_ID: &str = "commit";

/// What a menu button asks for. Encoded into the opaque action id the
/// transport hands back on a press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Toggle(Topic),
    Commit,
}

impl Action {
    pub fn encode(&self) -> String {
        match self {
            Action::Toggle(topic) => format!("{}{}", TOGGLE_PREFIX, topic.label()),
            Action::Commit => COMMIT_ID.to_owned(),
        }
    }

    pub fn decode(id: &str) -> Option<Action> {
        if id == COMMIT_ID {
            return Some(Action::Commit);
        }
        id.strip_prefix(TOGGLE_PREFIX)
            .and_then(Topic::from_label)
            .map(Action::Toggle)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub action: Action,
}

/// Rows of buttons attached to a menu message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }
}

/// Handle to a message already shown to a user, used to edit it in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageRef {
    pub chat: UserId,
    pub message_id: i64,
}

/// A button press delivered by the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interaction {
    pub id: String,
    pub user: UserId,
    pub message: Option<MessageRef>,
    pub action_id: String,
}
