pub mod types;
pub mod traits;
pub mod fetcher;
pub mod parser;
pub mod sources;
pub mod preferences;
pub mod session;
pub mod digest;
pub mod render;
pub mod keyboard;
pub mod handlers;
pub mod scheduler;
pub mod telegram;
pub mod poller;
pub mod health;

pub use types::*;
pub use traits::{BotTransport, NewsSource};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use sources::GoogleNewsSource;
pub use preferences::PreferenceStore;
pub use session::{CommitOutcome, SessionStore};
pub use digest::DigestFetcher;
pub use render::DigestRenderer;
pub use handlers::Dispatcher;
pub use scheduler::{DailySchedule, Scheduler};
pub use telegram::TelegramClient;
pub use poller::Poller;
