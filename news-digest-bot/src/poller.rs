use crate::handlers::Dispatcher;
use crate::telegram::TelegramClient;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Long-polls the Bot API and feeds updates to the dispatcher in arrival order.
pub struct Poller {
    client: Arc<TelegramClient>,
    dispatcher: Arc<Dispatcher>,
    offset: i64,
}

impl Poller {
    pub fn new(client: Arc<TelegramClient>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            client,
            dispatcher,
            offset: 0,
        }
    }

    /// Polls until `shutdown` resolves, then confirms the processed offset so
    /// handled updates are not delivered again.
    pub async fn run_until<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let timeout = self.client.poll_timeout_seconds();

        loop {
            let updates = tokio::select! {
                _ = &mut shutdown => break,
                result = self.client.get_updates(self.offset, timeout) => result,
            };

            match updates {
                Ok(updates) => {
                    for update in updates {
                        self.offset = self.offset.max(update.update_id + 1);
                        let Some(inbound) = update.into_inbound() else {
                            continue;
                        };
                        if let Err(e) = self.dispatcher.handle(inbound).await {
                            error!("Failed to handle update: {}", e);
                        }
                    }
                }
                Err(e) => {
                    warn!("Polling failed, retrying in {:?}: {}", RETRY_DELAY, e);
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(RETRY_DELAY) => {}
                    }
                }
            }
        }

        info!("Stopping update polling");
        if self.offset > 0 {
            if let Err(e) = self.client.get_updates(self.offset, 0).await {
                warn!("Could not confirm update offset {}: {}", self.offset, e);
            }
        }
    }
}
