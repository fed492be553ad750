use crate::digest::DigestFetcher;
use crate::keyboard;
use crate::preferences::PreferenceStore;
use crate::render::DigestRenderer;
use crate::session::{CommitOutcome, SessionStore};
use crate::traits::BotTransport;
use crate::types::{Action, Command, Inbound, Interaction, Result, Topic, UserId};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const MENU_PROMPT: &str = "🗞 Choose the topics you want in your digest, then press Save.";
pub const EMPTY_SELECTION_NOTICE: &str = "⚠️ Select at least one topic first.";
pub const NOT_CONFIGURED_MESSAGE: &str =
    "You have not chosen any topics yet. Send /start to set them up.";
pub const HELP_MESSAGE: &str = "I send you a news digest every morning.\n\n\
/start - choose your topics\n\
/reconfigure - change your topics\n\
/news - get your digest now";

/// Routes user events to the stores and runs the digest pipeline.
pub struct Dispatcher {
    preferences: PreferenceStore,
    sessions: SessionStore,
    fetcher: DigestFetcher,
    renderer: DigestRenderer,
    transport: Arc<dyn BotTransport>,
}

impl Dispatcher {
    pub fn new(
        preferences: PreferenceStore,
        sessions: SessionStore,
        fetcher: DigestFetcher,
        renderer: DigestRenderer,
        transport: Arc<dyn BotTransport>,
    ) -> Self {
        Self {
            preferences,
            sessions,
            fetcher,
            renderer,
            transport,
        }
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn handle(&self, inbound: Inbound) -> Result<()> {
        match inbound {
            Inbound::Command { user, command } => self.handle_command(user, command).await,
            Inbound::Interaction(interaction) => self.handle_interaction(interaction).await,
        }
    }

    pub async fn handle_command(&self, user: UserId, command: Command) -> Result<()> {
        debug!("User {} sent {:?}", user, command);
        match command {
            Command::Start | Command::Reconfigure => self.open_menu(user).await,
            Command::News => self.send_digest(user).await,
            Command::Help => self.transport.send_text(user, HELP_MESSAGE).await,
        }
    }

    /// Starts a fresh selection seeded from the user's saved topics and shows the menu.
    pub async fn open_menu(&self, user: UserId) -> Result<()> {
        self.open_session(user).await;
        let selected = self.sessions.current(user).await.unwrap_or_default();
        self.transport
            .send_menu(user, MENU_PROMPT, &keyboard::build(&selected))
            .await?;
        Ok(())
    }

    async fn open_session(&self, user: UserId) {
        let seed = self.preferences.get(user).await.unwrap_or_default();
        self.sessions.open(user, &seed).await;
    }

    pub async fn handle_interaction(&self, interaction: Interaction) -> Result<()> {
        match Action::decode(&interaction.action_id) {
            Some(Action::Toggle(topic)) => self.toggle(&interaction, topic).await,
            Some(Action::Commit) => self.commit(&interaction).await,
            None => {
                warn!(
                    "Ignoring unknown action {:?} from user {}",
                    interaction.action_id, interaction.user
                );
                self.transport.answer_interaction(&interaction.id, None).await
            }
        }
    }

    async fn toggle(&self, interaction: &Interaction, topic: Topic) -> Result<()> {
        let user = interaction.user;
        if !self.sessions.is_open(user).await {
            debug!("No open session for user {}, starting one", user);
            self.open_session(user).await;
        }

        let selected = self.sessions.toggle(user, topic).await;
        debug!("User {} toggled {}: {} selected", user, topic, selected.len());

        if let Some(message) = &interaction.message {
            if let Err(e) = self
                .transport
                .update_menu(message, &keyboard::build(&selected))
                .await
            {
                debug!("Could not refresh menu for user {}: {}", user, e);
            }
        }

        self.transport.answer_interaction(&interaction.id, None).await
    }

    async fn commit(&self, interaction: &Interaction) -> Result<()> {
        let user = interaction.user;
        let topics = match self.sessions.commit(user, &self.preferences).await {
            CommitOutcome::Committed(topics) => topics,
            CommitOutcome::Rejected => {
                return self
                    .transport
                    .answer_interaction(&interaction.id, Some(EMPTY_SELECTION_NOTICE))
                    .await;
            }
        };

        if let Err(e) = self.transport.answer_interaction(&interaction.id, None).await {
            warn!("Could not acknowledge commit for user {}: {}", user, e);
        }

        if let Some(message) = &interaction.message {
            if let Err(e) = self
                .transport
                .replace_text(message, &confirmation(&topics))
                .await
            {
                debug!("Could not replace menu for user {}: {}", user, e);
            }
        }

        self.send_digest(user).await
    }

    /// Fetches, renders and delivers one digest. Shared by `/news`, commit and
    /// the daily run.
    pub async fn send_digest(&self, user: UserId) -> Result<()> {
        let Some(topics) = self.preferences.get(user).await else {
            return self.transport.send_text(user, NOT_CONFIGURED_MESSAGE).await;
        };

        let digest = self.fetcher.fetch(&topics).await;
        let text = self.renderer.render(&digest, &topics);
        self.transport.send_text(user, &text).await?;

        info!("Delivered {} articles to user {}", digest.len(), user);
        Ok(())
    }
}

fn confirmation(topics: &[Topic]) -> String {
    let labels: Vec<&str> = topics.iter().map(Topic::label).collect();
    format!("✅ Saved! Your topics: {}", labels.join(", "))
}
