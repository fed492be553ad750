use crate::traits::BotTransport;
use crate::types::{
    BotError, Command, Inbound, InlineKeyboard, Interaction, MessageRef, Result, TelegramConfig,
    UserId,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

impl Message {
    fn reference(&self) -> MessageRef {
        MessageRef {
            chat: UserId(self.chat.id),
            message_id: self.message_id,
        }
    }
}

impl Update {
    /// Maps the update onto a bot event. Updates the bot does not react to
    /// (stickers, edits, joins) yield `None`.
    pub fn into_inbound(self) -> Option<Inbound> {
        if let Some(query) = self.callback_query {
            return Some(Inbound::Interaction(Interaction {
                id: query.id,
                user: UserId(query.from.id),
                message: query.message.as_ref().map(Message::reference),
                action_id: query.data.unwrap_or_default(),
            }));
        }

        let message = self.message?;
        let text = message.text?;
        Some(Inbound::Command {
            user: UserId(message.chat.id),
            command: Command::parse(&text),
        })
    }
}

fn keyboard_markup(keyboard: &InlineKeyboard) -> Value {
    let rows: Vec<Vec<Value>> = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| {
                    json!({
                        "text": button.label,
                        "callback_data": button.action.encode(),
                    })
                })
                .collect()
        })
        .collect();
    json!({ "inline_keyboard": rows })
}

/// Bot API client over plain HTTPS.
pub struct TelegramClient {
    client: Client,
    config: TelegramConfig,
}

impl TelegramClient {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        // Long polls hold the request open for the poll timeout.
        let client = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_seconds + 10))
            .build()?;
        Ok(Self { client, config })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.token,
            method
        )
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: Value) -> Result<T> {
        debug!("Calling Telegram method {}", method);

        let response = self
            .client
            .post(self.method_url(method))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        let payload: ApiResponse<T> = serde_json::from_slice(&body)?;

        if !payload.ok {
            return Err(BotError::Telegram {
                description: payload
                    .description
                    .unwrap_or_else(|| format!("HTTP {}", status)),
            });
        }
        payload
            .result
            .ok_or_else(|| BotError::General(format!("{} returned no result", method)))
    }

    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", json!({})).await
    }

    pub async fn get_updates(&self, offset: i64, timeout_seconds: u64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            json!({
                "offset": offset,
                "timeout": timeout_seconds,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    pub fn poll_timeout_seconds(&self) -> u64 {
        self.config.poll_timeout_seconds
    }
}

#[async_trait]
impl BotTransport for TelegramClient {
    async fn send_text(&self, chat: UserId, text: &str) -> Result<()> {
        let _: Message = self
            .call(
                "sendMessage",
                json!({
                    "chat_id": chat.0,
                    "text": text,
                    "parse_mode": "HTML",
                    "link_preview_options": { "is_disabled": true },
                }),
            )
            .await?;
        Ok(())
    }

    async fn send_menu(&self, chat: UserId, text: &str, keyboard: &InlineKeyboard) -> Result<MessageRef> {
        let message: Message = self
            .call(
                "sendMessage",
                json!({
                    "chat_id": chat.0,
                    "text": text,
                    "reply_markup": keyboard_markup(keyboard),
                }),
            )
            .await?;
        Ok(message.reference())
    }

    async fn update_menu(&self, message: &MessageRef, keyboard: &InlineKeyboard) -> Result<()> {
        let _: Value = self
            .call(
                "editMessageReplyMarkup",
                json!({
                    "chat_id": message.chat.0,
                    "message_id": message.message_id,
                    "reply_markup": keyboard_markup(keyboard),
                }),
            )
            .await?;
        Ok(())
    }

    async fn replace_text(&self, message: &MessageRef, text: &str) -> Result<()> {
        let _: Value = self
            .call(
                "editMessageText",
                json!({
                    "chat_id": message.chat.0,
                    "message_id": message.message_id,
                    "text": text,
                }),
            )
            .await?;
        Ok(())
    }

    async fn answer_interaction(&self, interaction_id: &str, notice: Option<&str>) -> Result<()> {
        let mut body = json!({ "callback_query_id": interaction_id });
        if let Some(notice) = notice {
            body["text"] = json!(notice);
            body["show_alert"] = json!(false);
        }
        let _: bool = self.call("answerCallbackQuery", body).await?;
        Ok(())
    }
}
