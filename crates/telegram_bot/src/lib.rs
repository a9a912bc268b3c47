//! Long-polling Telegram front end for the waitlist.
//!
//! The bot pulls updates with `getUpdates` rather than a webhook, routes
//! each private message through the registration state machine, and sends
//! the resulting replies. Every outbound API call goes through the retry
//! wrapper in [`caller`], so a blocked user or a flaky connection never
//! takes the polling loop down.

mod caller;
mod handlers;
mod state;
mod texts;

use std::time::Duration;

use teloxide::{
    payloads::{GetUpdatesSetters, SendDocumentSetters, SendMessageSetters},
    requests::Requester,
    types::{InputFile, KeyboardButton, KeyboardMarkup, ParseMode, UpdateKind},
};
use waitlist::Waitlist;

use crate::{
    caller::{Caller, RetryPolicy},
    handlers::{Inbound, Menu, Outcome, handle_update},
    state::StateStore,
};

/// Pause before re-polling when `getUpdates` itself gives up.
const POLL_RECOVERY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("telegram rejected the bot token")]
    Authentication,
}

pub struct Bot {
    token: String,
    polling_timeout: u32,
}

#[derive(Default)]
pub struct BotBuilder {
    token: String,
    polling_timeout: Option<u32>,
}

impl BotBuilder {
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Long-poll timeout in seconds. Defaults to 30.
    pub fn polling_timeout(mut self, seconds: u32) -> Self {
        self.polling_timeout = Some(seconds);
        self
    }

    pub fn build(self) -> Bot {
        Bot {
            token: self.token,
            polling_timeout: self.polling_timeout.unwrap_or(30),
        }
    }
}

impl Bot {
    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    /// Polls for updates until the process is stopped.
    ///
    /// Fails fast if the token is rejected; after that, errors are absorbed
    /// per update and the loop keeps running.
    pub async fn run(&self, store: Waitlist) -> Result<(), BotError> {
        let api = teloxide::Bot::new(&self.token);
        let caller = Caller::new(RetryPolicy::default());
        let states = StateStore::default();

        let me = caller
            .call("get_me", || api.get_me())
            .await
            .ok_or(BotError::Authentication)?;
        tracing::info!("@{} is polling for updates", me.username());

        let timeout = self.polling_timeout;
        let mut offset: Option<i32> = None;

        loop {
            let batch = caller
                .call("get_updates", || {
                    let mut req = api.get_updates().timeout(timeout);
                    if let Some(offset) = offset {
                        req = req.offset(offset);
                    }
                    req
                })
                .await;

            let Some(updates) = batch else {
                tokio::time::sleep(POLL_RECOVERY_DELAY).await;
                continue;
            };

            for update in updates {
                // Confirm the update even if we end up ignoring it.
                offset = Some(update.id.0 as i32 + 1);

                let UpdateKind::Message(message) = update.kind else {
                    continue;
                };
                let Some(from) = &message.from else {
                    continue;
                };

                let inbound = Inbound {
                    chat_id: message.chat.id,
                    user_id: from.id.0 as i64,
                    text: message.text().unwrap_or_default().trim().to_string(),
                    private: message.chat.is_private(),
                };

                match handle_update(&store, &states, &inbound).await {
                    Ok(outcomes) => {
                        for outcome in outcomes {
                            deliver(&api, &caller, outcome).await;
                        }
                    }
                    Err(err) => {
                        tracing::error!("dropping update {}: {err}", update.id.0);
                    }
                }
            }
        }
    }
}

async fn deliver(api: &teloxide::Bot, caller: &Caller, outcome: Outcome) {
    match outcome {
        Outcome::Text {
            chat_id,
            text,
            menu,
        } => {
            caller
                .call("send_message", || {
                    let mut req = api
                        .send_message(chat_id, text.clone())
                        .parse_mode(ParseMode::Html);
                    if let Some(menu) = menu {
                        req = req.reply_markup(keyboard(menu));
                    }
                    req
                })
                .await;
        }
        Outcome::Document {
            chat_id,
            filename,
            content,
            caption,
        } => {
            caller
                .call("send_document", || {
                    let file = InputFile::memory(content.clone().into_bytes()).file_name(filename);
                    api.send_document(chat_id, file).caption(caption)
                })
                .await;
        }
    }
}

/// Single-button persistent reply keyboard for the given menu.
fn keyboard(menu: Menu) -> KeyboardMarkup {
    let label = match menu {
        Menu::User => texts::COMING_SOON_BUTTON,
        Menu::Admin => texts::ADMIN_DOWNLOAD_BUTTON,
    };
    KeyboardMarkup::new([[KeyboardButton::new(label)]]).resize_keyboard()
}
