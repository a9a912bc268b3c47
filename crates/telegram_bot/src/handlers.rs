//! Update dispatch: the registration state machine.
//!
//! [`handle_update`] is transport-free. It consults the store and the
//! per-chat conversation state and returns the outbound calls to make; the
//! run loop delivers them through the retry wrapper. Rules are checked in a
//! fixed order and the first match wins, so an admin who is mid-registration
//! and sends `/start` is routed by the `/start` rule, not the username rule.

use teloxide::types::ChatId;
use waitlist::{
    DEFAULT_CREDENTIAL_LENGTH, Entry, Waitlist, WaitlistError, generate_credential,
    normalize_username,
};

use crate::{
    state::{Conversation, StateStore},
    texts,
};

/// One inbound chat message, reduced to the fields dispatch needs.
#[derive(Clone, Debug)]
pub(crate) struct Inbound {
    pub chat_id: ChatId,
    pub user_id: i64,
    pub text: String,
    pub private: bool,
}

/// Which persistent reply keyboard to attach to an outbound text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Menu {
    User,
    Admin,
}

/// An outbound call the run loop should make.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Text {
        chat_id: ChatId,
        text: String,
        menu: Option<Menu>,
    },
    Document {
        chat_id: ChatId,
        filename: &'static str,
        content: String,
        caption: &'static str,
    },
}

fn reply(chat_id: ChatId, text: impl Into<String>) -> Outcome {
    Outcome::Text {
        chat_id,
        text: text.into(),
        menu: None,
    }
}

fn reply_with_menu(chat_id: ChatId, text: impl Into<String>, menu: Menu) -> Outcome {
    Outcome::Text {
        chat_id,
        text: text.into(),
        menu: Some(menu),
    }
}

/// Routes one inbound message to a registration outcome.
///
/// A store error aborts processing of this update only; the caller logs it
/// and moves on to the next update.
pub(crate) async fn handle_update(
    store: &Waitlist,
    states: &StateStore,
    msg: &Inbound,
) -> Result<Vec<Outcome>, WaitlistError> {
    // Group and channel traffic gets a fixed notice, before any store access.
    if !msg.private {
        return Ok(vec![reply(msg.chat_id, texts::PRIVATE_ONLY)]);
    }

    let text = msg.text.trim();
    let mut is_admin = store.is_admin(msg.user_id).await?;
    let entry = store.find_entry(msg.user_id).await?;

    if text == "/start" {
        states.clear(msg.chat_id).await;
        let mut out = Vec::new();

        if store.admin_count().await? == 0 && store.promote_to_admin(msg.user_id).await? {
            is_admin = true;
            out.push(reply(msg.chat_id, texts::FIRST_ADMIN));
        }

        if is_admin && entry.is_some() {
            out.push(reply_with_menu(msg.chat_id, texts::ADMIN_MENU, Menu::Admin));
            return Ok(out);
        }

        if entry.is_some() {
            out.push(reply_with_menu(msg.chat_id, texts::WELCOME_BACK, Menu::User));
            return Ok(out);
        }

        states.set(msg.chat_id, Conversation::AwaitingUsername).await;
        out.push(reply(msg.chat_id, texts::ASK_USERNAME));
        return Ok(out);
    }

    if entry.is_some() && text == texts::COMING_SOON_BUTTON {
        return Ok(vec![reply(msg.chat_id, texts::COMING_SOON_RESPONSE)]);
    }

    if is_admin && text == texts::ADMIN_DOWNLOAD_BUTTON {
        let entries = store.export_all_ordered().await?;
        return Ok(vec![Outcome::Document {
            chat_id: msg.chat_id,
            filename: texts::EXPORT_FILENAME,
            content: render_export(&entries),
            caption: texts::EXPORT_CAPTION,
        }]);
    }

    if states.get(msg.chat_id).await == Some(Conversation::AwaitingUsername) && !text.is_empty() {
        let Some(normalized) = normalize_username(text) else {
            return Ok(vec![reply(msg.chat_id, texts::USERNAME_INVALID)]);
        };

        if store.find_entry_by_username(&normalized).await?.is_some() {
            return Ok(vec![reply(msg.chat_id, texts::USERNAME_TAKEN)]);
        }

        let credential = generate_credential(DEFAULT_CREDENTIAL_LENGTH);
        match store.register(msg.user_id, &normalized, &credential).await {
            Ok(_) => {
                states.clear(msg.chat_id).await;
                return Ok(vec![reply_with_menu(
                    msg.chat_id,
                    texts::registered(&normalized, &credential),
                    Menu::User,
                )]);
            }
            // Lost the race between the uniqueness check and the insert.
            Err(WaitlistError::Conflict(_)) => {
                return Ok(vec![reply(msg.chat_id, texts::USERNAME_TAKEN)]);
            }
            Err(err) => return Err(err),
        }
    }

    // No matching rule: ignore the message. Deliberate, not an omission.
    Ok(Vec::new())
}

/// Renders the export artifact: one registrant per line, 1-indexed,
/// oldest first.
fn render_export(entries: &[Entry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}. {} {}", i + 1, e.wanted_username, e.credential))
        .collect::<Vec<_>>()
        .join("\n")
}
