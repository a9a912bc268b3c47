//! User-facing message catalog (English).
//!
//! Outbound texts use Telegram HTML markup; anything interpolated from
//! user-controlled or generated data goes through [`html_escape`].

pub(crate) const PRIVATE_ONLY: &str =
    "🔒 This bot only works in private chats. Please message me directly!";

pub(crate) const ASK_USERNAME: &str = "✨ What <b>username</b> would you like for our platform?\n\n\
     📝 Use 5–32 characters: letters, numbers, underscore\n\
     💡 Example: <code>myusername</code>";

pub(crate) const USERNAME_INVALID: &str = "⚠️ Invalid username.\n\n\
     Use 5–32 characters: letters, numbers, underscore only.\n\
     💡 Example: <code>myusername</code>";

pub(crate) const USERNAME_TAKEN: &str =
    "❌ That username is already taken.\n\n👉 Please choose another one!";

pub(crate) const WELCOME_BACK: &str = "👋 Welcome back! You're already on the waitlist.";

pub(crate) const COMING_SOON_BUTTON: &str = "🚀 Coming soon";

pub(crate) const COMING_SOON_RESPONSE: &str = "🌐 <b>We're almost ready to launch!</b>\n\n\
     Your spot on the waitlist is secured. Early registrants get launch-day \
     perks, and we'll message you here the moment the doors open.";

pub(crate) const FIRST_ADMIN: &str = "👑 You're the first user, so you're now admin!\n\n\
     👇 Choose your username below to join the waitlist.";

pub(crate) const ADMIN_MENU: &str =
    "🔐 <b>Admin menu</b>\n\nUse the keyboard below to manage the waitlist.";

pub(crate) const ADMIN_DOWNLOAD_BUTTON: &str = "📥 Download users .txt file";

pub(crate) const EXPORT_FILENAME: &str = "users.txt";

pub(crate) const EXPORT_CAPTION: &str = "📋 Waitlist users export (oldest first)";

pub(crate) fn registered(username: &str, credential: &str) -> String {
    format!(
        "🎉 <b>{}</b> is on the list!\n\n\
         🔑 Your credential: <code>{}</code>\n\
         Keep it safe, you'll need it when the platform launches.",
        html_escape(username),
        html_escape(credential),
    )
}

/// Escapes text for Telegram HTML parse mode.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_handles_markup_characters() {
        assert_eq!(html_escape("a&b<c>d"), "a&amp;b&lt;c&gt;d");
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn registered_escapes_credential() {
        let text = registered("@alice", "p&s<w>d");
        assert!(text.contains("<code>p&amp;s&lt;w&gt;d</code>"));
        assert!(text.contains("<b>@alice</b>"));
    }
}
