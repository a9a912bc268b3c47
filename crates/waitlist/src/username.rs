use std::sync::LazyLock;

use regex::Regex;

// 5-32 chars, must start with a letter, alphanumeric + underscore,
// optional leading @.
static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^@?([a-zA-Z][a-zA-Z0-9_]{4,31})$").expect("username pattern compiles")
});

/// Validates and canonicalizes a user-submitted handle.
///
/// Returns the lower-cased, `@`-prefixed form, or `None` when the trimmed
/// input does not match the pattern. The check is purely lexical; the
/// store decides whether the handle is still free.
pub fn normalize_username(raw: &str) -> Option<String> {
    let caps = USERNAME_RE.captures(raw.trim())?;
    Some(format!("@{}", caps[1].to_ascii_lowercase()))
}
