//! Greeting translations for English and Hebrew.
//! Unsupported languages fall back to English; unknown keys fall back to
//! the key itself.

use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const SUPPORTED_LANGS: &[&str] = &["en", "he"];

static MESSAGES: Lazy<HashMap<&'static str, HashMap<&'static str, &'static str>>> =
    Lazy::new(|| {
        let mut greeting = HashMap::new();
        greeting.insert("en", "Hello");
        greeting.insert("he", "שלום");
        let mut messages = HashMap::new();
        messages.insert("greeting", greeting);
        messages
    });

pub fn translate<'a>(key: &'a str, lang: &str) -> &'a str {
    let lang = if SUPPORTED_LANGS.contains(&lang) { lang } else { "en" };
    MESSAGES
        .get(key)
        .and_then(|m| m.get(lang))
        .copied()
        .unwrap_or(key)
}

pub fn direction(lang: &str) -> &'static str {
    if lang == "he" { "rtl" } else { "ltr" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hebrew_greeting_and_direction() {
        assert_eq!(translate("greeting", "he"), "שלום");
        assert_eq!(direction("he"), "rtl");
    }

    #[test]
    fn unsupported_language_falls_back_to_english() {
        assert_eq!(translate("greeting", "fr"), "Hello");
        assert_eq!(direction("fr"), "ltr");
    }

    #[test]
    fn unknown_key_falls_back_to_the_key() {
        assert_eq!(translate("farewell", "en"), "farewell");
    }
}
