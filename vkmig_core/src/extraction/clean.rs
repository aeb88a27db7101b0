//! Text cleaning applied before any location matching.

use regex::Regex;

use crate::error::{Error, Result};

/// Fragments replaced by a single space, in application order.
const STRIP_PATTERNS: &[(&str, &str)] = &[
    ("html_tag", r"<[^>]+>"),
    ("url", r"https?://\S+"),
    ("www", r"www\.\S+"),
    ("email", r"\S+@\S+\.\S+"),
    // Long runs of digits, brackets, dashes and spaces: phone numbers.
    ("phone", r"\+?[0-9()\-\s]{10,}"),
];

/// Strips markup, links, e-mail addresses and phone numbers, then collapses
/// whitespace.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    steps: Vec<Regex>,
    whitespace: Regex,
}

impl TextCleaner {
    /// # Errors
    /// Fails only if one of the built-in patterns does not compile.
    pub fn new() -> Result<Self> {
        let steps = STRIP_PATTERNS
            .iter()
            .map(|(name, pattern)| Regex::new(pattern).map_err(|e| Error::pattern(*name, e)))
            .collect::<Result<Vec<_>>>()?;
        let whitespace = Regex::new(r"\s+").map_err(|e| Error::pattern("whitespace", e))?;

        Ok(Self { steps, whitespace })
    }

    #[must_use]
    pub fn clean(&self, text: &str) -> String {
        let mut cleaned = text.to_string();
        for step in &self.steps {
            cleaned = step.replace_all(&cleaned, " ").into_owned();
        }
        self.collapse_whitespace(&cleaned)
    }

    /// Collapse every whitespace run to one space and trim the ends.
    #[must_use]
    pub fn collapse_whitespace(&self, text: &str) -> String {
        self.whitespace.replace_all(text, " ").trim().to_string()
    }

    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn cleaner() -> TextCleaner {
        TextCleaner::new().expect("cleaner patterns should compile")
    }

    #[test]
    fn test_strips_html_tags() {
        assert_eq!(
            cleaner().clean("<p>Концерт в <b>Казани</b></p>"),
            "Концерт в Казани"
        );
    }

    #[test]
    fn test_strips_urls_and_emails() {
        let cleaned = cleaner().clean(
            "Подробнее: https://vk.com/event1 или www.example.ru, пишите info@example.ru",
        );
        assert_eq!(cleaned, "Подробнее: или пишите");
    }

    #[test]
    fn test_strips_phone_numbers() {
        let cleaned = cleaner().clean("Звоните +7 (912) 345-67-89 в Перми");
        assert!(!cleaned.contains("345"));
        assert!(cleaned.ends_with("в Перми"));
    }

    #[test]
    fn test_short_numbers_survive() {
        assert_eq!(cleaner().clean("ул. Ленина, д. 5"), "ул. Ленина, д. 5");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(cleaner().clean("  Тула \n\t  Тверь  "), "Тула Тверь");
        assert_eq!(cleaner().clean("   "), "");
    }
}
