//! Independent boolean signals feeding the event decision.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One feature of a post that hints at an event announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Invitation or event vocabulary ("приглашаем", "концерт").
    Keywords,
    /// Dates, weekdays, "завтра", "выходные".
    Date,
    /// Clock times, ranges, "всю ночь".
    Time,
    /// Place words and meeting platforms.
    Location,
    /// Phone numbers, "присылайте", "в директ".
    Contact,
    /// Prices and free entry.
    Price,
    /// Programme lines, stages, performer line-ups.
    Program,
}

impl Signal {
    pub const ALL: [Self; 7] = [
        Self::Keywords,
        Self::Date,
        Self::Time,
        Self::Location,
        Self::Contact,
        Self::Price,
        Self::Program,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Keywords => "keywords",
            Self::Date => "date",
            Self::Time => "time",
            Self::Location => "location",
            Self::Contact => "contact",
            Self::Price => "price",
            Self::Program => "program",
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values of all seven signals for one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "One flag per signal is the diagnostic shape"
)]
pub struct SignalSet {
    pub has_keywords: bool,
    pub has_date: bool,
    pub has_time: bool,
    pub has_location: bool,
    pub has_contact: bool,
    pub has_price: bool,
    pub has_program: bool,
}

impl SignalSet {
    #[must_use]
    pub const fn get(&self, signal: Signal) -> bool {
        match signal {
            Signal::Keywords => self.has_keywords,
            Signal::Date => self.has_date,
            Signal::Time => self.has_time,
            Signal::Location => self.has_location,
            Signal::Contact => self.has_contact,
            Signal::Price => self.has_price,
            Signal::Program => self.has_program,
        }
    }

    pub fn set(&mut self, signal: Signal, value: bool) {
        let slot = match signal {
            Signal::Keywords => &mut self.has_keywords,
            Signal::Date => &mut self.has_date,
            Signal::Time => &mut self.has_time,
            Signal::Location => &mut self.has_location,
            Signal::Contact => &mut self.has_contact,
            Signal::Price => &mut self.has_price,
            Signal::Program => &mut self.has_program,
        };
        *slot = value;
    }

    /// Signals that are true, in [`Signal::ALL`] order.
    #[must_use]
    pub fn active(&self) -> Vec<Signal> {
        Signal::ALL
            .into_iter()
            .filter(|signal| self.get(*signal))
            .collect()
    }

    #[must_use]
    pub fn count_of(&self, signals: &[Signal]) -> usize {
        signals.iter().filter(|signal| self.get(**signal)).count()
    }
}

/// How one signal is detected.
#[derive(Debug, Clone)]
pub enum SignalDetector {
    /// Substring membership in the lower-cased text.
    Keywords(Vec<String>),
    /// Any case-insensitive regex match in the original text.
    Patterns(Vec<Regex>),
}

impl SignalDetector {
    /// Keyword detector; keywords are lower-cased and deduplicated, keeping
    /// their first position.
    #[must_use]
    pub fn keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !unique.contains(&keyword) {
                unique.push(keyword);
            }
        }
        Self::Keywords(unique)
    }

    /// Compile a pattern family.
    ///
    /// # Errors
    /// Fails on the first pattern that does not compile.
    pub fn patterns<I, S>(name: &str, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        patterns
            .into_iter()
            .enumerate()
            .map(|(i, pattern)| {
                RegexBuilder::new(pattern.as_ref())
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| Error::pattern(format!("{name}[{i}]"), e))
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::Patterns)
    }

    /// `lower` must be `text.to_lowercase()`.
    #[must_use]
    pub fn matches(&self, text: &str, lower: &str) -> bool {
        match self {
            Self::Keywords(keywords) => keywords.iter().any(|k| lower.contains(k.as_str())),
            Self::Patterns(patterns) => patterns.iter().any(|p| p.is_match(text)),
        }
    }

    /// Keywords present in `lower`, in list order. Empty for pattern detectors.
    #[must_use]
    pub fn matched_keywords(&self, lower: &str) -> Vec<String> {
        match self {
            Self::Keywords(keywords) => keywords
                .iter()
                .filter(|k| lower.contains(k.as_str()))
                .cloned()
                .collect(),
            Self::Patterns(_) => Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Keywords(keywords) => keywords.len(),
            Self::Patterns(patterns) => patterns.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_set_get_and_set() {
        let mut set = SignalSet::default();
        assert!(set.active().is_empty());

        set.set(Signal::Time, true);
        set.set(Signal::Price, true);
        assert!(set.get(Signal::Time));
        assert!(!set.get(Signal::Date));
        assert_eq!(set.active(), vec![Signal::Time, Signal::Price]);
        assert_eq!(set.count_of(&[Signal::Time, Signal::Contact, Signal::Price]), 2);
    }

    #[test]
    fn test_keyword_detector_dedups_and_lowercases() {
        let detector = SignalDetector::keywords(["Концерт", "концерт", " ", "вход"]);
        assert_eq!(detector.len(), 2);
        let text = "Большой КОНЦЕРТ";
        assert!(detector.matches(text, &text.to_lowercase()));
        assert_eq!(
            detector.matched_keywords(&text.to_lowercase()),
            vec!["концерт".to_string()]
        );
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_pattern_detector_is_case_insensitive() {
        let detector =
            SignalDetector::patterns("stage", [r"\bmain\s+stage\b"]).expect("pattern should compile");
        let text = "MAIN STAGE";
        assert!(detector.matches(text, &text.to_lowercase()));
        assert!(detector.matched_keywords("main stage").is_empty());
    }

    #[test]
    fn test_invalid_pattern_names_its_position() {
        let err = SignalDetector::patterns("date", [r"\d+", r"(unclosed"]);
        assert!(matches!(err, Err(Error::Pattern { name, .. }) if name == "date[1]"));
    }

    #[test]
    fn test_signal_names() {
        assert_eq!(Signal::Keywords.to_string(), "keywords");
        assert_eq!(
            serde_json::to_string(&Signal::Program).unwrap_or_default(),
            "\"program\""
        );
    }
}
