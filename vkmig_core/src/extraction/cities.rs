//! City detection driven by the gazetteer.

use regex::{Regex, RegexBuilder};
use std::collections::{BTreeSet, HashSet};
use std::ops::Range;

use crate::error::{Error, Result};
use crate::gazetteer::{Gazetteer, fold_key};

/// Compiled program budget for the city alternation. The alternation holds
/// every surface form of the gazetteer and is case-insensitive, so the
/// default limit is too tight for large gazetteers.
const PATTERN_SIZE_LIMIT: usize = 64 * (1 << 20);

/// Context templates; `{cities}` is replaced with the alternation.
const CITY_CONTEXTS: &[(&str, &str)] = &[
    // Bare mention, optionally after "г."
    ("bare", r"\b(?:г\.?\s*)?({cities})\b"),
    // After a locative preposition
    (
        "preposition",
        r"\b(?:в|из|до|от|по|на|под|над|при|около|возле|рядом\s+с)\s+(?:г\.?\s*)?({cities})\b",
    ),
    ("city_marker", r"\b(?:город|гор\.)\s+({cities})\b"),
    (
        "region",
        r"\b({cities})\s*(?:обл\.|область|край|республика|респ\.)",
    ),
    // "Москва, ул. ..."
    ("comma", r"\b({cities})\s*,"),
    ("quoted", r#"["(]({cities})[")\]]"#),
];

/// Standalone Cyrillic words tested against the gazetteer as a fallback.
const FALLBACK_WORD: &str = r"\b[А-Яа-яёЁ\-]+\b";

/// Escape one surface form for the alternation, letting `е` and `ё` match
/// each other.
fn escape_form(form: &str) -> String {
    let mut escaped = String::with_capacity(form.len() * 2);
    let mut buf = [0_u8; 4];
    for c in form.chars() {
        match c {
            'е' | 'ё' | 'Е' | 'Ё' => escaped.push_str("[её]"),
            _ => escaped.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    escaped
}

/// Every surface form of the gazetteer, longest first.
///
/// Leftmost-first alternation picks the first alternative that matches, so
/// this ordering is what makes "Нижний Новгород" win over "Новгород".
#[must_use]
pub fn ordered_forms(gazetteer: &Gazetteer) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut forms: Vec<&str> = gazetteer
        .surface_forms()
        .iter()
        .map(String::as_str)
        .filter(|form| seen.insert(fold_key(form)))
        .collect();

    forms.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    forms
}

#[must_use]
pub fn build_alternation(gazetteer: &Gazetteer) -> String {
    ordered_forms(gazetteer)
        .into_iter()
        .map(escape_form)
        .collect::<Vec<_>>()
        .join("|")
}

/// Contextual city patterns plus the fallback word scanner.
#[derive(Debug, Clone)]
pub struct CityMatcher {
    contexts: Vec<Regex>,
    word: Regex,
}

impl CityMatcher {
    /// # Errors
    /// Fails if a pattern does not compile within the size budget.
    pub fn new(gazetteer: &Gazetteer) -> Result<Self> {
        let alternation = build_alternation(gazetteer);

        let contexts = CITY_CONTEXTS
            .iter()
            .map(|(name, template)| {
                let pattern = template.replace("{cities}", &alternation);
                RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .size_limit(PATTERN_SIZE_LIMIT)
                    .dfa_size_limit(PATTERN_SIZE_LIMIT)
                    .build()
                    .map_err(|e| Error::pattern(*name, e))
            })
            .collect::<Result<Vec<_>>>()?;

        let word = Regex::new(FALLBACK_WORD).map_err(|e| Error::pattern("fallback_word", e))?;

        Ok(Self { contexts, word })
    }

    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.contexts.len()
    }

    /// Canonical cities mentioned in already-cleaned text.
    ///
    /// Fallback words that sit inside a longer span captured by a contextual
    /// pattern are not looked up on their own.
    #[must_use]
    pub fn find(
        &self,
        text: &str,
        gazetteer: &Gazetteer,
        min_word_chars: usize,
    ) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut claimed: Vec<Range<usize>> = Vec::new();

        for pattern in &self.contexts {
            for caps in pattern.captures_iter(text) {
                let Some(capture) = caps.get(1) else {
                    continue;
                };
                if let Some(city) = gazetteer.normalize(capture.as_str()) {
                    found.insert(city.to_string());
                    claimed.push(capture.range());
                }
            }
        }

        for word in self.word.find_iter(text) {
            if word.as_str().chars().count() < min_word_chars {
                continue;
            }
            let inside_longer = claimed.iter().any(|span| {
                span.start <= word.start() && word.end() <= span.end && span.len() > word.len()
            });
            if inside_longer {
                continue;
            }
            if let Some(city) = gazetteer.normalize(word.as_str()) {
                found.insert(city.to_string());
            }
        }

        found
    }
}
