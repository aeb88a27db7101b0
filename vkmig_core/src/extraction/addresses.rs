//! Street address detection.

use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// Street-type markers: (name, marker alternation, accepts an apartment suffix).
const STREET_TYPES: &[(&str, &str, bool)] = &[
    ("street", r"ул\.|улица", true),
    ("avenue", r"пр\.|проспект", true),
    ("lane", r"пер\.|переулок", true),
    ("square", r"пл\.|площадь", false),
    ("boulevard", r"б-р|бульвар", true),
    ("embankment", r"наб\.|набережная", true),
    ("highway", r"ш\.|шоссе", true),
    ("territory", r"тер\.|территория", false),
    ("microdistrict", r"мкр\.|микрорайон", true),
];

/// Any street-type marker, for the unanchored patterns.
const ANY_MARKER: &str = r"(?:ул\.|улица|пр\.|проспект|пер\.|переулок|пл\.|площадь|б-р|бульвар|наб\.|набережная|ш\.|шоссе)";

const STREET_NAME: &str = r"[А-Яа-яёЁ\s\d\-\.]+";
const HOUSE_SUFFIX: &str = r"(?:,?\s*д\.?\s*\d+[а-я]?)?";
const FLAT_SUFFIX: &str = r"(?:,?\s*кв\.?\s*\d+)?";

/// Bare building number: "д. 15", "д.3а корп. 2 стр. 1, кв. 7".
const BUILDING: &str =
    r"\bд\.?\s*\d+[а-я]?(?:\s*корп\.?\s*\d+)?(?:\s*стр\.?\s*\d+)?(?:,?\s*кв\.?\s*\d+)?";

fn street_pattern(marker: &str, with_flat: bool) -> String {
    let flat = if with_flat { FLAT_SUFFIX } else { "" };
    format!(r"(?:{marker})\s+{STREET_NAME}{HOUSE_SUFFIX}{flat}")
}

/// "Тверская ул. 10": words, then any marker, then the rest.
fn generic_pattern() -> String {
    format!(r"[А-Яа-яёЁ\s]+{ANY_MARKER}[А-Яа-яёЁ\s\d\-\.,]+")
}

/// "123456, Московская область, г. Подольск, ул. Ленина, д. 5".
fn postal_pattern() -> String {
    format!(r"\b\d{{6}}\b[,\s]+[А-Яа-яёЁ\s\d\-\.,]+{ANY_MARKER}[А-Яа-яёЁ\s\d\-\.,]+")
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::pattern(name, e))
}

/// Trim surrounding commas, dots and whitespace, collapse inner whitespace and
/// reject fragments that are too short or purely numeric.
#[must_use]
pub fn clean_address(raw: &str, min_chars: usize) -> Option<String> {
    let trimmed = raw.trim_matches(|c: char| c == ',' || c == '.' || c.is_whitespace());
    let address = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");

    if address.chars().count() < min_chars || address.chars().all(char::is_numeric) {
        return None;
    }
    Some(address)
}

/// The fixed family of address patterns.
#[derive(Debug, Clone)]
pub struct AddressMatcher {
    patterns: Vec<(String, Regex)>,
}

impl AddressMatcher {
    /// # Errors
    /// Fails only if one of the built-in patterns does not compile.
    pub fn new() -> Result<Self> {
        let mut patterns = Vec::with_capacity(STREET_TYPES.len() + 3);

        for (name, marker, with_flat) in STREET_TYPES {
            let pattern = street_pattern(marker, *with_flat);
            patterns.push(((*name).to_string(), compile(name, &pattern)?));
        }
        patterns.push(("building".to_string(), compile("building", BUILDING)?));
        patterns.push(("generic".to_string(), compile("generic", &generic_pattern())?));
        patterns.push(("postal".to_string(), compile("postal", &postal_pattern())?));

        Ok(Self { patterns })
    }

    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn pattern_names(&self) -> Vec<&str> {
        self.patterns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Distinct cleaned addresses found in already-cleaned text.
    #[must_use]
    pub fn find(&self, text: &str, min_chars: usize) -> BTreeSet<String> {
        self.patterns
            .iter()
            .flat_map(|(_, regex)| regex.find_iter(text))
            .filter_map(|m| clean_address(m.as_str(), min_chars))
            .collect()
    }
}
