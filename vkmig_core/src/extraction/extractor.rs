use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use super::addresses::AddressMatcher;
use super::cities::CityMatcher;
use super::clean::TextCleaner;
use crate::error::Result;
use crate::gazetteer::Gazetteer;

const fn default_min_text_chars() -> usize {
    3
}

const fn default_min_address_chars() -> usize {
    5
}

const fn default_min_fallback_word_chars() -> usize {
    3
}

/// Length thresholds for extraction. Lengths count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Cleaned text shorter than this yields an empty result.
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,
    /// Cleaned address candidates shorter than this are dropped.
    #[serde(default = "default_min_address_chars")]
    pub min_address_chars: usize,
    /// Shortest standalone word looked up in the gazetteer.
    #[serde(default = "default_min_fallback_word_chars")]
    pub min_fallback_word_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_text_chars: default_min_text_chars(),
            min_address_chars: default_min_address_chars(),
            min_fallback_word_chars: default_min_fallback_word_chars(),
        }
    }
}

/// Cities (canonical names) and addresses found in one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub cities: BTreeSet<String>,
    pub addresses: BTreeSet<String>,
}

impl ExtractionResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty() && self.addresses.is_empty()
    }
}

/// Extraction result plus the numbers behind it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedExtraction {
    pub cities: BTreeSet<String>,
    pub addresses: BTreeSet<String>,
    pub text_length: usize,
    pub cleaned_text_length: usize,
    pub cities_found: usize,
    pub addresses_found: usize,
    pub patterns_used: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorStats {
    pub total_cities: usize,
    pub total_aliases: usize,
    pub city_patterns: usize,
    pub address_patterns: usize,
}

/// City and address extractor.
///
/// Holds the shared gazetteer and every compiled pattern. Extraction takes
/// `&self` and allocates only its result, so one extractor can serve any
/// number of threads.
#[derive(Debug, Clone)]
pub struct LocationExtractor {
    gazetteer: Arc<Gazetteer>,
    cleaner: TextCleaner,
    cities: CityMatcher,
    addresses: AddressMatcher,
    config: ExtractorConfig,
}

impl LocationExtractor {
    /// Compile all patterns for `gazetteer`.
    ///
    /// # Errors
    /// Fails if a pattern cannot be compiled.
    pub fn new(gazetteer: Arc<Gazetteer>, config: ExtractorConfig) -> Result<Self> {
        let cleaner = TextCleaner::new()?;
        let cities = CityMatcher::new(&gazetteer)?;
        let addresses = AddressMatcher::new()?;

        debug!(
            "Location extractor ready: {} cities, {} city patterns, {} address patterns",
            gazetteer.len(),
            cities.pattern_count(),
            addresses.pattern_count()
        );

        Ok(Self {
            gazetteer,
            cleaner,
            cities,
            addresses,
            config,
        })
    }

    /// Extractor over the built-in gazetteer with default thresholds.
    ///
    /// # Errors
    /// Fails if the built-in data or a pattern is invalid.
    pub fn with_defaults() -> Result<Self> {
        Self::new(Gazetteer::builtin()?, ExtractorConfig::default())
    }

    #[must_use]
    pub fn extract(&self, text: &str) -> ExtractionResult {
        if text.trim().is_empty() {
            return ExtractionResult::default();
        }
        let cleaned = self.cleaner.clean(text);
        self.extract_cleaned(&cleaned)
    }

    fn extract_cleaned(&self, cleaned: &str) -> ExtractionResult {
        if cleaned.chars().count() < self.config.min_text_chars {
            return ExtractionResult::default();
        }

        ExtractionResult {
            cities: self.cities.find(
                cleaned,
                &self.gazetteer,
                self.config.min_fallback_word_chars,
            ),
            addresses: self.addresses.find(cleaned, self.config.min_address_chars),
        }
    }

    /// Cities and addresses as sorted vectors.
    #[must_use]
    pub fn extract_locations_and_addresses(&self, text: &str) -> (Vec<String>, Vec<String>) {
        let result = self.extract(text);
        (
            result.cities.into_iter().collect(),
            result.addresses.into_iter().collect(),
        )
    }

    #[must_use]
    pub fn analyze_detailed(&self, text: &str) -> DetailedExtraction {
        if text.trim().is_empty() {
            return DetailedExtraction::default();
        }

        let cleaned = self.cleaner.clean(text);
        let result = self.extract_cleaned(&cleaned);

        DetailedExtraction {
            cities_found: result.cities.len(),
            addresses_found: result.addresses.len(),
            cities: result.cities,
            addresses: result.addresses,
            text_length: text.chars().count(),
            cleaned_text_length: cleaned.chars().count(),
            patterns_used: self.cities.pattern_count() + self.addresses.pattern_count(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> ExtractorStats {
        ExtractorStats {
            total_cities: self.gazetteer.len(),
            total_aliases: self.gazetteer.alias_count(),
            city_patterns: self.cities.pattern_count(),
            address_patterns: self.addresses.pattern_count(),
        }
    }

    #[must_use]
    pub fn gazetteer(&self) -> &Arc<Gazetteer> {
        &self.gazetteer
    }
}
