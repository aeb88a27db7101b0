//! Single entry point the ingestion pipeline calls per record.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::event::{ClassifierConfig, EventAnalysis, EventClassifier};
use crate::extraction::{ExtractorConfig, LocationExtractor};
use crate::gazetteer::Gazetteer;

/// Everything derived from one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    pub cities: Vec<String>,
    pub addresses: Vec<String>,
    pub is_event: bool,
}

/// Location extractor and event classifier behind one handle.
#[derive(Debug, Clone)]
pub struct Enricher {
    extractor: LocationExtractor,
    classifier: EventClassifier,
}

impl Enricher {
    #[must_use]
    pub const fn new(extractor: LocationExtractor, classifier: EventClassifier) -> Self {
        Self {
            extractor,
            classifier,
        }
    }

    /// # Errors
    /// Fails if a pattern cannot be compiled.
    pub fn from_parts(
        gazetteer: Arc<Gazetteer>,
        extractor_config: ExtractorConfig,
        classifier_config: &ClassifierConfig,
    ) -> Result<Self> {
        Ok(Self::new(
            LocationExtractor::new(gazetteer, extractor_config)?,
            EventClassifier::new(classifier_config)?,
        ))
    }

    /// Built-in gazetteer and tables.
    ///
    /// # Errors
    /// Fails only if the built-in data is invalid.
    pub fn builtin() -> Result<Self> {
        Self::from_parts(
            Gazetteer::builtin()?,
            ExtractorConfig::default(),
            &ClassifierConfig::default(),
        )
    }

    /// Gazetteer loaded from a JSON file, built-in classifier tables.
    ///
    /// # Errors
    /// Fails if the file cannot be read or parsed, or a pattern cannot be
    /// compiled.
    pub fn from_gazetteer_path(path: &Path, extractor_config: ExtractorConfig) -> Result<Self> {
        Self::from_parts(
            Arc::new(Gazetteer::from_path(path)?),
            extractor_config,
            &ClassifierConfig::default(),
        )
    }

    #[must_use]
    pub fn extract_locations_and_addresses(&self, text: &str) -> (Vec<String>, Vec<String>) {
        self.extractor.extract_locations_and_addresses(text)
    }

    #[must_use]
    pub fn is_event_invitation(&self, text: &str) -> bool {
        self.classifier.is_event_invitation(text)
    }

    #[must_use]
    pub fn get_event_analysis(&self, text: &str) -> EventAnalysis {
        self.classifier.classify(text)
    }

    #[must_use]
    pub fn enrich(&self, text: &str) -> Enrichment {
        let (cities, addresses) = self.extract_locations_and_addresses(text);
        Enrichment {
            cities,
            addresses,
            is_event: self.is_event_invitation(text),
        }
    }

    #[must_use]
    pub const fn extractor(&self) -> &LocationExtractor {
        &self.extractor
    }

    #[must_use]
    pub const fn classifier(&self) -> &EventClassifier {
        &self.classifier
    }
}
