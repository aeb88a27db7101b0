#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

//! Text enrichment for migrated social-media records: canonical cities and
//! street addresses extracted from free text, plus an event-invitation flag.

mod enricher;
pub mod error;
pub mod event;
pub mod extraction;
pub mod gazetteer;

pub use enricher::{Enricher, Enrichment};
pub use error::{Error, Result};
pub use event::{
    BatchAnalysis, ClassifierConfig, EventAnalysis, EventClassifier, EventRule, Signal, SignalSet,
};
pub use extraction::{
    DetailedExtraction, ExtractionResult, ExtractorConfig, ExtractorStats, LocationExtractor,
};
pub use gazetteer::{CityEntry, Gazetteer, GazetteerData, fold_key};
