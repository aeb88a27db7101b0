//! Location and address extraction.
//!
//! Raw text is cleaned of markup, links and phone numbers, then scanned with
//! gazetteer-driven city patterns and a fixed family of street-address
//! patterns. All patterns are compiled once when the extractor is built.

pub mod addresses;
pub mod cities;
pub mod clean;
pub mod extractor;

pub use extractor::{
    DetailedExtraction, ExtractionResult, ExtractorConfig, ExtractorStats, LocationExtractor,
};
