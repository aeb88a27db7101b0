//! Event-invitation classification.
//!
//! Seven independent signal detectors (keywords, date, time, location,
//! contact, price, programme) feed a small decision table; a post is an event
//! invitation when any row of the table fires.

pub mod classifier;
pub mod patterns;
pub mod rules;
pub mod signals;

pub use classifier::{BatchAnalysis, ClassifierConfig, EventAnalysis, EventClassifier};
pub use rules::{EventRule, RuleCondition, default_rules};
pub use signals::{Signal, SignalDetector, SignalSet};
