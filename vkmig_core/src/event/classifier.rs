use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::patterns;
use super::rules::{EventRule, default_rules};
use super::signals::{Signal, SignalDetector, SignalSet};
use crate::error::Result;

/// Keyword lists and pattern families used by [`EventClassifier`].
///
/// Every field defaults to the built-in table, so a partial JSON object only
/// overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub invitation_keywords: Vec<String>,
    pub location_keywords: Vec<String>,
    pub service_keywords: Vec<String>,
    pub date_patterns: Vec<String>,
    pub time_patterns: Vec<String>,
    pub contact_patterns: Vec<String>,
    pub price_patterns: Vec<String>,
    pub program_patterns: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            invitation_keywords: patterns::invitation_keywords(),
            location_keywords: patterns::location_keywords(),
            service_keywords: patterns::service_keywords(),
            date_patterns: patterns::date_patterns(),
            time_patterns: patterns::time_patterns(),
            contact_patterns: patterns::contact_patterns(),
            price_patterns: patterns::price_patterns(),
            program_patterns: patterns::program_patterns(),
        }
    }
}

/// Why a text was or was not judged an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAnalysis {
    pub is_event: bool,
    pub signals: SignalSet,
    /// Invitation keywords present in the text, in keyword-list order.
    pub matched_keywords: Vec<String>,
    /// Names of the decision rows that fired.
    pub matched_rules: Vec<String>,
    /// Venue or service vocabulary present. Does not affect `is_event`.
    pub has_service_keywords: bool,
}

/// Verdict counts over a batch of posts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchAnalysis {
    pub total_posts: usize,
    pub event_posts: usize,
    pub regular_posts: usize,
    pub event_percentage: f64,
    /// `(post_id, is_event)` in input order.
    pub analyzed: Vec<(i64, bool)>,
}

/// Event-invitation classifier.
///
/// Seven signal detectors feed a decision table. All patterns are compiled
/// in [`EventClassifier::new`]; classification itself is allocation-light and
/// never fails.
#[derive(Debug, Clone)]
pub struct EventClassifier {
    detectors: Vec<(Signal, SignalDetector)>,
    service: SignalDetector,
    rules: Vec<EventRule>,
}

impl EventClassifier {
    /// Compile the detectors described by `config` and use the built-in rules.
    ///
    /// # Errors
    /// Fails if any pattern does not compile.
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let detectors = vec![
            (
                Signal::Keywords,
                SignalDetector::keywords(&config.invitation_keywords),
            ),
            (
                Signal::Date,
                SignalDetector::patterns("date", &config.date_patterns)?,
            ),
            (
                Signal::Time,
                SignalDetector::patterns("time", &config.time_patterns)?,
            ),
            (
                Signal::Location,
                SignalDetector::keywords(&config.location_keywords),
            ),
            (
                Signal::Contact,
                SignalDetector::patterns("contact", &config.contact_patterns)?,
            ),
            (
                Signal::Price,
                SignalDetector::patterns("price", &config.price_patterns)?,
            ),
            (
                Signal::Program,
                SignalDetector::patterns("program", &config.program_patterns)?,
            ),
        ];

        let classifier = Self {
            detectors,
            service: SignalDetector::keywords(&config.service_keywords),
            rules: default_rules(),
        };

        debug!(
            "Event classifier ready: {} detector entries, {} rules",
            classifier
                .detectors
                .iter()
                .map(|(_, d)| d.len())
                .sum::<usize>(),
            classifier.rules.len()
        );

        Ok(classifier)
    }

    /// Classifier over the built-in tables.
    ///
    /// # Errors
    /// Fails only if a built-in pattern is invalid.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&ClassifierConfig::default())
    }

    /// Replace the decision table.
    #[must_use]
    pub fn with_rules(mut self, rules: Vec<EventRule>) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn rules(&self) -> &[EventRule] {
        &self.rules
    }

    /// Evaluate a single signal.
    #[must_use]
    pub fn detect(&self, signal: Signal, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.detector(signal)
            .is_some_and(|detector| detector.matches(text, &lower))
    }

    fn detector(&self, signal: Signal) -> Option<&SignalDetector> {
        self.detectors
            .iter()
            .find(|(s, _)| *s == signal)
            .map(|(_, detector)| detector)
    }

    fn signals(&self, text: &str, lower: &str) -> SignalSet {
        let mut set = SignalSet::default();
        for (signal, detector) in &self.detectors {
            set.set(*signal, detector.matches(text, lower));
        }
        set
    }

    /// Full diagnostic analysis. Empty text is never an event.
    #[must_use]
    pub fn classify(&self, text: &str) -> EventAnalysis {
        if text.is_empty() {
            return EventAnalysis::default();
        }

        let lower = text.to_lowercase();
        let signals = self.signals(text, &lower);
        let matched_rules: Vec<String> = self
            .rules
            .iter()
            .filter(|rule| rule.matches(&signals))
            .map(|rule| rule.name.clone())
            .collect();

        EventAnalysis {
            is_event: !matched_rules.is_empty(),
            signals,
            matched_keywords: self
                .detector(Signal::Keywords)
                .map(|detector| detector.matched_keywords(&lower))
                .unwrap_or_default(),
            matched_rules,
            has_service_keywords: self.service.matches(text, &lower),
        }
    }

    #[must_use]
    pub fn is_event_invitation(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let lower = text.to_lowercase();
        let signals = self.signals(text, &lower);
        self.rules.iter().any(|rule| rule.matches(&signals))
    }

    /// Classify `(post_id, text)` pairs in parallel.
    #[must_use]
    pub fn analyze_batch(&self, posts: &[(i64, String)]) -> BatchAnalysis {
        let analyzed: Vec<(i64, bool)> = posts
            .par_iter()
            .map(|(post_id, text)| (*post_id, self.is_event_invitation(text)))
            .collect();

        let total_posts = analyzed.len();
        let event_posts = analyzed.iter().filter(|(_, is_event)| *is_event).count();
        let event_percentage = if total_posts == 0 {
            0.0
        } else {
            event_posts as f64 / total_posts as f64 * 100.0
        };

        BatchAnalysis {
            total_posts,
            event_posts,
            regular_posts: total_posts - event_posts,
            event_percentage,
            analyzed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn classifier() -> EventClassifier {
        EventClassifier::with_defaults().expect("default classifier should build")
    }

    #[test]
    fn test_empty_text_is_not_an_event() {
        let classifier = classifier();
        assert_eq!(classifier.classify(""), EventAnalysis::default());
        assert!(!classifier.is_event_invitation(""));
    }

    #[test]
    fn test_whitespace_has_no_signals() {
        let analysis = classifier().classify("   ");
        assert!(!analysis.is_event);
        assert!(analysis.signals.active().is_empty());
    }

    #[test]
    fn test_classic_invitation() {
        let analysis = classifier().classify("Приглашаем на концерт 25 декабря 2024 в 19:00");
        assert!(analysis.is_event);
        assert!(analysis.signals.has_keywords);
        assert!(analysis.signals.has_date);
        assert!(analysis.signals.has_time);
        assert!(analysis.matched_rules.contains(&"classic".to_string()));
        assert_eq!(
            analysis.matched_keywords,
            vec!["приглашаем".to_string(), "концерт".to_string()]
        );
    }

    #[test]
    fn test_three_signals_without_date_or_place() {
        let analysis = classifier().classify("Регистрация по телефону 77-95-76, участие 500 руб");
        assert!(analysis.signals.has_keywords);
        assert!(analysis.signals.has_contact);
        assert!(analysis.signals.has_price);
        assert!(!analysis.signals.has_date);
        assert!(!analysis.signals.has_time);
        assert!(!analysis.signals.has_location);
        assert!(analysis.is_event);
        assert_eq!(analysis.matched_rules, vec!["many_signals".to_string()]);
    }

    #[test]
    fn test_nightlife_lineup() {
        let text = "23:00 Lacoste / Raimov. Фамилии присылайте заранее";
        let classifier = classifier();
        assert!(classifier.detect(Signal::Program, text));
        assert!(classifier.detect(Signal::Time, text));
        assert!(classifier.detect(Signal::Contact, text));
        assert!(classifier.is_event_invitation(text));
    }

    #[test]
    fn test_bare_city_is_not_an_event() {
        let analysis = classifier().classify("Красноярск");
        assert!(!analysis.is_event);
        assert!(analysis.signals.active().is_empty());
        assert!(analysis.matched_keywords.is_empty());
    }

    #[test]
    fn test_keywords_signal() {
        let classifier = classifier();
        assert!(classifier.detect(Signal::Keywords, "Приглашаем друзей"));
        assert!(!classifier.detect(Signal::Keywords, "Просто фото"));
    }

    #[test]
    fn test_date_signal() {
        let classifier = classifier();
        for text in [
            "25.12.2024",
            "6-го июня, пятница",
            "Открытие: суббота, 14 сентября",
            "Увидимся завтра",
            "Сегодня играем",
            "Планы на выходные",
        ] {
            assert!(classifier.detect(Signal::Date, text), "{text}");
        }
        assert!(!classifier.detect(Signal::Date, "Отчёт о проделанной работе"));
        assert!(!classifier.detect(Signal::Date, "Пятничный обзор новинок"));
    }

    #[test]
    fn test_time_signal() {
        let classifier = classifier();
        for text in [
            "с 18:00 до 22:00",
            "18:00-22:00",
            "Начало в 19 часов",
            "Танцуем всю ночь",
        ] {
            assert!(classifier.detect(Signal::Time, text), "{text}");
        }
        assert!(!classifier.detect(Signal::Time, "Танцуем до утра"));
        assert!(!classifier.detect(Signal::Time, "Выпуск номер 5"));
    }

    #[test]
    fn test_location_signal() {
        let classifier = classifier();
        for text in ["Собираемся в офисе", "Ул. Ленина, 5", "Созвон в Zoom"] {
            assert!(classifier.detect(Signal::Location, text), "{text}");
        }
        assert!(!classifier.detect(Signal::Location, "Хорошей недели всем"));
        assert!(!classifier.detect(Signal::Location, "Новый выпуск подкаста"));
    }

    #[test]
    fn test_contact_signal() {
        let classifier = classifier();
        for text in ["+7 912 345 67 89", "8 (912) 3456789", "Пишите в директ"] {
            assert!(classifier.detect(Signal::Contact, text), "{text}");
        }
        assert!(!classifier.detect(Signal::Contact, "Пишите в комментариях"));
        assert!(!classifier.detect(Signal::Contact, "Нас уже 1500 человек"));
    }

    #[test]
    fn test_program_signal() {
        let classifier = classifier();
        assert!(classifier.detect(Signal::Program, "Main stage открыт"));
        assert!(!classifier.detect(Signal::Program, "Рассказ о поездке"));
    }

    #[test]
    fn test_price_signal() {
        let classifier = classifier();
        assert!(classifier.detect(Signal::Price, "Бокал вина 250₽ за бокал"));
        assert!(classifier.detect(Signal::Price, "Вход бесплатный"));
        assert!(classifier.detect(Signal::Price, "Вход свободный"));
        assert!(!classifier.detect(Signal::Price, "Цена договорная"));
    }

    #[test]
    fn test_service_keywords_do_not_decide() {
        let analysis = classifier().classify("Уютное кафе у дома");
        assert!(analysis.has_service_keywords);
        assert!(!analysis.is_event);
    }

    #[test]
    fn test_custom_rules() {
        let classifier = classifier().with_rules(vec![EventRule::all_any(
            "keywords_only",
            &[Signal::Keywords],
            &[],
        )]);
        assert_eq!(classifier.rules().len(), 1);
        assert!(classifier.is_event_invitation("Большой концерт"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_partial_config_keeps_builtin_tables() {
        let config: ClassifierConfig =
            serde_json::from_str(r#"{"invitation_keywords": ["сходка"]}"#)
                .expect("partial config should parse");
        assert_eq!(config.invitation_keywords, vec!["сходка".to_string()]);
        assert_eq!(config.time_patterns, patterns::time_patterns());

        let classifier = EventClassifier::new(&config).expect("classifier should build");
        assert!(classifier.detect(Signal::Keywords, "Сходка в субботу"));
        assert!(!classifier.detect(Signal::Keywords, "Приглашаем всех"));
    }

    #[test]
    fn test_analyze_batch_preserves_order() {
        let posts = vec![
            (1, "Приглашаем на концерт в 19:00".to_string()),
            (2, "Просто фото".to_string()),
            (3, String::new()),
            (4, "Регистрация по телефону 77-95-76, участие 500 руб".to_string()),
        ];
        let batch = classifier().analyze_batch(&posts);
        assert_eq!(batch.total_posts, 4);
        assert_eq!(batch.event_posts, 2);
        assert_eq!(batch.regular_posts, 2);
        assert!((batch.event_percentage - 50.0).abs() < f64::EPSILON);
        assert_eq!(
            batch.analyzed,
            vec![(1, true), (2, false), (3, false), (4, true)]
        );
    }

    #[test]
    fn test_analyze_empty_batch() {
        let batch = classifier().analyze_batch(&[]);
        assert_eq!(batch.total_posts, 0);
        assert!(batch.event_percentage.abs() < f64::EPSILON);
    }
}
