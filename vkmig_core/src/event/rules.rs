//! Decision table combining signals into the event verdict.
//!
//! A text is an event when any row fires. New event genres are new rows.

use serde::{Deserialize, Serialize};

use super::signals::{Signal, SignalSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleCondition {
    /// Every signal in `all` is true and, unless `any` is empty, at least
    /// one signal in `any` is true.
    AllAny { all: Vec<Signal>, any: Vec<Signal> },
    /// At least `min` of the listed signals are true.
    AtLeast { min: usize, of: Vec<Signal> },
}

/// One named row of the decision table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRule {
    pub name: String,
    pub condition: RuleCondition,
}

impl EventRule {
    #[must_use]
    pub fn all_any(name: impl Into<String>, all: &[Signal], any: &[Signal]) -> Self {
        Self {
            name: name.into(),
            condition: RuleCondition::AllAny {
                all: all.to_vec(),
                any: any.to_vec(),
            },
        }
    }

    #[must_use]
    pub fn at_least(name: impl Into<String>, min: usize, of: &[Signal]) -> Self {
        Self {
            name: name.into(),
            condition: RuleCondition::AtLeast {
                min,
                of: of.to_vec(),
            },
        }
    }

    #[must_use]
    pub fn matches(&self, signals: &SignalSet) -> bool {
        match &self.condition {
            RuleCondition::AllAny { all, any } => {
                all.iter().all(|s| signals.get(*s))
                    && (any.is_empty() || any.iter().any(|s| signals.get(*s)))
            }
            RuleCondition::AtLeast { min, of } => signals.count_of(of) >= *min,
        }
    }
}

/// The built-in rows.
///
/// * `classic`: keywords with a date, time or place.
/// * `nightlife`: time and contact with a price or programme.
/// * `programme`: programme and time with a contact or price.
/// * `venue`: keywords, time and price.
/// * `many_signals`: three of keywords, time, contact, price, programme.
#[must_use]
pub fn default_rules() -> Vec<EventRule> {
    use Signal::{Contact, Date, Keywords, Location, Price, Program, Time};

    vec![
        EventRule::all_any("classic", &[Keywords], &[Date, Time, Location]),
        EventRule::all_any("nightlife", &[Time, Contact], &[Price, Program]),
        EventRule::all_any("programme", &[Program, Time], &[Contact, Price]),
        EventRule::all_any("venue", &[Keywords, Time, Price], &[]),
        EventRule::at_least("many_signals", 3, &[Keywords, Time, Contact, Price, Program]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(active: &[Signal]) -> SignalSet {
        let mut set = SignalSet::default();
        for signal in active {
            set.set(*signal, true);
        }
        set
    }

    fn fired(active: &[Signal]) -> Vec<String> {
        let set = signals(active);
        default_rules()
            .into_iter()
            .filter(|rule| rule.matches(&set))
            .map(|rule| rule.name)
            .collect()
    }

    #[test]
    fn test_no_signals_no_rules() {
        assert!(fired(&[]).is_empty());
    }

    #[test]
    fn test_classic_needs_a_companion_signal() {
        assert!(fired(&[Signal::Keywords]).is_empty());
        assert_eq!(fired(&[Signal::Keywords, Signal::Date]), vec!["classic"]);
        assert_eq!(fired(&[Signal::Keywords, Signal::Location]), vec!["classic"]);
    }

    #[test]
    fn test_nightlife_and_programme() {
        assert_eq!(
            fired(&[Signal::Time, Signal::Contact, Signal::Program]),
            vec!["nightlife", "programme", "many_signals"]
        );
        assert!(fired(&[Signal::Time, Signal::Contact]).is_empty());
    }

    #[test]
    fn test_venue() {
        assert_eq!(
            fired(&[Signal::Keywords, Signal::Time, Signal::Price]),
            vec!["classic", "venue", "many_signals"]
        );
    }

    #[test]
    fn test_many_signals_without_date_time_or_place() {
        assert_eq!(
            fired(&[Signal::Keywords, Signal::Contact, Signal::Price]),
            vec!["many_signals"]
        );
    }

    #[test]
    fn test_date_and_location_do_not_count_towards_many_signals() {
        assert!(fired(&[Signal::Date, Signal::Location, Signal::Contact]).is_empty());
    }

    #[test]
    fn test_rules_serialize_with_kind_tag() {
        let json = serde_json::to_value(EventRule::at_least("x", 2, &[Signal::Time]))
            .unwrap_or_default();
        assert_eq!(json["condition"]["kind"], "at_least");
        assert_eq!(json["condition"]["of"][0], "time");
    }
}
