//! City gazetteer: canonical city names plus alias normalization.
//!
//! The gazetteer is built once and never mutated afterwards, so a single
//! instance is shared (behind an `Arc`) by every extraction call.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Error, Result};

const BUILTIN_CITIES: &str = include_str!("../data/cities.json");

static BUILTIN: OnceCell<Arc<Gazetteer>> = OnceCell::new();

/// One canonical city and the surface forms that resolve to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityEntry {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl CityEntry {
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }
}

/// On-disk layout of a gazetteer file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GazetteerData {
    pub cities: Vec<CityEntry>,
}

/// Lookup key used for every comparison: lower-cased, `ё` folded to `е`.
#[must_use]
pub fn fold_key(s: &str) -> String {
    s.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ё' { 'е' } else { c })
        .collect()
}

/// Immutable city gazetteer.
#[derive(Debug)]
pub struct Gazetteer {
    /// Canonical names in load order.
    cities: Vec<String>,
    /// Every canonical name and alias as written in the source data.
    surface_forms: Vec<String>,
    /// Folded surface form -> index into `cities`.
    lookup: HashMap<String, usize>,
    alias_count: usize,
}

impl Gazetteer {
    /// Build a gazetteer from entries.
    ///
    /// # Errors
    /// Fails when there are no cities, when a canonical name repeats, or when
    /// a surface form would resolve to two different cities.
    pub fn new(entries: Vec<CityEntry>) -> Result<Self> {
        let mut cities: Vec<String> = Vec::with_capacity(entries.len());
        let mut surface_forms = Vec::new();
        let mut lookup: HashMap<String, usize> = HashMap::new();
        let mut alias_count = 0;

        for entry in entries {
            let name = entry.name.trim();
            if name.is_empty() {
                continue;
            }

            let index = cities.len();
            let name_key = fold_key(name);
            if let Some(&existing) = lookup.get(&name_key) {
                let owner = &cities[existing];
                if fold_key(owner) == name_key {
                    return Err(Error::DuplicateCity(name.to_string()));
                }
                return Err(Error::AliasConflict {
                    alias: name.to_string(),
                    existing: owner.clone(),
                    conflicting: name.to_string(),
                });
            }

            lookup.insert(name_key, index);
            cities.push(name.to_string());
            surface_forms.push(name.to_string());

            for alias in &entry.aliases {
                let alias = alias.trim();
                if alias.is_empty() {
                    continue;
                }
                let key = fold_key(alias);
                match lookup.get(&key) {
                    // Same city spelled twice (e.g. "СПб" and "СПБ").
                    Some(&existing) if existing == index => {}
                    Some(&existing) => {
                        return Err(Error::AliasConflict {
                            alias: alias.to_string(),
                            existing: cities[existing].clone(),
                            conflicting: name.to_string(),
                        });
                    }
                    None => {
                        lookup.insert(key, index);
                        surface_forms.push(alias.to_string());
                        alias_count += 1;
                    }
                }
            }
        }

        if cities.is_empty() {
            return Err(Error::EmptyGazetteer);
        }

        debug!(
            "Gazetteer built: {} cities, {} aliases",
            cities.len(),
            alias_count
        );

        Ok(Self {
            cities,
            surface_forms,
            lookup,
            alias_count,
        })
    }

    /// Parse a gazetteer from its JSON form.
    ///
    /// # Errors
    /// Fails on malformed JSON or on any error [`Gazetteer::new`] reports.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: GazetteerData = serde_json::from_str(json)?;
        Self::new(data.cities)
    }

    /// Load a gazetteer file.
    ///
    /// # Errors
    /// Fails when the file cannot be read or does not hold a valid gazetteer.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::GazetteerIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// The built-in Russian city gazetteer, parsed once per process.
    ///
    /// # Errors
    /// Only fails if the embedded data is itself invalid.
    pub fn builtin() -> Result<Arc<Self>> {
        BUILTIN
            .get_or_try_init(|| Self::from_json(BUILTIN_CITIES).map(Arc::new))
            .cloned()
    }

    /// Resolve a candidate (canonical name or alias, any case) to its
    /// canonical city name.
    #[must_use]
    pub fn normalize(&self, candidate: &str) -> Option<&str> {
        self.lookup
            .get(&fold_key(candidate))
            .map(|&index| self.cities[index].as_str())
    }

    #[must_use]
    pub fn contains(&self, candidate: &str) -> bool {
        self.lookup.contains_key(&fold_key(candidate))
    }

    /// Canonical city names in load order.
    #[must_use]
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Canonical names followed by their aliases, as written in the source.
    #[must_use]
    pub fn surface_forms(&self) -> &[String] {
        &self.surface_forms
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    #[must_use]
    pub const fn alias_count(&self) -> usize {
        self.alias_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn sample() -> Gazetteer {
        Gazetteer::new(vec![
            CityEntry::new("Москва", ["Москве", "Мск"]),
            CityEntry::new("Орёл", ["Орла"]),
            CityEntry::new("Санкт-Петербург", ["СПб", "Питер", "СПБ"]),
        ])
        .expect("sample gazetteer should build")
    }

    #[test]
    fn test_normalize_canonical_and_alias() {
        let gazetteer = sample();
        assert_eq!(gazetteer.normalize("Москва"), Some("Москва"));
        assert_eq!(gazetteer.normalize("Москве"), Some("Москва"));
        assert_eq!(gazetteer.normalize("мск"), Some("Москва"));
        assert_eq!(gazetteer.normalize("ПИТЕР"), Some("Санкт-Петербург"));
    }

    #[test]
    fn test_normalize_folds_yo() {
        let gazetteer = sample();
        assert_eq!(gazetteer.normalize("Орел"), Some("Орёл"));
        assert_eq!(gazetteer.normalize("ОРЁЛ"), Some("Орёл"));
    }

    #[test]
    fn test_normalize_unknown() {
        let gazetteer = sample();
        assert_eq!(gazetteer.normalize("Атлантида"), None);
        assert_eq!(gazetteer.normalize(""), None);
        assert!(!gazetteer.contains("Мос"));
    }

    #[test]
    fn test_same_city_alias_repeat_is_ignored() {
        let gazetteer = sample();
        // "СПб" and "СПБ" fold to the same key.
        assert_eq!(gazetteer.alias_count(), 5);
        assert_eq!(gazetteer.len(), 3);
    }

    #[test]
    fn test_empty_gazetteer_rejected() {
        assert!(matches!(
            Gazetteer::new(Vec::new()),
            Err(Error::EmptyGazetteer)
        ));
        assert!(matches!(
            Gazetteer::new(vec![CityEntry::new("  ", Vec::<String>::new())]),
            Err(Error::EmptyGazetteer)
        ));
    }

    #[test]
    fn test_duplicate_city_rejected() {
        let result = Gazetteer::new(vec![
            CityEntry::new("Тула", ["Туле"]),
            CityEntry::new("ТУЛА", Vec::<String>::new()),
        ]);
        assert!(matches!(result, Err(Error::DuplicateCity(name)) if name == "ТУЛА"));
    }

    #[test]
    fn test_alias_conflict_rejected() {
        let result = Gazetteer::new(vec![
            CityEntry::new("Ростов-на-Дону", ["Ростов"]),
            CityEntry::new("Ростов Великий", ["Ростов"]),
        ]);
        match result {
            Err(Error::AliasConflict {
                alias,
                existing,
                conflicting,
            }) => {
                assert_eq!(alias, "Ростов");
                assert_eq!(existing, "Ростов-на-Дону");
                assert_eq!(conflicting, "Ростов Великий");
            }
            other => panic!("expected alias conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_canonical_name_colliding_with_alias_rejected() {
        let result = Gazetteer::new(vec![
            CityEntry::new("Великий Новгород", ["Новгород"]),
            CityEntry::new("Новгород", Vec::<String>::new()),
        ]);
        assert!(matches!(result, Err(Error::AliasConflict { .. })));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_builtin_gazetteer() {
        let gazetteer = Gazetteer::builtin().expect("built-in gazetteer should load");
        assert!(gazetteer.len() > 50);
        assert_eq!(
            gazetteer.normalize("Нижнем Новгороде"),
            Some("Нижний Новгород")
        );
        assert_eq!(gazetteer.normalize("спб"), Some("Санкт-Петербург"));

        // Shared instance.
        let again = Gazetteer::builtin().expect("built-in gazetteer should load");
        assert!(Arc::ptr_eq(&gazetteer, &again));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_every_surface_form_resolves_to_a_canonical_city() {
        let gazetteer = Gazetteer::builtin().expect("built-in gazetteer should load");
        for form in gazetteer.surface_forms() {
            let city = gazetteer
                .normalize(form)
                .expect("surface form should resolve");
            assert!(gazetteer.cities().iter().any(|c| c == city));
        }
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_from_path() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("cities.json");
        std::fs::write(
            &path,
            r#"{"cities": [{"name": "Тверь", "aliases": ["Твери"]}]}"#,
        )
        .expect("gazetteer file should be written");

        let gazetteer = Gazetteer::from_path(&path).expect("gazetteer file should load");
        assert_eq!(gazetteer.normalize("твери"), Some("Тверь"));

        let missing = Gazetteer::from_path(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(Error::GazetteerIo { .. })));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            Gazetteer::from_json("{\"cities\": 5}"),
            Err(Error::GazetteerJson(_))
        ));
    }
}
