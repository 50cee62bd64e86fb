//! The [`Vocabulary`] value and its TOML representation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::VocabError;
use crate::types::{Collection, QuantityClass, TemporalAverageType};

/// Bundled vocabulary.
const BUILTIN: &str = include_str!("../data/vocabulary.toml");

/// Metadata for a selectable variable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableSpec {
    /// Display label.
    pub label: String,
    /// CF standard name of the stored data.
    #[serde(default)]
    pub standard_name: Option<String>,
    /// Quantity class used to pick the data variable from a file.
    pub quantity: QuantityClass,
    /// Preferred output unit.
    pub unit: String,
    /// For derived anomaly variables, the absolute variable the anomaly is
    /// computed from.
    #[serde(default)]
    pub absolute: Option<String>,
}

impl VariableSpec {
    /// Returns `true` for derived anomaly variables.
    pub fn is_anomaly(&self) -> bool {
        self.absolute.is_some()
    }
}

/// Per-collection constraints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionSpec {
    /// Display label.
    pub label: String,
    /// Earliest selectable year.
    pub min_year: i32,
    /// Latest selectable year.
    pub max_year: i32,
    /// Spatial representation used when the request names none.
    pub default_resolution: String,
    /// Spatial representations published for the collection.
    pub resolutions: Vec<String>,
    /// Valid ensemble members.
    #[serde(default)]
    pub ensembles: Vec<String>,
}

/// A climatological baseline period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaselineSpec {
    /// First meteorological year.
    pub start_year: i32,
    /// Last meteorological year.
    pub end_year: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBaseline {
    label: String,
    start_year: i32,
    end_year: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct YearBounds {
    min: i32,
    max: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVocabulary {
    year_bounds: YearBounds,
    #[serde(default)]
    terms: BTreeMap<String, BTreeMap<String, String>>,
    time_periods: BTreeMap<String, Vec<String>>,
    variables: BTreeMap<String, VariableSpec>,
    collections: BTreeMap<String, CollectionSpec>,
    baselines: BTreeMap<String, RawBaseline>,
}

/// Immutable controlled vocabulary.
///
/// Maps stored codes to display labels per category, and carries the
/// variable, collection and baseline metadata the validator and resolvers
/// need. Constructed explicitly and shared by reference; there is no global
/// instance.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms: BTreeMap<String, BTreeMap<String, String>>,
    time_periods: BTreeMap<TemporalAverageType, Vec<String>>,
    variables: BTreeMap<String, VariableSpec>,
    collections: BTreeMap<Collection, CollectionSpec>,
    baselines: BTreeMap<String, BaselineSpec>,
    year_bounds: (i32, i32),
}

impl Vocabulary {
    /// The vocabulary bundled with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled file is broken.
    pub fn builtin() -> Result<Self, VocabError> {
        Self::from_toml_str(BUILTIN)
    }

    /// Load a vocabulary file, replacing the bundled terms.
    ///
    /// # Errors
    ///
    /// Returns [`VocabError::Io`] if the file cannot be read, or the errors
    /// of [`from_toml_str`](Self::from_toml_str).
    pub fn from_path(path: &Path) -> Result<Self, VocabError> {
        let text = std::fs::read_to_string(path).map_err(|source| VocabError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse a vocabulary from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`VocabError::Parse`] on malformed TOML or
    /// [`VocabError::Inconsistent`] when sections disagree (a collection
    /// missing, an ensemble without a term, a derived variable pointing at
    /// an unknown absolute variable, ...).
    pub fn from_toml_str(text: &str) -> Result<Self, VocabError> {
        let raw: RawVocabulary = toml::from_str(text)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawVocabulary) -> Result<Self, VocabError> {
        let inconsistent = |reason: String| VocabError::Inconsistent { reason };

        let mut terms = raw.terms;
        for reserved in ["variable", "collection", "baseline"] {
            if terms.contains_key(reserved) {
                return Err(inconsistent(format!(
                    "terms.{reserved} is derived from the [{reserved}s] section"
                )));
            }
        }

        let mut collections = BTreeMap::new();
        for (code, spec) in raw.collections {
            let collection: Collection = code.parse()?;
            if spec.min_year > spec.max_year {
                return Err(inconsistent(format!(
                    "collection {code} has min_year {} > max_year {}",
                    spec.min_year, spec.max_year
                )));
            }
            if !spec.resolutions.contains(&spec.default_resolution) {
                return Err(inconsistent(format!(
                    "collection {code} default resolution {} is not one of its resolutions",
                    spec.default_resolution
                )));
            }
            collections.insert(collection, spec);
        }
        if let Some(missing) = Collection::ALL.iter().find(|c| !collections.contains_key(*c)) {
            return Err(inconsistent(format!("collection {missing} is missing")));
        }

        let ensemble_terms = terms.get("ensemble");
        for (collection, spec) in &collections {
            for member in &spec.ensembles {
                if !ensemble_terms.is_some_and(|t| t.contains_key(member)) {
                    return Err(inconsistent(format!(
                        "ensemble {member} of {collection} has no term"
                    )));
                }
            }
        }

        for (name, spec) in &raw.variables {
            if let Some(abs) = &spec.absolute
                && !raw.variables.contains_key(abs)
            {
                return Err(inconsistent(format!(
                    "variable {name} refers to unknown absolute variable {abs}"
                )));
            }
        }

        let mut time_periods = BTreeMap::new();
        for (code, periods) in raw.time_periods {
            let tat: TemporalAverageType = code.parse()?;
            for p in &periods {
                if !terms.get("time_period").is_some_and(|t| t.contains_key(p)) {
                    return Err(inconsistent(format!(
                        "time period {p} allowed for {tat} has no term"
                    )));
                }
            }
            time_periods.insert(tat, periods);
        }

        let mut baselines = BTreeMap::new();
        let mut baseline_terms = BTreeMap::new();
        for (id, b) in raw.baselines {
            if b.start_year > b.end_year {
                return Err(inconsistent(format!("baseline {id} has an empty year range")));
            }
            baseline_terms.insert(id.clone(), b.label);
            baselines.insert(
                id,
                BaselineSpec {
                    start_year: b.start_year,
                    end_year: b.end_year,
                },
            );
        }

        terms.insert(
            "variable".to_string(),
            raw.variables
                .iter()
                .map(|(k, v)| (k.clone(), v.label.clone()))
                .collect(),
        );
        terms.insert(
            "collection".to_string(),
            collections
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), v.label.clone()))
                .collect(),
        );
        terms.insert("baseline".to_string(), baseline_terms);

        Ok(Self {
            terms,
            time_periods,
            variables: raw.variables,
            collections,
            baselines,
            year_bounds: (raw.year_bounds.min, raw.year_bounds.max),
        })
    }

    // -----------------------------------------------------------------------
    // Term lookups
    // -----------------------------------------------------------------------

    /// Returns `true` if `value` is a term of `category`.
    pub fn contains(&self, category: &str, value: &str) -> bool {
        self.terms
            .get(category)
            .is_some_and(|t| t.contains_key(value))
    }

    /// Display label of a term.
    pub fn label(&self, category: &str, value: &str) -> Option<&str> {
        self.terms.get(category)?.get(value).map(String::as_str)
    }

    /// Reverse lookup: the code whose label is `label` (case-insensitive).
    pub fn value_for_label(&self, category: &str, label: &str) -> Option<&str> {
        self.terms
            .get(category)?
            .iter()
            .find(|(_, l)| l.eq_ignore_ascii_case(label))
            .map(|(v, _)| v.as_str())
    }

    /// All `(code, label)` pairs of a category, ordered by code.
    pub fn terms(&self, category: &str) -> Option<&BTreeMap<String, String>> {
        self.terms.get(category)
    }

    // -----------------------------------------------------------------------
    // Metadata
    // -----------------------------------------------------------------------

    /// Variable metadata.
    pub fn variable(&self, name: &str) -> Option<&VariableSpec> {
        self.variables.get(name)
    }

    /// Derived anomaly variable computed from `absolute`, if any.
    pub fn anomaly_variable(&self, absolute: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(_, spec)| spec.absolute.as_deref() == Some(absolute))
            .map(|(name, _)| name.as_str())
    }

    /// Collection constraints. Present for every [`Collection`].
    pub fn collection(&self, collection: Collection) -> Option<&CollectionSpec> {
        self.collections.get(&collection)
    }

    /// Baseline year range.
    pub fn baseline(&self, id: &str) -> Option<BaselineSpec> {
        self.baselines.get(id).copied()
    }

    /// Baseline ids ordered by start year, earliest first.
    pub fn baselines_by_start(&self) -> Vec<&str> {
        let mut ids: Vec<(&str, BaselineSpec)> =
            self.baselines.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        ids.sort_by_key(|(id, b)| (b.start_year, b.end_year, *id));
        ids.into_iter().map(|(id, _)| id).collect()
    }

    /// Time periods allowed for a temporal average type.
    pub fn time_periods(&self, tat: TemporalAverageType) -> &[String] {
        self.time_periods
            .get(&tat)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Vocabulary-wide `(min, max)` selectable years.
    pub fn year_bounds(&self) -> (i32, i32) {
        self.year_bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> Vocabulary {
        Vocabulary::builtin().unwrap()
    }

    #[test]
    fn builtin_parses() {
        let v = builtin();
        assert_eq!(v.year_bounds(), (1900, 2100));
        assert!(v.contains("scenario", "rcp85"));
        assert!(!v.contains("scenario", "rcp99"));
    }

    #[test]
    fn derived_categories() {
        let v = builtin();
        assert!(v.contains("variable", "tasAnom"));
        assert!(v.contains("collection", "land-cordex"));
        assert_eq!(v.label("baseline", "b8100"), Some("1981-2000"));
    }

    #[test]
    fn reverse_lookup_ignores_case() {
        let v = builtin();
        assert_eq!(v.value_for_label("river", "north west england"), Some("north_west_england"));
        assert_eq!(v.value_for_label("river", "Atlantis"), None);
    }

    #[test]
    fn variable_metadata() {
        let v = builtin();
        let spec = v.variable("prAnom").unwrap();
        assert_eq!(spec.quantity, QuantityClass::PrecipitationRate);
        assert_eq!(spec.absolute.as_deref(), Some("pr"));
        assert!(spec.is_anomaly());
        assert!(!v.variable("tas").unwrap().is_anomaly());
        assert_eq!(v.anomaly_variable("pr"), Some("prAnom"));
        assert_eq!(v.anomaly_variable("prAnom"), None);
    }

    #[test]
    fn every_collection_present() {
        let v = builtin();
        for &c in Collection::ALL {
            assert!(v.collection(c).is_some(), "{c}");
        }
        let rcm = v.collection(Collection::LandRcm).unwrap();
        assert_eq!(rcm.default_resolution, "12km");
        assert_eq!(rcm.ensembles.len(), 12);
    }

    #[test]
    fn baselines_ordered_by_start() {
        assert_eq!(builtin().baselines_by_start(), vec!["b6190", "b8100", "b8110"]);
    }

    #[test]
    fn time_periods_per_type() {
        let v = builtin();
        assert_eq!(v.time_periods(TemporalAverageType::Seasonal).len(), 4);
        assert_eq!(v.time_periods(TemporalAverageType::Daily), ["all"]);
        assert_eq!(v.time_periods(TemporalAverageType::Annual), ["ann"]);
    }

    #[test]
    fn reserved_terms_rejected() {
        let text = format!("{BUILTIN}\n[terms.variable]\ntas = \"x\"\n");
        assert!(matches!(
            Vocabulary::from_toml_str(&text),
            Err(VocabError::Inconsistent { .. }) | Err(VocabError::Parse(_))
        ));
    }

    #[test]
    fn unknown_field_rejected() {
        let text = format!("{BUILTIN}\n[extra]\nkey = 1\n");
        assert!(matches!(
            Vocabulary::from_toml_str(&text),
            Err(VocabError::Parse(_))
        ));
    }
}
