//! The [`InputData`] selection model.

use std::collections::BTreeMap;
use std::sync::Arc;

use ukcp_vocab::{InputType, Vocabulary};

use crate::area::{Area, AreaInput};
use crate::error::InputError;
use crate::value::InputValue;

/// Stored value of one category.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Entry {
    Single {
        value: InputValue,
        label: String,
    },
    Many {
        values: Vec<InputValue>,
        labels: Vec<String>,
    },
}

/// Selection criteria for one request.
///
/// Every value is checked against the vocabulary when it is set, so an
/// `InputData` never holds an unknown term. Categories without a
/// vocabulary (years, counts, flags, ids) are stored as given and labelled
/// with their own text. Cross-field rules are applied by
/// [`validate`](crate::validate).
#[derive(Debug, Clone)]
pub struct InputData {
    vocab: Arc<Vocabulary>,
    entries: BTreeMap<InputType, Entry>,
    area: Option<Area>,
}

impl PartialEq for InputData {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries && self.area == other.area
    }
}

impl InputData {
    /// Empty criteria checked against `vocab`.
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        Self {
            vocab,
            entries: BTreeMap::new(),
            area: None,
        }
    }

    /// The vocabulary values are checked against.
    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocab
    }

    // -----------------------------------------------------------------------
    // Setters
    // -----------------------------------------------------------------------

    /// Set a single-valued category.
    ///
    /// `allowed` narrows the accepted values further; it must not be empty.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Cardinality`] for multi-valued categories,
    /// [`InputError::Inconsistent`] for the area,
    /// [`InputError::EmptyAllowedValues`] for an empty
    /// `allowed`, and [`InputError::InvalidParameter`] for a value outside
    /// the vocabulary or `allowed`.
    pub fn set(
        &mut self,
        category: InputType,
        value: impl Into<InputValue>,
        allowed: Option<&[&str]>,
    ) -> Result<(), InputError> {
        if category.is_multi() {
            return Err(InputError::Cardinality {
                category,
                expected: "many",
            });
        }
        if category == InputType::Area {
            return Err(InputError::inconsistent(category, "areas are set with set_area"));
        }
        let value = value.into();
        let label = self.check(category, &value, allowed)?;
        self.entries.insert(category, Entry::Single { value, label });
        Ok(())
    }

    /// Set a multi-valued category. Either every value is stored or, on
    /// the first invalid value, none is.
    ///
    /// # Errors
    ///
    /// As for [`set`](Self::set), with [`InputError::Cardinality`] for
    /// single-valued categories; an empty `values` is a missing value.
    pub fn set_many<V: Into<InputValue>>(
        &mut self,
        category: InputType,
        values: impl IntoIterator<Item = V>,
        allowed: Option<&[&str]>,
    ) -> Result<(), InputError> {
        if !category.is_multi() {
            return Err(InputError::Cardinality {
                category,
                expected: "one",
            });
        }
        let values: Vec<InputValue> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(InputError::missing(category));
        }
        let labels = values
            .iter()
            .map(|v| self.check(category, v, allowed))
            .collect::<Result<Vec<_>, _>>()?;
        self.entries
            .insert(category, Entry::Many { values, labels });
        Ok(())
    }

    /// Parse and set the area.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Area::parse`].
    pub fn set_area(&mut self, input: &AreaInput) -> Result<(), InputError> {
        self.area = Some(Area::parse(input, &self.vocab)?);
        Ok(())
    }

    /// Remove a category, returning whether it was set.
    pub fn unset(&mut self, category: InputType) -> bool {
        if category == InputType::Area {
            return self.area.take().is_some();
        }
        self.entries.remove(&category).is_some()
    }

    fn check(
        &self,
        category: InputType,
        value: &InputValue,
        allowed: Option<&[&str]>,
    ) -> Result<String, InputError> {
        let text = value.to_string();
        if let Some(allowed) = allowed {
            if allowed.is_empty() {
                return Err(InputError::EmptyAllowedValues { category });
            }
            if !allowed.contains(&text.as_str()) {
                return Err(InputError::invalid(category, &text));
            }
        }
        match category.vocab_category() {
            Some(vocab_category) => self
                .vocab
                .label(vocab_category, &text)
                .map(str::to_string)
                .ok_or_else(|| InputError::invalid(category, &text)),
            None => Ok(text),
        }
    }

    // -----------------------------------------------------------------------
    // Getters
    // -----------------------------------------------------------------------

    /// Returns `true` if the category has a value.
    pub fn is_set(&self, category: InputType) -> bool {
        if category == InputType::Area {
            return self.area.is_some();
        }
        self.entries.contains_key(&category)
    }

    /// Categories with a value, in declaration order (area excluded).
    pub fn categories(&self) -> impl Iterator<Item = InputType> + '_ {
        self.entries.keys().copied()
    }

    /// Value of a single-valued category.
    pub fn get_single(&self, category: InputType) -> Option<&InputValue> {
        match self.entries.get(&category)? {
            Entry::Single { value, .. } => Some(value),
            Entry::Many { .. } => None,
        }
    }

    /// Values of a multi-valued category.
    pub fn get_many(&self, category: InputType) -> Option<&[InputValue]> {
        match self.entries.get(&category)? {
            Entry::Many { values, .. } => Some(values),
            Entry::Single { .. } => None,
        }
    }

    /// Label of a single-valued category.
    pub fn get_label(&self, category: InputType) -> Option<&str> {
        match self.entries.get(&category)? {
            Entry::Single { label, .. } => Some(label),
            Entry::Many { .. } => None,
        }
    }

    /// Labels of a multi-valued category, parallel to [`get_many`](Self::get_many).
    pub fn get_labels(&self, category: InputType) -> Option<&[String]> {
        match self.entries.get(&category)? {
            Entry::Many { labels, .. } => Some(labels),
            Entry::Single { .. } => None,
        }
    }

    /// The parsed area.
    pub fn area(&self) -> Option<&Area> {
        self.area.as_ref()
    }

    /// Text value of a single-valued category.
    pub fn get_text(&self, category: InputType) -> Option<&str> {
        self.get_single(category)?.as_text()
    }

    /// Integer value of a single-valued category.
    pub fn get_int(&self, category: InputType) -> Option<i64> {
        self.get_single(category)?.as_int()
    }

    /// Numeric value of a single-valued category.
    pub fn get_float(&self, category: InputType) -> Option<f64> {
        self.get_single(category)?.as_float()
    }

    /// Boolean value of a single-valued category.
    pub fn get_bool(&self, category: InputType) -> Option<bool> {
        self.get_single(category)?.as_bool()
    }

    /// Values of a multi-valued category as text.
    pub fn get_many_text(&self, category: InputType) -> Option<Vec<String>> {
        Some(self.get_many(category)?.iter().map(ToString::to_string).collect())
    }

    /// Values of a multi-valued category as integers; `None` if any value
    /// is not an integer.
    pub fn get_many_int(&self, category: InputType) -> Option<Vec<i64>> {
        self.get_many(category)?.iter().map(InputValue::as_int).collect()
    }
}
