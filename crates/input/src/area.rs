//! Spatial selection parsing.

use std::fmt;

use serde::Serialize;
use ukcp_vocab::{AreaType, InputType, Vocabulary};

use crate::error::InputError;

/// Area as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum AreaInput {
    /// `[kind, coords...]`; point kinds take `x, y`, `bbox` takes
    /// `xmin, ymin, xmax, ymax`.
    Coordinates {
        /// Area kind code.
        kind: String,
        /// Coordinates in the projection's metres.
        coords: Vec<f64>,
    },
    /// `"kind|name"` for region kinds; `name` is a code or a label.
    Named(String),
}

/// Value part of a parsed area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AreaValue {
    /// Point or bounding-box coordinates.
    Coordinates(Vec<f64>),
    /// Region code.
    Region(String),
}

/// A parsed area: `(kind, kind label, value, value label)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Area {
    kind: AreaType,
    kind_label: String,
    value: AreaValue,
    value_label: String,
}

impl Area {
    /// Parse and resolve an area against the vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::UnknownAreaType`] for an unknown kind,
    /// [`InputError::InvalidParameter`] when the form does not suit the
    /// kind, [`InputError::AreaCoordinates`] for bad coordinates and
    /// [`InputError::UnknownAreaName`] when a region name resolves neither
    /// as a code nor as a label.
    pub fn parse(input: &AreaInput, vocab: &Vocabulary) -> Result<Self, InputError> {
        match input {
            AreaInput::Coordinates { kind, coords } => Self::from_coordinates(kind, coords, vocab),
            AreaInput::Named(text) => Self::from_named(text, vocab),
        }
    }

    fn from_coordinates(kind: &str, coords: &[f64], vocab: &Vocabulary) -> Result<Self, InputError> {
        let kind = parse_kind(kind)?;
        let Some(expected) = kind.coordinate_count() else {
            return Err(InputError::invalid(
                InputType::Area,
                format!("{kind} takes a name, not coordinates"),
            ));
        };
        let bad = |reason: String| InputError::AreaCoordinates {
            kind,
            coords: coords.to_vec(),
            reason,
        };
        if coords.len() != expected {
            return Err(bad(format!("expected {expected} values, got {}", coords.len())));
        }
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(bad("coordinates must be finite".to_string()));
        }
        if kind == AreaType::Bbox && (coords[0] > coords[2] || coords[1] > coords[3]) {
            return Err(bad("minimum exceeds maximum".to_string()));
        }
        let value_label = coords
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Ok(Self {
            kind,
            kind_label: kind_label(kind, vocab),
            value: AreaValue::Coordinates(coords.to_vec()),
            value_label,
        })
    }

    fn from_named(text: &str, vocab: &Vocabulary) -> Result<Self, InputError> {
        let Some((kind, name)) = text.split_once('|') else {
            return Err(InputError::invalid(InputType::Area, text));
        };
        let kind = parse_kind(kind)?;
        let Some(category) = kind.region_token() else {
            return Err(InputError::invalid(
                InputType::Area,
                format!("{kind} takes coordinates, not a name"),
            ));
        };

        let code = if vocab.contains(category, name) {
            name.to_string()
        } else if let Some(code) = vocab.value_for_label(category, name) {
            code.to_string()
        } else {
            return Err(InputError::UnknownAreaName {
                kind,
                name: name.to_string(),
            });
        };
        let value_label = vocab.label(category, &code).unwrap_or(&code).to_string();
        Ok(Self {
            kind,
            kind_label: kind_label(kind, vocab),
            value: AreaValue::Region(code),
            value_label,
        })
    }

    /// Area kind.
    pub fn kind(&self) -> AreaType {
        self.kind
    }

    /// Display label of the kind.
    pub fn kind_label(&self) -> &str {
        &self.kind_label
    }

    /// Coordinates or region code.
    pub fn value(&self) -> &AreaValue {
        &self.value
    }

    /// Display label of the value.
    pub fn value_label(&self) -> &str {
        &self.value_label
    }

    /// Coordinates, for point and bbox kinds.
    pub fn coordinates(&self) -> Option<&[f64]> {
        match &self.value {
            AreaValue::Coordinates(c) => Some(c),
            AreaValue::Region(_) => None,
        }
    }

    /// Region code, for region kinds.
    pub fn region(&self) -> Option<&str> {
        match &self.value {
            AreaValue::Region(r) => Some(r),
            AreaValue::Coordinates(_) => None,
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind_label, self.value_label)
    }
}

fn parse_kind(kind: &str) -> Result<AreaType, InputError> {
    kind.trim()
        .parse()
        .map_err(|_| InputError::UnknownAreaType {
            value: kind.to_string(),
        })
}

fn kind_label(kind: AreaType, vocab: &Vocabulary) -> String {
    vocab
        .label("area", kind.as_str())
        .unwrap_or(kind.as_str())
        .to_string()
}
