//! Error types for the ukcp-input crate.

use ukcp_vocab::{AreaType, InputType};

/// Error type for setting and validating selection criteria.
///
/// Every variant is an invalid-parameter error in the sense of the request
/// contract: the caller supplied something that cannot be selected.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Returned when a value is not accepted for a category, or a
    /// mandatory category has no value (`value` is `None`).
    #[error("invalid parameter for {category}: {}", value.as_deref().unwrap_or("None"))]
    InvalidParameter {
        /// Category that was set or checked.
        category: InputType,
        /// Offending value, or `None` when missing.
        value: Option<String>,
    },

    /// Returned when an explicit allowed-values list is empty.
    #[error("allowed values for {category} must not be empty")]
    EmptyAllowedValues {
        /// Category that was being set.
        category: InputType,
    },

    /// Returned when a single value is set on a multi-valued category or
    /// the reverse.
    #[error("{category} holds {expected} value(s)")]
    Cardinality {
        /// Category that was being set.
        category: InputType,
        /// `"one"` or `"many"`.
        expected: &'static str,
    },

    /// Returned when an area kind is not a known area type.
    #[error("unknown area type: '{value}'")]
    UnknownAreaType {
        /// The unrecognised kind.
        value: String,
    },

    /// Returned when a region name matches neither a code nor a label.
    #[error("unknown {kind} name: '{name}'")]
    UnknownAreaName {
        /// Area kind the name was looked up for.
        kind: AreaType,
        /// The unrecognised name.
        name: String,
    },

    /// Returned when a coordinate-form area has the wrong arity or order.
    #[error("invalid {kind} coordinates {coords:?}: {reason}")]
    AreaCoordinates {
        /// Area kind.
        kind: AreaType,
        /// Supplied coordinates.
        coords: Vec<f64>,
        /// What was wrong.
        reason: String,
    },

    /// Returned when a cross-field rule is violated.
    #[error("invalid {category}: {reason}")]
    Inconsistent {
        /// Category the rule is reported against.
        category: InputType,
        /// Rule that was violated.
        reason: String,
    },
}

impl InputError {
    pub(crate) fn invalid(category: InputType, value: impl ToString) -> Self {
        InputError::InvalidParameter {
            category,
            value: Some(value.to_string()),
        }
    }

    pub(crate) fn missing(category: InputType) -> Self {
        InputError::InvalidParameter {
            category,
            value: None,
        }
    }

    pub(crate) fn inconsistent(category: InputType, reason: impl Into<String>) -> Self {
        InputError::Inconsistent {
            category,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_parameter() {
        let e = InputError::invalid(InputType::Scenario, "rcp99");
        assert_eq!(e.to_string(), "invalid parameter for scenario: rcp99");
    }

    #[test]
    fn display_missing_parameter() {
        let e = InputError::missing(InputType::Collection);
        assert_eq!(e.to_string(), "invalid parameter for collection: None");
    }

    #[test]
    fn display_unknown_area_name() {
        let e = InputError::UnknownAreaName {
            kind: AreaType::RiverBasin,
            name: "Amazon".to_string(),
        };
        assert_eq!(e.to_string(), "unknown river_basin name: 'Amazon'");
    }

    #[test]
    fn display_area_coordinates() {
        let e = InputError::AreaCoordinates {
            kind: AreaType::Bbox,
            coords: vec![1.0, 2.0],
            reason: "expected 4 values".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid bbox coordinates [1.0, 2.0]: expected 4 values"
        );
    }

    #[test]
    fn display_inconsistent() {
        let e = InputError::inconsistent(InputType::YearMinimum, "2050 is after 2040");
        assert_eq!(e.to_string(), "invalid year_minimum: 2050 is after 2040");
    }

    #[test]
    fn display_cardinality() {
        let e = InputError::Cardinality {
            category: InputType::Variable,
            expected: "many",
        };
        assert_eq!(e.to_string(), "variable holds many value(s)");
    }
}
