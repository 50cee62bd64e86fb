//! Error types for the ukcp-vocab crate.

use std::path::PathBuf;

/// Error type for vocabulary loading and term parsing.
#[derive(Debug, thiserror::Error)]
pub enum VocabError {
    /// Returned when a vocabulary file cannot be read.
    #[error("cannot read vocabulary file {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when vocabulary TOML is malformed.
    #[error("invalid vocabulary: {0}")]
    Parse(#[from] toml::de::Error),

    /// Returned when a string is not a member of a closed category.
    #[error("unknown {category} term: '{value}'")]
    UnknownTerm {
        /// Category the term was parsed for.
        category: &'static str,
        /// The unrecognised value.
        value: String,
    },

    /// Returned when a loaded vocabulary is internally inconsistent.
    #[error("inconsistent vocabulary: {reason}")]
    Inconsistent {
        /// Description of the inconsistency.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_term() {
        let e = VocabError::UnknownTerm {
            category: "collection",
            value: "land-foo".to_string(),
        };
        assert_eq!(e.to_string(), "unknown collection term: 'land-foo'");
    }

    #[test]
    fn display_inconsistent() {
        let e = VocabError::Inconsistent {
            reason: "collection land-rcm is missing".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "inconsistent vocabulary: collection land-rcm is missing"
        );
    }

    #[test]
    fn display_io() {
        let e = VocabError::Io {
            path: PathBuf::from("/tmp/vocab.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(e.to_string().starts_with("cannot read vocabulary file /tmp/vocab.toml"));
    }
}
