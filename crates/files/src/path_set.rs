//! The resolved `variable → scenario → ensemble → patterns` tree.

use std::path::PathBuf;

use serde::Serialize;
use ukcp_vocab::Collection;

/// Path patterns for one ensemble member, or for the whole scenario when
/// the collection has no members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnsembleFiles {
    /// Ensemble member; `None` for probabilistic and observed data.
    pub ensemble: Option<String>,
    /// Collection the member was resolved against. Differs from the
    /// request's for CORDEX members and global-warming-level baselines.
    pub collection: Collection,
    /// File patterns, in time order. May contain `*` wildcards.
    pub patterns: Vec<PathBuf>,
}

/// Files of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioFiles {
    /// Scenario code; `None` for observations.
    pub scenario: Option<String>,
    /// Per-member groups, in request order.
    pub ensembles: Vec<EnsembleFiles>,
}

/// Files of one requested variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableFiles {
    /// Variable as requested.
    pub variable: String,
    /// Variable stored in the files. Differs from `variable` when an
    /// anomaly is derived from absolute data.
    pub file_variable: String,
    /// Per-scenario groups, in request order.
    pub scenarios: Vec<ScenarioFiles>,
}

/// Every file pattern a request needs, grouped by variable, scenario and
/// ensemble member.
///
/// Built once per request by the resolvers and never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilePathSet {
    variables: Vec<VariableFiles>,
}

impl FilePathSet {
    pub(crate) fn new(variables: Vec<VariableFiles>) -> Self {
        Self { variables }
    }

    /// Per-variable groups, in request order.
    pub fn variables(&self) -> &[VariableFiles] {
        &self.variables
    }

    /// Group of one variable.
    pub fn variable(&self, name: &str) -> Option<&VariableFiles> {
        self.variables.iter().find(|v| v.variable == name)
    }

    /// Every pattern, flattened in tree order.
    pub fn patterns(&self) -> impl Iterator<Item = &PathBuf> + '_ {
        self.variables
            .iter()
            .flat_map(|v| &v.scenarios)
            .flat_map(|s| &s.ensembles)
            .flat_map(|e| &e.patterns)
    }

    /// Total number of patterns.
    pub fn len(&self) -> usize {
        self.patterns().count()
    }

    /// Returns `true` when no pattern was resolved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> FilePathSet {
        let group = |ensemble: &str, files: &[&str]| EnsembleFiles {
            ensemble: Some(ensemble.to_string()),
            collection: Collection::LandRcm,
            patterns: files.iter().map(PathBuf::from).collect(),
        };
        FilePathSet::new(vec![VariableFiles {
            variable: "tas".into(),
            file_variable: "tas".into(),
            scenarios: vec![ScenarioFiles {
                scenario: Some("rcp85".into()),
                ensembles: vec![group("01", &["a.nc", "b.nc"]), group("04", &["c.nc"])],
            }],
        }])
    }

    #[test]
    fn patterns_flatten_in_tree_order() {
        let s = set();
        let flat: Vec<_> = s.patterns().map(|p| p.to_str().unwrap()).collect();
        assert_eq!(flat, ["a.nc", "b.nc", "c.nc"]);
        assert_eq!(s.len(), 3);
        assert!(!s.is_empty());
        assert!(FilePathSet::default().is_empty());
    }

    #[test]
    fn variable_lookup() {
        let s = set();
        assert!(s.variable("tas").is_some());
        assert!(s.variable("pr").is_none());
    }
}
