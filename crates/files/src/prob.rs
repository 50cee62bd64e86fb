//! Probabilistic projection (`land-prob`) file layout.
//!
//! ```text
//! {root}/land-prob/uk/{spatial}/{scenario}/{data_type}/{variable}/{tat}[-{slice}]/{version}/
//!     {variable}_{scenario}_land-prob_uk_{spatial}_{data_type}_{baseline}_{slice}_{tat}_{range}.nc
//! ```

use std::path::PathBuf;

use ukcp_vocab::{Collection, DataType, TemporalAverageType, TimeSliceType};

use crate::date_range::{PROB_CLIMATOLOGY_RANGE, WILDCARD, met_year_ranges};
use crate::layout::DataLayout;
use crate::path_set::{EnsembleFiles, ScenarioFiles, VariableFiles};

/// Everything a probabilistic file name depends on.
#[derive(Debug, Clone)]
pub(crate) struct ProbQuery<'a> {
    pub variables: Vec<String>,
    pub scenarios: Vec<String>,
    pub spatial: &'a str,
    pub data_type: DataType,
    pub time_slice: TimeSliceType,
    pub baseline: &'a str,
    pub tat: TemporalAverageType,
    pub years: (i32, i32),
}

/// Range tokens of one scenario's files.
///
/// Annual files hold the whole century; 20- and 30-year slices are single
/// climatology files; one-year slices of monthly and seasonal data are
/// split by meteorological year.
pub(crate) fn ranges(q: &ProbQuery<'_>) -> Vec<String> {
    match q.time_slice {
        TimeSliceType::TwentyYear | TimeSliceType::ThirtyYear => {
            vec![PROB_CLIMATOLOGY_RANGE.to_string()]
        }
        TimeSliceType::OneYear if q.tat == TemporalAverageType::Annual => vec![WILDCARD.to_string()],
        TimeSliceType::OneYear => met_year_ranges(q.years.0, q.years.1),
    }
}

fn directory(layout: &DataLayout, q: &ProbQuery<'_>, variable: &str, scenario: &str) -> PathBuf {
    let tat = match q.time_slice {
        TimeSliceType::OneYear => q.tat.to_string(),
        slice => format!("{}-{slice}", q.tat),
    };
    let collection = Collection::LandProb;
    layout
        .root()
        .join(collection.as_str())
        .join("uk")
        .join(q.spatial)
        .join(scenario)
        .join(q.data_type.as_str())
        .join(variable)
        .join(tat)
        .join(layout.version(collection))
}

fn file_name(q: &ProbQuery<'_>, variable: &str, scenario: &str, range: &str) -> String {
    format!(
        "{variable}_{scenario}_{}_uk_{}_{}_{}_{}_{}_{range}.nc",
        Collection::LandProb,
        q.spatial,
        q.data_type,
        q.baseline,
        q.time_slice,
        q.tat,
    )
}

/// Resolve every variable and scenario of `q`.
pub(crate) fn resolve(layout: &DataLayout, q: &ProbQuery<'_>) -> Vec<VariableFiles> {
    let ranges = ranges(q);
    q.variables
        .iter()
        .map(|variable| VariableFiles {
            variable: variable.clone(),
            file_variable: variable.clone(),
            scenarios: q
                .scenarios
                .iter()
                .map(|scenario| {
                    let dir = directory(layout, q, variable, scenario);
                    let patterns = ranges
                        .iter()
                        .map(|r| dir.join(file_name(q, variable, scenario, r)))
                        .collect();
                    ScenarioFiles {
                        scenario: Some(scenario.clone()),
                        ensembles: vec![EnsembleFiles {
                            ensemble: None,
                            collection: Collection::LandProb,
                            patterns,
                        }],
                    }
                })
                .collect(),
        })
        .collect()
}
