//! Model simulation (`land-gcm`, `land-rcm`, `land-cordex`, `land-cpm`)
//! file layout.
//!
//! ```text
//! {root}/{collection}/uk/{spatial}/{scenario}/{ensemble}/{variable}/{tat}/{version}/
//!     {variable}_{scenario}_{collection}_uk_{spatial}_{ensemble}_{tat}_{range}.nc
//! ```

use std::path::PathBuf;

use tracing::debug;
use ukcp_vocab::{Collection, TemporalAverageType, Vocabulary, is_global_warming_level};

use crate::date_range::{WILDCARD, met_year_ranges, model_month_ranges};
use crate::layout::DataLayout;
use crate::path_set::{EnsembleFiles, ScenarioFiles};

/// Scenario the global-warming-level baselines are taken from.
pub const GWL_BASELINE_SCENARIO: &str = "rcp85";

/// Collection the global-warming-level baselines are taken from.
pub const GWL_BASELINE_COLLECTION: Collection = Collection::LandGcm;

/// Collection a member's files live under.
///
/// Regional-model members that belong to the EURO-CORDEX ensemble are
/// published under `land-cordex` even when requested as `land-rcm`.
pub fn member_collection(collection: Collection, ensemble: &str, vocab: &Vocabulary) -> Collection {
    if collection.is_regional_model()
        && vocab
            .collection(Collection::LandCordex)
            .is_some_and(|spec| spec.ensembles.iter().any(|e| e == ensemble))
    {
        Collection::LandCordex
    } else {
        collection
    }
}

/// Range tokens for meteorological years `first..=last`.
pub(crate) fn ranges(tat: TemporalAverageType, years: (i32, i32)) -> Vec<String> {
    match tat {
        TemporalAverageType::Daily => met_year_ranges(years.0, years.1),
        t if t.is_sub_daily() => model_month_ranges(years.0, years.1),
        _ => vec![WILDCARD.to_string()],
    }
}

/// Inputs of one simulation resolution.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SimQuery<'a> {
    pub collection: Collection,
    pub spatial: &'a str,
    pub tat: TemporalAverageType,
    pub years: (i32, i32),
    pub for_baseline: bool,
}

/// Resolve one scenario of one variable for every member.
pub(crate) fn resolve_scenario(
    layout: &DataLayout,
    vocab: &Vocabulary,
    q: SimQuery<'_>,
    file_variable: &str,
    scenario: &str,
    ensembles: &[String],
) -> ScenarioFiles {
    let ranges = ranges(q.tat, q.years);
    let ensembles = ensembles
        .iter()
        .map(|ensemble| {
            let (collection, file_scenario) = if q.for_baseline && is_global_warming_level(scenario) {
                debug!(
                    scenario,
                    collection = %GWL_BASELINE_COLLECTION,
                    "global warming level baseline substituted"
                );
                (GWL_BASELINE_COLLECTION, GWL_BASELINE_SCENARIO)
            } else {
                (member_collection(q.collection, ensemble, vocab), scenario)
            };
            let dir = layout
                .root()
                .join(collection.as_str())
                .join("uk")
                .join(q.spatial)
                .join(file_scenario)
                .join(ensemble)
                .join(file_variable)
                .join(q.tat.as_str())
                .join(layout.version(collection));
            let patterns: Vec<PathBuf> = ranges
                .iter()
                .map(|range| {
                    dir.join(format!(
                        "{file_variable}_{file_scenario}_{collection}_uk_{}_{ensemble}_{}_{range}.nc",
                        q.spatial, q.tat
                    ))
                })
                .collect();
            EnsembleFiles {
                ensemble: Some(ensemble.clone()),
                collection,
                patterns,
            }
        })
        .collect();
    ScenarioFiles {
        scenario: Some(scenario.to_string()),
        ensembles,
    }
}
