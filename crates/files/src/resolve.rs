//! Entry points: request files, baseline files and overlay files.

use tracing::{debug, warn};
use ukcp_input::{DEFAULT_PROBABILISTIC_BASELINE, ValidatedInput};
use ukcp_vocab::{Collection, DataType, TimeSliceType, Vocabulary};

use crate::error::FilesError;
use crate::layout::DataLayout;
use crate::obs;
use crate::path_set::{FilePathSet, VariableFiles};
use crate::prob::{self, ProbQuery};
use crate::sim::{self, SimQuery};

/// Spatial representation overlays use when the request's own is not one
/// the probabilistic projections are published at.
pub const OVERLAY_FALLBACK_SPATIAL: &str = "25km";

/// Directory token of the request's spatial representation.
///
/// Region areas map onto their aggregate directories (`river_basin` to
/// `river`, `admin_region` to `region`, `country` to `country`); grid
/// areas use the validated representation.
pub fn spatial_directory(input: &ValidatedInput) -> &str {
    input
        .area()
        .kind()
        .region_token()
        .unwrap_or_else(|| input.spatial_representation())
}

/// Resolve the files a request reads.
///
/// With `baseline`, the request's years are replaced by the baseline's and
/// global-warming-level scenarios read the RCP8.5 global runs. Derived
/// anomaly variables of simulation and observation collections resolve to
/// their absolute variable's files.
///
/// # Errors
///
/// Returns [`FilesError::NoBaselineFiles`] for a probabilistic baseline,
/// [`FilesError::UnknownBaseline`] or [`FilesError::UnknownVariable`] for
/// ids the vocabulary lacks, and [`FilesError::MissingSetting`] when a
/// probabilistic request lacks a file-name setting.
pub fn resolve(
    input: &ValidatedInput,
    layout: &DataLayout,
    baseline: Option<&str>,
) -> Result<FilePathSet, FilesError> {
    let vocab = input.vocabulary();
    let collection = input.collection();
    let years = match baseline {
        Some(id) => {
            let spec = vocab.baseline(id).ok_or_else(|| FilesError::UnknownBaseline {
                id: id.to_string(),
            })?;
            (spec.start_year, spec.end_year)
        }
        None => input.year_range(),
    };
    let spatial = spatial_directory(input);

    let variables = match collection {
        Collection::LandProb => {
            if baseline.is_some() {
                return Err(FilesError::NoBaselineFiles { collection });
            }
            let missing = |what| FilesError::MissingSetting { collection, what };
            let query = ProbQuery {
                variables: input.variables(),
                scenarios: input.scenarios(),
                spatial,
                data_type: input.data_type().ok_or_else(|| missing("data type"))?,
                time_slice: input.time_slice_type().ok_or_else(|| missing("time slice type"))?,
                baseline: input.baseline().ok_or_else(|| missing("baseline"))?,
                tat: input.temporal_average_type(),
                years,
            };
            prob::resolve(layout, &query)
        }
        Collection::LandObs => input
            .variables()
            .into_iter()
            .map(|variable| {
                let file_variable = file_variable(vocab, &variable)?;
                let files = obs::resolve_variable(
                    layout,
                    spatial,
                    input.temporal_average_type(),
                    years,
                    &file_variable,
                )?;
                Ok(VariableFiles {
                    variable,
                    file_variable,
                    scenarios: vec![files],
                })
            })
            .collect::<Result<Vec<_>, FilesError>>()?,
        _ => {
            let query = SimQuery {
                collection,
                spatial,
                tat: input.temporal_average_type(),
                years,
                for_baseline: baseline.is_some(),
            };
            let ensembles = input.ensembles();
            input
                .variables()
                .into_iter()
                .map(|variable| {
                    let file_variable = file_variable(vocab, &variable)?;
                    let scenarios = input
                        .scenarios()
                        .iter()
                        .map(|s| sim::resolve_scenario(layout, vocab, query, &file_variable, s, &ensembles))
                        .collect();
                    Ok(VariableFiles {
                        variable,
                        file_variable,
                        scenarios,
                    })
                })
                .collect::<Result<Vec<_>, FilesError>>()?
        }
    };

    let set = FilePathSet::new(variables);
    debug!(
        %collection,
        baseline = baseline.unwrap_or("none"),
        first_year = years.0,
        last_year = years.1,
        patterns = set.len(),
        "files resolved"
    );
    Ok(set)
}

/// Resolve the probabilistic 10th/50th/90th percentile files overlaid on a
/// request's plot.
///
/// Uses the first requested scenario, the request's baseline (or the
/// probabilistic default) and one-year slices. Absolute variables are
/// mapped to their anomaly counterparts. When the request's spatial
/// representation is not published for `land-prob` the overlay falls back
/// to [`OVERLAY_FALLBACK_SPATIAL`], which is logged at `warn`.
///
/// # Errors
///
/// Returns [`FilesError::MissingSetting`] when the request has no
/// scenario.
pub fn resolve_overlay(input: &ValidatedInput, layout: &DataLayout) -> Result<FilePathSet, FilesError> {
    let vocab = input.vocabulary();
    let collection = Collection::LandProb;
    let scenario = input
        .scenarios()
        .into_iter()
        .next()
        .ok_or(FilesError::MissingSetting {
            collection,
            what: "scenario",
        })?;

    let spatial = overlay_spatial(input);
    let query = ProbQuery {
        variables: input
            .variables()
            .iter()
            .map(|v| overlay_variable(vocab, v))
            .collect(),
        scenarios: vec![scenario],
        spatial,
        data_type: DataType::Percentile,
        time_slice: TimeSliceType::OneYear,
        baseline: input.baseline().unwrap_or(DEFAULT_PROBABILISTIC_BASELINE),
        tat: input.temporal_average_type(),
        years: input.year_range(),
    };
    let set = FilePathSet::new(prob::resolve(layout, &query));
    debug!(spatial, patterns = set.len(), "overlay files resolved");
    Ok(set)
}

/// Spatial representation of a request's overlay: the request's own when
/// `land-prob` publishes it, else [`OVERLAY_FALLBACK_SPATIAL`].
pub fn overlay_spatial(input: &ValidatedInput) -> &str {
    let requested = spatial_directory(input);
    let published = input
        .vocabulary()
        .collection(Collection::LandProb)
        .is_some_and(|spec| spec.resolutions.iter().any(|r| r == requested));
    if published {
        return requested;
    }
    warn!(
        requested,
        fallback = OVERLAY_FALLBACK_SPATIAL,
        "spatial representation not published for land-prob, overlay uses fallback"
    );
    OVERLAY_FALLBACK_SPATIAL
}

/// Variable stored in the files of a simulation or observation request.
fn file_variable(vocab: &Vocabulary, variable: &str) -> Result<String, FilesError> {
    let spec = vocab
        .variable(variable)
        .ok_or_else(|| FilesError::UnknownVariable {
            name: variable.to_string(),
        })?;
    Ok(spec.absolute.clone().unwrap_or_else(|| variable.to_string()))
}

fn overlay_variable(vocab: &Vocabulary, variable: &str) -> String {
    if vocab.variable(variable).is_some_and(|s| s.is_anomaly()) {
        return variable.to_string();
    }
    vocab
        .anomaly_variable(variable)
        .unwrap_or(variable)
        .to_string()
}
