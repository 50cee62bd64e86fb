//! The [`DataExtractor`]: from a [`FilePathSet`] to filtered cubes.

use tracing::{debug, info};
use ukcp_cube::Cube;
use ukcp_files::{FilePathSet, VariableFiles, overlay_spatial};
use ukcp_input::{Area, ValidatedInput};
use ukcp_io::{CubeSource, VariableSelector};
use ukcp_vocab::{Collection, DataType, InputType, TimePeriod, TimeSliceType, Vocabulary};

use crate::error::ExtractError;
use crate::filter::{select_area, select_percentiles, select_period, select_years};
use crate::merge::{join_fragments, merge_members};

/// Percentiles drawn as probability-level overlays.
pub const OVERLAY_PERCENTILES: [f64; 3] = [10.0, 50.0, 90.0];

/// Name of the sample dimension of probabilistic sample data.
pub const SAMPLE: &str = "sample";

/// Filters applied to every loaded cube.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    /// Meteorological years to keep; `None` keeps every time point.
    pub years: Option<(i32, i32)>,
    /// Month or season to keep.
    pub period: TimePeriod,
    /// Spatial selection.
    pub area: &'a Area,
    /// Spatial representation of the data, for point windows.
    pub resolution: &'a str,
    /// Percentiles to keep, if restricted.
    pub percentiles: Option<Vec<f64>>,
}

impl<'a> Selection<'a> {
    /// The request's own filters.
    ///
    /// Climatology slices (20 and 30 year) are not cut to the request's
    /// years: their time points mark the slice, not the year.
    pub fn for_request(input: &'a ValidatedInput) -> Self {
        let climatology = matches!(
            input.time_slice_type(),
            Some(TimeSliceType::TwentyYear | TimeSliceType::ThirtyYear)
        );
        Self {
            years: (!climatology).then(|| input.year_range()),
            period: input.time_period(),
            area: input.area(),
            resolution: input.spatial_representation(),
            percentiles: input.percentiles(),
        }
    }

    /// Filters for a baseline period: every sub-period of `years` is kept
    /// so climatologies can be built per month or season.
    pub fn for_baseline(input: &'a ValidatedInput, years: (i32, i32)) -> Self {
        Self {
            years: Some(years),
            period: TimePeriod::All,
            area: input.area(),
            resolution: input.spatial_representation(),
            percentiles: None,
        }
    }

    fn apply(&self, cube: &Cube) -> Result<Cube, ExtractError> {
        let mut cube = match self.years {
            Some((first, last)) => select_years(cube, first, last)?,
            None => cube.clone(),
        };
        cube = select_period(&cube, self.period)?;
        cube = select_area(&cube, self.area, self.resolution)?;
        if let Some(p) = &self.percentiles {
            cube = select_percentiles(&cube, p)?;
        }
        Ok(cube.to_canonical_order()?)
    }
}

/// One loaded `(variable, scenario)` cube.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableCube {
    /// Variable as requested.
    pub variable: String,
    /// Scenario, if the collection has them.
    pub scenario: Option<String>,
    /// Merged and filtered data.
    pub cube: Cube,
}

/// Output of [`DataExtractor::extract`].
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// One cube per `(variable, scenario)`, in request order.
    pub cubes: Vec<VariableCube>,
    /// 10th/50th/90th percentile cubes, one per variable, when requested.
    pub overlay: Vec<Cube>,
    /// Human-readable description of the selection.
    pub title: String,
}

/// Loads the files of a request through a [`CubeSource`] and applies the
/// request's filters.
#[derive(Debug)]
pub struct DataExtractor<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: CubeSource + ?Sized> DataExtractor<'a, S> {
    /// Extractor reading through `source`.
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Load, join, merge and filter every `(variable, scenario)` of
    /// `files`.
    ///
    /// # Errors
    ///
    /// Propagates load failures, returns [`ExtractError::UnknownVariable`]
    /// for a variable the vocabulary lacks and
    /// [`ExtractError::DataNotFound`] when a filter empties a cube.
    pub fn load(
        &self,
        files: &FilePathSet,
        vocab: &Vocabulary,
        selection: &Selection<'_>,
    ) -> Result<Vec<VariableCube>, ExtractError> {
        let mut out = Vec::new();
        for variable in files.variables() {
            let selector = selector(vocab, variable)?;
            for scenario in &variable.scenarios {
                let mut members = Vec::with_capacity(scenario.ensembles.len());
                for group in &scenario.ensembles {
                    let mut fragments = Vec::new();
                    for pattern in &group.patterns {
                        fragments.extend(self.source.load(pattern, &selector)?);
                    }
                    debug!(
                        variable = %variable.variable,
                        ensemble = group.ensemble.as_deref().unwrap_or("-"),
                        fragments = fragments.len(),
                        "fragments loaded"
                    );
                    members.push((group.ensemble.clone(), join_fragments(fragments)?));
                }
                let mut cube = selection.apply(&merge_members(members)?)?;
                if let Some(s) = &scenario.scenario {
                    cube.set_attribute("scenario", s.as_str());
                }
                out.push(VariableCube {
                    variable: variable.variable.clone(),
                    scenario: scenario.scenario.clone(),
                    cube,
                });
            }
        }
        Ok(out)
    }

    /// Run a whole request: its cubes, the optional probability-level
    /// overlay and the title.
    ///
    /// The overlay is computed over the `sample` dimension for
    /// probabilistic sample data and loaded from `overlay_files` otherwise.
    ///
    /// # Errors
    ///
    /// As for [`load`](Self::load), plus [`ExtractError::MissingOverlay`]
    /// when an overlay is requested without files to load it from.
    pub fn extract(
        &self,
        input: &ValidatedInput,
        files: &FilePathSet,
        overlay_files: Option<&FilePathSet>,
    ) -> Result<Extraction, ExtractError> {
        let vocab = input.vocabulary();
        let cubes = self.load(files, vocab, &Selection::for_request(input))?;

        let overlay = if !input.overlay_probability_levels() {
            Vec::new()
        } else if input.collection() == Collection::LandProb && input.data_type() == Some(DataType::Sample) {
            sample_overlay(&cubes)?
        } else {
            let files = overlay_files.ok_or(ExtractError::MissingOverlay)?;
            let selection = Selection {
                resolution: overlay_spatial(input),
                percentiles: Some(OVERLAY_PERCENTILES.to_vec()),
                ..Selection::for_request(input)
            };
            self.load(files, vocab, &selection)?
                .into_iter()
                .map(|v| v.cube)
                .collect()
        };

        let title = title(input);
        info!(cubes = cubes.len(), overlay = overlay.len(), %title, "extraction complete");
        Ok(Extraction {
            cubes,
            overlay,
            title,
        })
    }
}

fn selector(vocab: &Vocabulary, files: &VariableFiles) -> Result<VariableSelector, ExtractError> {
    let spec = vocab
        .variable(&files.file_variable)
        .or_else(|| vocab.variable(&files.variable))
        .ok_or_else(|| ExtractError::UnknownVariable {
            name: files.variable.clone(),
        })?;
    Ok(VariableSelector::named(files.file_variable.as_str()).with_quantity(spec.quantity))
}

/// Percentiles over the samples of each variable's first scenario.
fn sample_overlay(cubes: &[VariableCube]) -> Result<Vec<Cube>, ExtractError> {
    let mut out: Vec<Cube> = Vec::new();
    let mut seen: Vec<&str> = Vec::new();
    for v in cubes {
        if seen.contains(&v.variable.as_str()) {
            continue;
        }
        seen.push(&v.variable);
        let levels = v.cube.collapse_percentiles(SAMPLE, &OVERLAY_PERCENTILES)?;
        out.push(levels.to_canonical_order()?);
    }
    Ok(out)
}

/// `"<when>, <variables>, <area>"`, e.g.
/// `"January 2018-2019, Mean air temperature at 1.5m (°C), Grid point 450000, 250000"`.
pub fn title(input: &ValidatedInput) -> String {
    let (first, last) = input.year_range();
    let years = if first == last {
        first.to_string()
    } else {
        format!("{first}-{last}")
    };
    let period = input.time_period();
    let when = match period {
        TimePeriod::All => years,
        TimePeriod::Period(_) => {
            let label = input
                .vocabulary()
                .label("time_period", period.as_str())
                .unwrap_or(period.as_str());
            format!("{label} {years}")
        }
    };
    let variables = input
        .get_labels(InputType::Variable)
        .map(|l| l.join(" and "))
        .unwrap_or_default();
    format!("{when}, {variables}, {}", input.area())
}
