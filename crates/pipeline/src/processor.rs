//! The [`Processor`]: one request from criteria to final cubes.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};
use ukcp_anomaly::{AnomalyRequest, anomaly, climatology};
use ukcp_calendar::Period;
use ukcp_cube::Cube;
use ukcp_extract::{DataExtractor, Extraction, Selection, VariableCube};
use ukcp_files::{DataLayout, FilesError, resolve, resolve_overlay};
use ukcp_input::{InputData, ValidatedInput, validate};
use ukcp_io::CubeSource;
use ukcp_sampling::{SamplingError, SamplingStrategy, SupportingCubes, sample};
use ukcp_vocab::{Collection, DataType, InputType, TemporalAverageType, Vocabulary};

use crate::error::PipelineError;

/// Categories cleared from a request before it is reused to load the
/// supporting data of subset sampling.
const SUPPORT_CLEARED: [InputType; 11] = [
    InputType::SamplingMethod,
    InputType::SamplingId,
    InputType::RandomSamplingCount,
    InputType::SamplingVariable1,
    InputType::SamplingVariable2,
    InputType::SamplingTemporalAverage1,
    InputType::SamplingTemporalAverage2,
    InputType::SamplingPercentile1,
    InputType::SamplingPercentile2,
    InputType::OverlayProbabilityLevels,
    InputType::Percentiles,
];

/// Result of one request, ready for writers and plotters.
#[derive(Debug, Clone)]
pub struct ProcessorOutput {
    /// One cube per `(variable, scenario)`, in request order.
    pub cubes: Vec<VariableCube>,
    /// Probability-level overlay cubes, empty unless requested.
    pub overlay: Vec<Cube>,
    /// Human-readable description of the selection.
    pub title: String,
    /// The validated request.
    pub input: ValidatedInput,
    /// Vocabulary the request was validated against.
    pub vocabulary: Arc<Vocabulary>,
}

/// Runs requests against one data layout.
///
/// The processor holds no per-request state: the same input always gives
/// the same output, provided random sampling is seeded.
#[derive(Debug)]
pub struct Processor<'a, S: ?Sized> {
    source: &'a S,
    layout: &'a DataLayout,
    seed: Option<u64>,
}

impl<'a, S: CubeSource + ?Sized> Processor<'a, S> {
    /// Processor reading `layout` through `source`.
    pub fn new(source: &'a S, layout: &'a DataLayout) -> Self {
        Self {
            source,
            layout,
            seed: None,
        }
    }

    /// Seed random sampling. Unseeded processors draw from the OS.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate `input` and run it.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Input`] for invalid criteria and the errors
    /// of [`process_validated`](Self::process_validated).
    pub fn process(&self, input: InputData) -> Result<ProcessorOutput, PipelineError> {
        self.process_validated(validate(input)?)
    }

    /// Run a validated request: resolve and load its files, derive
    /// anomalies against the baseline and select samples.
    ///
    /// # Errors
    ///
    /// Propagates the first failure of any stage.
    #[tracing::instrument(skip_all, fields(collection = %input.collection()))]
    pub fn process_validated(&self, input: ValidatedInput) -> Result<ProcessorOutput, PipelineError> {
        let files = resolve(&input, self.layout, None)?;
        let overlay_files = if input.overlay_probability_levels() && !is_prob_sample(&input) {
            Some(resolve_overlay(&input, self.layout)?)
        } else {
            None
        };

        let Extraction {
            mut cubes,
            overlay,
            title,
        } = DataExtractor::new(self.source).extract(&input, &files, overlay_files.as_ref())?;

        if input.collection() != Collection::LandProb {
            cubes = self.anomalies(&input, cubes)?;
        }

        let strategy = SamplingStrategy::from_input(&input)?;
        if strategy != SamplingStrategy::All {
            cubes = self.sample(&input, cubes, &strategy)?;
        }

        info!(cubes = cubes.len(), overlay = overlay.len(), %title, "request processed");
        let vocabulary = Arc::clone(input.vocabulary());
        Ok(ProcessorOutput {
            cubes,
            overlay,
            title,
            input,
            vocabulary,
        })
    }

    // -----------------------------------------------------------------------
    // Anomalies
    // -----------------------------------------------------------------------

    /// Replace the absolute data loaded for derived anomaly variables with
    /// anomalies against the request's baseline. Other cubes pass through.
    fn anomalies(&self, input: &ValidatedInput, cubes: Vec<VariableCube>) -> Result<Vec<VariableCube>, PipelineError> {
        let vocab = input.vocabulary();
        let derived: Vec<String> = input
            .variables()
            .into_iter()
            .filter(|v| vocab.variable(v).is_some_and(|spec| spec.is_anomaly()))
            .collect();
        if derived.is_empty() {
            return Ok(cubes);
        }

        let baseline = self.load_baseline(input, &derived)?;
        let tat = input.temporal_average_type();
        let mut out = Vec::with_capacity(cubes.len());
        for mut v in cubes {
            if derived.contains(&v.variable) {
                let request = AnomalyRequest::for_variable(input, &v.variable, v.scenario.as_deref())
                    .ok_or_else(|| PipelineError::NoBaseline {
                        variable: v.variable.clone(),
                    })?;
                let base = baseline
                    .iter()
                    .find(|b| b.variable == v.variable && b.scenario == v.scenario)
                    .ok_or_else(|| PipelineError::MissingBaseline {
                        variable: v.variable.clone(),
                        scenario: v.scenario.clone().unwrap_or_else(|| "-".to_string()),
                    })?;
                let clim = climatology(&base.cube, tat)?;
                v.cube = anomaly(&v.cube, &clim, &request)?;
                debug!(
                    variable = %v.variable,
                    scenario = v.scenario.as_deref().unwrap_or("-"),
                    "anomaly derived"
                );
            }
            out.push(v);
        }
        Ok(out)
    }

    /// Absolute data of the `derived` variables over the baseline years.
    fn load_baseline(&self, input: &ValidatedInput, derived: &[String]) -> Result<Vec<VariableCube>, PipelineError> {
        let id = input.baseline().ok_or_else(|| PipelineError::NoBaseline {
            variable: derived.join(", "),
        })?;
        let spec = input
            .vocabulary()
            .baseline(id)
            .ok_or_else(|| FilesError::UnknownBaseline { id: id.to_string() })?;

        let mut data = input.input().clone();
        data.set_many(InputType::Variable, derived.iter().map(String::as_str), None)?;
        let narrowed = validate(data)?;

        let files = resolve(&narrowed, self.layout, Some(id))?;
        let selection = Selection::for_baseline(&narrowed, (spec.start_year, spec.end_year));
        let cubes = DataExtractor::new(self.source).load(&files, narrowed.vocabulary(), &selection)?;
        info!(baseline = id, cubes = cubes.len(), "baseline loaded");
        Ok(cubes)
    }

    // -----------------------------------------------------------------------
    // Sampling
    // -----------------------------------------------------------------------

    fn sample(
        &self,
        input: &ValidatedInput,
        cubes: Vec<VariableCube>,
        strategy: &SamplingStrategy,
    ) -> Result<Vec<VariableCube>, PipelineError> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let support = RequestSupport {
            processor: self,
            input,
        };
        let data: Vec<Cube> = cubes.iter().map(|v| v.cube.clone()).collect();
        let sampled = sample(&data, strategy, &support, &mut rng)?;
        Ok(cubes
            .into_iter()
            .zip(sampled)
            .map(|(v, cube)| VariableCube { cube, ..v })
            .collect())
    }
}

fn is_prob_sample(input: &ValidatedInput) -> bool {
    input.collection() == Collection::LandProb && input.data_type() == Some(DataType::Sample)
}

/// Loads subset-sampling support by rerunning the request for another
/// variable and period.
struct RequestSupport<'p, 'a, S: ?Sized> {
    processor: &'p Processor<'a, S>,
    input: &'p ValidatedInput,
}

impl<S: CubeSource + ?Sized> RequestSupport<'_, '_, S> {
    fn load(&self, variable: &str, period: Period) -> Result<Vec<Cube>, PipelineError> {
        let mut data = self.input.input().clone();
        for category in SUPPORT_CLEARED {
            data.unset(category);
        }
        data.set_many(InputType::Variable, [variable], None)?;
        data.set(
            InputType::TemporalAverageType,
            TemporalAverageType::for_period(period).as_str(),
            None,
        )?;
        data.set(InputType::TimePeriod, period.code(), None)?;
        let input = validate(data)?;

        let files = resolve(&input, self.processor.layout, None)?;
        let cubes = DataExtractor::new(self.processor.source).load(
            &files,
            input.vocabulary(),
            &Selection::for_request(&input),
        )?;
        Ok(cubes.into_iter().map(|v| v.cube).collect())
    }
}

impl<S: CubeSource + ?Sized> SupportingCubes for RequestSupport<'_, '_, S> {
    fn supporting_cubes(&self, variable: &str, period: Period) -> Result<Vec<Cube>, SamplingError> {
        debug!(variable, %period, "loading subset support");
        self.load(variable, period).map_err(|e| SamplingError::Support {
            variable: variable.to_string(),
            source: Box::new(e),
        })
    }
}
