//! Sampling strategies built from validated requests.

use ukcp_calendar::Period;
use ukcp_input::ValidatedInput;
use ukcp_vocab::{InputType, SamplingMethod};

use crate::error::SamplingError;

/// Half width, in percentage points, of each subset window.
pub const SUBSET_HALF_WIDTH: f64 = 10.0;

/// One narrowing step of subset sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetCriterion {
    /// Supporting variable.
    pub variable: String,
    /// Temporal average the supporting variable is ranked over.
    pub period: Period,
    /// Centre of the kept window, 10..=90.
    pub percentile: f64,
}

/// How to select along the `sample` dimension.
///
/// Ids are positions along the dimension, counted from zero.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingStrategy {
    /// Keep every sample.
    All,
    /// Keep the listed positions, in ascending order.
    Ids(Vec<usize>),
    /// Keep `count` distinct positions drawn at random.
    Random {
        /// Number of draws.
        count: usize,
    },
    /// Narrow by each criterion in turn.
    Subset(Vec<SubsetCriterion>),
}

const SUBSET_TRIPLES: [[InputType; 3]; 2] = [
    [
        InputType::SamplingVariable1,
        InputType::SamplingTemporalAverage1,
        InputType::SamplingPercentile1,
    ],
    [
        InputType::SamplingVariable2,
        InputType::SamplingTemporalAverage2,
        InputType::SamplingPercentile2,
    ],
];

impl SamplingStrategy {
    /// Strategy of a validated request.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::MissingSetting`] or
    /// [`SamplingError::InvalidSetting`] when the request's sampling
    /// settings do not describe its method.
    pub fn from_input(input: &ValidatedInput) -> Result<Self, SamplingError> {
        let missing = |category| SamplingError::MissingSetting { category };
        let invalid = |category, value: &dyn std::fmt::Display| SamplingError::InvalidSetting {
            category,
            value: value.to_string(),
        };

        match input.sampling_method() {
            SamplingMethod::All => Ok(SamplingStrategy::All),
            SamplingMethod::Id => {
                let category = InputType::SamplingId;
                let mut ids = input
                    .get_many_int(category)
                    .ok_or(missing(category))?
                    .into_iter()
                    .map(|id| usize::try_from(id).map_err(|_| invalid(category, &id)))
                    .collect::<Result<Vec<_>, _>>()?;
                ids.sort_unstable();
                Ok(SamplingStrategy::Ids(ids))
            }
            SamplingMethod::Random => {
                let category = InputType::RandomSamplingCount;
                let count = input.get_int(category).ok_or(missing(category))?;
                let count = usize::try_from(count).map_err(|_| invalid(category, &count))?;
                Ok(SamplingStrategy::Random { count })
            }
            SamplingMethod::Subset => {
                let mut criteria = Vec::with_capacity(SUBSET_TRIPLES.len());
                for [variable, period, percentile] in SUBSET_TRIPLES {
                    let Some(name) = input.get_text(variable) else {
                        continue;
                    };
                    let code = input.get_text(period).ok_or(missing(period))?;
                    criteria.push(SubsetCriterion {
                        variable: name.to_string(),
                        period: Period::from_code(code).map_err(|_| invalid(period, &code))?,
                        percentile: input.get_float(percentile).ok_or(missing(percentile))?,
                    });
                }
                if criteria.is_empty() {
                    return Err(missing(InputType::SamplingVariable1));
                }
                Ok(SamplingStrategy::Subset(criteria))
            }
        }
    }
}
