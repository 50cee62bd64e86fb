//! Cross-field validation of selection criteria.
//!
//! [`validate`] runs a fixed sequence of checks and stops at the first
//! violation. Some checks also fill in defaults (spatial representation,
//! colour mode, time period, baseline and the probabilistic data type and
//! time slice), so the returned [`ValidatedInput`] is complete for the
//! collection it targets.

use std::collections::BTreeSet;
use std::ops::{Deref, RangeInclusive};
use std::str::FromStr;

use tracing::debug;
use ukcp_vocab::{
    Collection, CollectionSpec, DataType, InputType, SamplingMethod, TemporalAverageType,
    TimePeriod, TimeSliceType, Vocabulary,
};

use crate::area::Area;
use crate::error::InputError;
use crate::input::InputData;

/// Baseline used by probabilistic requests that name none.
pub const DEFAULT_PROBABILISTIC_BASELINE: &str = "b8100";

/// Accepted number of explicit sample ids, and of random draws.
pub const SAMPLE_COUNT_RANGE: RangeInclusive<i64> = 100..=4000;

/// Accepted subset-sampling percentiles.
pub const SUBSET_PERCENTILE_RANGE: RangeInclusive<f64> = 10.0..=90.0;

/// Most ensemble members that may be highlighted.
pub const MAX_HIGHLIGHTED_MEMBERS: usize = 5;

/// Selection criteria that passed [`validate`].
///
/// Derefs to the underlying [`InputData`] for labels and raw values; the
/// typed accessors return the parsed form of the categories every request
/// has after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    data: InputData,
    area: Area,
    collection: Collection,
    temporal_average_type: TemporalAverageType,
    time_period: TimePeriod,
    years: (i32, i32),
    spatial_representation: String,
    data_type: Option<DataType>,
    time_slice_type: Option<TimeSliceType>,
    sampling_method: SamplingMethod,
}

impl Deref for ValidatedInput {
    type Target = InputData;

    fn deref(&self) -> &InputData {
        &self.data
    }
}

impl ValidatedInput {
    /// The validated criteria.
    pub fn input(&self) -> &InputData {
        &self.data
    }

    /// Consume into the underlying criteria.
    pub fn into_inner(self) -> InputData {
        self.data
    }

    /// Parsed area.
    pub fn area(&self) -> &Area {
        &self.area
    }

    /// Dataset collection.
    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Temporal averaging granularity.
    pub fn temporal_average_type(&self) -> TemporalAverageType {
        self.temporal_average_type
    }

    /// Requested time period (`all` when none was given).
    pub fn time_period(&self) -> TimePeriod {
        self.time_period
    }

    /// Inclusive `(first, last)` meteorological years.
    pub fn year_range(&self) -> (i32, i32) {
        self.years
    }

    /// Spatial representation after defaulting.
    pub fn spatial_representation(&self) -> &str {
        &self.spatial_representation
    }

    /// Probabilistic data type; `None` outside `land-prob`.
    pub fn data_type(&self) -> Option<DataType> {
        self.data_type
    }

    /// Probabilistic time slice; `None` outside `land-prob`.
    pub fn time_slice_type(&self) -> Option<TimeSliceType> {
        self.time_slice_type
    }

    /// Sampling method (`all` when none was given).
    pub fn sampling_method(&self) -> SamplingMethod {
        self.sampling_method
    }

    /// Requested variables, in request order.
    pub fn variables(&self) -> Vec<String> {
        self.data.get_many_text(InputType::Variable).unwrap_or_default()
    }

    /// Requested scenarios, in request order (empty for observations).
    pub fn scenarios(&self) -> Vec<String> {
        self.data.get_many_text(InputType::Scenario).unwrap_or_default()
    }

    /// Requested ensemble members, in request order.
    pub fn ensembles(&self) -> Vec<String> {
        self.data.get_many_text(InputType::Ensemble).unwrap_or_default()
    }

    /// Baseline id, if any.
    pub fn baseline(&self) -> Option<&str> {
        self.data.get_text(InputType::Baseline)
    }

    /// Whether 10th/50th/90th percentile overlays were requested.
    pub fn overlay_probability_levels(&self) -> bool {
        self.data
            .get_bool(InputType::OverlayProbabilityLevels)
            .unwrap_or(false)
    }

    /// Requested percentiles, if restricted.
    pub fn percentiles(&self) -> Option<Vec<f64>> {
        self.data
            .get_many(InputType::Percentiles)
            .map(|v| v.iter().filter_map(|p| p.as_float()).collect())
    }
}

/// Validate criteria, filling in defaults.
///
/// Checks run in this order, each failing fast:
///
/// 1. collection, variable, area and temporal average type are present;
/// 2. spatial representation (region token for region areas, else the
///    collection default) belongs to the collection;
/// 3. flags are booleans;
/// 4. exactly `YEAR` or both `YEAR_MINIMUM`/`YEAR_MAXIMUM`, ordered and
///    within bounds; `YEAR` is expanded into both;
/// 5. colour mode defaults to `c`;
/// 6. scenarios and ensemble members suit the collection;
/// 7. highlighted members are few enough and requested;
/// 8. the time period suits the temporal average type;
/// 9. the baseline is allowed and present where needed;
/// 10. probabilistic data type and time slice defaults;
/// 11. sampling-method parameters.
///
/// # Errors
///
/// Returns the first [`InputError`] encountered.
pub fn validate(mut input: InputData) -> Result<ValidatedInput, InputError> {
    let vocab = std::sync::Arc::clone(input.vocabulary());

    // 1. Required categories.
    let collection: Collection = parse_required(&input, InputType::Collection)?;
    if input.get_many(InputType::Variable).is_none() {
        return Err(InputError::missing(InputType::Variable));
    }
    let area = input
        .area()
        .cloned()
        .ok_or_else(|| InputError::missing(InputType::Area))?;
    let tat: TemporalAverageType = parse_required(&input, InputType::TemporalAverageType)?;
    let spec = vocab
        .collection(collection)
        .ok_or_else(|| InputError::invalid(InputType::Collection, collection))?;

    let spatial_representation = check_spatial_representation(&mut input, &area, collection, spec)?;
    check_flags(&input)?;
    let years = check_years(&mut input, collection, spec, &vocab)?;
    if !input.is_set(InputType::ColourMode) {
        input.set(InputType::ColourMode, "c", None)?;
    }
    check_ensembles(&input, collection, spec, &vocab)?;
    check_highlighted(&input)?;
    let time_period = check_time_period(&mut input, tat, &vocab)?;
    check_baseline(&mut input, collection, &vocab)?;
    let (data_type, time_slice_type) = probabilistic_defaults(&mut input, collection)?;
    let sampling_method = check_sampling(&input, collection, data_type)?;

    debug!(
        %collection,
        tat = %tat,
        time_period = %time_period,
        first_year = years.0,
        last_year = years.1,
        spatial = %spatial_representation,
        "criteria validated"
    );

    Ok(ValidatedInput {
        data: input,
        area,
        collection,
        temporal_average_type: tat,
        time_period,
        years,
        spatial_representation,
        data_type,
        time_slice_type,
        sampling_method,
    })
}

// ---------------------------------------------------------------------------
// Individual checks
// ---------------------------------------------------------------------------

fn parse_required<T: FromStr>(input: &InputData, category: InputType) -> Result<T, InputError> {
    let text = input
        .get_text(category)
        .ok_or_else(|| InputError::missing(category))?;
    text.parse().map_err(|_| InputError::invalid(category, text))
}

fn parse_optional<T: FromStr>(input: &InputData, category: InputType) -> Result<Option<T>, InputError> {
    input
        .get_text(category)
        .map(|text| text.parse().map_err(|_| InputError::invalid(category, text)))
        .transpose()
}

fn check_spatial_representation(
    input: &mut InputData,
    area: &Area,
    collection: Collection,
    spec: &CollectionSpec,
) -> Result<String, InputError> {
    let category = InputType::SpatialRepresentation;
    let spatial = match area.kind().region_token() {
        Some(token) => {
            if input.get_text(category).is_some_and(|s| s != token) {
                debug!(token, "spatial representation replaced by region token");
            }
            input.set(category, token, None)?;
            token.to_string()
        }
        None => match input.get_text(category).map(str::to_string) {
            Some(s) => {
                if ["country", "region", "river"].contains(&s.as_str()) {
                    return Err(InputError::inconsistent(
                        category,
                        format!("{s} needs a {s} area, not a {}", area.kind()),
                    ));
                }
                s
            }
            None => {
                input.set(category, spec.default_resolution.as_str(), None)?;
                spec.default_resolution.clone()
            }
        },
    };
    if !spec.resolutions.contains(&spatial) {
        return Err(InputError::inconsistent(
            category,
            format!("{spatial} is not published for {collection}"),
        ));
    }
    Ok(spatial)
}

fn check_flags(input: &InputData) -> Result<(), InputError> {
    let category = InputType::OverlayProbabilityLevels;
    match input.get_single(category) {
        Some(v) if v.as_bool().is_none() => Err(InputError::invalid(category, v)),
        _ => Ok(()),
    }
}

fn year(input: &InputData, category: InputType) -> Result<Option<i32>, InputError> {
    let Some(v) = input.get_single(category) else {
        return Ok(None);
    };
    v.as_int()
        .and_then(|y| i32::try_from(y).ok())
        .map(Some)
        .ok_or_else(|| InputError::invalid(category, v))
}

fn check_years(
    input: &mut InputData,
    collection: Collection,
    spec: &CollectionSpec,
    vocab: &Vocabulary,
) -> Result<(i32, i32), InputError> {
    let single = year(input, InputType::Year)?;
    let min = year(input, InputType::YearMinimum)?;
    let max = year(input, InputType::YearMaximum)?;

    let (first, last) = match (single, min, max) {
        (Some(y), None, None) => {
            input.unset(InputType::Year);
            input.set(InputType::YearMinimum, y, None)?;
            input.set(InputType::YearMaximum, y, None)?;
            (y, y)
        }
        (None, Some(a), Some(b)) => (a, b),
        (Some(_), _, _) => {
            return Err(InputError::inconsistent(
                InputType::Year,
                "set either year or year_minimum and year_maximum, not both",
            ));
        }
        (None, None, None) => return Err(InputError::missing(InputType::Year)),
        (None, None, Some(_)) => return Err(InputError::missing(InputType::YearMinimum)),
        (None, Some(_), None) => return Err(InputError::missing(InputType::YearMaximum)),
    };

    if first > last {
        return Err(InputError::inconsistent(
            InputType::YearMinimum,
            format!("{first} is after year_maximum {last}"),
        ));
    }
    let (vocab_min, vocab_max) = vocab.year_bounds();
    let lower = spec.min_year.max(vocab_min);
    let upper = spec.max_year.min(vocab_max);
    if first < lower {
        return Err(InputError::inconsistent(
            InputType::YearMinimum,
            format!("{first} is before {lower}, the first year of {collection}"),
        ));
    }
    if last > upper {
        return Err(InputError::inconsistent(
            InputType::YearMaximum,
            format!("{last} is after {upper}, the last year of {collection}"),
        ));
    }
    Ok((first, last))
}

fn check_ensembles(
    input: &InputData,
    collection: Collection,
    spec: &CollectionSpec,
    vocab: &Vocabulary,
) -> Result<(), InputError> {
    if !collection.is_observation() && input.get_many(InputType::Scenario).is_none() {
        return Err(InputError::missing(InputType::Scenario));
    }

    let Some(members) = input.get_many_text(InputType::Ensemble) else {
        if collection.is_simulation() {
            return Err(InputError::missing(InputType::Ensemble));
        }
        return Ok(());
    };

    let mut valid: BTreeSet<&str> = spec.ensembles.iter().map(String::as_str).collect();
    if collection.is_regional_model() {
        for c in [Collection::LandRcm, Collection::LandCordex] {
            if let Some(s) = vocab.collection(c) {
                valid.extend(s.ensembles.iter().map(String::as_str));
            }
        }
    }
    match members.iter().find(|m| !valid.contains(m.as_str())) {
        Some(m) => Err(InputError::inconsistent(
            InputType::Ensemble,
            format!("{m} is not a member of {collection}"),
        )),
        None => Ok(()),
    }
}

fn check_highlighted(input: &InputData) -> Result<(), InputError> {
    let category = InputType::HighlightedEnsembleMembers;
    let Some(highlighted) = input.get_many_text(category) else {
        return Ok(());
    };
    if highlighted.len() > MAX_HIGHLIGHTED_MEMBERS {
        return Err(InputError::inconsistent(
            category,
            format!(
                "{} members highlighted, at most {MAX_HIGHLIGHTED_MEMBERS} allowed",
                highlighted.len()
            ),
        ));
    }
    let requested = input.get_many_text(InputType::Ensemble).unwrap_or_default();
    match highlighted.iter().find(|h| !requested.contains(h)) {
        Some(h) => Err(InputError::inconsistent(
            category,
            format!("{h} is not a requested ensemble member"),
        )),
        None => Ok(()),
    }
}

fn check_time_period(
    input: &mut InputData,
    tat: TemporalAverageType,
    vocab: &Vocabulary,
) -> Result<TimePeriod, InputError> {
    let category = InputType::TimePeriod;
    let Some(code) = input.get_text(category).map(str::to_string) else {
        let default = if tat == TemporalAverageType::Annual {
            "ann"
        } else {
            "all"
        };
        input.set(category, default, None)?;
        return default.parse().map_err(|_| InputError::invalid(category, default));
    };

    let all_bypass = code == "all"
        && matches!(tat, TemporalAverageType::Monthly | TemporalAverageType::Seasonal);
    if !all_bypass && !vocab.time_periods(tat).contains(&code) {
        return Err(InputError::inconsistent(
            category,
            format!("{code} is not a {tat} period"),
        ));
    }
    code.parse().map_err(|_| InputError::invalid(category, code))
}

fn check_baseline(
    input: &mut InputData,
    collection: Collection,
    vocab: &Vocabulary,
) -> Result<(), InputError> {
    let category = InputType::Baseline;

    if let Some(baseline) = input.get_text(category)
        && collection.is_regional_model()
        && vocab.baselines_by_start().first() == Some(&baseline)
    {
        return Err(InputError::inconsistent(
            category,
            format!("{baseline} is not available for {collection}"),
        ));
    }

    if collection.is_probabilistic() && !input.is_set(category) {
        input.set(category, DEFAULT_PROBABILISTIC_BASELINE, None)?;
    }

    let derived = input
        .get_many_text(InputType::Variable)
        .unwrap_or_default()
        .iter()
        .any(|v| vocab.variable(v).is_some_and(|s| s.is_anomaly()));
    let needs_baseline = (derived && (collection.is_simulation() || collection.is_observation()))
        || input
            .get_bool(InputType::OverlayProbabilityLevels)
            .unwrap_or(false);
    if needs_baseline && !input.is_set(category) {
        return Err(InputError::missing(category));
    }
    Ok(())
}

fn probabilistic_defaults(
    input: &mut InputData,
    collection: Collection,
) -> Result<(Option<DataType>, Option<TimeSliceType>), InputError> {
    if !collection.is_probabilistic() {
        return Ok((None, None));
    }
    if !input.is_set(InputType::DataType) {
        input.set(InputType::DataType, DataType::Percentile.as_str(), None)?;
    }
    if !input.is_set(InputType::TimeSliceType) {
        input.set(InputType::TimeSliceType, TimeSliceType::OneYear.as_str(), None)?;
    }
    Ok((
        parse_optional(input, InputType::DataType)?,
        parse_optional(input, InputType::TimeSliceType)?,
    ))
}

fn check_sampling(
    input: &InputData,
    collection: Collection,
    data_type: Option<DataType>,
) -> Result<SamplingMethod, InputError> {
    let method = parse_optional(input, InputType::SamplingMethod)?.unwrap_or(SamplingMethod::All);
    if method == SamplingMethod::All {
        return Ok(method);
    }
    if !collection.is_probabilistic() || data_type != Some(DataType::Sample) {
        return Err(InputError::inconsistent(
            InputType::SamplingMethod,
            format!("{method} sampling needs probabilistic sample data"),
        ));
    }

    match method {
        SamplingMethod::All => {}
        SamplingMethod::Id => {
            let category = InputType::SamplingId;
            let ids = input
                .get_many_int(category)
                .ok_or_else(|| InputError::missing(category))?;
            if !SAMPLE_COUNT_RANGE.contains(&(ids.len() as i64)) {
                return Err(InputError::inconsistent(
                    category,
                    format!(
                        "{} ids given, between {} and {} required",
                        ids.len(),
                        SAMPLE_COUNT_RANGE.start(),
                        SAMPLE_COUNT_RANGE.end()
                    ),
                ));
            }
            if let Some(id) = ids.iter().find(|&&id| id < 0) {
                return Err(InputError::invalid(category, id));
            }
            let unique: BTreeSet<i64> = ids.iter().copied().collect();
            if unique.len() != ids.len() {
                return Err(InputError::inconsistent(category, "ids must be unique"));
            }
        }
        SamplingMethod::Random => {
            let category = InputType::RandomSamplingCount;
            let count = input
                .get_int(category)
                .ok_or_else(|| InputError::missing(category))?;
            if !SAMPLE_COUNT_RANGE.contains(&count) {
                return Err(InputError::invalid(category, count));
            }
        }
        SamplingMethod::Subset => {
            check_subset_triple(
                input,
                [
                    InputType::SamplingVariable1,
                    InputType::SamplingTemporalAverage1,
                    InputType::SamplingPercentile1,
                ],
                true,
            )?;
            check_subset_triple(
                input,
                [
                    InputType::SamplingVariable2,
                    InputType::SamplingTemporalAverage2,
                    InputType::SamplingPercentile2,
                ],
                false,
            )?;
            let scenarios = input.get_many(InputType::Scenario).map_or(0, <[_]>::len);
            if scenarios != 1 {
                return Err(InputError::inconsistent(
                    InputType::Scenario,
                    format!("subset sampling needs exactly one scenario, got {scenarios}"),
                ));
            }
        }
    }
    Ok(method)
}

/// `[variable, temporal average, percentile]`; a required triple must be
/// complete, an optional one complete or absent.
fn check_subset_triple(
    input: &InputData,
    triple: [InputType; 3],
    required: bool,
) -> Result<(), InputError> {
    let present = triple.map(|c| input.is_set(c));
    if !required && present.iter().all(|p| !p) {
        return Ok(());
    }
    if let Some(i) = present.iter().position(|p| !p) {
        return Err(InputError::missing(triple[i]));
    }

    let [_, period, percentile] = triple;
    if input.get_text(period) == Some("all") {
        return Err(InputError::invalid(period, "all"));
    }
    let value = input
        .get_float(percentile)
        .ok_or_else(|| InputError::missing(percentile))?;
    if !SUBSET_PERCENTILE_RANGE.contains(&value) {
        return Err(InputError::invalid(percentile, value));
    }
    Ok(())
}
