//! Cross-field validation rules.

use std::sync::Arc;

use ukcp_input::{AreaInput, InputData, InputError, ValidatedInput, validate};
use ukcp_vocab::{Collection, DataType, InputType, SamplingMethod, TimePeriod, TimeSliceType, Vocabulary};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn base(collection: &str) -> InputData {
    let mut i = InputData::new(Arc::new(Vocabulary::builtin().unwrap()));
    i.set(InputType::Collection, collection, None).unwrap();
    i.set_many(InputType::Variable, ["tas"], None).unwrap();
    i.set(InputType::TemporalAverageType, "mon", None).unwrap();
    i.set_area(&AreaInput::Coordinates {
        kind: "point".into(),
        coords: vec![450_000.0, 250_000.0],
    })
    .unwrap();
    if collection != "land-obs" {
        i.set_many(InputType::Scenario, ["rcp85"], None).unwrap();
    }
    i
}

fn rcm() -> InputData {
    let mut i = base("land-rcm");
    i.set_many(InputType::Ensemble, ["01", "04"], None).unwrap();
    i.set(InputType::YearMinimum, 2000, None).unwrap();
    i.set(InputType::YearMaximum, 2010, None).unwrap();
    i
}

fn prob_samples() -> InputData {
    let mut i = base("land-prob");
    i.set(InputType::Year, 2050, None).unwrap();
    i.set(InputType::DataType, "sample", None).unwrap();
    i
}

fn ok(i: InputData) -> ValidatedInput {
    validate(i).unwrap()
}

fn fails_on(i: InputData, category: InputType) {
    match validate(i) {
        Err(InputError::InvalidParameter { category: c, .. })
        | Err(InputError::Inconsistent { category: c, .. }) => assert_eq!(c, category),
        other => panic!("expected failure on {category}, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Required categories and defaults
// ---------------------------------------------------------------------------

#[test]
fn complete_rcm_request_validates_with_defaults() {
    let v = ok(rcm());
    assert_eq!(v.collection(), Collection::LandRcm);
    assert_eq!(v.year_range(), (2000, 2010));
    assert_eq!(v.spatial_representation(), "12km");
    assert_eq!(v.time_period(), TimePeriod::All);
    assert_eq!(v.get_text(InputType::ColourMode), Some("c"));
    assert_eq!(v.data_type(), None);
    assert_eq!(v.sampling_method(), SamplingMethod::All);
    assert_eq!(v.ensembles(), vec!["01".to_string(), "04".to_string()]);
}

#[test]
fn missing_required_categories() {
    let mut i = rcm();
    i.unset(InputType::Collection);
    fails_on(i, InputType::Collection);

    let mut i = rcm();
    i.unset(InputType::Area);
    fails_on(i, InputType::Area);

    let mut i = rcm();
    i.unset(InputType::TemporalAverageType);
    fails_on(i, InputType::TemporalAverageType);
}

#[test]
fn region_area_forces_region_token() {
    let mut i = rcm();
    i.set(InputType::SpatialRepresentation, "12km", None).unwrap();
    i.set_area(&AreaInput::Named("river_basin|thames".into()))
        .unwrap();
    assert_eq!(ok(i).spatial_representation(), "river");
}

#[test]
fn spatial_representation_must_belong_to_collection() {
    let mut i = rcm();
    i.set(InputType::SpatialRepresentation, "60km", None).unwrap();
    fails_on(i, InputType::SpatialRepresentation);
}

#[test]
fn overlay_flag_must_be_boolean() {
    let mut i = rcm();
    i.set(InputType::OverlayProbabilityLevels, "yes", None)
        .unwrap();
    fails_on(i, InputType::OverlayProbabilityLevels);
}

// ---------------------------------------------------------------------------
// Year slice
// ---------------------------------------------------------------------------

#[test]
fn year_expands_into_minimum_and_maximum() {
    let mut i = rcm();
    i.unset(InputType::YearMinimum);
    i.unset(InputType::YearMaximum);
    i.set(InputType::Year, 2018, None).unwrap();
    let v = ok(i);
    assert_eq!(v.year_range(), (2018, 2018));
    assert_eq!(v.get_int(InputType::YearMinimum), Some(2018));
    assert_eq!(v.get_int(InputType::YearMaximum), Some(2018));
    assert!(!v.is_set(InputType::Year));
}

#[test]
fn year_slice_combinations() {
    // YEAR together with a range.
    let mut i = rcm();
    i.set(InputType::Year, 2005, None).unwrap();
    fails_on(i, InputType::Year);

    // Partial range.
    let mut i = rcm();
    i.unset(InputType::YearMaximum);
    fails_on(i, InputType::YearMaximum);

    let mut i = rcm();
    i.unset(InputType::YearMinimum);
    fails_on(i, InputType::YearMinimum);

    // Nothing at all.
    let mut i = rcm();
    i.unset(InputType::YearMinimum);
    i.unset(InputType::YearMaximum);
    fails_on(i, InputType::Year);
}

#[test]
fn year_order_and_collection_bounds() {
    let mut i = rcm();
    i.set(InputType::YearMinimum, 2011, None).unwrap();
    fails_on(i, InputType::YearMinimum);

    // Regional model runs start in 1981.
    let mut i = rcm();
    i.set(InputType::YearMinimum, 1970, None).unwrap();
    fails_on(i, InputType::YearMinimum);

    let mut i = rcm();
    i.set(InputType::YearMaximum, 2090, None).unwrap();
    fails_on(i, InputType::YearMaximum);

    // Probabilistic projections start in 1961.
    let mut i = base("land-prob");
    i.set(InputType::Year, 1960, None).unwrap();
    fails_on(i, InputType::YearMinimum);
}

// ---------------------------------------------------------------------------
// Scenarios and ensembles
// ---------------------------------------------------------------------------

#[test]
fn projections_need_a_scenario() {
    let mut i = rcm();
    i.unset(InputType::Scenario);
    fails_on(i, InputType::Scenario);
}

#[test]
fn simulations_need_ensembles() {
    let mut i = rcm();
    i.unset(InputType::Ensemble);
    fails_on(i, InputType::Ensemble);
}

#[test]
fn ensemble_membership() {
    // "02" is a global member but not a regional one.
    let mut i = rcm();
    i.set_many(InputType::Ensemble, ["01", "02"], None).unwrap();
    fails_on(i, InputType::Ensemble);

    // Regional model requests also accept CORDEX members.
    let mut i = rcm();
    i.set_many(InputType::Ensemble, ["01", "ICHEC-EC-EARTH_DMI-HIRHAM5"], None)
        .unwrap();
    assert!(validate(i).is_ok());
}

#[test]
fn highlighted_members() {
    let mut i = rcm();
    i.set_many(InputType::HighlightedEnsembleMembers, ["04"], None)
        .unwrap();
    assert!(validate(i).is_ok());

    let mut i = rcm();
    i.set_many(InputType::HighlightedEnsembleMembers, ["05"], None)
        .unwrap();
    fails_on(i, InputType::HighlightedEnsembleMembers);

    let mut i = rcm();
    let members = ["01", "04", "05", "06", "07", "08"];
    i.set_many(InputType::Ensemble, members, None).unwrap();
    i.set_many(InputType::HighlightedEnsembleMembers, members, None)
        .unwrap();
    fails_on(i, InputType::HighlightedEnsembleMembers);
}

// ---------------------------------------------------------------------------
// Time period
// ---------------------------------------------------------------------------

#[test]
fn time_period_must_suit_temporal_average() {
    let mut i = rcm();
    i.set(InputType::TimePeriod, "djf", None).unwrap();
    fails_on(i, InputType::TimePeriod);

    let mut i = rcm();
    i.set(InputType::TimePeriod, "jan", None).unwrap();
    assert_eq!(ok(i).time_period().as_str(), "jan");
}

#[test]
fn all_bypasses_period_list_for_monthly_and_seasonal() {
    let mut i = rcm();
    i.set(InputType::TemporalAverageType, "seas", None).unwrap();
    i.set(InputType::TimePeriod, "all", None).unwrap();
    assert!(ok(i).time_period().is_all());

    let mut i = rcm();
    i.set(InputType::TemporalAverageType, "ann", None).unwrap();
    i.set(InputType::TimePeriod, "all", None).unwrap();
    fails_on(i, InputType::TimePeriod);
}

#[test]
fn annual_defaults_to_ann() {
    let mut i = rcm();
    i.set(InputType::TemporalAverageType, "ann", None).unwrap();
    assert_eq!(ok(i).time_period().as_str(), "ann");
}

// ---------------------------------------------------------------------------
// Baseline
// ---------------------------------------------------------------------------

#[test]
fn earliest_baseline_excluded_for_regional_model() {
    let mut i = rcm();
    i.set(InputType::Baseline, "b6190", None).unwrap();
    fails_on(i, InputType::Baseline);

    let mut i = rcm();
    i.set(InputType::Baseline, "b8110", None).unwrap();
    assert_eq!(ok(i).baseline(), Some("b8110"));
}

#[test]
fn derived_anomaly_needs_baseline_on_simulations() {
    let mut i = rcm();
    i.set_many(InputType::Variable, ["tasAnom"], None).unwrap();
    fails_on(i, InputType::Baseline);
}

#[test]
fn overlay_needs_baseline() {
    let mut i = rcm();
    i.set(InputType::OverlayProbabilityLevels, true, None).unwrap();
    fails_on(i, InputType::Baseline);
}

#[test]
fn probabilistic_defaults() {
    let mut i = base("land-prob");
    i.set(InputType::Year, 2050, None).unwrap();
    let v = ok(i);
    assert_eq!(v.baseline(), Some("b8100"));
    assert_eq!(v.data_type(), Some(DataType::Percentile));
    assert_eq!(v.time_slice_type(), Some(TimeSliceType::OneYear));
    assert_eq!(v.spatial_representation(), "25km");
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

#[test]
fn sampling_needs_probabilistic_samples() {
    let mut i = base("land-prob");
    i.set(InputType::Year, 2050, None).unwrap();
    i.set(InputType::SamplingMethod, "random", None).unwrap();
    i.set(InputType::RandomSamplingCount, 200, None).unwrap();
    fails_on(i, InputType::SamplingMethod);
}

#[test]
fn random_count_range() {
    let mut i = prob_samples();
    i.set(InputType::SamplingMethod, "random", None).unwrap();
    fails_on(i, InputType::RandomSamplingCount);

    let mut i = prob_samples();
    i.set(InputType::SamplingMethod, "random", None).unwrap();
    i.set(InputType::RandomSamplingCount, 99, None).unwrap();
    fails_on(i, InputType::RandomSamplingCount);

    let mut i = prob_samples();
    i.set(InputType::SamplingMethod, "random", None).unwrap();
    i.set(InputType::RandomSamplingCount, 4000, None).unwrap();
    assert_eq!(ok(i).sampling_method(), SamplingMethod::Random);
}

#[test]
fn id_list_size_and_uniqueness() {
    let mut i = prob_samples();
    i.set(InputType::SamplingMethod, "id", None).unwrap();
    i.set_many(InputType::SamplingId, 0..150_i64, None).unwrap();
    assert_eq!(ok(i).sampling_method(), SamplingMethod::Id);

    let mut i = prob_samples();
    i.set(InputType::SamplingMethod, "id", None).unwrap();
    i.set_many(InputType::SamplingId, 0..50_i64, None).unwrap();
    fails_on(i, InputType::SamplingId);

    let mut i = prob_samples();
    i.set(InputType::SamplingMethod, "id", None).unwrap();
    i.set_many(InputType::SamplingId, (0..150_i64).map(|x| x % 100), None)
        .unwrap();
    fails_on(i, InputType::SamplingId);
}

fn subset() -> InputData {
    let mut i = prob_samples();
    i.set(InputType::SamplingMethod, "subset", None).unwrap();
    i.set(InputType::SamplingVariable1, "prAnom", None).unwrap();
    i.set(InputType::SamplingTemporalAverage1, "jja", None).unwrap();
    i.set(InputType::SamplingPercentile1, 50, None).unwrap();
    i
}

#[test]
fn subset_first_triple() {
    assert_eq!(ok(subset()).sampling_method(), SamplingMethod::Subset);

    let mut i = subset();
    i.unset(InputType::SamplingTemporalAverage1);
    fails_on(i, InputType::SamplingTemporalAverage1);

    let mut i = subset();
    i.set(InputType::SamplingPercentile1, 95, None).unwrap();
    fails_on(i, InputType::SamplingPercentile1);

    let mut i = subset();
    i.set(InputType::SamplingTemporalAverage1, "all", None).unwrap();
    fails_on(i, InputType::SamplingTemporalAverage1);
}

#[test]
fn subset_second_triple_all_or_nothing() {
    let mut i = subset();
    i.set(InputType::SamplingVariable2, "tasAnom", None).unwrap();
    fails_on(i, InputType::SamplingTemporalAverage2);

    let mut i = subset();
    i.set(InputType::SamplingVariable2, "tasAnom", None).unwrap();
    i.set(InputType::SamplingTemporalAverage2, "ann", None).unwrap();
    i.set(InputType::SamplingPercentile2, 10, None).unwrap();
    assert!(validate(i).is_ok());
}

#[test]
fn subset_needs_exactly_one_scenario() {
    let mut i = subset();
    i.set_many(InputType::Scenario, ["rcp45", "rcp85"], None)
        .unwrap();
    fails_on(i, InputType::Scenario);
}

// ---------------------------------------------------------------------------
// Purity
// ---------------------------------------------------------------------------

#[test]
fn validation_is_deterministic() {
    assert_eq!(ok(rcm()), ok(rcm()));
}
