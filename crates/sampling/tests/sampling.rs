use std::collections::HashMap;
use std::sync::Arc;

use ndarray::{ArrayD, IxDyn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ukcp_calendar::{Period, Season};
use ukcp_cube::{Coord, Cube, REGION, TIME};
use ukcp_input::{AreaInput, InputData, ValidatedInput, validate};
use ukcp_sampling::{
    SAMPLE, SamplingError, SamplingStrategy, SubsetCriterion, SupportingCubes, sample, subset_ids,
};
use ukcp_vocab::{InputType, Vocabulary};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const N: usize = 100;

/// `N` samples over two time points and one region; sample `i` holds
/// `value(i)` everywhere.
fn cube(name: &str, value: impl Fn(usize) -> f64) -> Cube {
    let data = ArrayD::from_shape_fn(IxDyn(&[N, 2, 1]), |ix| value(ix[0]));
    Cube::new(
        name,
        data,
        vec![
            Coord::numeric(SAMPLE, (0..N).map(|i| i as f64).collect()),
            Coord::numeric(TIME, vec![15.0, 45.0]).with_units("days since 2050-01-01"),
            Coord::labels(REGION, ["Scotland"]),
        ],
        "degC",
    )
    .unwrap()
}

#[derive(Default)]
struct Support(HashMap<(String, Period), Vec<Cube>>);

impl Support {
    fn with(mut self, variable: &str, period: Period, cubes: Vec<Cube>) -> Self {
        self.0.insert((variable.to_string(), period), cubes);
        self
    }
}

impl SupportingCubes for Support {
    fn supporting_cubes(&self, variable: &str, period: Period) -> Result<Vec<Cube>, SamplingError> {
        Ok(self
            .0
            .get(&(variable.to_string(), period))
            .cloned()
            .unwrap_or_default())
    }
}

fn criterion(variable: &str, period: Period, percentile: f64) -> SubsetCriterion {
    SubsetCriterion {
        variable: variable.to_string(),
        period,
        percentile,
    }
}

const JJA: Period = Period::Season(Season::Jja);

fn prob_samples() -> InputData {
    let mut i = InputData::new(Arc::new(Vocabulary::builtin().unwrap()));
    i.set(InputType::Collection, "land-prob", None).unwrap();
    i.set_many(InputType::Variable, ["tasAnom"], None).unwrap();
    i.set_many(InputType::Scenario, ["rcp85"], None).unwrap();
    i.set(InputType::TemporalAverageType, "seas", None).unwrap();
    i.set(InputType::Year, 2050, None).unwrap();
    i.set(InputType::DataType, "sample", None).unwrap();
    i.set_area(&AreaInput::Named("country|scotland".into())).unwrap();
    i
}

fn validated(i: InputData) -> ValidatedInput {
    validate(i).unwrap()
}

// ---------------------------------------------------------------------------
// Subset sampling
// ---------------------------------------------------------------------------

#[test]
fn subset_window_over_ranked_samples() {
    // Descending support: rank r is sample N - 1 - r.
    let support = Support::default().with("tasAnom", JJA, vec![cube("tasAnom", |i| (N - i) as f64)]);
    let ids = subset_ids(N, &[criterion("tasAnom", JJA, 50.0)], &support).unwrap();
    // Ranks [40, 60) are samples 59 down to 40.
    assert_eq!(ids, (40..60).collect::<Vec<_>>());
}

#[test]
fn second_criterion_narrows_the_first() {
    let support = Support::default()
        .with("tasAnom", JJA, vec![cube("tasAnom", |i| (N - i) as f64)])
        .with("prAnom", Period::Annual, vec![cube("prAnom", |i| i as f64)]);
    let ids = subset_ids(
        N,
        &[
            criterion("tasAnom", JJA, 50.0),
            criterion("prAnom", Period::Annual, 10.0),
        ],
        &support,
    )
    .unwrap();
    // 20 remain after the first step; [0, 4) of them by ascending prAnom.
    assert_eq!(ids, [40, 41, 42, 43]);
}

#[test]
fn subset_applies_to_every_cube() {
    let support = Support::default().with("tasAnom", JJA, vec![cube("tasAnom", |i| i as f64)]);
    let cubes = [cube("tasAnom", |i| i as f64), cube("prAnom", |i| 2.0 * i as f64)];
    let out = sample(
        &cubes,
        &SamplingStrategy::Subset(vec![criterion("tasAnom", JJA, 90.0)]),
        &support,
        &mut StdRng::seed_from_u64(0),
    )
    .unwrap();
    assert_eq!(out.len(), 2);
    for c in &out {
        assert_eq!(c.shape(), &[20, 2, 1]);
        assert_eq!(c.dim(SAMPLE).unwrap().points().unwrap()[0], 80.0);
    }
}

#[test]
fn missing_or_ambiguous_support_is_fatal() {
    let c = [criterion("tasAnom", JJA, 50.0)];
    assert!(matches!(
        subset_ids(N, &c, &Support::default()),
        Err(SamplingError::NoSupportingCube { .. })
    ));

    let two = Support::default().with(
        "tasAnom",
        JJA,
        vec![cube("tasAnom", |i| i as f64), cube("tasAnom", |i| i as f64)],
    );
    assert!(matches!(
        subset_ids(N, &c, &two),
        Err(SamplingError::AmbiguousSupportingCubes { count: 2, .. })
    ));
}

#[test]
fn support_with_other_sample_count_is_rejected() {
    let support = Support::default().with("tasAnom", JJA, vec![cube("tasAnom", |i| i as f64)]);
    assert!(matches!(
        subset_ids(N + 1, &[criterion("tasAnom", JJA, 50.0)], &support),
        Err(SamplingError::SampleCountMismatch { .. })
    ));
}

// ---------------------------------------------------------------------------
// Random sampling
// ---------------------------------------------------------------------------

#[test]
fn random_sampling_is_reproducible_under_a_seed() {
    let cubes = [cube("tasAnom", |i| i as f64)];
    let strategy = SamplingStrategy::Random { count: 30 };
    let a = sample(&cubes, &strategy, &Support::default(), &mut StdRng::seed_from_u64(11)).unwrap();
    let b = sample(&cubes, &strategy, &Support::default(), &mut StdRng::seed_from_u64(11)).unwrap();
    assert_eq!(a, b);
    let points = a[0].dim(SAMPLE).unwrap().points().unwrap();
    assert_eq!(points.len(), 30);
    assert!(points.windows(2).all(|w| w[0] < w[1]));
}

// ---------------------------------------------------------------------------
// Strategies from requests
// ---------------------------------------------------------------------------

#[test]
fn default_strategy_is_all() {
    let s = SamplingStrategy::from_input(&validated(prob_samples())).unwrap();
    assert_eq!(s, SamplingStrategy::All);
}

#[test]
fn id_strategy_sorts_ids() {
    let mut i = prob_samples();
    i.set(InputType::SamplingMethod, "id", None).unwrap();
    i.set_many(InputType::SamplingId, (0..100i64).rev(), None).unwrap();
    let s = SamplingStrategy::from_input(&validated(i)).unwrap();
    assert_eq!(s, SamplingStrategy::Ids((0..100).collect()));
}

#[test]
fn random_strategy_reads_the_count() {
    let mut i = prob_samples();
    i.set(InputType::SamplingMethod, "random", None).unwrap();
    i.set(InputType::RandomSamplingCount, 150i64, None).unwrap();
    let s = SamplingStrategy::from_input(&validated(i)).unwrap();
    assert_eq!(s, SamplingStrategy::Random { count: 150 });
}

#[test]
fn subset_strategy_reads_both_triples() {
    let mut i = prob_samples();
    i.set(InputType::SamplingMethod, "subset", None).unwrap();
    i.set(InputType::SamplingVariable1, "tasAnom", None).unwrap();
    i.set(InputType::SamplingTemporalAverage1, "jja", None).unwrap();
    i.set(InputType::SamplingPercentile1, 50.0, None).unwrap();
    i.set(InputType::SamplingVariable2, "prAnom", None).unwrap();
    i.set(InputType::SamplingTemporalAverage2, "ann", None).unwrap();
    i.set(InputType::SamplingPercentile2, 20.0, None).unwrap();
    let s = SamplingStrategy::from_input(&validated(i)).unwrap();
    assert_eq!(
        s,
        SamplingStrategy::Subset(vec![
            criterion("tasAnom", JJA, 50.0),
            criterion("prAnom", Period::Annual, 20.0),
        ])
    );
}
