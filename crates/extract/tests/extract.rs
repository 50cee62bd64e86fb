use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use approx::assert_relative_eq;
use ndarray::{ArrayD, IxDyn};
use ukcp_calendar::Calendar;
use ukcp_cube::{Coord, Cube, PROJECTION_X, PROJECTION_Y, REGION, TIME};
use ukcp_extract::{DataExtractor, ENSEMBLE_MEMBER, ExtractError, PERCENTILE, SAMPLE, title};
use ukcp_files::{DataLayout, FilePathSet, resolve, resolve_overlay};
use ukcp_input::{AreaInput, InputData, ValidatedInput, validate};
use ukcp_io::{CubeSource, IoError, VariableSelector};
use ukcp_vocab::{InputType, Vocabulary};

// ---------------------------------------------------------------------------
// In-memory source
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemorySource {
    cubes: HashMap<PathBuf, Vec<Cube>>,
    loads: RefCell<Vec<String>>,
}

impl MemorySource {
    fn insert(&mut self, pattern: &Path, cubes: Vec<Cube>) {
        self.cubes.insert(pattern.to_path_buf(), cubes);
    }

    /// Serve `make(i)` for the i-th pattern of `set`.
    fn serve(&mut self, set: &FilePathSet, make: impl Fn(usize) -> Cube) {
        let patterns: Vec<PathBuf> = set.patterns().map(Path::to_path_buf).collect();
        for (i, p) in patterns.iter().enumerate() {
            self.insert(p, vec![make(i)]);
        }
    }
}

impl CubeSource for MemorySource {
    fn load(&self, pattern: &Path, selector: &VariableSelector) -> Result<Vec<Cube>, IoError> {
        self.loads.borrow_mut().push(selector.name().to_string());
        self.cubes
            .get(pattern)
            .cloned()
            .ok_or_else(|| IoError::DataNotFound {
                pattern: pattern.display().to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const POINT: [f64; 2] = [450_000.0, 250_000.0];

fn layout() -> DataLayout {
    DataLayout::new("/data", "/obs")
}

/// 24 monthly points from December 2017 on the 360-day calendar.
fn months() -> Coord {
    Coord::time(
        (0..24).map(|m| 15.0 + 30.0 * m as f64).collect(),
        "days since 2017-12-01",
        Calendar::Day360,
    )
}

/// A 2x2 grid of `spacing` metre cells; only the lower-left centre lies
/// inside the point window around [`POINT`].
fn grid(name: &str, spacing: f64, offset: f64, member: &str) -> Cube {
    let x0 = POINT[0] - spacing / 2.0;
    let y0 = POINT[1] - spacing / 2.0;
    let data = ArrayD::from_shape_fn(IxDyn(&[24, 2, 2]), |ix| offset + (ix[0] * 4 + ix[1] * 2 + ix[2]) as f64);
    Cube::new(
        name,
        data,
        vec![
            months(),
            Coord::numeric(PROJECTION_Y, vec![y0, y0 + spacing]),
            Coord::numeric(PROJECTION_X, vec![x0, x0 + spacing]),
        ],
        "degC",
    )
    .unwrap()
    .with_attribute("ensemble_member_id", member)
}

/// Probabilistic percentiles on the 25km grid, laid out like [`grid`].
fn prob_percentiles(name: &str) -> Cube {
    let percentiles = vec![5.0, 10.0, 50.0, 90.0, 95.0];
    let data = ArrayD::from_shape_fn(IxDyn(&[5, 24, 2, 2]), |ix| percentiles[ix[0]] + ix[1] as f64);
    Cube::new(
        name,
        data,
        vec![
            Coord::numeric(PERCENTILE, percentiles.clone()).with_units("%"),
            months(),
            Coord::numeric(PROJECTION_Y, vec![POINT[1] - 12_500.0, POINT[1] + 12_500.0]),
            Coord::numeric(PROJECTION_X, vec![POINT[0] - 12_500.0, POINT[0] + 12_500.0]),
        ],
        "degC",
    )
    .unwrap()
}

/// Probabilistic samples over two countries.
fn prob_samples(name: &str) -> Cube {
    let data = ArrayD::from_shape_fn(IxDyn(&[100, 24, 2]), |ix| ix[0] as f64);
    Cube::new(
        name,
        data,
        vec![
            Coord::numeric(SAMPLE, (1..=100).map(f64::from).collect()),
            months(),
            Coord::labels(REGION, ["Scotland", "Wales"]),
        ],
        "degC",
    )
    .unwrap()
}

fn request(collection: &str, variable: &str) -> InputData {
    let mut i = InputData::new(Arc::new(Vocabulary::builtin().unwrap()));
    i.set(InputType::Collection, collection, None).unwrap();
    i.set_many(InputType::Variable, [variable], None).unwrap();
    i.set_many(InputType::Scenario, ["rcp85"], None).unwrap();
    i.set(InputType::TemporalAverageType, "mon", None).unwrap();
    i.set(InputType::Year, 2018, None).unwrap();
    i
}

fn rcm(period: Option<&str>, overlay: bool) -> ValidatedInput {
    let mut i = request("land-rcm", "tas");
    i.set_many(InputType::Ensemble, ["04", "01"], None).unwrap();
    i.set_area(&AreaInput::Coordinates {
        kind: "point".into(),
        coords: POINT.to_vec(),
    })
    .unwrap();
    if let Some(p) = period {
        i.set(InputType::TimePeriod, p, None).unwrap();
    }
    if overlay {
        i.set(InputType::OverlayProbabilityLevels, true, None).unwrap();
        i.set(InputType::Baseline, "b8100", None).unwrap();
    }
    validate(i).unwrap()
}

fn rcm_source(input: &ValidatedInput) -> (MemorySource, FilePathSet) {
    let files = resolve(input, &layout(), None).unwrap();
    let mut source = MemorySource::default();
    source.serve(&files, |i| grid("tas", 12_000.0, 100.0 * i as f64, &format!("r{i}")));
    (source, files)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn members_merge_and_point_selects_one_cell() {
    let input = rcm(None, false);
    let (source, files) = rcm_source(&input);
    let out = DataExtractor::new(&source)
        .extract(&input, &files, None)
        .unwrap();

    assert_eq!(out.cubes.len(), 1);
    let v = &out.cubes[0];
    assert_eq!(v.variable, "tas");
    assert_eq!(v.scenario.as_deref(), Some("rcp85"));
    assert_eq!(v.cube.attribute("scenario"), Some("rcp85"));
    assert_eq!(v.cube.attribute("ensemble_member_id"), None);
    assert_eq!(v.cube.dim_names(), [ENSEMBLE_MEMBER, TIME, PROJECTION_Y, PROJECTION_X]);
    assert_eq!(v.cube.shape(), &[2, 12, 1, 1]);
    assert_eq!(
        v.cube.dim(ENSEMBLE_MEMBER).unwrap().label_points().unwrap(),
        &["04".to_string(), "01".to_string()]
    );
    // Second member's file carries the +100 offset.
    let data = v.cube.data();
    assert_relative_eq!(data[&[0, 0, 0, 0][..]], 0.0);
    assert_relative_eq!(data[&[1, 0, 0, 0][..]], 100.0);
    assert!(out.overlay.is_empty());
    assert_eq!(*source.loads.borrow(), ["tas", "tas"]);
}

#[test]
fn period_keeps_one_month_and_titles_it() {
    let input = rcm(Some("jan"), false);
    let (source, files) = rcm_source(&input);
    let out = DataExtractor::new(&source)
        .extract(&input, &files, None)
        .unwrap();

    let dates = out.cubes[0].cube.time_dates().unwrap();
    assert_eq!(dates.len(), 1);
    assert_eq!((dates[0].year(), dates[0].month()), (2018, 1));
    assert_eq!(
        out.title,
        "January 2018, Mean air temperature at 1.5m (°C), Grid point 450000, 250000"
    );
    assert_eq!(title(&input), out.title);
}

#[test]
fn missing_file_propagates_not_found() {
    let input = rcm(None, false);
    let files = resolve(&input, &layout(), None).unwrap();
    let source = MemorySource::default();
    let err = DataExtractor::new(&source)
        .extract(&input, &files, None)
        .unwrap_err();
    assert!(matches!(err, ExtractError::Io(IoError::DataNotFound { .. })));
}

#[test]
fn years_without_data_are_not_found() {
    let mut i = request("land-rcm", "tas");
    i.set_many(InputType::Ensemble, ["01"], None).unwrap();
    i.set(InputType::Year, 2040, None).unwrap();
    i.set_area(&AreaInput::Coordinates {
        kind: "point".into(),
        coords: POINT.to_vec(),
    })
    .unwrap();
    let input = validate(i).unwrap();
    let (source, files) = rcm_source(&input);
    let err = DataExtractor::new(&source)
        .extract(&input, &files, None)
        .unwrap_err();
    assert!(matches!(err, ExtractError::DataNotFound { .. }));
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

#[test]
fn overlay_loads_probabilistic_levels_at_fallback_resolution() {
    let input = rcm(None, true);
    let (mut source, files) = rcm_source(&input);
    let overlay_files = resolve_overlay(&input, &layout()).unwrap();
    source.serve(&overlay_files, |_| prob_percentiles("tasAnom"));

    let out = DataExtractor::new(&source)
        .extract(&input, &files, Some(&overlay_files))
        .unwrap();

    assert_eq!(out.overlay.len(), 1);
    let levels = &out.overlay[0];
    assert_eq!(levels.shape(), &[3, 12, 1, 1]);
    assert_eq!(
        levels.dim(PERCENTILE).unwrap().points(),
        Some(&[10.0, 50.0, 90.0][..])
    );
    // Each level is its percentile plus the month offset.
    let data = levels.data();
    for t in 0..12 {
        assert_relative_eq!(data[&[1, t, 0, 0][..]] - data[&[0, t, 0, 0][..]], 40.0);
        assert_relative_eq!(data[&[2, t, 0, 0][..]] - data[&[1, t, 0, 0][..]], 40.0);
    }
}

#[test]
fn overlay_without_files_is_an_error() {
    let input = rcm(None, true);
    let (source, files) = rcm_source(&input);
    let err = DataExtractor::new(&source)
        .extract(&input, &files, None)
        .unwrap_err();
    assert!(matches!(err, ExtractError::MissingOverlay));
}

#[test]
fn sample_overlay_collapses_samples() {
    let mut i = request("land-prob", "tasAnom");
    i.set(InputType::DataType, "sample", None).unwrap();
    i.set(InputType::OverlayProbabilityLevels, true, None).unwrap();
    i.set_area(&AreaInput::Named("country|scotland".into())).unwrap();
    let input = validate(i).unwrap();

    let files = resolve(&input, &layout(), None).unwrap();
    let mut source = MemorySource::default();
    source.serve(&files, |_| prob_samples("tasAnom"));

    let out = DataExtractor::new(&source)
        .extract(&input, &files, None)
        .unwrap();

    let cube = &out.cubes[0].cube;
    assert_eq!(cube.dim_names(), [SAMPLE, TIME, REGION]);
    assert_eq!(cube.shape(), &[100, 12, 1]);

    assert_eq!(out.overlay.len(), 1);
    let levels = &out.overlay[0];
    assert_eq!(levels.dim_names(), [PERCENTILE, TIME, REGION]);
    assert_eq!(
        levels.dim(PERCENTILE).unwrap().points(),
        Some(&[10.0, 50.0, 90.0][..])
    );
    // Sample values 0..=99 interpolated between ranks.
    let data = levels.data();
    assert_relative_eq!(data[&[0, 0, 0][..]], 9.9, epsilon = 1e-9);
    assert_relative_eq!(data[&[1, 0, 0][..]], 49.5, epsilon = 1e-9);
    assert_relative_eq!(data[&[2, 11, 0][..]], 89.1, epsilon = 1e-9);
}
