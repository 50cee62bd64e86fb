//! Integration tests for loading NetCDF fixtures into cubes.

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use tempfile::tempdir;
use ukcp_calendar::Calendar;
use ukcp_io::{CubeSource, IoError, NetcdfSource, VariableSelector, load_cube};
use ukcp_vocab::QuantityClass;

// ---------------------------------------------------------------------------
// Helper: programmatic NetCDF fixture builders
// ---------------------------------------------------------------------------

/// Gridded monthly file: `tas(time, projection_y_coordinate,
/// projection_x_coordinate)` on a 360-day calendar with time bounds and a
/// `month_number` auxiliary coordinate.
fn write_grid(path: &Path, var_name: &str, first_day: f64, fill: Option<f64>) {
    let nt = 3;
    let ny = 2;
    let nx = 2;
    let mut file = netcdf::create(path).expect("create file");

    file.add_dimension("time", nt).expect("dim time");
    file.add_dimension("projection_y_coordinate", ny).expect("dim y");
    file.add_dimension("projection_x_coordinate", nx).expect("dim x");
    file.add_dimension("bnds", 2).expect("dim bnds");

    file.add_attribute("collection", "land-rcm").expect("global attr");
    file.add_attribute("ensemble_member_id", "01").expect("global attr");

    {
        let points: Vec<f64> = (0..nt).map(|i| first_day + 15.0 + 30.0 * i as f64).collect();
        let mut var = file.add_variable::<f64>("time", &["time"]).expect("var time");
        var.put_values(&points, ..).expect("time values");
        var.put_attribute("units", "days since 1970-01-01 00:00:00")
            .expect("time units");
        var.put_attribute("calendar", "360_day").expect("calendar");
        var.put_attribute("bounds", "time_bnds").expect("bounds attr");
    }
    {
        let bounds: Vec<f64> = (0..nt)
            .flat_map(|i| {
                let start = first_day + 30.0 * i as f64;
                [start, start + 30.0]
            })
            .collect();
        let mut var = file
            .add_variable::<f64>("time_bnds", &["time", "bnds"])
            .expect("var time_bnds");
        var.put_values(&bounds, ..).expect("bounds values");
    }
    {
        let mut var = file
            .add_variable::<f64>("projection_y_coordinate", &["projection_y_coordinate"])
            .expect("var y");
        var.put_values(&[6000.0, 18000.0], ..).expect("y values");
        var.put_attribute("units", "m").expect("y units");
    }
    {
        let mut var = file
            .add_variable::<f64>("projection_x_coordinate", &["projection_x_coordinate"])
            .expect("var x");
        var.put_values(&[6000.0, 18000.0], ..).expect("x values");
        var.put_attribute("units", "m").expect("x units");
    }
    {
        let mut var = file
            .add_variable::<i32>("month_number", &["time"])
            .expect("var month_number");
        var.put_values(&[12, 1, 2], ..).expect("month values");
    }
    {
        let data: Vec<f64> = (0..nt * ny * nx).map(|i| 280.0 + i as f64).collect();
        let mut var = file
            .add_variable::<f64>(
                var_name,
                &["time", "projection_y_coordinate", "projection_x_coordinate"],
            )
            .expect("var data");
        if let Some(fv) = fill {
            var.put_attribute("_FillValue", fv).expect("fill value");
        }
        var.put_attribute("units", "K").expect("data units");
        var.put_attribute("standard_name", "air_temperature")
            .expect("standard name");
        var.put_attribute("coordinates", "month_number").expect("coordinates");
        let mut data = data;
        if let Some(fv) = fill {
            data[0] = fv;
        }
        var.put_values(&data, ..).expect("data values");
    }
}

/// Region file: `pr(time, region)` with string region labels.
fn write_regions(path: &Path) {
    let mut file = netcdf::create(path).expect("create file");
    file.add_dimension("time", 2).expect("dim time");
    file.add_dimension("region", 2).expect("dim region");
    {
        let mut var = file.add_variable::<f64>("time", &["time"]).expect("var time");
        var.put_values(&[15.0, 45.0], ..).expect("time values");
        var.put_attribute("units", "days since 2000-01-01")
            .expect("time units");
    }
    {
        let mut var = file
            .add_string_variable("region", &["region"])
            .expect("var region");
        var.put_string("East Anglia", [0]).expect("label 0");
        var.put_string("North Scotland", [1]).expect("label 1");
    }
    {
        let mut var = file
            .add_variable::<f32>("pr", &["time", "region"])
            .expect("var pr");
        var.put_attribute("units", "mm/day").expect("units");
        var.put_attribute("standard_name", "lwe_precipitation_rate")
            .expect("standard name");
        var.put_values(&[1.5_f32, 2.5, 3.5, 4.5], ..).expect("values");
    }
}

fn grid_fixture(dir: &Path, name: &str, first_day: f64) -> PathBuf {
    let path = dir.join(name);
    write_grid(&path, "tas", first_day, None);
    path
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn grid_loads_dims_units_and_calendar() {
    let dir = tempdir().unwrap();
    let path = grid_fixture(dir.path(), "tas.nc", 0.0);

    let cube = load_cube(&path, &VariableSelector::named("tas")).unwrap();
    assert_eq!(cube.name(), "tas");
    assert_eq!(cube.units(), "K");
    assert_eq!(
        cube.dim_names(),
        vec!["time", "projection_y_coordinate", "projection_x_coordinate"]
    );
    assert_eq!(cube.shape(), &[3, 2, 2]);
    assert!(cube.is_canonical());

    let time = cube.dim("time").unwrap();
    assert_eq!(time.calendar(), Some(Calendar::Day360));
    assert_eq!(time.bounds().unwrap()[1], [30.0, 60.0]);

    let dates = cube.time_dates().unwrap();
    assert_eq!(dates[0].month(), 1);
    assert_eq!(dates[0].day(), 16);
    assert_eq!(dates[1].month(), 2);
}

#[test]
fn aux_coords_and_attributes_are_loaded() {
    let dir = tempdir().unwrap();
    let path = grid_fixture(dir.path(), "tas.nc", 0.0);

    let cube = load_cube(&path, &VariableSelector::named("tas")).unwrap();
    let month = cube.aux("month_number").unwrap();
    assert_eq!(month.dims(), &[0]);
    assert_eq!(month.coord().points().unwrap(), &[12.0, 1.0, 2.0]);

    assert_eq!(cube.attribute("collection"), Some("land-rcm"));
    assert_eq!(cube.attribute("ensemble_member_id"), Some("01"));
    assert_eq!(cube.attribute("standard_name"), Some("air_temperature"));
    assert_eq!(cube.attribute("coordinates"), None);
    assert_eq!(cube.attribute("units"), None);
}

#[test]
fn fill_value_becomes_nan() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tas.nc");
    write_grid(&path, "tas", 0.0, Some(1.0e20));

    let cube = load_cube(&path, &VariableSelector::named("tas")).unwrap();
    assert!(cube.data()[[0, 0, 0]].is_nan());
    assert_relative_eq!(cube.data()[[0, 0, 1]], 281.0);
}

#[test]
fn falls_back_to_standard_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tas.nc");
    write_grid(&path, "air_temp", 0.0, None);

    let selector = VariableSelector::named("tasAnom").with_quantity(QuantityClass::Temperature);
    let cube = load_cube(&path, &selector).unwrap();
    assert_eq!(cube.name(), "air_temp");
}

#[test]
fn unknown_variable_without_quantity_is_missing() {
    let dir = tempdir().unwrap();
    let path = grid_fixture(dir.path(), "tas.nc", 0.0);

    let err = load_cube(&path, &VariableSelector::named("pr")).unwrap_err();
    assert!(matches!(err, IoError::MissingVariable { .. }));
}

#[test]
fn wrong_quantity_is_no_matching_variable() {
    let dir = tempdir().unwrap();
    let path = grid_fixture(dir.path(), "tas.nc", 0.0);

    let selector = VariableSelector::named("pr").with_quantity(QuantityClass::PrecipitationRate);
    let err = load_cube(&path, &selector).unwrap_err();
    assert!(matches!(err, IoError::NoMatchingVariable { .. }));
}

#[test]
fn string_region_labels() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pr.nc");
    write_regions(&path);

    let cube = load_cube(&path, &VariableSelector::named("pr")).unwrap();
    assert_eq!(cube.dim_names(), vec!["time", "region"]);
    assert_eq!(
        cube.dim("region").unwrap().label_points().unwrap(),
        &["East Anglia".to_string(), "North Scotland".to_string()]
    );
    assert_eq!(cube.units(), "mm/day");
    assert_relative_eq!(cube.data()[[1, 0]], 3.5);
    // No calendar attribute: standard calendar.
    assert_eq!(cube.dim("time").unwrap().calendar(), Some(Calendar::Standard));
}

#[test]
fn source_expands_and_loads_in_path_order() {
    let dir = tempdir().unwrap();
    grid_fixture(dir.path(), "tas_rcp85_19801201-19810230.nc", 0.0);
    grid_fixture(dir.path(), "tas_rcp85_19810301-19810530.nc", 90.0);

    let cubes = NetcdfSource
        .load(&dir.path().join("tas_rcp85_*.nc"), &VariableSelector::named("tas"))
        .unwrap();
    assert_eq!(cubes.len(), 2);
    let first = cubes[0].dim("time").unwrap().points().unwrap()[0];
    let second = cubes[1].dim("time").unwrap().points().unwrap()[0];
    assert!(first < second);
}

#[test]
fn source_reports_missing_data() {
    let dir = tempdir().unwrap();
    let err = NetcdfSource
        .load(&dir.path().join("tas_*.nc"), &VariableSelector::named("tas"))
        .unwrap_err();
    assert!(matches!(err, IoError::DataNotFound { .. }));
}
