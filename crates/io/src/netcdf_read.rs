//! NetCDF → [`Cube`] loading.

use std::collections::BTreeMap;
use std::path::Path;

use ndarray::{ArrayD, IxDyn};
use netcdf::AttributeValue;
use netcdf::types::NcVariableType;
use tracing::debug;
use ukcp_calendar::Calendar;
use ukcp_cube::{Coord, Cube, CubeError};

use crate::error::IoError;
use crate::source::VariableSelector;

/// Variable attributes that describe storage rather than content, and so
/// are not copied onto the cube.
const STORAGE_ATTRIBUTES: [&str; 4] = ["_FillValue", "missing_value", "coordinates", "units"];

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Load one data variable from a NetCDF file as a [`Cube`].
///
/// The variable is chosen by name first; failing that, by the first
/// variable whose `standard_name` is accepted for the selector's quantity
/// class. Dimension variables become dimension coordinates (numeric with
/// optional bounds, or string labels), variables listed in the
/// `coordinates` attribute become auxiliary coordinates, and
/// `_FillValue` / `missing_value` entries become NaN. Global attributes
/// are copied first, then the variable's own attributes over them.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`], [`IoError::MissingVariable`] /
/// [`IoError::NoMatchingVariable`] when no variable qualifies, or
/// [`IoError::Layout`] / [`IoError::Cube`] when the file's structure
/// cannot be represented.
pub fn load_cube(path: &Path, selector: &VariableSelector) -> Result<Cube, IoError> {
    let file = open_file(path)?;
    let var = select_variable(&file, selector, path)?;
    let name = var.name();

    let dim_names: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

    let mut values = var.get_values::<f64, _>(..)?;
    for key in ["_FillValue", "missing_value"] {
        if let Some(fill) = numeric_attribute(&var, key) {
            mask_fill(&mut values, fill);
        }
    }
    let data = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|e| IoError::Layout {
        name: name.clone(),
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let dims = dim_names
        .iter()
        .zip(&shape)
        .map(|(dim, &len)| read_dim_coord(&file, dim, len, path))
        .collect::<Result<Vec<_>, _>>()?;

    let units = string_attribute(&var, "units").unwrap_or_else(|| "1".to_string());
    let mut cube = Cube::new(name.clone(), data, dims, units)?;

    if let Some(listed) = string_attribute(&var, "coordinates") {
        for aux_name in listed.split_whitespace() {
            if cube.coord(aux_name).is_some() {
                continue;
            }
            let Some(aux_var) = file.variable(aux_name) else {
                debug!(variable = %name, aux = aux_name, "listed coordinate not in file");
                continue;
            };
            let axes: Option<Vec<usize>> = aux_var
                .dimensions()
                .iter()
                .map(|d| dim_names.iter().position(|n| *n == d.name()))
                .collect();
            let Some(axes) = axes else {
                debug!(variable = %name, aux = aux_name, "coordinate spans foreign dimensions");
                continue;
            };
            let coord = read_coord(&file, &aux_var, path)?;
            cube.add_aux(coord, axes)?;
        }
    }

    let mut attributes = BTreeMap::new();
    for attr in file.attributes() {
        if let Some(text) = attr.value().ok().and_then(attribute_text) {
            attributes.insert(attr.name().to_string(), text);
        }
    }
    for attr in var.attributes() {
        if STORAGE_ATTRIBUTES.contains(&attr.name()) {
            continue;
        }
        if let Some(text) = attr.value().ok().and_then(attribute_text) {
            attributes.insert(attr.name().to_string(), text);
        }
    }
    cube.set_attributes(attributes);

    debug!(path = %path.display(), cube = %cube.summary(), "loaded cube");
    Ok(cube)
}

fn select_variable<'f>(
    file: &'f netcdf::File,
    selector: &VariableSelector,
    path: &Path,
) -> Result<netcdf::Variable<'f>, IoError> {
    if let Some(var) = file.variable(selector.name()) {
        return Ok(var);
    }
    let Some(quantity) = selector.quantity() else {
        return Err(IoError::MissingVariable {
            name: selector.name().to_string(),
            path: path.to_path_buf(),
        });
    };
    let accepted = quantity.standard_names();
    file.variables()
        .find(|v| {
            string_attribute(v, "standard_name")
                .is_some_and(|s| accepted.contains(&s.as_str()))
        })
        .ok_or_else(|| IoError::NoMatchingVariable {
            quantity: quantity.to_string(),
            accepted: accepted.iter().map(|s| s.to_string()).collect(),
            path: path.to_path_buf(),
        })
}

/// Dimension coordinate: the same-named variable if present, else indices.
fn read_dim_coord(
    file: &netcdf::File,
    dim: &str,
    len: usize,
    path: &Path,
) -> Result<Coord, IoError> {
    let Some(var) = file.variable(dim) else {
        return Ok(Coord::numeric(dim, (0..len).map(|i| i as f64).collect()));
    };
    let coord = read_coord(file, &var, path)?;
    if coord.len() != len {
        return Err(IoError::Layout {
            name: dim.to_string(),
            path: path.to_path_buf(),
            reason: format!("{} values for dimension of length {len}", coord.len()),
        });
    }
    Ok(coord)
}

fn read_coord(
    file: &netcdf::File,
    var: &netcdf::Variable<'_>,
    path: &Path,
) -> Result<Coord, IoError> {
    let name = var.name();

    if matches!(var.vartype(), NcVariableType::String) {
        let labels = match var.dimensions().len() {
            0 => vec![var.get_string(..)?],
            1 => (0..var.len())
                .map(|i| var.get_string([i]))
                .collect::<Result<Vec<_>, _>>()?,
            n => {
                return Err(IoError::Layout {
                    name,
                    path: path.to_path_buf(),
                    reason: format!("{n}-d string coordinates are not supported"),
                });
            }
        };
        return Ok(Coord::labels(name, labels));
    }

    let mut coord = Coord::numeric(name.clone(), var.get_values::<f64, _>(..)?);
    if let Some(units) = string_attribute(var, "units") {
        if units.contains(" since ") {
            let calendar = match string_attribute(var, "calendar") {
                Some(c) => c.parse::<Calendar>().map_err(CubeError::from)?,
                None => Calendar::Standard,
            };
            coord = coord.with_calendar(calendar);
        }
        coord = coord.with_units(units);
    }
    if let Some(bounds) = read_bounds(file, var, path)? {
        coord = coord.with_bounds(bounds)?;
    }
    Ok(coord)
}

/// Cell bounds from the variable named by `bounds`, or `<name>_bnds`.
fn read_bounds(
    file: &netcdf::File,
    var: &netcdf::Variable<'_>,
    path: &Path,
) -> Result<Option<Vec<[f64; 2]>>, IoError> {
    let bounds_name =
        string_attribute(var, "bounds").unwrap_or_else(|| format!("{}_bnds", var.name()));
    let Some(bvar) = file.variable(&bounds_name) else {
        return Ok(None);
    };
    let dims = bvar.dimensions();
    if dims.len() != 2 || dims[1].len() != 2 {
        return Err(IoError::Layout {
            name: bounds_name,
            path: path.to_path_buf(),
            reason: "bounds must have shape (n, 2)".to_string(),
        });
    }
    let flat = bvar.get_values::<f64, _>(..)?;
    Ok(Some(
        flat.chunks_exact(2).map(|pair| [pair[0], pair[1]]).collect(),
    ))
}

fn mask_fill(values: &mut [f64], fill: f64) {
    let tol = fill.abs() * 1e-6;
    for v in values.iter_mut() {
        if (*v - fill).abs() <= tol {
            *v = f64::NAN;
        }
    }
}

fn string_attribute(var: &netcdf::Variable<'_>, key: &str) -> Option<String> {
    var.attribute_value(key)
        .and_then(Result::ok)
        .and_then(attribute_text)
}

fn numeric_attribute(var: &netcdf::Variable<'_>, key: &str) -> Option<f64> {
    match var.attribute_value(key)?.ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Schar(v) => Some(f64::from(v)),
        AttributeValue::Uchar(v) => Some(f64::from(v)),
        AttributeValue::Ushort(v) => Some(f64::from(v)),
        AttributeValue::Uint(v) => Some(f64::from(v)),
        AttributeValue::Longlong(v) => Some(v as f64),
        AttributeValue::Ulonglong(v) => Some(v as f64),
        _ => None,
    }
}

/// Render an attribute value as text; arrays are comma-separated.
fn attribute_text(value: AttributeValue) -> Option<String> {
    fn join<T: ToString>(items: &[T]) -> String {
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    Some(match value {
        AttributeValue::Str(s) => s,
        AttributeValue::Strs(v) => v.join(", "),
        AttributeValue::Double(v) => v.to_string(),
        AttributeValue::Doubles(v) => join(&v),
        AttributeValue::Float(v) => v.to_string(),
        AttributeValue::Floats(v) => join(&v),
        AttributeValue::Int(v) => v.to_string(),
        AttributeValue::Ints(v) => join(&v),
        AttributeValue::Short(v) => v.to_string(),
        AttributeValue::Shorts(v) => join(&v),
        AttributeValue::Longlong(v) => v.to_string(),
        AttributeValue::Longlongs(v) => join(&v),
        AttributeValue::Uint(v) => v.to_string(),
        AttributeValue::Uints(v) => join(&v),
        _ => return None,
    })
}
