//! Operations combining or reducing cubes.

use ndarray::{ArrayD, Axis, Zip};

use crate::coord::Coord;
use crate::cube::{Cube, TIME};
use crate::error::CubeError;

fn mismatch(reason: impl Into<String>, left: &Cube, right: &Cube) -> CubeError {
    let err = CubeError::Mismatch {
        reason: reason.into(),
        left: left.summary(),
        right: right.summary(),
    };
    tracing::error!("{err}");
    err
}

// ---------------------------------------------------------------------------
// Concatenation and merging
// ---------------------------------------------------------------------------

/// Join cubes end to end along an existing dimension.
///
/// Every other dimension coordinate, the units, the attributes and every
/// auxiliary coordinate not spanning `dim` must agree. Auxiliary
/// coordinates along `dim` are joined with the data. Nothing is dropped:
/// any disagreement is an error.
///
/// # Errors
///
/// Returns [`CubeError::Empty`] for no input, or [`CubeError::Mismatch`]
/// naming the first incompatible pair.
pub fn concatenate(cubes: &[Cube], dim: &str) -> Result<Cube, CubeError> {
    let first = cubes.first().ok_or(CubeError::Empty {
        operation: "concatenate",
    })?;
    let ax = first.require_dim(dim)?;
    let mut dims = first.dims().to_vec();
    let mut aux: Vec<_> = first.aux_coords().to_vec();

    for other in &cubes[1..] {
        check_compatible(first, other, Some(ax))?;
        if dims[ax].append(&other.dims()[ax]).is_err() {
            return Err(mismatch(
                format!("'{dim}' coordinates cannot be joined"),
                first,
                other,
            ));
        }
        for a in aux.iter_mut() {
            if !a.dims().contains(&ax) {
                continue;
            }
            if a.dims().len() != 1 {
                return Err(mismatch(
                    format!(
                        "multi-dimensional coordinate '{}' spans '{dim}'",
                        a.coord().name()
                    ),
                    first,
                    other,
                ));
            }
            let Some(theirs) = other.aux(a.coord().name()) else {
                return Err(mismatch(
                    format!("coordinate '{}' missing", a.coord().name()),
                    first,
                    other,
                ));
            };
            let mut joined = a.coord().clone();
            if joined.append(theirs.coord()).is_err() {
                return Err(mismatch(
                    format!("coordinate '{}' cannot be joined", a.coord().name()),
                    first,
                    other,
                ));
            }
            *a = Cube::aux_with_dims(joined, a.dims().to_vec());
        }
    }

    let views: Vec<_> = cubes.iter().map(|c| c.data().view()).collect();
    let data = ndarray::concatenate(Axis(ax), &views)
        .map_err(|e| mismatch(format!("data cannot be joined: {e}"), first, &cubes[cubes.len() - 1]))?;
    Ok(Cube::from_parts(first, data, dims, aux))
}

/// Stack cubes along a new leading dimension described by `coord`.
///
/// A scalar auxiliary coordinate with the same name as `coord` on the
/// inputs is dropped; the stacked dimension replaces it.
///
/// # Errors
///
/// Returns [`CubeError::Empty`] for no input, [`CubeError::Coord`] when
/// `coord` has the wrong length, or [`CubeError::Mismatch`] when the
/// inputs differ.
pub fn stack(cubes: &[Cube], coord: Coord) -> Result<Cube, CubeError> {
    if cubes.is_empty() {
        return Err(CubeError::Empty { operation: "stack" });
    }
    if coord.len() != cubes.len() {
        return Err(coord.error(&format!("{} points for {} cubes", coord.len(), cubes.len())));
    }
    let stripped: Vec<Cube> = cubes
        .iter()
        .map(|c| {
            let mut c = c.clone();
            c.remove_aux(coord.name());
            c
        })
        .collect();
    let first = &stripped[0];
    if first.dim_index(coord.name()).is_some() {
        return Err(coord.error("dimension already present"));
    }
    for other in &stripped[1..] {
        check_compatible(first, other, None)?;
    }

    let views: Vec<_> = stripped.iter().map(|c| c.data().view()).collect();
    let data = ndarray::stack(Axis(0), &views)
        .map_err(|e| mismatch(format!("data cannot be stacked: {e}"), first, &stripped[0]))?;
    let mut dims = Vec::with_capacity(first.ndim() + 1);
    dims.push(coord);
    dims.extend(first.dims().iter().cloned());
    let aux = first
        .aux_coords()
        .iter()
        .map(|a| {
            Cube::aux_with_dims(
                a.coord().clone(),
                a.dims().iter().map(|d| d + 1).collect(),
            )
        })
        .collect();
    Ok(Cube::from_parts(first, data, dims, aux))
}

/// Compare everything except the dimension at `skip`.
fn check_compatible(left: &Cube, right: &Cube, skip: Option<usize>) -> Result<(), CubeError> {
    if left.dim_names() != right.dim_names() {
        return Err(mismatch("dimension names differ", left, right));
    }
    if left.units() != right.units() {
        return Err(mismatch("units differ", left, right));
    }
    if left.attributes() != right.attributes() {
        let differing: Vec<&str> = left
            .attributes()
            .iter()
            .filter(|(k, v)| right.attribute(k) != Some(v.as_str()))
            .map(|(k, _)| k.as_str())
            .chain(
                right
                    .attributes()
                    .keys()
                    .filter(|k| left.attribute(k).is_none())
                    .map(String::as_str),
            )
            .collect();
        return Err(mismatch(
            format!("attributes differ: {}", differing.join(", ")),
            left,
            right,
        ));
    }
    for (i, (a, b)) in left.dims().iter().zip(right.dims()).enumerate() {
        if Some(i) != skip && !a.matches(b) {
            return Err(mismatch(
                format!("'{}' coordinates differ", a.name()),
                left,
                right,
            ));
        }
    }
    if left.aux_coords().len() != right.aux_coords().len() {
        return Err(mismatch("auxiliary coordinates differ", left, right));
    }
    for a in left.aux_coords() {
        let spans_skip = skip.is_some_and(|s| a.dims().contains(&s));
        match right.aux(a.coord().name()) {
            None => {
                return Err(mismatch(
                    format!("coordinate '{}' missing", a.coord().name()),
                    left,
                    right,
                ));
            }
            Some(b) if a.dims() != b.dims() || (!spans_skip && !a.coord().matches(b.coord())) => {
                return Err(mismatch(
                    format!("coordinate '{}' differs", a.coord().name()),
                    left,
                    right,
                ));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

impl Cube {
    /// `self - other`, broadcasting `other` along its length-1 axes.
    ///
    /// Both cubes must have the same dimension names in the same order and
    /// the same units. Dimension coordinates other than `time` must match
    /// on axes of equal length, and auxiliary coordinates present on both
    /// sides must be identical. The result keeps `self`'s metadata.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Mismatch`] describing both operands.
    pub fn subtract(&self, other: &Cube) -> Result<Cube, CubeError> {
        if self.units() != other.units() {
            return Err(mismatch("units differ", self, other));
        }
        self.combine(other, |a, b| a - b)
    }

    /// `self / other`, broadcasting as for [`subtract`](Self::subtract).
    /// The result is dimensionless (`"1"`). Division by zero gives NaN.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Mismatch`] describing both operands.
    pub fn divide(&self, other: &Cube) -> Result<Cube, CubeError> {
        let mut out = self.combine(other, |a, b| if b == 0.0 { f64::NAN } else { a / b })?;
        out.set_units("1");
        Ok(out)
    }

    fn combine<F>(&self, other: &Cube, f: F) -> Result<Cube, CubeError>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.dim_names() != other.dim_names() {
            return Err(mismatch("dimension order differs", self, other));
        }
        for (i, (a, b)) in self.dims().iter().zip(other.dims()).enumerate() {
            let (la, lb) = (self.shape()[i], other.shape()[i]);
            if la != lb && lb != 1 {
                return Err(mismatch(
                    format!("'{}' has length {la} vs {lb}", a.name()),
                    self,
                    other,
                ));
            }
            if la == lb && a.name() != TIME && !a.matches(b) {
                return Err(mismatch(
                    format!("'{}' coordinates differ", a.name()),
                    self,
                    other,
                ));
            }
        }
        for a in self.aux_coords() {
            if let Some(b) = other.aux(a.coord().name())
                && (a.dims() != b.dims() || !a.coord().matches(b.coord()))
            {
                return Err(mismatch(
                    format!("coordinate '{}' differs", a.coord().name()),
                    self,
                    other,
                ));
            }
        }

        let rhs = other
            .data()
            .broadcast(self.data().raw_dim())
            .ok_or_else(|| mismatch("shapes cannot be broadcast", self, other))?;
        let mut out = self.clone();
        Zip::from(out.data_mut()).and(&rhs).for_each(|a, &b| *a = f(*a, b));
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Reductions
// ---------------------------------------------------------------------------

impl Cube {
    /// NaN-aware mean over a dimension, keeping it with length 1.
    ///
    /// The dimension coordinate collapses to the midpoint of its extent
    /// with bounds covering it; one-dimensional auxiliary coordinates on the
    /// axis collapse the same way, others spanning it are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::UnknownDimension`].
    pub fn collapse_mean(&self, dim: &str) -> Result<Cube, CubeError> {
        let ax = self.require_dim(dim)?;
        let data = reduce_axis(self.data(), ax, ukcp_stats::nan_mean);
        let mut dims = self.dims().to_vec();
        dims[ax] = dims[ax].collapsed();
        let aux = self
            .aux_coords()
            .iter()
            .filter_map(|a| match a.dims() {
                d if !d.contains(&ax) => Some(a.clone()),
                [_] => Some(Cube::aux_with_dims(a.coord().collapsed(), a.dims().to_vec())),
                _ => None,
            })
            .collect();
        Ok(Cube::from_parts(self, data, dims, aux))
    }

    /// Replace a dimension by a `percentile` dimension holding the given
    /// percentiles (0..=100) of the data along it.
    ///
    /// Auxiliary coordinates spanning the dimension are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::UnknownDimension`], or [`CubeError::Coord`] if
    /// `percentiles` is empty.
    pub fn collapse_percentiles(&self, dim: &str, percentiles: &[f64]) -> Result<Cube, CubeError> {
        let ax = self.require_dim(dim)?;
        if percentiles.is_empty() {
            return Err(self.dims()[ax].error("no percentiles requested"));
        }
        let slices: Vec<ArrayD<f64>> = percentiles
            .iter()
            .map(|&p| reduce_axis(self.data(), ax, |lane| ukcp_stats::nan_percentile(lane, p)))
            .collect();
        let views: Vec<_> = slices.iter().map(|a| a.view()).collect();
        let data = ndarray::concatenate(Axis(ax), &views)
            .map_err(|e| self.dims()[ax].error(&format!("cannot assemble percentiles: {e}")))?;
        let mut dims = self.dims().to_vec();
        dims[ax] = Coord::numeric("percentile", percentiles.to_vec()).with_units("%");
        let aux = self
            .aux_coords()
            .iter()
            .filter(|a| !a.dims().contains(&ax))
            .cloned()
            .collect();
        Ok(Cube::from_parts(self, data, dims, aux))
    }
}

/// Reduce every lane along `ax` with `f`, keeping the axis with length 1.
fn reduce_axis<F>(data: &ArrayD<f64>, ax: usize, f: F) -> ArrayD<f64>
where
    F: Fn(&[f64]) -> f64,
{
    data.map_axis(Axis(ax), |lane| {
        let values: Vec<f64> = lane.iter().copied().collect();
        f(&values)
    })
    .insert_axis(Axis(ax))
}
