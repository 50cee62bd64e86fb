//! The [`Cube`] type: data, dimension coordinates, auxiliary coordinates,
//! units and attributes.

use std::collections::BTreeMap;

use ndarray::{ArrayD, Axis, IxDyn};
use ukcp_calendar::CalendarDate;

use crate::coord::Coord;
use crate::error::CubeError;

/// Names of the leading "member-like" dimensions.
pub const MEMBER_DIMS: [&str; 4] = ["ensemble_member", "scenario", "percentile", "sample"];

/// Name of the time dimension.
pub const TIME: &str = "time";

/// Name of the projection y dimension.
pub const PROJECTION_Y: &str = "projection_y_coordinate";

/// Name of the projection x dimension.
pub const PROJECTION_X: &str = "projection_x_coordinate";

/// Name of the region dimension of aggregated data.
pub const REGION: &str = "region";

/// Rank of a dimension in the canonical order
/// `(member-like, time, projection_y, projection_x | region)`.
/// Unknown dimensions sort after the known ones.
pub fn canonical_rank(name: &str) -> u8 {
    match name {
        n if MEMBER_DIMS.contains(&n) => 0,
        TIME => 1,
        PROJECTION_Y => 2,
        PROJECTION_X | REGION => 3,
        _ => 4,
    }
}

/// A coordinate attached to zero or more dimensions of a cube.
///
/// Multi-dimensional points are stored flattened in row-major order of
/// `dims` as listed. A scalar coordinate has no dims and one point.
#[derive(Debug, Clone, PartialEq)]
pub struct AuxCoord {
    coord: Coord,
    dims: Vec<usize>,
}

impl AuxCoord {
    /// The coordinate.
    pub fn coord(&self) -> &Coord {
        &self.coord
    }

    /// Cube axes the coordinate spans.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns `true` for a scalar coordinate.
    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }
}

/// A labeled n-dimensional array.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    name: String,
    data: ArrayD<f64>,
    dims: Vec<Coord>,
    aux: Vec<AuxCoord>,
    units: String,
    attributes: BTreeMap<String, String>,
}

impl Cube {
    /// Creates a cube from data and one coordinate per axis.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Shape`] if the coordinate lengths do not match
    /// the data shape, or [`CubeError::Coord`] on duplicate dimension names.
    pub fn new(
        name: impl Into<String>,
        data: ArrayD<f64>,
        dims: Vec<Coord>,
        units: impl Into<String>,
    ) -> Result<Self, CubeError> {
        let coords: Vec<usize> = dims.iter().map(Coord::len).collect();
        if data.shape() != coords.as_slice() {
            return Err(CubeError::Shape {
                data: data.shape().to_vec(),
                coords,
            });
        }
        for (i, d) in dims.iter().enumerate() {
            if dims[..i].iter().any(|o| o.name() == d.name()) {
                return Err(d.error("duplicate dimension name"));
            }
        }
        Ok(Self {
            name: name.into(),
            data,
            dims,
            aux: Vec::new(),
            units: units.into(),
            attributes: BTreeMap::new(),
        })
    }

    /// Attach an auxiliary coordinate spanning the named dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::UnknownDimension`] for an unknown dimension, or
    /// [`CubeError::Coord`] if the point count does not match the spanned
    /// shape or the name is already taken.
    pub fn with_aux(mut self, coord: Coord, dims: &[&str]) -> Result<Self, CubeError> {
        let axes = dims
            .iter()
            .map(|d| self.require_dim(d))
            .collect::<Result<Vec<_>, _>>()?;
        self.add_aux(coord, axes)?;
        Ok(self)
    }

    /// Attach an auxiliary coordinate by axis indices.
    ///
    /// # Errors
    ///
    /// As for [`with_aux`](Self::with_aux).
    pub fn add_aux(&mut self, coord: Coord, dims: Vec<usize>) -> Result<(), CubeError> {
        if self.coord(coord.name()).is_some() {
            return Err(coord.error("coordinate name already in use"));
        }
        let mut expected = 1;
        for &d in &dims {
            let len = self.data.shape().get(d).copied().ok_or_else(|| {
                coord.error(&format!("axis {d} out of range for {}-d cube", self.ndim()))
            })?;
            expected *= len;
        }
        if coord.len() != expected {
            return Err(coord.error(&format!(
                "{} points for a span of {expected}",
                coord.len()
            )));
        }
        self.aux.push(AuxCoord { coord, dims });
        Ok(())
    }

    /// Sets an attribute, returning the cube.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the cube.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Data array.
    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// Mutable data array. The shape must not change.
    pub fn data_mut(&mut self) -> &mut ArrayD<f64> {
        &mut self.data
    }

    /// Units string.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Replaces the units string without touching the data.
    pub fn set_units(&mut self, units: impl Into<String>) {
        self.units = units.into();
    }

    /// Shape of the data.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Dimension coordinates in axis order.
    pub fn dims(&self) -> &[Coord] {
        &self.dims
    }

    /// Dimension names in axis order.
    pub fn dim_names(&self) -> Vec<&str> {
        self.dims.iter().map(Coord::name).collect()
    }

    /// Axis index of a dimension.
    pub fn dim_index(&self, name: &str) -> Option<usize> {
        self.dims.iter().position(|c| c.name() == name)
    }

    /// Axis index of a dimension, or an error naming the cube.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::UnknownDimension`].
    pub fn require_dim(&self, name: &str) -> Result<usize, CubeError> {
        self.dim_index(name).ok_or_else(|| CubeError::UnknownDimension {
            name: name.to_string(),
            cube: self.name.clone(),
        })
    }

    /// Dimension coordinate by name.
    pub fn dim(&self, name: &str) -> Option<&Coord> {
        self.dims.iter().find(|c| c.name() == name)
    }

    /// Auxiliary coordinates.
    pub fn aux_coords(&self) -> &[AuxCoord] {
        &self.aux
    }

    /// Auxiliary coordinate by name.
    pub fn aux(&self, name: &str) -> Option<&AuxCoord> {
        self.aux.iter().find(|a| a.coord.name() == name)
    }

    /// Dimension or auxiliary coordinate by name.
    pub fn coord(&self, name: &str) -> Option<&Coord> {
        self.dim(name).or_else(|| self.aux(name).map(AuxCoord::coord))
    }

    /// Removes an auxiliary coordinate, returning it if present.
    pub fn remove_aux(&mut self, name: &str) -> Option<AuxCoord> {
        let i = self.aux.iter().position(|a| a.coord.name() == name)?;
        Some(self.aux.remove(i))
    }

    /// Attributes.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Attribute value by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Sets an attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Replaces every attribute.
    pub fn set_attributes(&mut self, attributes: BTreeMap<String, String>) {
        self.attributes = attributes;
    }

    /// Removes an attribute, returning its value if present.
    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.remove(key)
    }

    /// Time points of the `time` dimension decoded to dates.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::UnknownDimension`] without a time dimension, or
    /// the decoding errors of [`Coord::dates`].
    pub fn time_dates(&self) -> Result<Vec<CalendarDate>, CubeError> {
        let i = self.require_dim(TIME)?;
        self.dims[i].dates()
    }

    /// One-line description: name, units and dimension lengths.
    pub fn summary(&self) -> String {
        let dims: Vec<String> = self
            .dims
            .iter()
            .map(|c| format!("{}: {}", c.name(), c.len()))
            .collect();
        format!("{} / ({}) ({})", self.name, self.units, dims.join("; "))
    }

    // -----------------------------------------------------------------------
    // Structural operations
    // -----------------------------------------------------------------------

    /// Sub-cube at `indices` along a dimension, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::UnknownDimension`] or
    /// [`CubeError::IndexOutOfBounds`].
    pub fn select(&self, dim: &str, indices: &[usize]) -> Result<Cube, CubeError> {
        let ax = self.require_dim(dim)?;
        let len = self.shape()[ax];
        if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
            return Err(CubeError::IndexOutOfBounds {
                dim: dim.to_string(),
                index: bad,
                len,
            });
        }
        let mut dims = self.dims.clone();
        dims[ax] = self.dims[ax].select(indices);
        let aux = self
            .aux
            .iter()
            .map(|a| self.slice_aux(a, ax, indices))
            .collect();
        Ok(Cube {
            name: self.name.clone(),
            data: self.data.select(Axis(ax), indices),
            dims,
            aux,
            units: self.units.clone(),
            attributes: self.attributes.clone(),
        })
    }

    /// Sub-cube of the points along `dim` for which `keep(index)` holds.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::UnknownDimension`].
    pub fn select_where<F>(&self, dim: &str, keep: F) -> Result<Cube, CubeError>
    where
        F: Fn(usize) -> bool,
    {
        let ax = self.require_dim(dim)?;
        let indices: Vec<usize> = (0..self.shape()[ax]).filter(|&i| keep(i)).collect();
        self.select(dim, &indices)
    }

    /// Restrict an auxiliary coordinate to `indices` along axis `ax`.
    fn slice_aux(&self, aux: &AuxCoord, ax: usize, indices: &[usize]) -> AuxCoord {
        let Some(rel) = aux.dims.iter().position(|&d| d == ax) else {
            return aux.clone();
        };
        let shape: Vec<usize> = aux.dims.iter().map(|&d| self.shape()[d]).collect();
        let total: usize = shape.iter().product();
        let flat = ArrayD::from_shape_vec(IxDyn(&shape), (0..total).collect::<Vec<usize>>())
            .map(|a| a.select(Axis(rel), indices).iter().copied().collect::<Vec<_>>())
            .unwrap_or_default();
        AuxCoord {
            coord: aux.coord.select(&flat),
            dims: aux.dims.clone(),
        }
    }

    /// Slice out one point of a dimension, removing the axis. The dimension
    /// coordinate becomes a scalar auxiliary coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::UnknownDimension`] or
    /// [`CubeError::IndexOutOfBounds`].
    pub fn index_scalar(&self, dim: &str, index: usize) -> Result<Cube, CubeError> {
        let ax = self.require_dim(dim)?;
        let len = self.shape()[ax];
        if index >= len {
            return Err(CubeError::IndexOutOfBounds {
                dim: dim.to_string(),
                index,
                len,
            });
        }
        let mut dims = self.dims.clone();
        let demoted = dims.remove(ax).select(&[index]);
        let mut aux: Vec<AuxCoord> = self
            .aux
            .iter()
            .map(|a| {
                let mut sliced = self.slice_aux(a, ax, &[index]);
                sliced.dims.retain(|&d| d != ax);
                for d in &mut sliced.dims {
                    if *d > ax {
                        *d -= 1;
                    }
                }
                sliced
            })
            .collect();
        aux.push(AuxCoord {
            coord: demoted,
            dims: Vec::new(),
        });
        Ok(Cube {
            name: self.name.clone(),
            data: self.data.index_axis(Axis(ax), index).to_owned(),
            dims,
            aux,
            units: self.units.clone(),
            attributes: self.attributes.clone(),
        })
    }

    /// Promote a scalar auxiliary coordinate to a new leading length-1
    /// dimension. The scalar coordinates named in `expand` come to span the
    /// new dimension; other scalar coordinates stay scalar.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::UnknownCoord`] if no such auxiliary coordinate
    /// exists, or [`CubeError::Coord`] if it is not scalar.
    pub fn promote(&self, name: &str, expand: &[&str]) -> Result<Cube, CubeError> {
        let i = self
            .aux
            .iter()
            .position(|a| a.coord.name() == name)
            .ok_or_else(|| CubeError::UnknownCoord {
                name: name.to_string(),
                cube: self.name.clone(),
            })?;
        if !self.aux[i].is_scalar() {
            return Err(self.aux[i].coord.error("only scalar coordinates can be promoted"));
        }
        let mut aux = self.aux.clone();
        let promoted = aux.remove(i).coord;
        for a in &mut aux {
            if a.dims.is_empty() && expand.contains(&a.coord.name()) {
                a.dims.push(0);
                continue;
            }
            for d in &mut a.dims {
                *d += 1;
            }
        }
        let mut dims = Vec::with_capacity(self.dims.len() + 1);
        dims.push(promoted);
        dims.extend(self.dims.iter().cloned());
        Ok(Cube {
            name: self.name.clone(),
            data: self.data.clone().insert_axis(Axis(0)),
            dims,
            aux,
            units: self.units.clone(),
            attributes: self.attributes.clone(),
        })
    }

    /// Reorder the axes to `order`, which must name every dimension once.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Mismatch`] if `order` is not a permutation of
    /// the dimension names.
    pub fn transpose_to(&self, order: &[&str]) -> Result<Cube, CubeError> {
        let perm = order
            .iter()
            .map(|n| self.dim_index(n))
            .collect::<Option<Vec<usize>>>()
            .filter(|p| {
                let mut sorted = p.clone();
                sorted.sort_unstable();
                sorted == (0..self.ndim()).collect::<Vec<_>>()
            })
            .ok_or_else(|| CubeError::Mismatch {
                reason: "transpose order is not a permutation of the dimensions".to_string(),
                left: self.summary(),
                right: order.join(", "),
            })?;
        if perm.iter().enumerate().all(|(i, &p)| i == p) {
            return Ok(self.clone());
        }
        let mut inverse = vec![0; perm.len()];
        for (new, &old) in perm.iter().enumerate() {
            inverse[old] = new;
        }
        let aux = self
            .aux
            .iter()
            .map(|a| AuxCoord {
                coord: a.coord.clone(),
                dims: a.dims.iter().map(|&d| inverse[d]).collect(),
            })
            .collect();
        let data = self
            .data
            .clone()
            .permuted_axes(IxDyn(&perm))
            .as_standard_layout()
            .into_owned();
        Ok(Cube {
            name: self.name.clone(),
            data,
            dims: perm.iter().map(|&p| self.dims[p].clone()).collect(),
            aux,
            units: self.units.clone(),
            attributes: self.attributes.clone(),
        })
    }

    /// Dimension names sorted into canonical order. Dimensions of equal
    /// rank keep their relative order.
    pub fn canonical_order(&self) -> Vec<&str> {
        let mut names = self.dim_names();
        names.sort_by_key(|n| canonical_rank(n));
        names
    }

    /// Returns `true` if the axes are already in canonical order.
    pub fn is_canonical(&self) -> bool {
        self.dim_names() == self.canonical_order()
    }

    /// Transpose into canonical order.
    ///
    /// # Errors
    ///
    /// Never fails for a well-formed cube; the `Result` mirrors
    /// [`transpose_to`](Self::transpose_to).
    pub fn to_canonical_order(&self) -> Result<Cube, CubeError> {
        let order = self.canonical_order();
        self.transpose_to(&order)
    }

    /// Sort along a numeric dimension by its coordinate points.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::UnknownDimension`], or [`CubeError::Coord`] for
    /// a label coordinate.
    pub fn sort_along(&self, dim: &str) -> Result<Cube, CubeError> {
        let ax = self.require_dim(dim)?;
        let coord = &self.dims[ax];
        let points = coord
            .points()
            .ok_or_else(|| coord.error("cannot sort along a label coordinate"))?;
        let order = ukcp_stats::argsort(points);
        if order.iter().enumerate().all(|(i, &o)| i == o) {
            return Ok(self.clone());
        }
        self.select(dim, &order)
    }

    /// Apply `f` to every data value.
    pub fn map_data<F>(&self, f: F) -> Cube
    where
        F: Fn(f64) -> f64,
    {
        let mut out = self.clone();
        out.data.mapv_inplace(f);
        out
    }

    pub(crate) fn from_parts(
        template: &Cube,
        data: ArrayD<f64>,
        dims: Vec<Coord>,
        aux: Vec<AuxCoord>,
    ) -> Cube {
        Cube {
            name: template.name.clone(),
            data,
            dims,
            aux,
            units: template.units.clone(),
            attributes: template.attributes.clone(),
        }
    }

    pub(crate) fn aux_with_dims(coord: Coord, dims: Vec<usize>) -> AuxCoord {
        AuxCoord { coord, dims }
    }
}
