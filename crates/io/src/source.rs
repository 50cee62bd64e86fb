//! The [`CubeSource`] seam between path patterns and loaded cubes.

use std::path::Path;

use ukcp_cube::Cube;
use ukcp_vocab::QuantityClass;

use crate::error::IoError;
use crate::glob::expand;
use crate::netcdf_read::load_cube;

/// Which data variable to read from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSelector {
    name: String,
    quantity: Option<QuantityClass>,
}

impl VariableSelector {
    /// Select by variable name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
        }
    }

    /// Fall back to the quantity class's accepted standard names when no
    /// variable carries the requested name.
    pub fn with_quantity(mut self, quantity: QuantityClass) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Requested variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quantity class used as fallback.
    pub fn quantity(&self) -> Option<QuantityClass> {
        self.quantity
    }
}

/// Loads the cube fragments behind one path pattern.
pub trait CubeSource {
    /// Load every fragment matching `pattern`, in path order.
    ///
    /// # Errors
    ///
    /// Implementations return [`IoError::DataNotFound`] when nothing
    /// matches and propagate load failures.
    fn load(&self, pattern: &Path, selector: &VariableSelector) -> Result<Vec<Cube>, IoError>;
}

/// Reads fragments from NetCDF files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetcdfSource;

impl CubeSource for NetcdfSource {
    fn load(&self, pattern: &Path, selector: &VariableSelector) -> Result<Vec<Cube>, IoError> {
        expand(pattern)?
            .iter()
            .map(|path| load_cube(path, selector))
            .collect()
    }
}
