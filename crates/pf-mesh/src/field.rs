//! Cell-centred scalar fields.

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;

/// A named scalar field with one value per mesh cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    name: String,
    values: Vec<f64>,
}

impl ScalarField {
    /// Wrap `values`, checking them against the mesh size.
    pub fn new(mesh: &Mesh, name: impl Into<String>, values: Vec<f64>) -> MeshResult<Self> {
        mesh.check_len("field values", &values)?;
        Ok(Self {
            name: name.into(),
            values,
        })
    }

    /// Uniform field.
    pub fn uniform(mesh: &Mesh, name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            values: vec![value; mesh.n_cells()],
        }
    }

    /// Field from a function of the cell centre.
    pub fn from_fn(mesh: &Mesh, name: impl Into<String>, f: impl Fn([f64; 3]) -> f64) -> Self {
        Self {
            name: name.into(),
            values: mesh.cells().iter().map(|c| f(c.centre)).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Volume-weighted average over the mesh.
    pub fn weighted_average(&self, mesh: &Mesh) -> MeshResult<f64> {
        mesh.check_len("field values", &self.values)?;
        let total = mesh.total_volume();
        if total <= 0.0 {
            return Err(MeshError::Empty);
        }
        let sum: f64 = mesh
            .cells()
            .iter()
            .zip(&self.values)
            .map(|(c, v)| c.volume * v)
            .sum();
        Ok(sum / total)
    }

    pub fn min_max(&self) -> Option<(f64, f64)> {
        let first = *self.values.first()?;
        Some(
            self.values
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }
}
