//! Discretized linear transport operators.

use std::collections::BTreeMap;

use pf_core::{dot, ensure_finite};
use pf_core::units::{Diffusivity, Velocity};
use pf_mesh::{Mesh, MeshError};

use crate::error::{PodError, PodResult};

/// A linear spatial operator `L` acting on a cell field.
///
/// Implementations evaluate `L(field)` per unit cell volume, so the
/// full-order system reads `d(field)/dt = L(field)` and projection uses the
/// plain volume-weighted inner product.
pub trait TransportOperator: Send + Sync {
    /// Operator name for logging.
    fn name(&self) -> &str;

    /// Write `L(field)` into `out`. Both slices hold one value per cell.
    fn apply(&self, mesh: &Mesh, field: &[f64], out: &mut [f64]) -> PodResult<()>;
}

/// Homogeneous boundary condition on a patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoundaryCondition {
    /// Field is zero on the boundary face.
    ZeroValue,
    /// No diffusive flux; the face takes the owner cell value.
    #[default]
    ZeroGradient,
}

/// `L(f) = -div(U f) + D lap(f)` with first-order upwind convection and
/// central-difference diffusion, for a uniform velocity.
#[derive(Debug, Clone)]
pub struct ConvectionDiffusion {
    velocity: [f64; 3],
    diffusivity: f64,
    boundaries: BTreeMap<String, BoundaryCondition>,
}

impl ConvectionDiffusion {
    pub fn new(velocity: [Velocity; 3], diffusivity: Diffusivity) -> PodResult<Self> {
        let velocity = [
            ensure_finite(velocity[0].value, "velocity x")?,
            ensure_finite(velocity[1].value, "velocity y")?,
            ensure_finite(velocity[2].value, "velocity z")?,
        ];
        let diffusivity = ensure_finite(diffusivity.value, "diffusivity")?;
        if diffusivity < 0.0 {
            return Err(PodError::Numeric {
                what: format!("diffusivity must be non-negative, got {diffusivity}"),
            });
        }
        Ok(Self {
            velocity,
            diffusivity,
            boundaries: BTreeMap::new(),
        })
    }

    /// Set the condition on a named patch. Patches not listed are zero-gradient.
    pub fn with_boundary(mut self, patch: impl Into<String>, bc: BoundaryCondition) -> Self {
        self.boundaries.insert(patch.into(), bc);
        self
    }

    pub fn velocity(&self) -> [f64; 3] {
        self.velocity
    }

    pub fn diffusivity(&self) -> f64 {
        self.diffusivity
    }

    pub fn boundary(&self, patch: &str) -> BoundaryCondition {
        self.boundaries.get(patch).copied().unwrap_or_default()
    }

    /// Resolve the per-patch conditions against `mesh`, indexed by patch.
    fn resolve(&self, mesh: &Mesh) -> PodResult<Vec<BoundaryCondition>> {
        for name in self.boundaries.keys() {
            if mesh.patch_by_name(name).is_none() {
                return Err(MeshError::PatchNotFound { name: name.clone() }.into());
            }
        }
        Ok(mesh
            .patches()
            .iter()
            .map(|p| self.boundary(&p.name))
            .collect())
    }
}

impl TransportOperator for ConvectionDiffusion {
    fn name(&self) -> &str {
        "convection-diffusion"
    }

    fn apply(&self, mesh: &Mesh, field: &[f64], out: &mut [f64]) -> PodResult<()> {
        mesh.check_len("transported field", field)?;
        mesh.check_len("operator output", out)?;
        let bcs = self.resolve(mesh)?;

        out.iter_mut().for_each(|v| *v = 0.0);
        let d = self.diffusivity;

        for face in mesh.faces() {
            let o = face.owner.idx();
            let flux = dot(&self.velocity, &face.normal)? * face.area;

            match (face.neighbour, face.patch) {
                (Some(nb), _) => {
                    let n = nb.idx();
                    let upwind = if flux >= 0.0 { field[o] } else { field[n] };
                    let conv = flux * upwind;
                    let diff = d * face.area * (field[n] - field[o]) / face.delta;
                    out[o] += diff - conv;
                    out[n] += conv - diff;
                }
                (None, Some(patch)) => match bcs[patch.idx()] {
                    BoundaryCondition::ZeroValue => {
                        let face_value = if flux >= 0.0 { field[o] } else { 0.0 };
                        let diff = -d * face.area * field[o] / face.delta;
                        out[o] += diff - flux * face_value;
                    }
                    BoundaryCondition::ZeroGradient => {
                        out[o] -= flux * field[o];
                    }
                },
                (None, None) => {}
            }
        }

        for (v, cell) in out.iter_mut().zip(mesh.cells()) {
            *v /= cell.volume;
        }
        Ok(())
    }
}
