//! Galerkin projection of the transport operator onto a basis.

use nalgebra::DMatrix;
use pf_mesh::Mesh;
use rayon::prelude::*;

use crate::basis::OrthoNormalBasis;
use crate::error::{PodError, PodResult};
use crate::transport::TransportOperator;

/// Dense `n_modes x n_modes` matrix `M[i][j] = <b_i, L(b_j)>`, so that the
/// reduced dynamics read `dy/dt = M y`.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeOperator {
    matrix: DMatrix<f64>,
    basis_generation: u64,
}

impl DerivativeOperator {
    /// Project `transport` onto `basis`.
    ///
    /// When `live_generation` is given, the basis must carry that generation;
    /// otherwise the call fails with [`PodError::StaleBasis`].
    pub fn project(
        mesh: &Mesh,
        basis: &OrthoNormalBasis,
        transport: &dyn TransportOperator,
        live_generation: Option<u64>,
    ) -> PodResult<Self> {
        if let Some(live) = live_generation
            && basis.generation() != live
        {
            return Err(PodError::StaleBasis {
                what: format!(
                    "operator projection against basis generation {} (live generation {live})",
                    basis.generation()
                ),
            });
        }
        if basis.n_cells() != mesh.n_cells() {
            return Err(PodError::dimension(
                "basis cells vs mesh cells",
                mesh.n_cells(),
                basis.n_cells(),
            ));
        }

        let n = basis.mode_count();
        let modes = basis.modes();

        // L(b_j) per mode, then one inner product per entry.
        let images: Vec<Vec<f64>> = modes
            .par_iter()
            .map(|b| {
                let mut out = vec![0.0; mesh.n_cells()];
                transport.apply(mesh, b, &mut out)?;
                Ok(out)
            })
            .collect::<PodResult<_>>()?;

        let mut matrix = DMatrix::zeros(n, n);
        for (i, bi) in modes.iter().enumerate() {
            for (j, lj) in images.iter().enumerate() {
                matrix[(i, j)] = mesh.inner(bi, lj)?;
            }
        }

        Ok(Self {
            matrix,
            basis_generation: basis.generation(),
        })
    }

    /// Wrap a precomputed matrix.
    pub fn from_matrix(matrix: DMatrix<f64>, basis_generation: u64) -> PodResult<Self> {
        if !matrix.is_square() {
            return Err(PodError::DimensionMismatch {
                what: format!(
                    "operator matrix must be square, got {}x{}",
                    matrix.nrows(),
                    matrix.ncols()
                ),
            });
        }
        Ok(Self {
            matrix,
            basis_generation,
        })
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn size(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn basis_generation(&self) -> u64 {
        self.basis_generation
    }

    /// `out = M y`
    pub fn apply(&self, y: &[f64], out: &mut [f64]) -> PodResult<()> {
        let n = self.size();
        if y.len() != n {
            return Err(PodError::dimension("coefficient vector", n, y.len()));
        }
        if out.len() != n {
            return Err(PodError::dimension("derivative vector", n, out.len()));
        }
        for (i, o) in out.iter_mut().enumerate() {
            *o = self.matrix.row(i).iter().zip(y).map(|(m, v)| m * v).sum();
        }
        Ok(())
    }
}
