//! Orthonormal basis construction.
//!
//! Modes are computed with the method of snapshots: for fluctuations
//! `u_k = s_k - reference`, the correlation matrix `C_kl = <u_k, u_l>_V / N`
//! is decomposed, and each eigenvector `v_i` (largest eigenvalue first) gives
//! a mode `phi_i = sum_k v_ki u_k`, normalized under the volume-weighted inner
//! product. A modified Gram-Schmidt pass removes the residual
//! non-orthogonality left by the eigen-solver.

use nalgebra::{DMatrix, SymmetricEigen};
use pf_core::ensure_all_finite;
use pf_io::{BasisRecord, timestamp_now};
use pf_mesh::Mesh;
use rayon::prelude::*;
use tracing::debug;

use crate::config::{PodConfig, ReferenceField};
use crate::error::{PodError, PodResult};

/// A set of modes, orthonormal under the mesh inner product, plus the
/// reference field they are fluctuations about.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthoNormalBasis {
    reference: Vec<f64>,
    modes: Vec<Vec<f64>>,
    eigenvalues: Vec<f64>,
    mesh_fingerprint: String,
    generation: u64,
}

impl OrthoNormalBasis {
    /// Build `config.n_modes` modes from snapshot fields.
    pub fn from_snapshots(
        mesh: &Mesh,
        snapshots: &[Vec<f64>],
        config: &PodConfig,
    ) -> PodResult<Self> {
        if snapshots.is_empty() {
            return Err(PodError::DataUnavailable {
                what: format!("no snapshots of '{}'", config.field_name),
            });
        }
        for snap in snapshots {
            if snap.len() != mesh.n_cells() {
                return Err(PodError::dimension(
                    "snapshot length vs mesh cells",
                    mesh.n_cells(),
                    snap.len(),
                ));
            }
            ensure_all_finite(snap, "snapshot value")?;
        }
        let n_snap = snapshots.len();
        if config.n_modes > n_snap {
            return Err(PodError::dimension(
                "snapshots available for requested modes",
                config.n_modes,
                n_snap,
            ));
        }

        let reference = match config.reference {
            ReferenceField::Zero => vec![0.0; mesh.n_cells()],
            ReferenceField::SnapshotMean => {
                let mut mean = vec![0.0; mesh.n_cells()];
                for snap in snapshots {
                    for (m, v) in mean.iter_mut().zip(snap) {
                        *m += v;
                    }
                }
                mean.iter_mut().for_each(|m| *m /= n_snap as f64);
                mean
            }
        };

        let fluctuations: Vec<Vec<f64>> = snapshots
            .iter()
            .map(|s| s.iter().zip(&reference).map(|(v, r)| v - r).collect())
            .collect();

        let gram = mesh.gram(&fluctuations)?;
        let corr = DMatrix::from_fn(n_snap, n_snap, |k, l| gram[k][l] / n_snap as f64);
        let eigen = SymmetricEigen::new(corr);

        let mut order: Vec<usize> = (0..n_snap).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));
        let eigenvalues: Vec<f64> = order
            .iter()
            .map(|&k| eigen.eigenvalues[k].max(0.0))
            .collect();

        let lambda_max = eigenvalues[0];
        if !(lambda_max > 0.0) {
            return Err(PodError::DataUnavailable {
                what: format!(
                    "snapshots of '{}' carry no energy about the reference field",
                    config.field_name
                ),
            });
        }
        let rank = eigenvalues
            .iter()
            .take_while(|&&l| l > config.rank_tol * lambda_max)
            .count();
        if rank < config.n_modes {
            return Err(PodError::dimension(
                "independent snapshots for requested modes",
                config.n_modes,
                rank,
            ));
        }

        let raw_modes: Vec<Vec<f64>> = order[..config.n_modes]
            .par_iter()
            .map(|&col| {
                let mut phi = vec![0.0; mesh.n_cells()];
                for (k, u) in fluctuations.iter().enumerate() {
                    let w = eigen.eigenvectors[(k, col)];
                    for (p, v) in phi.iter_mut().zip(u) {
                        *p += w * v;
                    }
                }
                phi
            })
            .collect();

        let modes = gram_schmidt(mesh, raw_modes)?;
        let basis = Self {
            reference,
            modes,
            eigenvalues,
            mesh_fingerprint: mesh.fingerprint(),
            generation: 0,
        };
        basis.check_orthonormal(mesh, config.orthonormality_tol)?;

        debug!(
            field = %config.field_name,
            modes = basis.mode_count(),
            snapshots = n_snap,
            captured_energy = basis.captured_energy().unwrap_or(0.0),
            "built basis from snapshots"
        );

        Ok(basis)
    }

    /// Wrap precomputed modes, verifying sizes and orthonormality.
    pub fn from_modes(
        mesh: &Mesh,
        reference: Vec<f64>,
        modes: Vec<Vec<f64>>,
        eigenvalues: Vec<f64>,
        tol: f64,
    ) -> PodResult<Self> {
        if modes.is_empty() {
            return Err(PodError::DataUnavailable {
                what: "basis has no modes".to_string(),
            });
        }
        if reference.len() != mesh.n_cells() {
            return Err(PodError::dimension(
                "reference field length vs mesh cells",
                mesh.n_cells(),
                reference.len(),
            ));
        }
        for mode in &modes {
            if mode.len() != mesh.n_cells() {
                return Err(PodError::dimension(
                    "mode length vs mesh cells",
                    mesh.n_cells(),
                    mode.len(),
                ));
            }
            ensure_all_finite(mode, "mode value")?;
        }

        let basis = Self {
            reference,
            modes,
            eigenvalues,
            mesh_fingerprint: mesh.fingerprint(),
            generation: 0,
        };
        basis.check_orthonormal(mesh, tol)?;
        Ok(basis)
    }

    /// Rebuild from a persisted record, keeping the first `config.n_modes` modes.
    pub fn from_record(mesh: &Mesh, record: &BasisRecord, config: &PodConfig) -> PodResult<Self> {
        if record.mesh_fingerprint != mesh.fingerprint() {
            return Err(PodError::DimensionMismatch {
                what: format!(
                    "basis for '{}' was computed on a different mesh",
                    record.field
                ),
            });
        }
        if record.n_cells != mesh.n_cells() {
            return Err(PodError::dimension(
                "persisted basis cells vs mesh cells",
                mesh.n_cells(),
                record.n_cells,
            ));
        }
        if record.modes.len() < config.n_modes {
            return Err(PodError::dimension(
                "persisted modes for requested modes",
                config.n_modes,
                record.modes.len(),
            ));
        }

        Self::from_modes(
            mesh,
            record.reference.clone(),
            record.modes[..config.n_modes].to_vec(),
            record.eigenvalues.clone(),
            config.orthonormality_tol,
        )
    }

    pub fn to_record(&self, field: &str) -> BasisRecord {
        BasisRecord {
            field: field.to_string(),
            mesh_fingerprint: self.mesh_fingerprint.clone(),
            n_cells: self.reference.len(),
            reference: self.reference.clone(),
            modes: self.modes.clone(),
            eigenvalues: self.eigenvalues.clone(),
            created: timestamp_now(),
        }
    }

    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    pub fn n_cells(&self) -> usize {
        self.reference.len()
    }

    pub fn modes(&self) -> &[Vec<f64>] {
        &self.modes
    }

    pub fn mode(&self, i: usize) -> Option<&[f64]> {
        self.modes.get(i).map(Vec::as_slice)
    }

    pub fn reference(&self) -> &[f64] {
        &self.reference
    }

    /// Correlation eigenvalues, descending. Empty for hand-built bases.
    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    /// Fraction of snapshot energy carried by the retained modes.
    pub fn captured_energy(&self) -> Option<f64> {
        let total: f64 = self.eigenvalues.iter().sum();
        if self.eigenvalues.is_empty() || total <= 0.0 {
            return None;
        }
        let kept: f64 = self.eigenvalues.iter().take(self.modes.len()).sum();
        Some(kept / total)
    }

    pub fn mesh_fingerprint(&self) -> &str {
        &self.mesh_fingerprint
    }

    /// Generation stamp assigned by the owning model (0 when built standalone).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Coefficients `y_i = <field - reference, b_i>`.
    pub fn project_field(&self, mesh: &Mesh, field: &[f64]) -> PodResult<Vec<f64>> {
        if field.len() != self.n_cells() {
            return Err(PodError::dimension(
                "projected field length vs basis cells",
                self.n_cells(),
                field.len(),
            ));
        }
        let fluct: Vec<f64> = field
            .iter()
            .zip(&self.reference)
            .map(|(v, r)| v - r)
            .collect();
        self.modes
            .iter()
            .map(|b| Ok(mesh.inner(&fluct, b)?))
            .collect()
    }

    /// Largest `|<b_i, b_j> - delta_ij|`.
    pub fn orthonormality_error(&self, mesh: &Mesh) -> PodResult<f64> {
        let gram = mesh.gram(&self.modes)?;
        let mut worst = 0.0_f64;
        for (i, row) in gram.iter().enumerate() {
            for (j, g) in row.iter().enumerate() {
                let target = if i == j { 1.0 } else { 0.0 };
                worst = worst.max((g - target).abs());
            }
        }
        Ok(worst)
    }

    fn check_orthonormal(&self, mesh: &Mesh, tol: f64) -> PodResult<()> {
        let err = self.orthonormality_error(mesh)?;
        if !(err <= tol) {
            return Err(PodError::Numeric {
                what: format!("basis deviates from orthonormality by {err:e} (tolerance {tol:e})"),
            });
        }
        Ok(())
    }
}

/// Modified Gram-Schmidt under the mesh inner product.
fn gram_schmidt(mesh: &Mesh, mut modes: Vec<Vec<f64>>) -> PodResult<Vec<Vec<f64>>> {
    for i in 0..modes.len() {
        let (done, rest) = modes.split_at_mut(i);
        let phi = &mut rest[0];
        for prev in done.iter() {
            let c = mesh.inner(phi, prev)?;
            for (p, q) in phi.iter_mut().zip(prev) {
                *p -= c * q;
            }
        }
        let norm = mesh.norm(phi)?;
        if !(norm.is_finite() && norm > 0.0) {
            return Err(PodError::Numeric {
                what: format!("mode {i} vanished during orthonormalization"),
            });
        }
        phi.iter_mut().for_each(|p| *p /= norm);
    }
    Ok(modes)
}
