//! The reduced-order model: coefficient state, lazy caches and the ODE contract.

use std::path::PathBuf;

use nalgebra::DMatrix;
use pf_io::{CaseStore, FieldRecord};
use pf_mesh::{Mesh, ScalarField};
use pf_ode::OdeSystem;
use tracing::{debug, info};

use crate::basis::OrthoNormalBasis;
use crate::config::PodConfig;
use crate::error::{PodError, PodResult};
use crate::operator::DerivativeOperator;
use crate::reconstruct::reconstruct;
use crate::source::BasisSource;
use crate::transport::TransportOperator;

/// Observable state of one cached artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Absent,
    Cached,
}

/// How many times each artifact has been materialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub basis_builds: usize,
    pub operator_builds: usize,
    pub field_builds: usize,
}

#[derive(Debug)]
enum Cache<T> {
    Absent,
    Cached(T),
}

impl<T> Cache<T> {
    fn state(&self) -> CacheState {
        match self {
            Cache::Absent => CacheState::Absent,
            Cache::Cached(_) => CacheState::Cached,
        }
    }

    fn get(&self) -> Option<&T> {
        match self {
            Cache::Absent => None,
            Cache::Cached(v) => Some(v),
        }
    }

    fn is_absent(&self) -> bool {
        matches!(self, Cache::Absent)
    }

    fn clear(&mut self) {
        *self = Cache::Absent;
    }
}

/// POD reduced-order model of a passive scalar.
///
/// Owns the coefficient vector `y` and three lazily materialized artifacts:
/// the basis, the projected operator `M` and the reconstructed field. Reads
/// that need an absent artifact build it; `clear_base` and `clear_fields`
/// release them. The basis and operator are only ever cleared together.
///
/// The model borrows its mesh and is deliberately not `Clone`.
pub struct ScalarTransportPod<'m> {
    mesh: &'m Mesh,
    config: PodConfig,
    transport: Box<dyn TransportOperator>,
    source: Option<BasisSource>,
    output: Option<CaseStore>,
    coefficients: Vec<f64>,
    generation: u64,
    basis: Cache<OrthoNormalBasis>,
    operator: Cache<DerivativeOperator>,
    field: Cache<ScalarField>,
    stats: CacheStats,
}

impl<'m> ScalarTransportPod<'m> {
    /// Create a model with all coefficients zero and every cache absent.
    pub fn new(
        mesh: &'m Mesh,
        config: PodConfig,
        transport: Box<dyn TransportOperator>,
    ) -> PodResult<Self> {
        config.validate()?;
        Ok(Self {
            mesh,
            coefficients: vec![0.0; config.n_modes],
            config,
            transport,
            source: None,
            output: None,
            generation: 1,
            basis: Cache::Absent,
            operator: Cache::Absent,
            field: Cache::Absent,
            stats: CacheStats::default(),
        })
    }

    pub fn with_source(mut self, source: BasisSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Store used by [`Self::write`].
    pub fn with_output(mut self, store: CaseStore) -> Self {
        self.output = Some(store);
        self
    }

    pub fn mesh(&self) -> &'m Mesh {
        self.mesh
    }

    pub fn config(&self) -> &PodConfig {
        &self.config
    }

    pub fn transport(&self) -> &dyn TransportOperator {
        self.transport.as_ref()
    }

    /// Replace the coefficient vector. Drops the reconstructed field.
    pub fn set_coefficients(&mut self, y: &[f64]) -> PodResult<()> {
        if y.len() != self.coefficients.len() {
            return Err(PodError::dimension(
                "coefficient vector",
                self.coefficients.len(),
                y.len(),
            ));
        }
        self.coefficients.copy_from_slice(y);
        self.field.clear();
        Ok(())
    }

    /// Set the coefficients to the projection of a full-order field.
    pub fn initialise_from(&mut self, field: &[f64]) -> PodResult<()> {
        self.ensure_basis()?;
        let basis = self.basis.get().ok_or(PodError::ModelNotInitialized {
            what: "basis",
        })?;
        let y = basis.project_field(self.mesh, field)?;
        self.set_coefficients(&y)
    }

    /// The basis, built from the configured source on first use.
    pub fn ortho_base(&mut self) -> PodResult<&OrthoNormalBasis> {
        self.ensure_basis()?;
        self.basis.get().ok_or(PodError::ModelNotInitialized {
            what: "basis",
        })
    }

    /// The projected operator, built on first use.
    pub fn derivative_operator(&mut self) -> PodResult<&DerivativeOperator> {
        self.ensure_operator()?;
        self.operator.get().ok_or(PodError::ModelNotInitialized {
            what: "derivative operator",
        })
    }

    /// The reconstructed field, built from the current coefficients if absent.
    ///
    /// A cached field is returned as is. With `auto_clear_fields` disabled,
    /// refreshing it after changing coefficients is up to the caller.
    pub fn field(&mut self) -> PodResult<&ScalarField> {
        if self.field.is_absent() {
            self.update_fields()?;
        }
        self.field.get().ok_or(PodError::ModelNotInitialized {
            what: "reconstructed field",
        })
    }

    /// Rebuild the reconstructed field from the current coefficients.
    pub fn update_fields(&mut self) -> PodResult<()> {
        self.ensure_basis()?;
        let basis = self.basis.get().ok_or(PodError::ModelNotInitialized {
            what: "basis",
        })?;
        let values = reconstruct(basis, &self.coefficients)?;
        let field = ScalarField::new(self.mesh, self.config.field_name.clone(), values)?;
        self.field = Cache::Cached(field);
        self.stats.field_builds += 1;
        Ok(())
    }

    /// Release the basis and the operator derived from it.
    pub fn clear_base(&mut self) {
        if !self.basis.is_absent() {
            self.generation += 1;
            debug!(generation = self.generation, "cleared basis");
        }
        self.basis.clear();
        self.operator.clear();
    }

    /// Release the reconstructed field.
    pub fn clear_fields(&mut self) {
        self.field.clear();
    }

    /// Reconstruct the current coefficients against a basis handed back by
    /// the caller, which must still be the model's live basis.
    pub fn reconstruct_with(&self, basis: &OrthoNormalBasis) -> PodResult<Vec<f64>> {
        if basis.generation() != self.generation || self.basis.is_absent() {
            return Err(PodError::StaleBasis {
                what: format!(
                    "reconstruction against basis generation {} (live generation {})",
                    basis.generation(),
                    self.generation
                ),
            });
        }
        reconstruct(basis, &self.coefficients)
    }

    /// Write the reconstructed field at `time_s` to the output store.
    pub fn write(&mut self, time_s: f64) -> PodResult<PathBuf> {
        if self.output.is_none() {
            return Err(PodError::ModelNotInitialized {
                what: "no output store configured",
            });
        }
        if self.field.is_absent() {
            self.update_fields()?;
        }

        let (Some(store), Some(field)) = (self.output.as_ref(), self.field.get()) else {
            return Err(PodError::ModelNotInitialized {
                what: "reconstructed field",
            });
        };
        let record = FieldRecord {
            field: field.name().to_string(),
            time_s,
            mesh_fingerprint: self.mesh.fingerprint(),
            values: field.values().to_vec(),
        };
        Ok(store.write_field(&record)?)
    }

    /// Generation of the live basis; bumped by every effective `clear_base`.
    pub fn basis_generation(&self) -> u64 {
        self.generation
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.stats
    }

    pub fn basis_state(&self) -> CacheState {
        self.basis.state()
    }

    pub fn operator_state(&self) -> CacheState {
        self.operator.state()
    }

    pub fn field_state(&self) -> CacheState {
        self.field.state()
    }

    fn ensure_basis(&mut self) -> PodResult<()> {
        if !self.basis.is_absent() {
            return Ok(());
        }
        let source = self.source.as_ref().ok_or(PodError::ModelNotInitialized {
            what: "no snapshot or basis source configured",
        })?;

        let basis = source
            .build(self.mesh, &self.config)?
            .with_generation(self.generation);
        if basis.mode_count() != self.config.n_modes {
            return Err(PodError::dimension(
                "basis modes vs configured modes",
                self.config.n_modes,
                basis.mode_count(),
            ));
        }

        info!(
            field = %self.config.field_name,
            modes = basis.mode_count(),
            generation = self.generation,
            "basis materialized"
        );
        self.basis = Cache::Cached(basis);
        self.stats.basis_builds += 1;
        Ok(())
    }

    fn ensure_operator(&mut self) -> PodResult<()> {
        self.ensure_basis()?;
        if !self.operator.is_absent() {
            return Ok(());
        }
        let basis = self.basis.get().ok_or(PodError::ModelNotInitialized {
            what: "basis",
        })?;

        let op = DerivativeOperator::project(
            self.mesh,
            basis,
            self.transport.as_ref(),
            Some(self.generation),
        )?;
        debug!(
            transport = self.transport.name(),
            size = op.size(),
            "derivative operator projected"
        );
        self.operator = Cache::Cached(op);
        self.stats.operator_builds += 1;
        Ok(())
    }
}

impl OdeSystem for ScalarTransportPod<'_> {
    type Error = PodError;

    fn equation_count(&self) -> usize {
        self.config.n_modes
    }

    fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    fn coefficients_mut(&mut self) -> &mut [f64] {
        if self.config.auto_clear_fields {
            self.field.clear();
        }
        &mut self.coefficients
    }

    /// `dydx = M y`; `x` is unused since the system is autonomous.
    fn derivatives(&mut self, _x: f64, y: &[f64], dydx: &mut [f64]) -> PodResult<()> {
        self.ensure_operator()?;
        let op = self.operator.get().ok_or(PodError::ModelNotInitialized {
            what: "derivative operator",
        })?;
        op.apply(y, dydx)
    }

    /// `dfdy = M` from the cached operator, `dfdx = 0`.
    fn jacobian(
        &mut self,
        _x: f64,
        y: &[f64],
        dfdx: &mut [f64],
        dfdy: &mut DMatrix<f64>,
    ) -> PodResult<()> {
        self.ensure_operator()?;
        let op = self.operator.get().ok_or(PodError::ModelNotInitialized {
            what: "derivative operator",
        })?;

        let n = op.size();
        if y.len() != n {
            return Err(PodError::dimension("coefficient vector", n, y.len()));
        }
        if dfdx.len() != n {
            return Err(PodError::dimension("dfdx", n, dfdx.len()));
        }
        if dfdy.shape() != (n, n) {
            return Err(PodError::DimensionMismatch {
                what: format!("dfdy: expected {n}x{n}, found {}x{}", dfdy.nrows(), dfdy.ncols()),
            });
        }

        dfdx.fill(0.0);
        dfdy.copy_from(op.matrix());
        Ok(())
    }
}
