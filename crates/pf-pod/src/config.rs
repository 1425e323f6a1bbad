//! Model configuration block.

use crate::error::{PodError, PodResult};

/// Field the modes are fluctuations about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferenceField {
    /// Modes span the raw snapshots.
    #[default]
    Zero,
    /// Modes span the snapshot fluctuations about their volume-wise mean.
    SnapshotMean,
}

/// Construction-time settings for [`crate::ScalarTransportPod`].
#[derive(Debug, Clone, PartialEq)]
pub struct PodConfig {
    /// Name of the modelled field; used for storage lookups and output.
    pub field_name: String,
    /// Number of retained modes (= number of ODE equations).
    pub n_modes: usize,
    pub reference: ReferenceField,
    /// Allowed deviation of `<b_i, b_j>` from the Kronecker delta.
    pub orthonormality_tol: f64,
    /// Eigenvalues below `rank_tol * lambda_max` count as rank deficiency.
    pub rank_tol: f64,
    /// Drop the reconstructed field whenever coefficients are borrowed mutably.
    pub auto_clear_fields: bool,
}

impl PodConfig {
    pub fn new(field_name: impl Into<String>, n_modes: usize) -> Self {
        Self {
            field_name: field_name.into(),
            n_modes,
            reference: ReferenceField::default(),
            orthonormality_tol: 1e-8,
            rank_tol: 1e-12,
            auto_clear_fields: true,
        }
    }

    pub fn with_reference(mut self, reference: ReferenceField) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_auto_clear_fields(mut self, enabled: bool) -> Self {
        self.auto_clear_fields = enabled;
        self
    }

    pub fn validate(&self) -> PodResult<()> {
        if self.field_name.trim().is_empty() {
            return Err(PodError::ModelNotInitialized {
                what: "field name is empty",
            });
        }
        if self.n_modes == 0 {
            return Err(PodError::dimension("retained mode count", 1, 0));
        }
        if !(self.orthonormality_tol.is_finite() && self.orthonormality_tol > 0.0) {
            return Err(PodError::Numeric {
                what: "orthonormality tolerance must be positive".to_string(),
            });
        }
        if !(self.rank_tol.is_finite() && self.rank_tol >= 0.0) {
            return Err(PodError::Numeric {
                what: "rank tolerance must be non-negative".to_string(),
            });
        }
        Ok(())
    }
}
