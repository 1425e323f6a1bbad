//! Error types for the reduced-order model.

use pf_core::PfError;
use pf_io::IoError;
use pf_mesh::MeshError;
use thiserror::Error;

/// Errors raised while building or evaluating the reduced-order model.
///
/// All of them are deterministic given the inputs; none is retried internally.
#[derive(Error, Debug)]
pub enum PodError {
    /// Snapshot or basis source missing or empty.
    #[error("Data unavailable: {what}")]
    DataUnavailable { what: String },

    /// Coefficient count, mode count or mesh size disagree.
    #[error("Dimension mismatch: {what}")]
    DimensionMismatch { what: String },

    /// A computation was handed a basis the model has since cleared.
    #[error("Stale basis: {what}")]
    StaleBasis { what: String },

    /// Inputs needed to materialize the model were never supplied.
    #[error("Model not initialized: {what}")]
    ModelNotInitialized { what: &'static str },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Storage error: {0}")]
    Storage(#[from] IoError),

    #[error(transparent)]
    Core(#[from] PfError),
}

pub type PodResult<T> = Result<T, PodError>;

impl PodError {
    pub(crate) fn dimension(what: &str, expected: usize, found: usize) -> Self {
        PodError::DimensionMismatch {
            what: format!("{what}: expected {expected}, found {found}"),
        }
    }
}
