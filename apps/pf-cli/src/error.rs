//! CLI error type.

use pf_case::CaseError;
use pf_io::IoError;
use pf_mesh::MeshError;
use pf_ode::OdeError;
use pf_pod::PodError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Case error: {0}")]
    Case(#[from] CaseError),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Model error: {0}")]
    Pod(#[from] PodError),

    #[error("Integration error: {0}")]
    Ode(#[from] OdeError),

    #[error("Storage error: {0}")]
    Storage(#[from] IoError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type CliResult<T> = Result<T, CliError>;
