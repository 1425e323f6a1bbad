//! Mesh-specific error types.

use pf_core::{CellId, FaceId, PatchId};

pub type MeshResult<T> = Result<T, MeshError>;

/// Mesh construction, validation and field errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    /// The mesh has no cells.
    Empty,

    /// A cell volume is zero, negative or non-finite.
    BadVolume { cell: CellId, volume: f64 },

    /// A face area is zero, negative or non-finite.
    BadArea { face: FaceId, area: f64 },

    /// A face normal is not a unit vector.
    BadNormal { face: FaceId },

    /// A face has the same cell on both sides.
    SelfNeighbour { face: FaceId, cell: CellId },

    /// A face refers to a cell that doesn't exist.
    InvalidCellRef { face: FaceId, cell: CellId },

    /// A boundary face refers to a patch that doesn't exist.
    InvalidPatchRef { face: FaceId, patch: PatchId },

    /// Cell centres coincide across a face, leaving no diffusion length.
    DegenerateDelta { face: FaceId },

    /// Two patches share a name.
    DuplicatePatch { name: String },

    /// Patch lookup by name failed.
    PatchNotFound { name: String },

    /// Field or coefficient length disagrees with the mesh.
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Builder argument outside its domain.
    InvalidArg { what: &'static str },
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::Empty => write!(f, "Mesh has no cells"),
            MeshError::BadVolume { cell, volume } => {
                write!(f, "Cell {} has invalid volume {}", cell, volume)
            }
            MeshError::BadArea { face, area } => {
                write!(f, "Face {} has invalid area {}", face, area)
            }
            MeshError::BadNormal { face } => {
                write!(f, "Face {} normal is not a unit vector", face)
            }
            MeshError::SelfNeighbour { face, cell } => {
                write!(f, "Face {} has cell {} on both sides", face, cell)
            }
            MeshError::InvalidCellRef { face, cell } => {
                write!(f, "Face {} refers to non-existent cell {}", face, cell)
            }
            MeshError::InvalidPatchRef { face, patch } => {
                write!(f, "Face {} refers to non-existent patch {}", face, patch)
            }
            MeshError::DegenerateDelta { face } => {
                write!(f, "Face {} has zero centre-to-centre distance", face)
            }
            MeshError::DuplicatePatch { name } => {
                write!(f, "Patch name '{}' is used more than once", name)
            }
            MeshError::PatchNotFound { name } => write!(f, "Patch '{}' not found", name),
            MeshError::LengthMismatch {
                what,
                expected,
                found,
            } => {
                write!(
                    f,
                    "{} has length {} but the mesh expects {}",
                    what, found, expected
                )
            }
            MeshError::InvalidArg { what } => write!(f, "Invalid argument: {}", what),
        }
    }
}

impl std::error::Error for MeshError {}
