//! Mesh validation logic.

use std::collections::HashSet;

use crate::builder::PendingFace;
use crate::error::{MeshError, MeshResult};
use crate::mesh::{Cell, Face, Patch};

const NORMAL_TOL: f64 = 1e-9;

/// Validate the mesh structure: all references exist, sizes are positive, etc.
pub(crate) fn validate_structure(
    cells: &[Cell],
    faces: &[PendingFace],
    patches: &[Patch],
) -> MeshResult<()> {
    if cells.is_empty() {
        return Err(MeshError::Empty);
    }

    for cell in cells {
        if !(cell.volume.is_finite() && cell.volume > 0.0) {
            return Err(MeshError::BadVolume {
                cell: cell.id,
                volume: cell.volume,
            });
        }
    }

    // Patch names must be unique
    let mut names = HashSet::new();
    for patch in patches {
        if !names.insert(patch.name.as_str()) {
            return Err(MeshError::DuplicatePatch {
                name: patch.name.clone(),
            });
        }
    }

    for face in faces {
        if face.owner.idx() >= cells.len() {
            return Err(MeshError::InvalidCellRef {
                face: face.id,
                cell: face.owner,
            });
        }

        match (face.neighbour, face.patch) {
            (Some(n), _) => {
                if n.idx() >= cells.len() {
                    return Err(MeshError::InvalidCellRef {
                        face: face.id,
                        cell: n,
                    });
                }
                if n == face.owner {
                    return Err(MeshError::SelfNeighbour {
                        face: face.id,
                        cell: n,
                    });
                }
            }
            (None, Some(p)) => {
                if p.idx() >= patches.len() {
                    return Err(MeshError::InvalidPatchRef {
                        face: face.id,
                        patch: p,
                    });
                }
            }
            (None, None) => {
                return Err(MeshError::InvalidArg {
                    what: "face has neither neighbour nor patch",
                });
            }
        }

        if !(face.area.is_finite() && face.area > 0.0) {
            return Err(MeshError::BadArea {
                face: face.id,
                area: face.area,
            });
        }

        let len2: f64 = face.normal.iter().map(|c| c * c).sum();
        if !len2.is_finite() || (len2.sqrt() - 1.0).abs() > NORMAL_TOL {
            return Err(MeshError::BadNormal { face: face.id });
        }
    }

    Ok(())
}

/// Validate resolved geometry: every face needs a positive diffusion length.
pub(crate) fn validate_geometry(faces: &[Face]) -> MeshResult<()> {
    for face in faces {
        if !(face.delta.is_finite() && face.delta > 0.0) {
            return Err(MeshError::DegenerateDelta { face: face.id });
        }
    }
    Ok(())
}
