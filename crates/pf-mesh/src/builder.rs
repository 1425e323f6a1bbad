//! Incremental mesh builder.

use pf_core::units::{Area, Volume};
use pf_core::{CellId, FaceId, PatchId};

use crate::error::MeshResult;
use crate::mesh::{Cell, Face, Mesh, Patch};
use crate::validate;

/// Face as recorded by the builder; `delta` is resolved at `build()`.
#[derive(Debug, Clone)]
pub(crate) struct PendingFace {
    pub(crate) id: FaceId,
    pub(crate) owner: CellId,
    pub(crate) neighbour: Option<CellId>,
    pub(crate) patch: Option<PatchId>,
    pub(crate) area: f64,
    pub(crate) normal: [f64; 3],
    /// Boundary face centre, used for the owner-to-face distance.
    pub(crate) face_centre: Option<[f64; 3]>,
}

/// Builder for constructing a mesh incrementally.
///
/// Use `add_cell`, `add_patch` and the `add_*_face` methods to build up the
/// mesh, then call `build()` to validate and freeze it into an immutable `Mesh`.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    pub(crate) cells: Vec<Cell>,
    pub(crate) faces: Vec<PendingFace>,
    pub(crate) patches: Vec<Patch>,
}

impl MeshBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell and return its ID.
    pub fn add_cell(&mut self, centre: [f64; 3], volume: Volume) -> CellId {
        let id = CellId::from_index(self.cells.len() as u32);
        self.cells.push(Cell {
            id,
            centre,
            volume: volume.value,
        });
        id
    }

    /// Add a named boundary patch and return its ID.
    pub fn add_patch(&mut self, name: impl Into<String>) -> PatchId {
        let id = PatchId::from_index(self.patches.len() as u32);
        self.patches.push(Patch {
            id,
            name: name.into(),
        });
        id
    }

    /// Add a face shared by two cells. `normal` points from owner to neighbour.
    pub fn add_internal_face(
        &mut self,
        owner: CellId,
        neighbour: CellId,
        area: Area,
        normal: [f64; 3],
    ) -> FaceId {
        self.push_face(owner, Some(neighbour), None, area, normal, None)
    }

    /// Add a boundary face on `patch`. `normal` points out of the domain.
    pub fn add_boundary_face(
        &mut self,
        owner: CellId,
        patch: PatchId,
        area: Area,
        normal: [f64; 3],
        face_centre: [f64; 3],
    ) -> FaceId {
        self.push_face(owner, None, Some(patch), area, normal, Some(face_centre))
    }

    fn push_face(
        &mut self,
        owner: CellId,
        neighbour: Option<CellId>,
        patch: Option<PatchId>,
        area: Area,
        normal: [f64; 3],
        face_centre: Option<[f64; 3]>,
    ) -> FaceId {
        let id = FaceId::from_index(self.faces.len() as u32);
        self.faces.push(PendingFace {
            id,
            owner,
            neighbour,
            patch,
            area: area.value,
            normal,
            face_centre,
        });
        id
    }

    /// Build and validate the mesh, returning an immutable `Mesh`.
    pub fn build(self) -> MeshResult<Mesh> {
        validate::validate_structure(&self.cells, &self.faces, &self.patches)?;

        let faces = self
            .faces
            .iter()
            .map(|f| {
                let from = self.cells[f.owner.idx()].centre;
                let to = match (f.neighbour, f.face_centre) {
                    (Some(n), _) => self.cells[n.idx()].centre,
                    (None, Some(c)) => c,
                    // validate_structure guarantees one of the two
                    (None, None) => from,
                };
                Face {
                    id: f.id,
                    owner: f.owner,
                    neighbour: f.neighbour,
                    patch: f.patch,
                    area: f.area,
                    normal: f.normal,
                    delta: distance(from, to),
                }
            })
            .collect::<Vec<_>>();

        validate::validate_geometry(&faces)?;

        let (cell_face_offsets, cell_faces) = Self::build_adjacency(&self.cells, &faces);

        Ok(Mesh {
            cells: self.cells,
            faces,
            patches: self.patches,
            cell_face_offsets,
            cell_faces,
        })
    }

    /// Build compact adjacency lists: for each cell, collect its faces in face order.
    fn build_adjacency(cells: &[Cell], faces: &[Face]) -> (Vec<usize>, Vec<FaceId>) {
        let mut per_cell: Vec<Vec<FaceId>> = vec![Vec::new(); cells.len()];
        for face in faces {
            per_cell[face.owner.idx()].push(face.id);
            if let Some(n) = face.neighbour {
                per_cell[n.idx()].push(face.id);
            }
        }

        let mut offsets = Vec::with_capacity(cells.len() + 1);
        let mut flat = Vec::new();
        offsets.push(0);
        for list in per_cell {
            flat.extend(list);
            offsets.push(flat.len());
        }

        (offsets, flat)
    }
}

fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use pf_core::units::{m2, m3};

    #[test]
    fn builder_basic() {
        let mut builder = MeshBuilder::new();
        let c1 = builder.add_cell([0.5, 0.0, 0.0], m3(1.0));
        let c2 = builder.add_cell([1.5, 0.0, 0.0], m3(1.0));
        let wall = builder.add_patch("wall");
        let f1 = builder.add_internal_face(c1, c2, m2(1.0), [1.0, 0.0, 0.0]);

        assert_eq!(c1.index(), 0);
        assert_eq!(c2.index(), 1);
        assert_eq!(wall.index(), 0);
        assert_eq!(f1.index(), 0);
        assert_eq!(builder.cells.len(), 2);
    }

    #[test]
    fn builder_resolves_deltas_and_adjacency() {
        let mut builder = MeshBuilder::new();
        let c1 = builder.add_cell([0.5, 0.0, 0.0], m3(1.0));
        let c2 = builder.add_cell([2.0, 0.0, 0.0], m3(2.0));
        let wall = builder.add_patch("wall");
        builder.add_boundary_face(c1, wall, m2(1.0), [-1.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        builder.add_internal_face(c1, c2, m2(1.0), [1.0, 0.0, 0.0]);

        let mesh = builder.build().unwrap();
        assert!((mesh.faces()[0].delta - 0.5).abs() < 1e-15);
        assert!((mesh.faces()[1].delta - 1.5).abs() < 1e-15);
        assert_eq!(mesh.cell_faces(c1).len(), 2);
        assert_eq!(mesh.cell_faces(c2).len(), 1);
    }

    #[test]
    fn builder_rejects_coincident_centres() {
        let mut builder = MeshBuilder::new();
        let c1 = builder.add_cell([0.0, 0.0, 0.0], m3(1.0));
        let c2 = builder.add_cell([0.0, 0.0, 0.0], m3(1.0));
        let f = builder.add_internal_face(c1, c2, m2(1.0), [1.0, 0.0, 0.0]);
        assert_eq!(
            builder.build().unwrap_err(),
            MeshError::DegenerateDelta { face: f }
        );
    }
}
