//! Core mesh data structures.

use pf_core::units::{Area, Length};
use pf_core::{CellId, FaceId, PatchId};
use rayon::prelude::*;

use crate::builder::MeshBuilder;
use crate::error::{MeshError, MeshResult};

/// A finite-volume cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: CellId,
    /// Cell centre (m).
    pub centre: [f64; 3],
    /// Cell volume (m^3).
    pub volume: f64,
}

/// A face between two cells, or between a cell and a boundary patch.
///
/// The normal points from `owner` towards `neighbour`; on boundary faces it
/// points out of the domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub id: FaceId,
    pub owner: CellId,
    /// `None` on boundary faces.
    pub neighbour: Option<CellId>,
    /// Boundary patch, `None` on internal faces.
    pub patch: Option<PatchId>,
    /// Face area (m^2).
    pub area: f64,
    /// Unit normal.
    pub normal: [f64; 3],
    /// Owner centre to neighbour centre (internal) or to face centre (boundary), in m.
    pub delta: f64,
}

impl Face {
    pub fn is_boundary(&self) -> bool {
        self.neighbour.is_none()
    }
}

/// A named group of boundary faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub id: PatchId,
    pub name: String,
}

/// The mesh: a validated, immutable collection of cells, faces and patches.
///
/// Stores compact cell->face adjacency: cell i's faces are in
/// `cell_faces[cell_face_offsets[i]..cell_face_offsets[i+1]]`.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub(crate) cells: Vec<Cell>,
    pub(crate) faces: Vec<Face>,
    pub(crate) patches: Vec<Patch>,
    pub(crate) cell_face_offsets: Vec<usize>,
    pub(crate) cell_faces: Vec<FaceId>,
}

impl Mesh {
    /// Uniform 1-D channel along x with patches `inlet` (x = 0) and
    /// `outlet` (x = length).
    pub fn uniform_line(n_cells: usize, length: Length, area: Area) -> MeshResult<Mesh> {
        if n_cells == 0 {
            return Err(MeshError::Empty);
        }
        let len = length.value;
        if !(len.is_finite() && len > 0.0) {
            return Err(MeshError::InvalidArg {
                what: "line length must be positive",
            });
        }
        let dx = len / n_cells as f64;
        let volume = area * pf_core::units::m(dx);

        let mut builder = MeshBuilder::new();
        let inlet = builder.add_patch("inlet");
        let outlet = builder.add_patch("outlet");

        let cells: Vec<CellId> = (0..n_cells)
            .map(|i| builder.add_cell([(i as f64 + 0.5) * dx, 0.0, 0.0], volume))
            .collect();

        builder.add_boundary_face(cells[0], inlet, area, [-1.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        for pair in cells.windows(2) {
            builder.add_internal_face(pair[0], pair[1], area, [1.0, 0.0, 0.0]);
        }
        builder.add_boundary_face(cells[n_cells - 1], outlet, area, [1.0, 0.0, 0.0], [len, 0.0, 0.0]);

        builder.build()
    }

    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.idx())
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.idx())
    }

    pub fn patch(&self, id: PatchId) -> Option<&Patch> {
        self.patches.get(id.idx())
    }

    pub fn patch_by_name(&self, name: &str) -> Option<&Patch> {
        self.patches.iter().find(|p| p.name == name)
    }

    pub fn internal_faces(&self) -> impl Iterator<Item = &Face> {
        self.faces.iter().filter(|f| !f.is_boundary())
    }

    pub fn boundary_faces(&self) -> impl Iterator<Item = &Face> {
        self.faces.iter().filter(|f| f.is_boundary())
    }

    /// Faces touching a given cell.
    pub fn cell_faces(&self, cell: CellId) -> &[FaceId] {
        let idx = cell.idx();
        if idx >= self.cells.len() {
            return &[];
        }
        &self.cell_faces[self.cell_face_offsets[idx]..self.cell_face_offsets[idx + 1]]
    }

    /// Cell volumes in cell order.
    pub fn volumes(&self) -> Vec<f64> {
        self.cells.iter().map(|c| c.volume).collect()
    }

    pub fn total_volume(&self) -> f64 {
        self.cells.iter().map(|c| c.volume).sum()
    }

    /// Check that a per-cell array matches the mesh size.
    pub fn check_len(&self, what: &'static str, values: &[f64]) -> MeshResult<()> {
        if values.len() != self.cells.len() {
            return Err(MeshError::LengthMismatch {
                what,
                expected: self.cells.len(),
                found: values.len(),
            });
        }
        Ok(())
    }

    /// Volume-weighted inner product `sum_c V_c a_c b_c`.
    pub fn inner(&self, a: &[f64], b: &[f64]) -> MeshResult<f64> {
        self.check_len("left operand", a)?;
        self.check_len("right operand", b)?;
        Ok(self
            .cells
            .iter()
            .zip(a.iter().zip(b))
            .map(|(c, (x, y))| c.volume * x * y)
            .sum())
    }

    /// Volume-weighted norm.
    pub fn norm(&self, a: &[f64]) -> MeshResult<f64> {
        Ok(self.inner(a, a)?.sqrt())
    }

    /// Gram matrix `G[i][j] = <fields_i, fields_j>` in row-major order.
    ///
    /// Rows are evaluated in parallel; each entry is summed sequentially in
    /// cell order so the result does not depend on thread count.
    pub fn gram(&self, fields: &[Vec<f64>]) -> MeshResult<Vec<Vec<f64>>> {
        for f in fields {
            self.check_len("gram operand", f)?;
        }
        fields
            .par_iter()
            .map(|a| {
                fields
                    .iter()
                    .map(|b| self.inner(a, b))
                    .collect::<MeshResult<Vec<f64>>>()
            })
            .collect()
    }
}
