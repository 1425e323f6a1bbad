//! pf-mesh: finite-volume mesh layer for podflow.
//!
//! Provides:
//! - Core mesh data structures (Cell, Face, Patch, Mesh)
//! - Incremental mesh builder with validation
//! - Cell-centred scalar fields and the volume-weighted inner product
//! - Content fingerprints for checking persisted data against a mesh
//!
//! # Example
//!
//! ```
//! use pf_core::units::{m, m2};
//! use pf_mesh::Mesh;
//!
//! let mesh = Mesh::uniform_line(10, m(1.0), m2(0.01)).unwrap();
//! assert_eq!(mesh.n_cells(), 10);
//! assert_eq!(mesh.internal_faces().count(), 9);
//! assert!(mesh.patch_by_name("inlet").is_some());
//! ```

pub mod builder;
pub mod error;
pub mod field;
pub mod fingerprint;
pub mod mesh;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::MeshBuilder;
pub use error::{MeshError, MeshResult};
pub use field::ScalarField;
pub use mesh::{Cell, Face, Mesh, Patch};
