//! Content-based mesh fingerprints.
//!
//! Persisted snapshots, bases and output fields carry the fingerprint of the
//! mesh they were computed on; readers compare it against the live mesh.

use sha2::{Digest, Sha256};

use crate::mesh::Mesh;

impl Mesh {
    /// Hex SHA-256 over cell geometry and face topology.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();

        hasher.update((self.cells.len() as u64).to_le_bytes());
        for cell in &self.cells {
            hasher.update(cell.volume.to_le_bytes());
            for c in cell.centre {
                hasher.update(c.to_le_bytes());
            }
        }

        hasher.update((self.faces.len() as u64).to_le_bytes());
        for face in &self.faces {
            hasher.update(face.owner.index().to_le_bytes());
            match face.neighbour {
                Some(n) => hasher.update(n.index().to_le_bytes()),
                None => hasher.update(u32::MAX.to_le_bytes()),
            }
            hasher.update(face.area.to_le_bytes());
        }

        for patch in &self.patches {
            hasher.update(patch.name.as_bytes());
        }

        let result = hasher.finalize();
        format!("{:x}", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::units::{m, m2};

    #[test]
    fn fingerprint_stability() {
        let a = Mesh::uniform_line(5, m(1.0), m2(1.0)).unwrap();
        let b = Mesh::uniform_line(5, m(1.0), m2(1.0)).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn fingerprint_differs_for_different_meshes() {
        let a = Mesh::uniform_line(5, m(1.0), m2(1.0)).unwrap();
        let b = Mesh::uniform_line(6, m(1.0), m2(1.0)).unwrap();
        let c = Mesh::uniform_line(5, m(2.0), m2(1.0)).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
