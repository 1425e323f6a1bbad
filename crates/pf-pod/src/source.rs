//! Where the model gets its basis from.

use pf_io::CaseStore;
use pf_mesh::Mesh;
use tracing::info;

use crate::basis::OrthoNormalBasis;
use crate::config::PodConfig;
use crate::error::{PodError, PodResult};

#[derive(Debug, Clone)]
pub enum BasisSource {
    /// Snapshot fields held in memory, one value per cell each.
    InMemory(Vec<Vec<f64>>),
    /// A case directory: the persisted basis for the field if present,
    /// otherwise its snapshot records.
    Case(CaseStore),
}

impl BasisSource {
    pub fn build(&self, mesh: &Mesh, config: &PodConfig) -> PodResult<OrthoNormalBasis> {
        match self {
            BasisSource::InMemory(snapshots) => {
                OrthoNormalBasis::from_snapshots(mesh, snapshots, config)
            }
            BasisSource::Case(store) => Self::from_store(store, mesh, config),
        }
    }

    fn from_store(
        store: &CaseStore,
        mesh: &Mesh,
        config: &PodConfig,
    ) -> PodResult<OrthoNormalBasis> {
        let field = config.field_name.as_str();

        if store.has_basis(field) {
            let record = store.load_basis(field)?;
            let basis = OrthoNormalBasis::from_record(mesh, &record, config)?;
            info!(field, modes = basis.mode_count(), "loaded persisted basis");
            return Ok(basis);
        }

        let snapshots = load_snapshots(store, mesh, field)?;
        let basis = OrthoNormalBasis::from_snapshots(mesh, &snapshots, config)?;
        info!(
            field,
            snapshots = snapshots.len(),
            modes = basis.mode_count(),
            "built basis from case snapshots"
        );
        Ok(basis)
    }
}

/// Snapshot values of `field` stored under `store`, oldest first, checked
/// against the mesh fingerprint.
pub fn load_snapshots(store: &CaseStore, mesh: &Mesh, field: &str) -> PodResult<Vec<Vec<f64>>> {
    if !store.has_snapshots(field) {
        return Err(PodError::DataUnavailable {
            what: format!(
                "no snapshots of '{field}' under {}",
                store.root().display()
            ),
        });
    }

    let fingerprint = mesh.fingerprint();
    let records = store.load_snapshots(field)?;
    let mut snapshots = Vec::with_capacity(records.len());
    for record in records {
        if record.mesh_fingerprint != fingerprint {
            return Err(PodError::DimensionMismatch {
                what: format!(
                    "snapshot of '{field}' at t = {} was taken on a different mesh",
                    record.time_s
                ),
            });
        }
        snapshots.push(record.values);
    }
    Ok(snapshots)
}
