//! Persisted record types.

use serde::{Deserialize, Serialize};

/// One full-order snapshot of a field at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotRecord {
    pub field: String,
    pub time_s: f64,
    pub mesh_fingerprint: String,
    pub values: Vec<f64>,
}

/// A persisted orthonormal basis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BasisRecord {
    pub field: String,
    pub mesh_fingerprint: String,
    pub n_cells: usize,
    /// Reference (mean) field the modes are fluctuations about.
    pub reference: Vec<f64>,
    /// Mode fields, most energetic first.
    pub modes: Vec<Vec<f64>>,
    /// Correlation-matrix eigenvalues, descending; may be longer than `modes`.
    #[serde(default)]
    pub eigenvalues: Vec<f64>,
    pub created: String,
}

/// A reconstructed (or otherwise derived) field written at an output time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldRecord {
    pub field: String,
    pub time_s: f64,
    pub mesh_fingerprint: String,
    pub values: Vec<f64>,
}

/// Current UTC time in RFC 3339 form, for `created` stamps.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Directory-name form of a time value.
pub fn time_dir_name(time_s: f64) -> String {
    format!("{:.6}", time_s)
}
