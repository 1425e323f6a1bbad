//! Case directory storage API.
//!
//! Layout under the case root:
//!
//! ```text
//! snapshots/<field>/<time>.json    SnapshotRecord
//! pod/<field>.basis.json           BasisRecord
//! output/<time>/<field>.json       FieldRecord
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::types::{BasisRecord, FieldRecord, SnapshotRecord, time_dir_name};
use crate::{IoError, IoResult};

#[derive(Clone, Debug)]
pub struct CaseStore {
    root_dir: PathBuf,
}

impl CaseStore {
    pub fn new(root_dir: PathBuf) -> IoResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store rooted at the directory containing a case file.
    pub fn for_case(case_path: &Path) -> IoResult<Self> {
        let case_dir = case_path
            .parent()
            .ok_or_else(|| IoError::InvalidPath {
                message: "case path has no parent directory".to_string(),
            })?;
        if case_dir.as_os_str().is_empty() {
            return Self::new(PathBuf::from("."));
        }
        Self::new(case_dir.to_path_buf())
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    fn snapshot_dir(&self, field: &str) -> PathBuf {
        self.root_dir.join("snapshots").join(field)
    }

    fn basis_path(&self, field: &str) -> PathBuf {
        self.root_dir.join("pod").join(format!("{field}.basis.json"))
    }

    fn output_dir(&self, time_s: f64) -> PathBuf {
        self.root_dir.join("output").join(time_dir_name(time_s))
    }

    // Snapshots

    pub fn write_snapshot(&self, record: &SnapshotRecord) -> IoResult<PathBuf> {
        let dir = self.snapshot_dir(&record.field);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.json", time_dir_name(record.time_s)));
        fs::write(&path, serde_json::to_string(record)?)?;
        debug!(path = %path.display(), "wrote snapshot");
        Ok(path)
    }

    pub fn has_snapshots(&self, field: &str) -> bool {
        fs::read_dir(self.snapshot_dir(field))
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    /// Load every snapshot of `field`, sorted by time.
    pub fn load_snapshots(&self, field: &str) -> IoResult<Vec<SnapshotRecord>> {
        let dir = self.snapshot_dir(field);
        if !dir.exists() {
            return Err(IoError::NotFound {
                what: format!("snapshot directory {}", dir.display()),
            });
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                let record: SnapshotRecord = serde_json::from_str(&content)?;
                records.push(record);
            }
        }
        records.sort_by(|a, b| a.time_s.total_cmp(&b.time_s));

        Ok(records)
    }

    /// Remove all snapshots of `field`.
    pub fn clear_snapshots(&self, field: &str) -> IoResult<()> {
        let dir = self.snapshot_dir(field);
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        Ok(())
    }

    // Basis

    pub fn has_basis(&self, field: &str) -> bool {
        self.basis_path(field).exists()
    }

    pub fn save_basis(&self, record: &BasisRecord) -> IoResult<PathBuf> {
        let path = self.basis_path(&record.field);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, serde_json::to_string_pretty(record)?)?;
        debug!(path = %path.display(), modes = record.modes.len(), "saved basis");
        Ok(path)
    }

    pub fn load_basis(&self, field: &str) -> IoResult<BasisRecord> {
        let path = self.basis_path(field);
        if !path.exists() {
            return Err(IoError::NotFound {
                what: format!("basis file {}", path.display()),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    // Output fields

    pub fn write_field(&self, record: &FieldRecord) -> IoResult<PathBuf> {
        let dir = self.output_dir(record.time_s);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.json", record.field));
        fs::write(&path, serde_json::to_string(record)?)?;
        debug!(path = %path.display(), "wrote field");
        Ok(path)
    }

    pub fn load_field(&self, field: &str, time_s: f64) -> IoResult<FieldRecord> {
        let path = self.output_dir(time_s).join(format!("{field}.json"));
        if !path.exists() {
            return Err(IoError::NotFound {
                what: format!("field {} at t = {}", field, time_dir_name(time_s)),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Output times present on disk, ascending.
    pub fn list_output_times(&self) -> IoResult<Vec<f64>> {
        let dir = self.root_dir.join("output");
        let mut times = Vec::new();

        if !dir.exists() {
            return Ok(times);
        }

        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.path().is_dir()
                && let Ok(t) = entry.file_name().to_string_lossy().parse::<f64>()
            {
                times.push(t);
            }
        }
        times.sort_by(f64::total_cmp);

        Ok(times)
    }
}
