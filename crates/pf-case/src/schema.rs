//! Case schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    pub version: u32,
    pub name: String,
    pub mesh: MeshDef,
    pub transport: TransportDef,
    pub pod: PodDef,
    /// Full-order run that produces snapshots; optional when the case
    /// directory already holds snapshots or a basis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_order: Option<FullOrderDef>,
    pub run: RunDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum MeshDef {
    /// 1-D channel along x with patches `inlet` and `outlet`.
    UniformLine {
        n_cells: usize,
        length_m: f64,
        #[serde(default = "default_area_m2")]
        area_m2: f64,
    },
}

impl MeshDef {
    /// Patch names the mesh will carry.
    pub fn patch_names(&self) -> &'static [&'static str] {
        match self {
            MeshDef::UniformLine { .. } => &["inlet", "outlet"],
        }
    }
}

fn default_area_m2() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportDef {
    pub velocity_m_s: [f64; 3],
    pub diffusivity_m2_s: f64,
    /// Patches not listed are zero-gradient.
    #[serde(default)]
    pub boundaries: Vec<BoundaryDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundaryDef {
    pub patch: String,
    pub condition: BoundaryKindDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BoundaryKindDef {
    ZeroValue,
    ZeroGradient,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PodDef {
    pub field: String,
    pub n_modes: usize,
    #[serde(default)]
    pub reference: ReferenceDef,
    #[serde(default = "default_orthonormality_tol")]
    pub orthonormality_tol: f64,
    #[serde(default = "default_rank_tol")]
    pub rank_tol: f64,
    #[serde(default = "default_true")]
    pub auto_clear_fields: bool,
}

fn default_orthonormality_tol() -> f64 {
    1e-8
}

fn default_rank_tol() -> f64 {
    1e-12
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReferenceDef {
    #[default]
    Zero,
    SnapshotMean,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum InitialDef {
    /// `amplitude * exp(-((x - centre_m) / width_m)^2)` along x.
    Gaussian {
        centre_m: f64,
        width_m: f64,
        #[serde(default = "default_amplitude")]
        amplitude: f64,
    },
    Uniform {
        value: f64,
    },
    /// The earliest stored snapshot of the modelled field.
    FirstSnapshot,
}

fn default_amplitude() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum IntegratorDef {
    #[default]
    RK4,
    ForwardEuler,
    LinearlyImplicitEuler,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FullOrderDef {
    pub initial: InitialDef,
    pub dt_s: f64,
    pub t_end_s: f64,
    /// Write a snapshot every N steps (and at t = 0).
    pub snapshot_every: usize,
    #[serde(default)]
    pub integrator: IntegratorDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunDef {
    pub initial: InitialDef,
    pub dt_s: f64,
    pub t_end_s: f64,
    /// Write the reconstructed field every N steps (and at the end).
    pub write_every: usize,
    #[serde(default)]
    pub integrator: IntegratorDef,
}
