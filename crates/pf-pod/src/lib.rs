//! Proper Orthogonal Decomposition reduced-order model for passive scalar
//! transport.
//!
//! The full finite-volume transport equation is replaced by a small linear
//! ODE system for the coefficients of a precomputed orthonormal basis:
//!
//! - [`OrthoNormalBasis`]: modes from snapshots (method of snapshots) or a
//!   persisted basis
//! - [`DerivativeOperator`]: the transport operator projected onto the basis,
//!   `M[i][j] = <b_i, L(b_j)>`
//! - [`reconstruct`]: `mean + sum_i y_i b_i`
//! - [`ScalarTransportPod`]: owns the coefficients, caches the three derived
//!   artifacts lazily and implements [`pf_ode::OdeSystem`]
//!
//! [`FullOrderTransport`] integrates the full-order system with the same
//! operator and is used to produce snapshots.

pub mod basis;
pub mod config;
pub mod error;
pub mod full_order;
pub mod model;
pub mod operator;
pub mod reconstruct;
pub mod source;
pub mod transport;

pub use basis::OrthoNormalBasis;
pub use config::{PodConfig, ReferenceField};
pub use error::{PodError, PodResult};
pub use full_order::FullOrderTransport;
pub use model::{CacheState, CacheStats, ScalarTransportPod};
pub use operator::DerivativeOperator;
pub use reconstruct::reconstruct;
pub use source::{BasisSource, load_snapshots};
pub use transport::{BoundaryCondition, ConvectionDiffusion, TransportOperator};
