//! pf-core: stable foundation for podflow.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact IDs for mesh objects)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PfError, PfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
