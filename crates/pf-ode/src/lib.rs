//! Fixed-step time integration for ODE systems.
//!
//! Provides:
//! - The `OdeSystem` contract (state vector, derivatives, Jacobian)
//! - Fixed-step integrators: forward Euler, RK4, linearly-implicit Euler
//! - A run driver with decimated recording and per-step observers
//!
//! Integrators only see `OdeSystem`, so any model that implements it can be
//! advanced without the driver knowing its internals.

pub mod driver;
pub mod error;
pub mod integrator;
pub mod system;

pub use driver::{IntegratorType, OdeOptions, OdeRecord, run, run_with_observer};
pub use error::{OdeError, OdeResult};
pub use integrator::{ForwardEuler, Integrator, LinearlyImplicitEuler, RK4};
pub use system::OdeSystem;
