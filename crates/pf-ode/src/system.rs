//! OdeSystem trait for pluggable dynamic systems.

use nalgebra::DMatrix;

/// Contract between a model and a time integrator.
///
/// An OdeSystem must implement:
/// - The number of scalar unknowns, fixed for the system's lifetime
/// - Read and write access to its state vector
/// - The derivative evaluation `dydx = f(x, y)`
/// - The Jacobian evaluation `dfdx = df/dx`, `dfdy = df/dy`
///
/// `derivatives` and `jacobian` take `&mut self` so that implementations can
/// materialize and cache expensive data on first use.
pub trait OdeSystem {
    /// Error raised by the system's own evaluations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Number of scalar equations.
    fn equation_count(&self) -> usize;

    /// Current state vector.
    fn coefficients(&self) -> &[f64];

    /// Mutable state vector; the integrator writes the advanced state here.
    fn coefficients_mut(&mut self) -> &mut [f64];

    /// Compute `dydx = f(x, y)`.
    fn derivatives(&mut self, x: f64, y: &[f64], dydx: &mut [f64]) -> Result<(), Self::Error>;

    /// Compute `dfdx` and `dfdy` at `(x, y)`.
    fn jacobian(
        &mut self,
        x: f64,
        y: &[f64],
        dfdx: &mut [f64],
        dfdy: &mut DMatrix<f64>,
    ) -> Result<(), Self::Error>;
}
