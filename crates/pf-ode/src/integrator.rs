//! Fixed-step time integrators.

use nalgebra::{DMatrix, DVector};

use crate::error::{OdeError, OdeResult};
use crate::system::OdeSystem;

/// Trait for time integrators.
pub trait Integrator {
    /// Advance `y` from `x` to `x + h` and return the new state.
    fn step<S: OdeSystem>(&self, system: &mut S, x: f64, y: &[f64], h: f64)
    -> OdeResult<Vec<f64>>;
}

fn eval<S: OdeSystem>(system: &mut S, x: f64, y: &[f64]) -> OdeResult<Vec<f64>> {
    let mut dydx = vec![0.0; y.len()];
    system
        .derivatives(x, y, &mut dydx)
        .map_err(OdeError::system)?;
    Ok(dydx)
}

/// `a + s * b`
fn axpy(a: &[f64], s: f64, b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(ai, bi)| ai + s * bi).collect()
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<S: OdeSystem>(
        &self,
        system: &mut S,
        x: f64,
        y: &[f64],
        h: f64,
    ) -> OdeResult<Vec<f64>> {
        let k1 = eval(system, x, y)?;

        let y2 = axpy(y, 0.5 * h, &k1);
        let k2 = eval(system, x + 0.5 * h, &y2)?;

        let y3 = axpy(y, 0.5 * h, &k2);
        let k3 = eval(system, x + 0.5 * h, &y3)?;

        let y4 = axpy(y, h, &k3);
        let k4 = eval(system, x + h, &y4)?;

        // y_new = y + (h/6) * (k1 + 2*k2 + 2*k3 + k4)
        Ok(y.iter()
            .enumerate()
            .map(|(i, yi)| yi + h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]))
            .collect())
    }
}

/// Forward Euler (explicit, 1st order).
/// Calls derivatives() once per step instead of 4 times (RK4).
#[derive(Clone, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<S: OdeSystem>(
        &self,
        system: &mut S,
        x: f64,
        y: &[f64],
        h: f64,
    ) -> OdeResult<Vec<f64>> {
        let dydx = eval(system, x, y)?;
        Ok(axpy(y, h, &dydx))
    }
}

/// Linearly-implicit (Rosenbrock-Euler) step:
/// `(I - h * dfdy) dy = h * (f(x, y) + h * dfdx)`.
///
/// Unconditionally stable for linear systems. One Jacobian evaluation and one
/// LU factorization per step.
#[derive(Clone, Debug)]
pub struct LinearlyImplicitEuler;

impl Integrator for LinearlyImplicitEuler {
    fn step<S: OdeSystem>(
        &self,
        system: &mut S,
        x: f64,
        y: &[f64],
        h: f64,
    ) -> OdeResult<Vec<f64>> {
        let n = y.len();
        let f = eval(system, x, y)?;

        let mut dfdx = vec![0.0; n];
        let mut dfdy = DMatrix::zeros(n, n);
        system
            .jacobian(x, y, &mut dfdx, &mut dfdy)
            .map_err(OdeError::system)?;

        let lhs = DMatrix::identity(n, n) - dfdy * h;
        let rhs = DVector::from_iterator(n, f.iter().zip(&dfdx).map(|(fi, ti)| h * (fi + h * ti)));

        let dy = lhs.lu().solve(&rhs).ok_or(OdeError::Singular {
            what: "I - h*J is not invertible",
        })?;

        Ok(y.iter().zip(dy.iter()).map(|(yi, di)| yi + di).collect())
    }
}
