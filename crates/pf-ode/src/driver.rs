//! Run driver and result recording.

use tracing::{debug, info};

use crate::error::{OdeError, OdeResult};
use crate::integrator::{ForwardEuler, Integrator, LinearlyImplicitEuler, RK4};
use crate::system::OdeSystem;

/// Integrator selection for a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, 4 derivative calls per step).
    #[default]
    RK4,
    /// Forward Euler (1st-order, 1 derivative call per step).
    ForwardEuler,
    /// Linearly-implicit Euler (1 derivative + 1 Jacobian call per step).
    LinearlyImplicitEuler,
}

/// Options for a fixed-step run.
#[derive(Clone, Debug)]
pub struct OdeOptions {
    /// Initial value of the independent variable
    pub x_start: f64,
    /// Fixed step
    pub dt: f64,
    /// Final value of the independent variable
    pub x_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
    /// Integrator type (default: RK4)
    pub integrator: IntegratorType,
}

impl Default for OdeOptions {
    fn default() -> Self {
        Self {
            x_start: 0.0,
            dt: 1e-3,
            x_end: 1.0,
            max_steps: 100_000,
            record_every: 10,
            integrator: IntegratorType::default(),
        }
    }
}

impl OdeOptions {
    fn validate(&self) -> OdeResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(OdeError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !(self.x_end.is_finite() && self.x_start.is_finite()) || self.x_end < self.x_start {
            return Err(OdeError::InvalidArg {
                what: "x_end must not precede x_start",
            });
        }
        if self.max_steps == 0 {
            return Err(OdeError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(OdeError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }

    /// Number of steps needed to reach `x_end`, capped at `max_steps`.
    pub fn step_count(&self) -> usize {
        let span = (self.x_end - self.x_start) / self.dt;
        // 0.3 / 0.1 evaluates to 2.9999999999999996
        let steps = (span - 1e-9).ceil().max(0.0) as usize;
        steps.min(self.max_steps)
    }
}

/// Record of a run.
#[derive(Clone, Debug)]
pub struct OdeRecord {
    /// Independent variable at recorded points
    pub x: Vec<f64>,
    /// State snapshots
    pub y: Vec<Vec<f64>>,
}

impl OdeRecord {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn last(&self) -> Option<(f64, &[f64])> {
        Some((*self.x.last()?, self.y.last()?.as_slice()))
    }
}

/// Advance `system` from its current state using fixed steps.
pub fn run<S: OdeSystem>(system: &mut S, opts: &OdeOptions) -> OdeResult<OdeRecord> {
    run_with_observer(system, opts, |_, _, _| Ok(()))
}

/// Like [`run`], calling `observer(system, step, x)` after every step, once the
/// advanced state has been written back into the system.
pub fn run_with_observer<S, F>(
    system: &mut S,
    opts: &OdeOptions,
    mut observer: F,
) -> OdeResult<OdeRecord>
where
    S: OdeSystem,
    F: FnMut(&mut S, usize, f64) -> OdeResult<()>,
{
    opts.validate()?;

    let n = system.equation_count();
    let mut y = system.coefficients().to_vec();
    if y.len() != n {
        return Err(OdeError::DimensionMismatch {
            expected: n,
            found: y.len(),
        });
    }

    let steps = opts.step_count();
    debug!(
        equations = n,
        steps,
        dt = opts.dt,
        integrator = ?opts.integrator,
        "starting fixed-step run"
    );

    let mut x = opts.x_start;
    let mut x_record = vec![x];
    let mut y_record = vec![y.clone()];

    for step in 1..=steps {
        y = match opts.integrator {
            IntegratorType::RK4 => RK4.step(system, x, &y, opts.dt)?,
            IntegratorType::ForwardEuler => ForwardEuler.step(system, x, &y, opts.dt)?,
            IntegratorType::LinearlyImplicitEuler => {
                LinearlyImplicitEuler.step(system, x, &y, opts.dt)?
            }
        };
        x = opts.x_start + step as f64 * opts.dt;

        if y.iter().any(|v| !v.is_finite()) {
            return Err(OdeError::NonFinite { x });
        }

        let state = system.coefficients_mut();
        if state.len() != y.len() {
            return Err(OdeError::DimensionMismatch {
                expected: y.len(),
                found: state.len(),
            });
        }
        state.copy_from_slice(&y);

        observer(system, step, x)?;

        if step % opts.record_every == 0 {
            x_record.push(x);
            y_record.push(y.clone());
        }
    }

    // Always record final state
    if steps % opts.record_every != 0 {
        x_record.push(x);
        y_record.push(y);
    }

    info!(steps, x_end = x, "run complete");

    Ok(OdeRecord {
        x: x_record,
        y: y_record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ode_options_defaults() {
        let opts = OdeOptions::default();
        assert_eq!(opts.dt, 1e-3);
        assert_eq!(opts.x_end, 1.0);
        assert_eq!(opts.max_steps, 100_000);
        assert_eq!(opts.record_every, 10);
        assert_eq!(opts.integrator, IntegratorType::RK4);
    }

    #[test]
    fn step_count_absorbs_round_off() {
        let opts = OdeOptions {
            dt: 0.1,
            x_end: 0.3,
            ..OdeOptions::default()
        };
        assert_eq!(opts.step_count(), 3);

        let capped = OdeOptions {
            dt: 0.1,
            x_end: 100.0,
            max_steps: 7,
            ..OdeOptions::default()
        };
        assert_eq!(capped.step_count(), 7);
    }

    #[test]
    fn ode_options_invalid() {
        let bad_dt = OdeOptions {
            dt: 0.0,
            ..OdeOptions::default()
        };
        assert!(bad_dt.validate().is_err());

        let backwards = OdeOptions {
            x_start: 1.0,
            x_end: 0.5,
            ..OdeOptions::default()
        };
        assert!(backwards.validate().is_err());

        let no_record = OdeOptions {
            record_every: 0,
            ..OdeOptions::default()
        };
        assert!(no_record.validate().is_err());
    }
}
