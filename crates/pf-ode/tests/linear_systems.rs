//! Integration tests: driving small linear systems through the run driver.

use nalgebra::DMatrix;
use pf_ode::{IntegratorType, OdeError, OdeOptions, OdeSystem, run, run_with_observer};
use proptest::prelude::*;

/// dy/dx = A y with a diagonal A.
struct Diagonal {
    rates: Vec<f64>,
    y: Vec<f64>,
}

impl OdeSystem for Diagonal {
    type Error = std::convert::Infallible;

    fn equation_count(&self) -> usize {
        self.rates.len()
    }

    fn coefficients(&self) -> &[f64] {
        &self.y
    }

    fn coefficients_mut(&mut self) -> &mut [f64] {
        &mut self.y
    }

    fn derivatives(&mut self, _x: f64, y: &[f64], dydx: &mut [f64]) -> Result<(), Self::Error> {
        for ((d, r), v) in dydx.iter_mut().zip(&self.rates).zip(y) {
            *d = r * v;
        }
        Ok(())
    }

    fn jacobian(
        &mut self,
        _x: f64,
        _y: &[f64],
        dfdx: &mut [f64],
        dfdy: &mut DMatrix<f64>,
    ) -> Result<(), Self::Error> {
        dfdx.fill(0.0);
        dfdy.fill(0.0);
        for (i, r) in self.rates.iter().enumerate() {
            dfdy[(i, i)] = *r;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("boom at x = {0}")]
struct Boom(f64);

/// Fails once `x` passes a threshold.
struct FailsLate {
    y: Vec<f64>,
    fail_after: f64,
}

impl OdeSystem for FailsLate {
    type Error = Boom;

    fn equation_count(&self) -> usize {
        1
    }

    fn coefficients(&self) -> &[f64] {
        &self.y
    }

    fn coefficients_mut(&mut self) -> &mut [f64] {
        &mut self.y
    }

    fn derivatives(&mut self, x: f64, _y: &[f64], dydx: &mut [f64]) -> Result<(), Self::Error> {
        if x > self.fail_after {
            return Err(Boom(x));
        }
        dydx[0] = 1.0;
        Ok(())
    }

    fn jacobian(
        &mut self,
        _x: f64,
        _y: &[f64],
        _dfdx: &mut [f64],
        _dfdy: &mut DMatrix<f64>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[test]
fn rk4_tracks_exponential_decay() {
    let mut sys = Diagonal {
        rates: vec![-1.0, -2.0],
        y: vec![1.0, 1.0],
    };
    let opts = OdeOptions {
        dt: 0.01,
        x_end: 1.0,
        record_every: 10,
        ..OdeOptions::default()
    };

    let record = run(&mut sys, &opts).unwrap();

    assert_eq!(record.len(), 11);
    let (x, y) = record.last().unwrap();
    assert!((x - 1.0).abs() < 1e-12);
    assert!((y[0] - (-1.0_f64).exp()).abs() < 1e-9);
    assert!((y[1] - (-2.0_f64).exp()).abs() < 1e-7);
    // State is written back into the system
    assert_eq!(sys.coefficients(), y);
}

#[test]
fn final_state_is_always_recorded() {
    let mut sys = Diagonal {
        rates: vec![0.0],
        y: vec![3.0],
    };
    let opts = OdeOptions {
        dt: 0.1,
        x_end: 0.5,
        record_every: 2,
        integrator: IntegratorType::ForwardEuler,
        ..OdeOptions::default()
    };

    let record = run(&mut sys, &opts).unwrap();
    // x = 0, 0.2, 0.4, 0.5
    assert_eq!(record.len(), 4);
    assert!((record.x[3] - 0.5).abs() < 1e-12);
}

#[test]
fn observer_sees_written_back_state() {
    let mut sys = Diagonal {
        rates: vec![1.0],
        y: vec![1.0],
    };
    let opts = OdeOptions {
        dt: 0.1,
        x_end: 0.3,
        integrator: IntegratorType::ForwardEuler,
        ..OdeOptions::default()
    };

    let mut seen = Vec::new();
    run_with_observer(&mut sys, &opts, |s, step, _x| {
        seen.push((step, s.coefficients()[0]));
        Ok(())
    })
    .unwrap();

    assert_eq!(seen.len(), 3);
    assert!((seen[0].1 - 1.1).abs() < 1e-14);
    assert!((seen[2].1 - 1.331).abs() < 1e-12);
}

#[test]
fn system_errors_are_wrapped_and_recoverable() {
    let mut sys = FailsLate {
        y: vec![0.0],
        fail_after: 0.25,
    };
    let opts = OdeOptions {
        dt: 0.1,
        x_end: 1.0,
        integrator: IntegratorType::ForwardEuler,
        ..OdeOptions::default()
    };

    let err = run(&mut sys, &opts).unwrap_err();
    assert!(matches!(err, OdeError::System(_)));
    let boom = err.downcast_system::<Boom>().unwrap();
    assert!(boom.0 > 0.25);
    // Steps before the failure were committed
    assert!((sys.coefficients()[0] - 0.3).abs() < 1e-12);
}

#[test]
fn state_length_must_match_equation_count() {
    let mut sys = Diagonal {
        rates: vec![1.0, 1.0],
        y: vec![1.0],
    };
    let err = run(&mut sys, &OdeOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        OdeError::DimensionMismatch {
            expected: 2,
            found: 1
        }
    ));
}

proptest! {
    #[test]
    fn implicit_euler_never_grows_decaying_modes(
        rate in -1000.0_f64..-0.01,
        dt in 0.001_f64..1.0,
    ) {
        let mut sys = Diagonal { rates: vec![rate], y: vec![1.0] };
        let opts = OdeOptions {
            dt,
            x_end: 10.0 * dt,
            integrator: IntegratorType::LinearlyImplicitEuler,
            ..OdeOptions::default()
        };
        let record = run(&mut sys, &opts).unwrap();
        for y in &record.y {
            prop_assert!(y[0] > 0.0 && y[0] <= 1.0);
        }
    }
}
