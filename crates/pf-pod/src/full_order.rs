//! Full-order transport as an ODE system, used to generate snapshots.

use nalgebra::DMatrix;
use pf_io::SnapshotRecord;
use pf_mesh::Mesh;
use pf_ode::OdeSystem;

use crate::error::{PodError, PodResult};
use crate::transport::TransportOperator;

/// `d(phi)/dt = L(phi)` over every mesh cell.
pub struct FullOrderTransport<'m> {
    mesh: &'m Mesh,
    transport: Box<dyn TransportOperator>,
    state: Vec<f64>,
    jacobian: Option<DMatrix<f64>>,
}

impl<'m> FullOrderTransport<'m> {
    pub fn new(
        mesh: &'m Mesh,
        transport: Box<dyn TransportOperator>,
        initial: Vec<f64>,
    ) -> PodResult<Self> {
        mesh.check_len("initial field", &initial)?;
        Ok(Self {
            mesh,
            transport,
            state: initial,
            jacobian: None,
        })
    }

    pub fn state(&self) -> &[f64] {
        &self.state
    }

    /// Package the current state as a snapshot of `field` at `time_s`.
    pub fn snapshot(&self, field: &str, time_s: f64) -> SnapshotRecord {
        SnapshotRecord {
            field: field.to_string(),
            time_s,
            mesh_fingerprint: self.mesh.fingerprint(),
            values: self.state.clone(),
        }
    }

    /// Assemble the operator column by column from unit vectors.
    fn assemble(&self) -> PodResult<DMatrix<f64>> {
        let n = self.mesh.n_cells();
        let mut matrix = DMatrix::zeros(n, n);
        let mut unit = vec![0.0; n];
        let mut column = vec![0.0; n];
        for j in 0..n {
            unit[j] = 1.0;
            self.transport.apply(self.mesh, &unit, &mut column)?;
            unit[j] = 0.0;
            for (i, v) in column.iter().enumerate() {
                matrix[(i, j)] = *v;
            }
        }
        Ok(matrix)
    }
}

impl OdeSystem for FullOrderTransport<'_> {
    type Error = PodError;

    fn equation_count(&self) -> usize {
        self.mesh.n_cells()
    }

    fn coefficients(&self) -> &[f64] {
        &self.state
    }

    fn coefficients_mut(&mut self) -> &mut [f64] {
        &mut self.state
    }

    fn derivatives(&mut self, _x: f64, y: &[f64], dydx: &mut [f64]) -> PodResult<()> {
        self.transport.apply(self.mesh, y, dydx)
    }

    fn jacobian(
        &mut self,
        _x: f64,
        _y: &[f64],
        dfdx: &mut [f64],
        dfdy: &mut DMatrix<f64>,
    ) -> PodResult<()> {
        let n = self.mesh.n_cells();
        if dfdx.len() != n {
            return Err(PodError::dimension("full-order dfdx", n, dfdx.len()));
        }
        if dfdy.nrows() != n {
            return Err(PodError::dimension("full-order dfdy rows", n, dfdy.nrows()));
        }
        if dfdy.ncols() != n {
            return Err(PodError::dimension("full-order dfdy columns", n, dfdy.ncols()));
        }

        let jac = match self.jacobian.take() {
            Some(jac) => jac,
            None => self.assemble()?,
        };
        dfdx.fill(0.0);
        dfdy.copy_from(&jac);
        self.jacobian = Some(jac);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{BoundaryCondition, ConvectionDiffusion};
    use pf_core::units::{m, m2, m2ps, mps};

    #[test]
    fn jacobian_times_state_matches_derivatives() {
        let mesh = Mesh::uniform_line(5, m(1.0), m2(1.0)).unwrap();
        let op = ConvectionDiffusion::new([mps(1.0), mps(0.0), mps(0.0)], m2ps(0.05))
            .unwrap()
            .with_boundary("inlet", BoundaryCondition::ZeroValue);
        let y = vec![0.1, 0.7, 0.3, -0.2, 0.4];
        let mut sys = FullOrderTransport::new(&mesh, Box::new(op), y.clone()).unwrap();

        let mut dydx = vec![0.0; 5];
        sys.derivatives(0.0, &y, &mut dydx).unwrap();
        let mut dfdx = vec![1.0; 5];
        let mut dfdy = DMatrix::zeros(5, 5);
        sys.jacobian(0.0, &y, &mut dfdx, &mut dfdy).unwrap();

        let jy = &dfdy * nalgebra::DVector::from_vec(y);
        for (a, b) in dydx.iter().zip(jy.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        assert!(dfdx.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn jacobian_is_assembled_once_and_checks_both_outputs() {
        let mesh = Mesh::uniform_line(4, m(1.0), m2(1.0)).unwrap();
        let op = ConvectionDiffusion::new([mps(0.0); 3], m2ps(1.0)).unwrap();
        let mut sys = FullOrderTransport::new(&mesh, Box::new(op), vec![0.0; 4]).unwrap();

        let mut short_dfdx = vec![0.0; 3];
        let mut dfdy = DMatrix::zeros(4, 4);
        match sys.jacobian(0.0, &[0.0; 4], &mut short_dfdx, &mut dfdy) {
            Err(PodError::DimensionMismatch { what }) => {
                assert!(what.contains("dfdx"), "{what}");
                assert!(what.contains("found 3"), "{what}");
            }
            other => panic!("expected dimension mismatch, got {other:?}"),
        }
        assert!(sys.jacobian.is_none());

        let mut dfdx = vec![0.0; 4];
        let mut narrow = DMatrix::zeros(4, 3);
        assert!(matches!(
            sys.jacobian(0.0, &[0.0; 4], &mut dfdx, &mut narrow),
            Err(PodError::DimensionMismatch { .. })
        ));

        sys.jacobian(0.0, &[0.0; 4], &mut dfdx, &mut dfdy).unwrap();
        assert!(sys.jacobian.is_some());
        let first = dfdy.clone();
        dfdy.fill(7.0);
        sys.jacobian(1.0, &[1.0; 4], &mut dfdx, &mut dfdy).unwrap();
        assert_eq!(dfdy, first);
        assert!((first[(1, 1)] + 32.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_wrong_initial_length() {
        let mesh = Mesh::uniform_line(3, m(1.0), m2(1.0)).unwrap();
        let op = ConvectionDiffusion::new([mps(0.0); 3], m2ps(1.0)).unwrap();
        assert!(FullOrderTransport::new(&mesh, Box::new(op), vec![0.0; 2]).is_err());
    }
}
