//! Full-order field reconstruction.

use crate::basis::OrthoNormalBasis;
use crate::error::{PodError, PodResult};

/// `reference + sum_i y_i b_i`, one value per cell.
pub fn reconstruct(basis: &OrthoNormalBasis, coefficients: &[f64]) -> PodResult<Vec<f64>> {
    if coefficients.len() != basis.mode_count() {
        return Err(PodError::dimension(
            "coefficients vs basis modes",
            basis.mode_count(),
            coefficients.len(),
        ));
    }

    let mut values = basis.reference().to_vec();
    for (y, mode) in coefficients.iter().zip(basis.modes()) {
        if *y == 0.0 {
            continue;
        }
        for (v, b) in values.iter_mut().zip(mode) {
            *v += y * b;
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PodConfig, ReferenceField};
    use pf_core::units::{m, m2};
    use pf_mesh::Mesh;

    #[test]
    fn unit_coefficient_selects_mode() {
        let mesh = Mesh::uniform_line(3, m(3.0), m2(1.0)).unwrap();
        let snaps = vec![vec![1.0, 2.0, 0.0], vec![0.0, 1.0, 3.0], vec![2.0, 0.0, 1.0]];
        let cfg = PodConfig::new("T", 2).with_reference(ReferenceField::SnapshotMean);
        let basis = OrthoNormalBasis::from_snapshots(&mesh, &snaps, &cfg).unwrap();

        let field = reconstruct(&basis, &[0.0, 1.0]).unwrap();
        for ((f, r), b) in field.iter().zip(basis.reference()).zip(basis.mode(1).unwrap()) {
            assert!((f - (r + b)).abs() < 1e-14);
        }
    }

    #[test]
    fn length_mismatch() {
        let mesh = Mesh::uniform_line(2, m(1.0), m2(1.0)).unwrap();
        let basis =
            OrthoNormalBasis::from_snapshots(&mesh, &[vec![1.0, 0.0]], &PodConfig::new("T", 1))
                .unwrap();
        assert!(matches!(
            reconstruct(&basis, &[1.0, 2.0]),
            Err(PodError::DimensionMismatch { .. })
        ));
    }
}
