use crate::PfError;

/// Floating point type used throughout the workspace
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PfError::NonFinite { what, value: v })
    }
}

/// Check every entry of a slice, reporting the first offender.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> Result<(), PfError> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(PfError::NonFinite { what, value }),
        None => Ok(()),
    }
}

/// Plain dot product of two equal-length slices.
pub fn dot(a: &[Real], b: &[Real]) -> Result<Real, PfError> {
    if a.len() != b.len() {
        return Err(PfError::LengthMismatch {
            what: "dot operands",
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_all_finite_reports_first_bad_value() {
        assert!(ensure_all_finite(&[1.0, 2.0], "ok").is_ok());
        let err = ensure_all_finite(&[1.0, Real::INFINITY, Real::NAN], "bad").unwrap_err();
        assert_eq!(
            err,
            PfError::NonFinite {
                what: "bad",
                value: Real::INFINITY
            }
        );
    }

    #[test]
    fn dot_rejects_length_mismatch() {
        assert_eq!(dot(&[1.0, 2.0], &[3.0, 4.0]).unwrap(), 11.0);
        assert!(matches!(
            dot(&[1.0], &[1.0, 2.0]),
            Err(PfError::LengthMismatch { .. })
        ));
    }
}
