// pf-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, DiffusionCoefficient as UomDiffusionCoefficient, Length as UomLength,
    Velocity as UomVelocity, Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Diffusivity = UomDiffusionCoefficient;
pub type Length = UomLength;
pub type Velocity = UomVelocity;
pub type Volume = UomVolume;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

/// Diffusivity in m^2/s.
#[inline]
pub fn m2ps(v: f64) -> Diffusivity {
    use uom::si::diffusion_coefficient::square_meter_per_second;
    Diffusivity::new::<square_meter_per_second>(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _l = m(2.0);
        let _a = m2(0.01);
        let _v = m3(1e-3);
        let _u = mps(1.5);
        let _d = m2ps(1e-5);
    }

    #[test]
    fn values_are_si_base() {
        assert_eq!(m(2.0).value, 2.0);
        assert_eq!(m2ps(1e-3).value, 1e-3);
        assert_eq!((m(2.0) * m2(0.5)).value, m3(1.0).value);
    }

    #[test]
    fn diffusivity_over_velocity_is_a_length() {
        let l: Length = m2ps(0.5) / mps(2.0);
        assert_eq!(l.value, 0.25);
        let flux: Area = m2ps(1e-3) / mps(1.0) * m(10.0);
        assert!((flux.value - 1e-2).abs() < 1e-15);
    }
}
