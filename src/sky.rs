//! Equatorial sky coordinates and angular separations.

use crate::constants::ARCMIN_PER_RAD;

/// A position on the celestial sphere, stored in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyCoord {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

impl SkyCoord {
    pub fn new(ra_deg: f64, dec_deg: f64) -> Self {
        SkyCoord { ra_deg, dec_deg }
    }

    /// Great-circle separation to `other`, in radians.
    ///
    /// Uses the Vincenty formula, which stays well conditioned for both
    /// very small and near-antipodal separations.
    pub fn separation_rad(&self, other: &SkyCoord) -> f64 {
        let (ra1, dec1) = (self.ra_deg.to_radians(), self.dec_deg.to_radians());
        let (ra2, dec2) = (other.ra_deg.to_radians(), other.dec_deg.to_radians());
        let dra = ra2 - ra1;

        let (sin_d1, cos_d1) = dec1.sin_cos();
        let (sin_d2, cos_d2) = dec2.sin_cos();
        let (sin_dra, cos_dra) = dra.sin_cos();

        let num = ((cos_d2 * sin_dra).powi(2)
            + (cos_d1 * sin_d2 - sin_d1 * cos_d2 * cos_dra).powi(2))
        .sqrt();
        let den = sin_d1 * sin_d2 + cos_d1 * cos_d2 * cos_dra;
        num.atan2(den)
    }

    /// Great-circle separation to `other`, in arcminutes.
    pub fn separation_arcmin(&self, other: &SkyCoord) -> f64 {
        self.separation_rad(other) * ARCMIN_PER_RAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn separation_zero_for_same_point() {
        let p = SkyCoord::new(150.0, 2.2);
        assert_relative_eq!(p.separation_rad(&p), 0.0);
    }

    #[test]
    fn separation_along_equator_is_delta_ra() {
        let a = SkyCoord::new(10.0, 0.0);
        let b = SkyCoord::new(11.0, 0.0);
        assert_relative_eq!(a.separation_rad(&b), 1.0_f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(a.separation_arcmin(&b), 60.0, epsilon = 1e-9);
    }

    #[test]
    fn separation_along_meridian_is_delta_dec() {
        let a = SkyCoord::new(200.0, 10.0);
        let b = SkyCoord::new(200.0, 10.5);
        assert_relative_eq!(a.separation_arcmin(&b), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn separation_symmetric() {
        let a = SkyCoord::new(150.1, 2.2);
        let b = SkyCoord::new(150.4, 1.9);
        assert_relative_eq!(a.separation_rad(&b), b.separation_rad(&a), epsilon = 1e-15);
    }

    #[test]
    fn ra_offset_shrinks_with_declination() {
        // 1° of RA at dec 60° spans ~cos(60°) = half the great-circle angle.
        let a = SkyCoord::new(10.0, 60.0);
        let b = SkyCoord::new(11.0, 60.0);
        let sep = a.separation_rad(&b).to_degrees();
        assert!(sep < 0.51 && sep > 0.49, "got {sep}");
    }
}
