//! Physical and cosmological constants used by the cluster pipeline.
//!
//! Values follow CODATA 2018 / IAU 2015 where exact, and the Planck 2018
//! flat-ΛCDM parameters for the expansion rate.

/// Speed of light in vacuum, m/s (exact).
pub const C_M_S: f64 = 299_792_458.0;

/// Speed of light in vacuum, km/s.
pub const C_KM_S: f64 = C_M_S / 1000.0;

/// Newtonian gravitational constant, m³ kg⁻¹ s⁻².
pub const G_SI: f64 = 6.674_30e-11;

/// Nominal solar mass, kg (IAU 2015 resolution B3).
pub const M_SUN_KG: f64 = 1.988_409_87e30;

/// Hubble constant, km/s/Mpc (Planck 2018, TT,TE,EE+lowE+lensing+BAO).
pub const H0_KM_S_MPC: f64 = 67.66;

/// Deceleration parameter for the first-order distance approximation.
pub const Q0: f64 = -0.534;

/// One megaparsec in meters.
pub const MPC_M: f64 = 3.086e22;

/// Arcminutes per radian.
pub const ARCMIN_PER_RAD: f64 = 60.0 * 180.0 / std::f64::consts::PI;
