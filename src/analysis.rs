//! The cluster analysis pipeline.
//!
//! A single pass over the member catalog: average repeat measurements, clip
//! redshift outliers, then derive the cluster redshift, velocity dispersion,
//! angular extent, distance, physical diameter and dynamical mass, plus the
//! five diagnostic plots. Pure function of the input; nothing is kept
//! between invocations.

use std::collections::BTreeMap;
use std::io::Read;

use anyhow::{ensure, Result};
use log::{debug, info};
use serde::Serialize;

use crate::catalog::aggregate::{self, ClipBounds};
use crate::catalog::{self, AveragedGalaxy, GalaxyCatalog};
use crate::constants::{ARCMIN_PER_RAD, C_KM_S, C_M_S, G_SI, H0_KM_S_MPC, MPC_M, M_SUN_KG, Q0};
use crate::render::{charts, keys, PlotSet};
use crate::sky::SkyCoord;
use crate::stats;

// ---------------------------------------------------------------------------
// AnalysisResult – the nine derived scalars
// ---------------------------------------------------------------------------

/// Immutable snapshot of the derived cluster properties, produced once per
/// invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Mean redshift over the averaged catalog.
    pub mean_specz: f64,
    /// Sample standard deviation of the averaged redshifts (NaN for a
    /// single-galaxy catalog).
    pub std_specz: f64,
    /// `mean_specz - 3·std_specz`.
    pub lower_bound: f64,
    /// `mean_specz + 3·std_specz`.
    pub upper_bound: f64,
    /// Population std of the members' relativistic velocity offsets, km/s.
    pub velocity_dispersion_km_s: f64,
    /// Largest angular separation of any galaxy from the cluster center.
    pub theta_arcmin: f64,
    /// First-order angular diameter distance, Mpc.
    pub angular_diameter_distance_mpc: f64,
    /// `DA · θ`, Mpc.
    pub physical_diameter_mpc: f64,
    /// Virial mass estimate in solar masses.
    pub dynamical_mass_solar: f64,
}

impl AnalysisResult {
    /// The fixed-key mapping handed to the presentation layer.
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("mean_specz", self.mean_specz),
            ("std_specz", self.std_specz),
            ("lower_bound", self.lower_bound),
            ("upper_bound", self.upper_bound),
            ("velocity_dispersion_km_s", self.velocity_dispersion_km_s),
            ("theta_arcmin", self.theta_arcmin),
            ("angular_diameter_distance_mpc", self.angular_diameter_distance_mpc),
            ("physical_diameter_mpc", self.physical_diameter_mpc),
            ("dynamical_mass_solar", self.dynamical_mass_solar),
        ])
    }
}

// ---------------------------------------------------------------------------
// analyze – the public entry point
// ---------------------------------------------------------------------------

/// Run the full analysis over comma-separated catalog text.
///
/// Either both outputs are produced or a single error is returned; there are
/// no partial results. The only validated precondition is the presence of
/// the required columns ([`catalog::CatalogError::MissingColumns`]); any
/// other failure surfaces as a contextual error from the step that hit it.
pub fn analyze<R: Read>(input: R) -> Result<(AnalysisResult, PlotSet)> {
    let records = catalog::read_catalog(input)?;
    let catalog = aggregate::average_by_object(&records);
    ensure!(!catalog.is_empty(), "catalog contains no data rows");

    let bounds = aggregate::clip_bounds(&catalog);
    let members = aggregate::clip_members(&catalog, &bounds);

    let member_specz: Vec<f64> = members.iter().map(|g| g.specz).collect();
    let z_cluster = stats::mean(&member_specz);
    let offsets_km_s: Vec<f64> = member_specz
        .iter()
        .map(|&z| velocity_offset_km_s(z, z_cluster))
        .collect();
    let velocity_dispersion_km_s = stats::population_std(&offsets_km_s);
    debug!(
        "z_cluster = {z_cluster:.6} from {} members, σ = {velocity_dispersion_km_s:.2} km/s",
        members.len()
    );

    // Diagnostic velocities over the full averaged set are the plain z·c
    // convention, unlike the relativistic offsets above. Both conventions
    // are part of the contract; do not unify them.
    let velocities_m_s: Vec<f64> = catalog.galaxies.iter().map(|g| g.specz * C_M_S).collect();

    let theta_arcmin = max_separation_arcmin(&catalog);
    let theta_rad = theta_arcmin / ARCMIN_PER_RAD;

    // The distance uses the mean redshift of the averaged set, not the
    // clipped members.
    let z_mean = bounds.mean;
    let r = (C_KM_S * z_mean / H0_KM_S_MPC) * (1.0 - (z_mean / 2.0) * (1.0 + Q0));
    let angular_diameter_distance_mpc = r / (1.0 + z_mean);
    let physical_diameter_mpc = angular_diameter_distance_mpc * theta_rad;

    let radius_m = physical_diameter_mpc * MPC_M / 2.0;
    let sigma_m_s = velocity_dispersion_km_s * 1.0e3;
    let dynamical_mass_solar = 3.0 * sigma_m_s.powi(2) * radius_m / G_SI / M_SUN_KG;

    let result = AnalysisResult {
        mean_specz: bounds.mean,
        std_specz: bounds.std,
        lower_bound: bounds.lower,
        upper_bound: bounds.upper,
        velocity_dispersion_km_s,
        theta_arcmin,
        angular_diameter_distance_mpc,
        physical_diameter_mpc,
        dynamical_mass_solar,
    };
    info!(
        "analyzed {} rows / {} galaxies: z = {:.5}, σ = {:.1} km/s, M = {:.2e} M_sun",
        catalog.raw_rows,
        catalog.len(),
        result.mean_specz,
        result.velocity_dispersion_km_s,
        result.dynamical_mass_solar
    );

    let plots = render_plots(&catalog, &members, &bounds, &velocities_m_s)?;
    Ok((result, plots))
}

/// Relativistic line-of-sight velocity offset of a galaxy at redshift `z`
/// relative to the cluster redshift, in km/s.
fn velocity_offset_km_s(z: f64, z_cluster: f64) -> f64 {
    let a = (1.0 + z).powi(2);
    let b = (1.0 + z_cluster).powi(2);
    C_M_S * (a - b) / (a + b) / 1000.0
}

/// Largest great-circle separation of any averaged galaxy from the cluster
/// center, in arcminutes. The center is the arithmetic mean of ra and dec,
/// not a spherical centroid, so it is imprecise near the poles or the ra
/// wrap.
fn max_separation_arcmin(catalog: &GalaxyCatalog) -> f64 {
    let ra: Vec<f64> = catalog.galaxies.iter().map(|g| g.ra).collect();
    let dec: Vec<f64> = catalog.galaxies.iter().map(|g| g.dec).collect();
    let center = SkyCoord::new(stats::mean(&ra), stats::mean(&dec));

    catalog
        .galaxies
        .iter()
        .map(|g| SkyCoord::new(g.ra, g.dec).separation_arcmin(&center))
        .fold(f64::NEG_INFINITY, f64::max)
}

fn render_plots(
    catalog: &GalaxyCatalog,
    members: &[&AveragedGalaxy],
    bounds: &ClipBounds,
    velocities_m_s: &[f64],
) -> Result<PlotSet> {
    let averaged_specz = catalog.specz_values();
    let member_specz: Vec<f64> = members.iter().map(|g| g.specz).collect();
    let member_proj_sep: Vec<f64> = members.iter().map(|g| g.proj_sep).collect();

    let mut plots = PlotSet::new();
    plots.insert(
        keys::BOXPLOT.to_string(),
        charts::specz_boxplot(&averaged_specz)?,
    );
    plots.insert(
        keys::HISTOGRAM_WITH_BOUNDS.to_string(),
        charts::specz_histogram_with_bounds(&averaged_specz, bounds.lower, bounds.upper)?,
    );
    plots.insert(
        keys::FILTERED_HISTOGRAM.to_string(),
        charts::filtered_specz_histogram(&member_specz)?,
    );
    plots.insert(
        keys::VELOCITY_DISTRIBUTION.to_string(),
        charts::velocity_histogram(velocities_m_s)?,
    );
    plots.insert(
        keys::PROJ_SEP_DISTRIBUTION.to_string(),
        charts::proj_sep_histogram(&member_proj_sep)?,
    );
    Ok(plots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn velocity_offset_zero_at_cluster_redshift() {
        assert_eq!(velocity_offset_km_s(0.05, 0.05), 0.0);
    }

    #[test]
    fn velocity_offset_sign_follows_redshift() {
        assert!(velocity_offset_km_s(0.051, 0.05) > 0.0);
        assert!(velocity_offset_km_s(0.049, 0.05) < 0.0);
    }

    #[test]
    fn velocity_offset_small_z_approximates_c_dz() {
        // for z ≈ zc the offset tends to c·Δz/(1+zc)
        let v = velocity_offset_km_s(0.0501, 0.05);
        let expected = C_KM_S * 0.0001 / 1.05;
        assert_relative_eq!(v, expected, max_relative = 1e-3);
    }

    #[test]
    fn result_map_has_exactly_the_nine_keys() {
        let result = AnalysisResult {
            mean_specz: 0.05,
            std_specz: 0.001,
            lower_bound: 0.047,
            upper_bound: 0.053,
            velocity_dispersion_km_s: 500.0,
            theta_arcmin: 20.0,
            angular_diameter_distance_mpc: 210.0,
            physical_diameter_mpc: 1.2,
            dynamical_mass_solar: 3.0e14,
        };
        let map = result.to_map();
        assert_eq!(map.len(), 9);
        for key in [
            "mean_specz",
            "std_specz",
            "lower_bound",
            "upper_bound",
            "velocity_dispersion_km_s",
            "theta_arcmin",
            "angular_diameter_distance_mpc",
            "physical_diameter_mpc",
            "dynamical_mass_solar",
        ] {
            assert!(map.contains_key(key), "missing {key}");
        }
    }
}
