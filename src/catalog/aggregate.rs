use std::collections::BTreeMap;

use log::debug;

use super::model::{AveragedGalaxy, GalaxyCatalog, GalaxyRecord};
use crate::stats;

// ---------------------------------------------------------------------------
// Measurement averaging
// ---------------------------------------------------------------------------

/// Collapse repeat measurements: group rows by objid, average specz within
/// each group and keep ra/dec/proj_sep from the group's first row. The
/// result holds exactly one entry per distinct objid, ascending.
pub fn average_by_object(records: &[GalaxyRecord]) -> GalaxyCatalog {
    struct Group {
        specz_sum: f64,
        n: usize,
        first: AveragedGalaxy,
    }

    let mut groups: BTreeMap<u64, Group> = BTreeMap::new();
    for rec in records {
        groups
            .entry(rec.objid)
            .and_modify(|g| {
                g.specz_sum += rec.specz;
                g.n += 1;
            })
            .or_insert_with(|| Group {
                specz_sum: rec.specz,
                n: 1,
                first: AveragedGalaxy {
                    objid: rec.objid,
                    specz: 0.0,
                    ra: rec.ra,
                    dec: rec.dec,
                    proj_sep: rec.proj_sep,
                },
            });
    }

    let galaxies: Vec<AveragedGalaxy> = groups
        .into_values()
        .map(|g| AveragedGalaxy {
            specz: g.specz_sum / g.n as f64,
            ..g.first
        })
        .collect();

    debug!(
        "averaged {} rows into {} distinct galaxies",
        records.len(),
        galaxies.len()
    );
    GalaxyCatalog {
        galaxies,
        raw_rows: records.len(),
    }
}

// ---------------------------------------------------------------------------
// Redshift outlier clipping
// ---------------------------------------------------------------------------

/// The 3σ clip window around the mean averaged redshift.
#[derive(Debug, Clone, Copy)]
pub struct ClipBounds {
    pub mean: f64,
    pub std: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Compute `mean ± 3·sample_std` over the averaged redshifts. With fewer
/// than two galaxies the sample std is undefined and every field except
/// `mean` is NaN.
pub fn clip_bounds(catalog: &GalaxyCatalog) -> ClipBounds {
    let specz = catalog.specz_values();
    let mean = stats::mean(&specz);
    let std = stats::sample_std(&specz);
    ClipBounds {
        mean,
        std,
        lower: mean - 3.0 * std,
        upper: mean + 3.0 * std,
    }
}

/// Galaxies whose averaged redshift lies inside the clip window.
///
/// When the window is undefined (single-galaxy catalog, NaN std) clipping is
/// skipped and every galaxy is kept, so the degenerate case yields a zero
/// velocity dispersion downstream instead of an all-NaN result.
pub fn clip_members<'a>(
    catalog: &'a GalaxyCatalog,
    bounds: &ClipBounds,
) -> Vec<&'a AveragedGalaxy> {
    if bounds.std.is_nan() {
        return catalog.galaxies.iter().collect();
    }
    let members: Vec<&AveragedGalaxy> = catalog
        .galaxies
        .iter()
        .filter(|g| g.specz >= bounds.lower && g.specz <= bounds.upper)
        .collect();
    debug!(
        "{} of {} galaxies inside [{:.6}, {:.6}]",
        members.len(),
        catalog.len(),
        bounds.lower,
        bounds.upper
    );
    members
}
