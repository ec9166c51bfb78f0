//! Write a deterministic synthetic member catalog for the analyzer.
//!
//! Produces a CSV with the required columns plus two survey-style extras
//! (`plate`, `mjd`) that the loader must ignore. The cluster is a Gaussian
//! redshift clump with a handful of line-of-sight interlopers and repeat
//! spectroscopic visits for some objects.

use anyhow::{Context, Result};
use cluster_analyzer::sky::SkyCoord;

/// Seeded xoshiro256** generator, so the same seed always yields the same
/// catalog and the analyzer's output stays comparable across runs.
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Normal deviate via the Box-Muller transform; drives the redshift
    /// scatter and the sky positions.
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // A Coma-like cluster
    let z_cluster = 0.0540;
    let sigma_z = 0.0018;
    let center = SkyCoord::new(194.95, 27.98);
    let n_members = 180;
    let n_interlopers = 4;

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "cluster_catalog.csv".to_string());
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating '{output_path}'"))?;
    writer.write_record(["objid", "specz", "ra", "dec", "proj_sep", "plate", "mjd"])?;

    let mut rows = 0usize;
    let write_visit =
        |writer: &mut csv::Writer<std::fs::File>, objid: u64, specz: f64, pos: SkyCoord| {
            let proj_sep = pos.separation_arcmin(&center);
            let plate = 2600 + (objid % 40);
            let mjd = 54_000 + (objid % 700);
            writer.write_record([
                objid.to_string(),
                format!("{specz:.6}"),
                format!("{:.6}", pos.ra_deg),
                format!("{:.6}", pos.dec_deg),
                format!("{proj_sep:.4}"),
                plate.to_string(),
                mjd.to_string(),
            ])
        };

    for i in 0..n_members {
        let objid = 1_237_660_000_000_000_000u64 + i;
        let specz = rng.gauss(z_cluster, sigma_z);
        let pos = SkyCoord::new(
            rng.gauss(center.ra_deg, 0.15),
            rng.gauss(center.dec_deg, 0.15),
        );

        write_visit(&mut writer, objid, specz, pos)?;
        rows += 1;

        // Every fifth object gets repeat spectroscopic visits.
        if i % 5 == 0 {
            for _ in 0..2 {
                write_visit(&mut writer, objid, specz + rng.gauss(0.0, 5e-5), pos)?;
                rows += 1;
            }
        }
    }

    for i in 0..n_interlopers {
        let objid = 1_237_669_000_000_000_000u64 + i;
        let specz = 0.15 + 0.2 * rng.next_f64();
        let pos = SkyCoord::new(
            rng.gauss(center.ra_deg, 0.15),
            rng.gauss(center.dec_deg, 0.15),
        );
        write_visit(&mut writer, objid, specz, pos)?;
        rows += 1;
    }

    writer.flush()?;
    println!(
        "Wrote {rows} rows ({} objects, {n_interlopers} interlopers) to {output_path}",
        n_members + n_interlopers
    );
    Ok(())
}
