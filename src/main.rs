use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use cluster_analyzer::{analyze, AnalysisResult};

/// Presentation glue around the analyzer: read a catalog path, print the
/// derived properties, optionally decode the plot payloads to PNG files.
fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let catalog_path = args
        .next()
        .context("usage: cluster-analyzer <catalog.csv> [plot-output-dir]")?;
    let plot_dir = args.next();

    let file = File::open(&catalog_path)
        .with_context(|| format!("opening catalog '{catalog_path}'"))?;
    let (result, plots) = analyze(file)?;

    print_results(&result);
    println!("\n{}", serde_json::to_string_pretty(&result)?);

    if let Some(dir) = plot_dir {
        let dir = Path::new(&dir);
        fs::create_dir_all(dir).with_context(|| format!("creating '{}'", dir.display()))?;
        for (key, payload) in &plots {
            let bytes = BASE64
                .decode(payload)
                .with_context(|| format!("decoding plot '{key}'"))?;
            let path = dir.join(format!("{key}.png"));
            fs::write(&path, bytes).with_context(|| format!("writing '{}'", path.display()))?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn print_results(result: &AnalysisResult) {
    // Mass in scientific notation, everything else with four decimals.
    let labels = [
        ("mean_specz", "Mean Redshift"),
        ("std_specz", "Redshift Std. Dev."),
        ("lower_bound", "Lower Redshift Bound"),
        ("upper_bound", "Upper Redshift Bound"),
        ("velocity_dispersion_km_s", "Velocity Dispersion (km/s)"),
        ("theta_arcmin", "Max Angular Size (arcmin)"),
        ("angular_diameter_distance_mpc", "Angular Diameter Dist. (Mpc)"),
        ("physical_diameter_mpc", "Physical Diameter (Mpc)"),
        ("dynamical_mass_solar", "Dynamical Mass (Solar Masses)"),
    ];
    let values = result.to_map();
    for (key, label) in labels {
        let value = values[key];
        if key.contains("mass") {
            println!("{label:<30} {value:.2e}");
        } else {
            println!("{label:<30} {value:.4}");
        }
    }
}
