//! End-to-end tests of the analysis pipeline over in-memory catalogs.

use std::fmt::Write as _;
use std::io::Write as _;

use approx::assert_relative_eq;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use proptest::prelude::*;

use cluster_analyzer::catalog::aggregate::{average_by_object, clip_bounds, clip_members};
use cluster_analyzer::catalog::GalaxyRecord;
use cluster_analyzer::{analyze, plot_keys, CatalogError};

const HEADER: &str = "objid,specz,ra,dec,proj_sep";

/// A tight cluster at z ≈ 0.054 with one far outlier and one repeat visit.
fn sample_catalog() -> String {
    let mut csv = format!("{HEADER}\n");
    for i in 0..30 {
        let specz = 0.0530 + 2.0e-4 * (i % 7) as f64;
        let ra = 194.9 + 0.01 * i as f64;
        let dec = 27.9 + 0.005 * i as f64;
        writeln!(csv, "{},{specz},{ra},{dec},{:.3}", 100 + i, 0.3 * i as f64).unwrap();
    }
    // repeat visit for objid 100
    csv.push_str("100,0.0531,194.9,27.9,0.0\n");
    // line-of-sight interloper, far outside 3σ
    csv.push_str("999,0.4200,195.0,28.0,5.0\n");
    csv
}

#[test]
fn full_pipeline_produces_consistent_scalars() {
    let (result, plots) = analyze(sample_catalog().as_bytes()).unwrap();

    assert!(result.lower_bound <= result.mean_specz);
    assert!(result.mean_specz <= result.upper_bound);
    assert!(result.std_specz > 0.0);
    assert!(result.velocity_dispersion_km_s >= 0.0);
    assert!(result.theta_arcmin > 0.0);
    assert!(result.angular_diameter_distance_mpc > 0.0);
    assert!(result.physical_diameter_mpc > 0.0);
    assert!(result.dynamical_mass_solar > 0.0);

    // the interloper drags the mean above the member redshifts
    assert!(result.mean_specz > 0.053);
    assert_eq!(plots.len(), 5);
}

#[test]
fn plot_set_has_exactly_the_fixed_keys_and_png_payloads() {
    let (_, plots) = analyze(sample_catalog().as_bytes()).unwrap();
    let keys: Vec<&str> = plots.keys().map(String::as_str).collect();
    let mut expected = plot_keys::ALL.to_vec();
    expected.sort_unstable();
    assert_eq!(keys, expected);

    for (key, payload) in &plots {
        let png = BASE64
            .decode(payload)
            .unwrap_or_else(|e| panic!("plot '{key}' is not base64: {e}"));
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G'], "plot '{key}'");
    }
}

#[test]
fn rerun_on_identical_input_is_bit_identical() {
    let csv = sample_catalog();
    let (a, plots_a) = analyze(csv.as_bytes()).unwrap();
    let (b, plots_b) = analyze(csv.as_bytes()).unwrap();

    assert_eq!(a.mean_specz.to_bits(), b.mean_specz.to_bits());
    assert_eq!(a.std_specz.to_bits(), b.std_specz.to_bits());
    assert_eq!(
        a.velocity_dispersion_km_s.to_bits(),
        b.velocity_dispersion_km_s.to_bits()
    );
    assert_eq!(a.theta_arcmin.to_bits(), b.theta_arcmin.to_bits());
    assert_eq!(
        a.dynamical_mass_solar.to_bits(),
        b.dynamical_mass_solar.to_bits()
    );
    assert_eq!(plots_a, plots_b);
}

#[test]
fn repeat_measurements_collapse_per_spec_scenario() {
    let csv = format!(
        "{HEADER}\n\
         1,0.0100,150.0,2.2,1.0\n\
         1,0.0102,150.0,2.2,1.0\n\
         1,0.0098,150.0,2.2,1.0\n\
         2,0.0500,150.3,2.4,2.0\n"
    );
    let rows = cluster_analyzer::catalog::read_catalog(csv.as_bytes()).unwrap();
    let catalog = average_by_object(&rows);
    assert_eq!(catalog.len(), 2);
    assert_relative_eq!(catalog.galaxies[0].specz, 0.0100, epsilon = 1e-12);
}

#[test]
fn missing_columns_error_lists_every_missing_name() {
    let err = analyze("objid,specz\n1,0.05\n".as_bytes()).unwrap_err();
    match err.downcast_ref::<CatalogError>() {
        Some(CatalogError::MissingColumns(cols)) => {
            assert_eq!(cols, &["ra", "dec", "proj_sep"]);
        }
        _ => panic!("expected MissingColumns, got {err:?}"),
    }
}

#[test]
fn empty_catalog_is_an_error_not_nan() {
    let err = analyze(format!("{HEADER}\n").as_bytes()).unwrap_err();
    assert!(err.to_string().contains("no data rows"), "{err}");
}

#[test]
fn single_galaxy_has_nan_std_and_zero_dispersion() {
    let csv = format!("{HEADER}\n1,0.0500,150.0,2.2,0.0\n");
    let (result, plots) = analyze(csv.as_bytes()).unwrap();

    assert!(result.std_specz.is_nan());
    assert!(result.lower_bound.is_nan());
    assert!(result.upper_bound.is_nan());
    assert_relative_eq!(result.mean_specz, 0.05);
    assert_eq!(result.velocity_dispersion_km_s, 0.0);
    assert_eq!(result.theta_arcmin, 0.0);
    assert_eq!(result.dynamical_mass_solar, 0.0);
    assert_eq!(plots.len(), 5);
}

#[test]
fn identical_redshifts_give_zero_dispersion() {
    // 0.0625 is exactly representable, so the mean accumulates without
    // rounding and both spreads come out as exact zeros.
    let mut csv = format!("{HEADER}\n");
    for i in 0..8 {
        writeln!(csv, "{i},0.0625,{},27.9,1.0", 194.9 + 0.01 * i as f64).unwrap();
    }
    let (result, _) = analyze(csv.as_bytes()).unwrap();
    assert_eq!(result.velocity_dispersion_km_s, 0.0);
    assert_eq!(result.std_specz, 0.0);
    assert_eq!(result.dynamical_mass_solar, 0.0);
}

#[test]
fn analyze_accepts_a_real_file_handle() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(sample_catalog().as_bytes()).unwrap();
    let file = std::fs::File::open(tmp.path()).unwrap();
    let (result, _) = analyze(file).unwrap();
    assert!(result.mean_specz > 0.0);
}

// ---------------------------------------------------------------------------
// Invariant properties
// ---------------------------------------------------------------------------

fn arb_records() -> impl Strategy<Value = Vec<GalaxyRecord>> {
    prop::collection::vec(
        (0u64..50, 0.001f64..0.5, 0.0f64..359.0, -30.0f64..60.0, 0.0f64..10.0),
        2..60,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(objid, specz, ra, dec, proj_sep)| GalaxyRecord {
                objid,
                specz,
                ra,
                dec,
                proj_sep,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn averaged_count_equals_distinct_objids(records in arb_records()) {
        let catalog = average_by_object(&records);
        let mut ids: Vec<u64> = records.iter().map(|r| r.objid).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(catalog.len(), ids.len());
        prop_assert!(catalog.len() <= records.len());
    }

    #[test]
    fn clip_window_contains_the_mean(records in arb_records()) {
        let catalog = average_by_object(&records);
        let bounds = clip_bounds(&catalog);
        if catalog.len() >= 2 {
            prop_assert!(bounds.lower <= bounds.mean && bounds.mean <= bounds.upper);
        }
    }

    #[test]
    fn members_are_a_subset_within_bounds(records in arb_records()) {
        let catalog = average_by_object(&records);
        let bounds = clip_bounds(&catalog);
        let members = clip_members(&catalog, &bounds);
        prop_assert!(members.len() <= catalog.len());
        prop_assert!(!members.is_empty());
        if catalog.len() >= 2 {
            for g in members {
                prop_assert!(g.specz >= bounds.lower && g.specz <= bounds.upper);
            }
        }
    }
}
