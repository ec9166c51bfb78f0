//! The five diagnostic charts.
//!
//! Each chart function takes a plain data slice, renders into its own
//! [`Figure`] and returns the encoded payload.

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::figure::Figure;
use crate::stats::{self, Bin};

/// Horizontal box plot of the averaged redshift distribution.
pub fn specz_boxplot(specz: &[f64]) -> Result<String> {
    let values = specz.to_vec();
    Figure::default().render(move |root| {
        if values.is_empty() {
            return Ok(());
        }
        let quartiles = Quartiles::new(&values);
        let [q_min, _, _, _, q_max] = quartiles.values();
        let pad = ((q_max - q_min) * 0.15).max(f32::EPSILON);
        let labels = ["specz"];

        let mut chart = ChartBuilder::on(root)
            .caption("Distribution of Redshift", ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((q_min - pad)..(q_max + pad), labels[..].into_segmented())?;
        chart.configure_mesh().x_desc("Redshift").draw()?;

        chart.draw_series(std::iter::once(
            Boxplot::new_horizontal(SegmentValue::CenterOf(&"specz"), &quartiles)
                .width(60)
                .style(&BLUE),
        ))?;
        Ok(())
    })
}

/// 50-bin histogram of the averaged redshifts with the 3σ clip window
/// marked by vertical lines.
pub fn specz_histogram_with_bounds(specz: &[f64], lower: f64, upper: f64) -> Result<String> {
    let bins = stats::histogram(specz, 50);
    Figure::default().render(move |root| {
        let mut chart = histogram_chart(
            root,
            "Redshift Histogram with Bounds",
            "Redshift",
            "Number of Galaxies",
            &bins,
            // autoscale to keep the markers visible, as matplotlib does
            Some((lower, upper)),
        )?;
        let y_max = y_ceiling(&bins);

        if lower.is_finite() {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(lower, 0.0), (lower, y_max)],
                    RED.stroke_width(2),
                )))?
                .label("Lower Bound")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED.stroke_width(2)));
        }
        if upper.is_finite() {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(upper, 0.0), (upper, y_max)],
                    GREEN.stroke_width(2),
                )))?
                .label("Upper Bound")
                .legend(|(x, y)| {
                    PathElement::new(vec![(x, y), (x + 16, y)], GREEN.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()?;
        Ok(())
    })
}

/// 30-bin histogram of the redshifts that survived the clip.
pub fn filtered_specz_histogram(specz: &[f64]) -> Result<String> {
    let bins = stats::histogram(specz, 30);
    Figure::default().render(move |root| {
        histogram_chart(
            root,
            "Filtered Redshift Distribution",
            "Redshift",
            "Number of Galaxies",
            &bins,
            None,
        )?;
        Ok(())
    })
}

/// 30-bin histogram of the non-relativistic per-galaxy velocities (m/s).
pub fn velocity_histogram(velocity_m_s: &[f64]) -> Result<String> {
    let bins = stats::histogram(velocity_m_s, 30);
    Figure::default().render(move |root| {
        histogram_chart(
            root,
            "Velocity Distribution (m/s)",
            "Velocity",
            "Number of Galaxies",
            &bins,
            None,
        )?;
        Ok(())
    })
}

/// 30-bin histogram of the projected separations of the clipped members.
pub fn proj_sep_histogram(proj_sep: &[f64]) -> Result<String> {
    let bins = stats::histogram(proj_sep, 30);
    Figure::default().render(move |root| {
        histogram_chart(
            root,
            "Angular Separation Distribution",
            "Projected Angular Separation",
            "Number of Galaxies",
            &bins,
            None,
        )?;
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Shared histogram scaffolding
// ---------------------------------------------------------------------------

type HistChart<'a, 'b> = ChartContext<
    'a,
    BitMapBackend<'b>,
    Cartesian2d<plotters::coord::types::RangedCoordf64, plotters::coord::types::RangedCoordf64>,
>;

fn y_ceiling(bins: &[Bin]) -> f64 {
    let tallest = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    (tallest * 1.1).max(1.0)
}

/// Build the common chart frame and draw the bin rectangles (half-opaque
/// fill with a black edge). `extra_x` widens the x range so out-of-data
/// markers stay on the canvas.
fn histogram_chart<'a, 'b>(
    root: &'a DrawingArea<BitMapBackend<'b>, Shift>,
    title: &str,
    x_label: &str,
    y_label: &str,
    bins: &[Bin],
    extra_x: Option<(f64, f64)>,
) -> Result<HistChart<'a, 'b>> {
    let (mut x_min, mut x_max) = bins
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| {
            (lo.min(b.lo), hi.max(b.hi))
        });
    if let Some((lo, hi)) = extra_x {
        if lo.is_finite() {
            x_min = x_min.min(lo);
        }
        if hi.is_finite() {
            x_max = x_max.max(hi);
        }
    }
    if !x_min.is_finite() || !x_max.is_finite() || x_min >= x_max {
        // empty chart body for empty data
        (x_min, x_max) = (0.0, 1.0);
    }
    let span = x_max - x_min;
    let y_max = y_ceiling(bins);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((x_min - span * 0.02)..(x_max + span * 0.02), 0.0..y_max)?;
    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()?;

    chart.draw_series(bins.iter().filter(|b| b.count > 0).map(|b| {
        Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], BLUE.mix(0.5).filled())
    }))?;
    chart.draw_series(
        bins.iter()
            .filter(|b| b.count > 0)
            .map(|b| Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], BLACK.stroke_width(1))),
    )?;

    Ok(chart)
}
