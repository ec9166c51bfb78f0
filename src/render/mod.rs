//! Off-screen plot rendering.
//!
//! Every chart draws into its own [`figure::Figure`] (an owned RGB buffer
//! behind a plotters bitmap backend) and comes back as a base64-encoded PNG
//! payload. There is no shared or implicit figure state, so invocations are
//! independent of each other.

pub mod charts;
pub mod figure;

use std::collections::BTreeMap;

/// Plot-name → base64 PNG payload.
pub type PlotSet = BTreeMap<String, String>;

/// Fixed identifiers of the diagnostic plots.
pub mod keys {
    pub const BOXPLOT: &str = "boxplot";
    pub const HISTOGRAM_WITH_BOUNDS: &str = "histogram_with_bounds";
    pub const FILTERED_HISTOGRAM: &str = "filtered_histogram";
    pub const VELOCITY_DISTRIBUTION: &str = "velocity_distribution";
    pub const PROJ_SEP_DISTRIBUTION: &str = "proj_sep_distribution";

    /// All plot keys in their fixed order.
    pub const ALL: [&str; 5] = [
        BOXPLOT,
        HISTOGRAM_WITH_BOUNDS,
        FILTERED_HISTOGRAM,
        VELOCITY_DISTRIBUTION,
        PROJ_SEP_DISTRIBUTION,
    ];
}
