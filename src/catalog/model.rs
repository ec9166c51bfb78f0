//! Core catalog types.

// ---------------------------------------------------------------------------
// GalaxyRecord – one row of the input table
// ---------------------------------------------------------------------------

/// A single spectroscopic measurement (one CSV row). The same `objid` may
/// appear on several rows when a galaxy was observed more than once.
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyRecord {
    /// Survey object identifier.
    pub objid: u64,
    /// Spectroscopic redshift (dimensionless).
    pub specz: f64,
    /// Right ascension, degrees.
    pub ra: f64,
    /// Declination, degrees.
    pub dec: f64,
    /// Projected angular separation from the nominal cluster position,
    /// kept in whatever unit the input uses.
    pub proj_sep: f64,
}

// ---------------------------------------------------------------------------
// AveragedGalaxy – one galaxy after measurement averaging
// ---------------------------------------------------------------------------

/// One galaxy after collapsing repeat measurements: `specz` is the mean over
/// its input rows, `ra`/`dec`/`proj_sep` come from the first occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct AveragedGalaxy {
    pub objid: u64,
    pub specz: f64,
    pub ra: f64,
    pub dec: f64,
    pub proj_sep: f64,
}

// ---------------------------------------------------------------------------
// GalaxyCatalog – the aggregated dataset
// ---------------------------------------------------------------------------

/// The aggregated catalog: exactly one entry per distinct objid, ordered by
/// ascending objid, plus the raw row count it was built from.
#[derive(Debug, Clone)]
pub struct GalaxyCatalog {
    pub galaxies: Vec<AveragedGalaxy>,
    /// Number of input rows before averaging.
    pub raw_rows: usize,
}

impl GalaxyCatalog {
    /// Number of distinct galaxies.
    pub fn len(&self) -> usize {
        self.galaxies.len()
    }

    /// Whether the catalog holds no galaxies.
    pub fn is_empty(&self) -> bool {
        self.galaxies.is_empty()
    }

    /// Redshift column of the averaged catalog.
    pub fn specz_values(&self) -> Vec<f64> {
        self.galaxies.iter().map(|g| g.specz).collect()
    }
}
