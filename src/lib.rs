//! Galaxy cluster property estimation from spectroscopic member catalogs.
//!
//! The crate exposes one operation: [`analyze`] reads a comma-separated
//! member catalog (columns `objid`, `specz`, `ra`, `dec`, `proj_sep`; extra
//! columns ignored) and returns the derived cluster properties together with
//! five base64-PNG diagnostic plots. Any presentation layer — CLI, web
//! handler or test harness — calls it with a file-like reader and formats
//! the two mappings however it likes.

pub mod analysis;
pub mod catalog;
pub mod constants;
pub mod render;
pub mod sky;
pub mod stats;

pub use analysis::{analyze, AnalysisResult};
pub use catalog::CatalogError;
pub use render::{keys as plot_keys, PlotSet};
