//! Catalog layer: input rows, loading, aggregation and outlier clipping.
//!
//! Architecture:
//! ```text
//!  member-catalog CSV
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse + validate header → Vec<GalaxyRecord>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────────┐
//!   │ GalaxyCatalog   │  one AveragedGalaxy per objid
//!   └───────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ aggregate │  3σ redshift clip → member subset
//!   └──────────┘
//! ```

pub mod aggregate;
pub mod loader;
pub mod model;

pub use loader::{read_catalog, CatalogError, REQUIRED_COLUMNS};
pub use model::{AveragedGalaxy, GalaxyCatalog, GalaxyRecord};
