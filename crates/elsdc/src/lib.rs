//! High-level facade crate for the `elsdc-*` workspace.
//!
//! This crate provides:
//! - re-exports of the result model, the exporters and the C bindings
//! - [`Summary`], a compact description of a stored result set
//! - (feature `cli`) the `elsdc` binary: `export` and `summary` subcommands
//!
//! ## Quickstart
//!
//! ```no_run
//! use elsdc::core::ResultSet;
//! use elsdc::export::{export_all, ExportConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let results = ResultSet::load_json("ring.json")?;
//! let config = ExportConfig::default();
//! let paths = config.resolve_paths("ring.pgm".as_ref());
//! let report = export_all(&results, &paths, &config)?;
//! println!("wrote {} ellipse records", report.ellipse_lines);
//! results.release();
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `elsdc::core`: arcs, polygons, label image, `ResultSet`, detector and
//!   eigen-solver contracts, logging.
//! - `elsdc::export`: ASCII record files, SVG rendering, label PNG, config.
//! - `elsdc::ffi`: C ABI (`elsdc_release`, `export_detector!`) and the
//!   embedding-host copy-out adapter.

pub use elsdc_core as core;
pub use elsdc_export as export;
pub use elsdc_ffi as ffi;

pub use elsdc_core::{EllipseArc, LabelImage, Polygon, Primitives, ResultSet};
pub use elsdc_export::{export_all, ExportConfig, ExportError, ExportPaths, ExportReport};

mod summary;

pub use summary::Summary;
