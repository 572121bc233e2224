//! File exporters for ELSDc detection results.
//!
//! - [`ascii`]: the fixed-schema ellipse and polygon record files,
//! - [`svg`]: an SVG document drawing every primitive,
//! - [`write_label_png`]: the label image as a 16-bit PNG.
//!
//! Exporters only borrow the [`ResultSet`]; they may run in any order.
//! An empty result is not an error: no file is created.

pub mod ascii;
mod config;
mod error;
mod labels;
pub mod svg;

pub use ascii::{parse_ellipse_line, write_ellipses, write_polygons, AsciiParseError};
pub use config::{ConfigError, ExportConfig, ExportPaths};
pub use error::ExportError;
pub use labels::write_label_png;
pub use svg::{write_svg, SvgStyle};

use elsdc_core::ResultSet;
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// What an [`export_all`] run actually wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub ellipse_lines: usize,
    pub polygon_lines: usize,
    pub svg_written: bool,
    pub label_image_written: bool,
}

/// Run every export enabled in `config`, stopping at the first failure.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(
        ellipses = results.ell_count(),
        polygons = results.poly_count()
    ))
)]
pub fn export_all(
    results: &ResultSet,
    paths: &ExportPaths,
    config: &ExportConfig,
) -> Result<ExportReport, ExportError> {
    let mut report = ExportReport {
        ellipse_lines: write_ellipses(&paths.ellipses, results.primitives())?,
        ..ExportReport::default()
    };
    if config.write_polygons {
        report.polygon_lines = write_polygons(&paths.polygons, results.primitives())?;
    }
    report.svg_written = write_svg(
        &paths.svg,
        results.primitives(),
        results.width(),
        results.height(),
        &config.svg,
    )?;
    if config.write_label_image && !results.is_empty() {
        write_label_png(&paths.label_image, results.label_image())?;
        report.label_image_written = true;
    }
    Ok(report)
}
