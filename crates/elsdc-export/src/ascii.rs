//! Fixed-schema text records.
//!
//! Ellipse file, one line per arc:
//!
//! ```text
//! label x1 y1 x2 y2 cx cy ax bx theta ang_start ang_end
//! ```
//!
//! `label` is the value marking the arc's pixels in the label image,
//! `(x1, y1)`–`(x2, y2)` delimit the arc in trigonometric order, `ax`/`bx`
//! are the semi-axes and `theta` the major-axis angle.
//!
//! Polygon file, one line per polygon:
//!
//! ```text
//! label n x1 y1 ... xn yn
//! ```
//!
//! where `n` is the point count (twice the number of segments).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use elsdc_core::{EllipseArc, Primitives};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::{io_error, ExportError};

/// Decimal places written for every floating field.
pub const FLOAT_PRECISION: usize = 6;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AsciiParseError {
    #[error("expected 12 fields, got {0}")]
    FieldCount(usize),
    #[error("invalid label {0:?}")]
    Label(String),
    #[error("invalid number {0:?}")]
    Number(String),
}

/// Write one line per ellipse to `w`.
pub fn write_ellipse_records<W: Write>(mut w: W, primitives: &Primitives) -> io::Result<()> {
    for (label, e) in primitives.labeled_ellipses() {
        write!(w, "{label}")?;
        for v in [
            e.x1,
            e.y1,
            e.x2,
            e.y2,
            e.cx,
            e.cy,
            e.ax,
            e.bx,
            e.theta,
            e.ang_start,
            e.ang_end,
        ] {
            write!(w, " {v:.prec$}", prec = FLOAT_PRECISION)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Write one line per polygon to `w`.
pub fn write_polygon_records<W: Write>(mut w: W, primitives: &Primitives) -> io::Result<()> {
    for (label, poly) in primitives.labeled_polygons() {
        write!(w, "{label} {}", poly.len())?;
        for p in poly.points() {
            write!(
                w,
                " {:.prec$} {:.prec$}",
                p.x,
                p.y,
                prec = FLOAT_PRECISION
            )?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn write_file<F>(path: &Path, body: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let file = File::create(path).map_err(io_error(path))?;
    let mut w = BufWriter::new(file);
    body(&mut w).map_err(io_error(path))?;
    w.flush().map_err(io_error(path))
}

/// Write the ellipse file at `path`, creating or truncating it.
///
/// Returns the number of lines written. With no ellipses nothing is
/// created and `0` is returned.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(primitives), fields(count = primitives.ell_count()))
)]
pub fn write_ellipses(path: &Path, primitives: &Primitives) -> Result<usize, ExportError> {
    if primitives.ell_count() == 0 {
        log::debug!("no ellipses, skipping {}", path.display());
        return Ok(0);
    }
    write_file(path, |w| write_ellipse_records(w, primitives))?;
    log::info!(
        "wrote {} ellipses to {}",
        primitives.ell_count(),
        path.display()
    );
    Ok(primitives.ell_count())
}

/// Write the polygon file at `path`, creating or truncating it.
///
/// Returns the number of lines written. With no polygons nothing is
/// created and `0` is returned.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(primitives), fields(count = primitives.poly_count()))
)]
pub fn write_polygons(path: &Path, primitives: &Primitives) -> Result<usize, ExportError> {
    if primitives.poly_count() == 0 {
        log::debug!("no polygons, skipping {}", path.display());
        return Ok(0);
    }
    write_file(path, |w| write_polygon_records(w, primitives))?;
    log::info!(
        "wrote {} polygons to {}",
        primitives.poly_count(),
        path.display()
    );
    Ok(primitives.poly_count())
}

/// Parse one line of the ellipse file.
pub fn parse_ellipse_line(line: &str) -> Result<(u32, EllipseArc), AsciiParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 12 {
        return Err(AsciiParseError::FieldCount(fields.len()));
    }
    let label = fields[0]
        .parse::<u32>()
        .map_err(|_| AsciiParseError::Label(fields[0].to_string()))?;
    let mut v = [0.0f64; 11];
    for (dst, raw) in v.iter_mut().zip(&fields[1..]) {
        *dst = raw
            .parse::<f64>()
            .map_err(|_| AsciiParseError::Number((*raw).to_string()))?;
    }
    Ok((
        label,
        EllipseArc {
            x1: v[0],
            y1: v[1],
            x2: v[2],
            y2: v[3],
            cx: v[4],
            cy: v[5],
            ax: v[6],
            bx: v[7],
            theta: v[8],
            ang_start: v[9],
            ang_end: v[10],
            full: false,
        },
    ))
}
