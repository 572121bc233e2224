//! Copy-out adapter for embedding hosts with their own allocator.
//!
//! The host hands over label storage and allocates the output arrays; this
//! module fills them and releases every engine buffer before returning.
//! Host-owned storage is never freed here.

use elsdc_core::{
    detect_with_labels, DetectError, EllipseArc, ImageView, LabelGridMut, PrimitiveDetector,
    Primitives,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Columns of the host ellipse matrix: `x1 y1 x2 y2 cx cy theta`.
pub const ELLIPSE_COLUMNS: usize = 7;

#[derive(thiserror::Error, Debug)]
pub enum HostCopyError {
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error("host {what} array has {got} cells, expected {expected}")]
    ShortBuffer {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}

/// Element order of a host matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatrixLayout {
    #[default]
    RowMajor,
    ColumnMajor,
}

impl MatrixLayout {
    #[inline]
    pub fn index(self, row: usize, col: usize, rows: usize, cols: usize) -> usize {
        match self {
            MatrixLayout::RowMajor => row * cols + col,
            MatrixLayout::ColumnMajor => col * rows + row,
        }
    }
}

/// Output arrays allocated by the embedding host.
pub trait HostArrays {
    /// Storage for an `rows x ELLIPSE_COLUMNS` matrix of floats.
    fn ellipse_matrix(&mut self, rows: usize) -> &mut [f64];

    /// Storage for `rows` ellipse labels.
    fn ellipse_labels(&mut self, rows: usize) -> &mut [f64];

    fn layout(&self) -> MatrixLayout {
        MatrixLayout::RowMajor
    }
}

/// Plain vectors standing in for host arrays.
#[derive(Clone, Debug, Default)]
pub struct VecHost {
    pub layout: MatrixLayout,
    pub matrix: Vec<f64>,
    pub labels: Vec<f64>,
}

impl VecHost {
    pub fn new(layout: MatrixLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> usize {
        self.labels.len()
    }

    /// One matrix row, whatever the layout.
    pub fn row(&self, row: usize) -> Option<[f64; ELLIPSE_COLUMNS]> {
        let rows = self.rows();
        if row >= rows {
            return None;
        }
        let mut out = [0.0; ELLIPSE_COLUMNS];
        for (col, v) in out.iter_mut().enumerate() {
            *v = self.matrix[self.layout.index(row, col, rows, ELLIPSE_COLUMNS)];
        }
        Some(out)
    }
}

impl HostArrays for VecHost {
    fn ellipse_matrix(&mut self, rows: usize) -> &mut [f64] {
        self.matrix = vec![0.0; rows * ELLIPSE_COLUMNS];
        &mut self.matrix
    }

    fn ellipse_labels(&mut self, rows: usize) -> &mut [f64] {
        self.labels = vec![0.0; rows];
        &mut self.labels
    }

    fn layout(&self) -> MatrixLayout {
        self.layout
    }
}

fn host_row(e: &EllipseArc) -> [f64; ELLIPSE_COLUMNS] {
    [e.x1, e.y1, e.x2, e.y2, e.cx, e.cy, e.theta]
}

/// Run `detector` into host label storage and copy the ellipses out.
///
/// Returns the number of ellipse rows written.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(width = image.width, height = image.height))
)]
pub fn copy_out<D, H>(
    detector: &D,
    image: &ImageView<'_>,
    labels: &mut LabelGridMut<'_>,
    host: &mut H,
) -> Result<usize, HostCopyError>
where
    D: PrimitiveDetector + ?Sized,
    H: HostArrays + ?Sized,
{
    let primitives = detect_with_labels(detector, image, labels)?;
    copy_primitives(primitives, host)
}

/// Copy ellipses and their labels into host arrays, then drop `primitives`.
pub fn copy_primitives<H: HostArrays + ?Sized>(
    primitives: Primitives,
    host: &mut H,
) -> Result<usize, HostCopyError> {
    let rows = primitives.ell_count();
    let layout = host.layout();

    let matrix = host.ellipse_matrix(rows);
    let expected = rows * ELLIPSE_COLUMNS;
    if matrix.len() != expected {
        return Err(HostCopyError::ShortBuffer {
            what: "ellipse",
            expected,
            got: matrix.len(),
        });
    }
    for (row, e) in primitives.ellipses().iter().enumerate() {
        for (col, v) in host_row(e).into_iter().enumerate() {
            matrix[layout.index(row, col, rows, ELLIPSE_COLUMNS)] = v;
        }
    }

    let labels = host.ellipse_labels(rows);
    if labels.len() != rows {
        return Err(HostCopyError::ShortBuffer {
            what: "label",
            expected: rows,
            got: labels.len(),
        });
    }
    for (dst, &label) in labels.iter_mut().zip(primitives.ellipse_labels()) {
        *dst = f64::from(label);
    }

    log::debug!(
        "copied {rows} ellipses to host, dropping {} polygons",
        primitives.poly_count()
    );
    drop(primitives);
    Ok(rows)
}
