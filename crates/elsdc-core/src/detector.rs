//! Contract between this crate and a detection engine.
//!
//! The engine itself (edge detection, arc growing, fitting, validation)
//! lives elsewhere. It receives the input image, a builder that hands out
//! labels, and a label grid to mark supporting pixels in. It must not keep
//! references to any of them after returning.

use crate::image::{ImageError, ImageView};
use crate::label::{LabelGridMut, LabelImage, LabelImageError};
use crate::result::{Primitives, PrimitivesBuilder, ResultSet, ResultSetError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced while running a detector through this crate.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Labels(#[from] LabelImageError),
    #[error("label grid is {grid_width}x{grid_height}, image is {width}x{height}")]
    LabelShapeMismatch {
        width: usize,
        height: usize,
        grid_width: usize,
        grid_height: usize,
    },
    #[error("engine produced inconsistent output: {0}")]
    InvalidOutput(#[from] ResultSetError),
    #[error("engine failed: {0}")]
    Engine(String),
}

/// A geometric primitive detector.
pub trait PrimitiveDetector {
    /// Detect primitives in `image`, registering each one in `out` and
    /// marking its supporting pixels in `labels` with the returned label.
    ///
    /// `labels` has the same shape as `image` and starts all background.
    fn detect_into(
        &self,
        image: &ImageView<'_>,
        out: &mut PrimitivesBuilder,
        labels: &mut LabelGridMut<'_>,
    ) -> Result<(), DetectError>;
}

impl<D: PrimitiveDetector + ?Sized> PrimitiveDetector for &D {
    fn detect_into(
        &self,
        image: &ImageView<'_>,
        out: &mut PrimitivesBuilder,
        labels: &mut LabelGridMut<'_>,
    ) -> Result<(), DetectError> {
        (**self).detect_into(image, out, labels)
    }
}

/// Run `detector` with label storage owned by someone else.
///
/// The grid is cleared first and validated against the returned primitives
/// afterwards. Nothing in `labels` is freed here.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(width = image.width, height = image.height))
)]
pub fn detect_with_labels<D: PrimitiveDetector + ?Sized>(
    detector: &D,
    image: &ImageView<'_>,
    labels: &mut LabelGridMut<'_>,
) -> Result<Primitives, DetectError> {
    if labels.width() != image.width || labels.height() != image.height {
        return Err(DetectError::LabelShapeMismatch {
            width: image.width,
            height: image.height,
            grid_width: labels.width(),
            grid_height: labels.height(),
        });
    }
    labels.clear();
    let mut builder = PrimitivesBuilder::new();
    detector.detect_into(image, &mut builder, labels)?;
    let primitives = builder.finish();
    primitives.check_label_cells(labels.as_slice(), labels.width())?;
    log::debug!(
        "detected {} ellipses and {} polygons",
        primitives.ell_count(),
        primitives.poly_count()
    );
    Ok(primitives)
}

/// Run `detector` and return a self-contained [`ResultSet`].
pub fn detect<D: PrimitiveDetector + ?Sized>(
    detector: &D,
    image: &ImageView<'_>,
) -> Result<ResultSet, DetectError> {
    let mut label_image = LabelImage::new(image.width, image.height)?;
    let primitives = detect_with_labels(detector, image, &mut label_image.as_grid_mut())?;
    Ok(ResultSet::new(primitives, label_image)?)
}
