//! Caller-owned C ABI.
//!
//! # Memory ownership
//!
//! - A detect entry point (see [`export_detector!`](crate::export_detector))
//!   allocates every result buffer on the Rust heap and hands them to the
//!   caller through out-parameters.
//! - The caller owns them from then on and must pass them, together with
//!   the counts and dimensions it received, to [`elsdc_release`] exactly
//!   once.
//! - Empty collections come back as null pointers with a zero count.
//!   Releasing them is a no-op.
//! - Releasing twice, or reading a buffer after releasing it, is undefined
//!   behaviour.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::slice;

use elsdc_core::{detect, EllipseArc, ImageView, PrimitiveDetector};

use crate::raw::{release_buffers, ElsdcPolygon, ElsdcResults, FreedBuffers};

/// Outcome of a detect call.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElsdcStatus {
    Ok = 0,
    NullArgument = 1,
    InvalidDimensions = 2,
    DetectionFailed = 3,
    Panic = 4,
}

impl ElsdcStatus {
    pub fn is_ok(self) -> bool {
        self == ElsdcStatus::Ok
    }
}

/// Run `detector` on a row-major `width x height` image and hand the
/// results to the caller.
///
/// Every out-parameter is written: on failure, pointers are null and counts
/// are zero, so an unconditional [`elsdc_release`] afterwards is fine.
///
/// # Safety
/// - every `out_*` pointer must be valid for one write, or null (in which
///   case nothing is written and [`ElsdcStatus::NullArgument`] is returned);
/// - `image` must point to `width * height` readable `f64` values that stay
///   alive for the duration of the call.
#[allow(clippy::too_many_arguments)]
pub unsafe fn detect_raw<D: PrimitiveDetector + ?Sized>(
    detector: &D,
    out_ell: *mut *mut EllipseArc,
    out_ell_labels: *mut *mut u32,
    out_ell_count: *mut usize,
    out_poly: *mut *mut ElsdcPolygon,
    out_poly_labels: *mut *mut u32,
    out_poly_count: *mut usize,
    out_label_image: *mut *mut u32,
    image: *const f64,
    width: usize,
    height: usize,
) -> ElsdcStatus {
    if out_ell.is_null()
        || out_ell_labels.is_null()
        || out_ell_count.is_null()
        || out_poly.is_null()
        || out_poly_labels.is_null()
        || out_poly_count.is_null()
        || out_label_image.is_null()
    {
        return ElsdcStatus::NullArgument;
    }

    let write = |results: ElsdcResults| unsafe {
        *out_ell = results.ellipses;
        *out_ell_labels = results.ellipse_labels;
        *out_ell_count = results.ell_count;
        *out_poly = results.polygons;
        *out_poly_labels = results.polygon_labels;
        *out_poly_count = results.poly_count;
        *out_label_image = results.label_image;
    };
    write(ElsdcResults::empty());

    if image.is_null() {
        return ElsdcStatus::NullArgument;
    }
    let Some(len) = width.checked_mul(height) else {
        return ElsdcStatus::InvalidDimensions;
    };
    let pixels = unsafe { slice::from_raw_parts(image, len) };
    let view = match ImageView::new(width, height, pixels) {
        Ok(view) => view,
        Err(err) => {
            log::warn!("rejected input image: {err}");
            return ElsdcStatus::InvalidDimensions;
        }
    };

    match catch_unwind(AssertUnwindSafe(|| detect(detector, &view))) {
        Ok(Ok(results)) => {
            log::debug!(
                "handing {} ellipses and {} polygons to the caller",
                results.ell_count(),
                results.poly_count()
            );
            write(ElsdcResults::from_result_set(results));
            ElsdcStatus::Ok
        }
        Ok(Err(err)) => {
            log::warn!("detection failed: {err}");
            ElsdcStatus::DetectionFailed
        }
        Err(_) => {
            log::error!("detection engine panicked");
            ElsdcStatus::Panic
        }
    }
}

/// Free every buffer returned by one detect call.
///
/// Pass back the counts and the image dimensions the detect call wrote:
/// Rust frees a buffer only with its exact length, so `ell_count`,
/// `poly_count` and `width * height` size the ellipse, polygon and label
/// image arrays.
///
/// Each ellipse and polygon array (and its label array) is freed only when
/// its pointer is non-null and its count is non-zero. Polygon point arrays
/// are freed before the polygon array that holds them. The label image is
/// freed whenever its pointer is non-null.
///
/// # Safety
/// The arguments must be exactly the pointers, counts and dimensions
/// written by a single detect call, not yet released. Releasing twice or
/// touching any buffer afterwards is undefined behaviour.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn elsdc_release(
    ell: *mut EllipseArc,
    ell_labels: *mut u32,
    ell_count: usize,
    poly: *mut ElsdcPolygon,
    poly_labels: *mut u32,
    poly_count: usize,
    label_image: *mut u32,
    width: usize,
    height: usize,
) {
    let freed = unsafe {
        release_buffers(
            ell,
            ell_labels,
            ell_count,
            poly,
            poly_labels,
            poly_count,
            label_image,
            width.saturating_mul(height),
        )
    };
    log_freed(freed);
}

fn log_freed(freed: FreedBuffers) {
    log::trace!(
        "released {} ellipse, {} polygon and {} point arrays (label image: {})",
        freed.ellipse_arrays,
        freed.polygon_arrays,
        freed.polygon_point_arrays,
        freed.label_image
    );
}
