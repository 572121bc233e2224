//! C layouts for detection results and the matching deallocation.

use std::ptr;

use elsdc_core::{EllipseArc, Polygon, ResultSet};

/// A polygon point as seen from C.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElsdcPoint {
    pub x: f64,
    pub y: f64,
}

/// A polygon as seen from C: `len` points at `points`, `len` even.
#[repr(C)]
#[derive(Debug)]
pub struct ElsdcPolygon {
    pub len: usize,
    pub points: *mut ElsdcPoint,
}

/// Every buffer of one detection call, in C layout.
///
/// Empty collections are represented by null pointers and zero counts.
/// The label image always holds `width * height` cells.
#[repr(C)]
#[derive(Debug)]
pub struct ElsdcResults {
    pub ellipses: *mut EllipseArc,
    pub ellipse_labels: *mut u32,
    pub ell_count: usize,
    pub polygons: *mut ElsdcPolygon,
    pub polygon_labels: *mut u32,
    pub poly_count: usize,
    pub label_image: *mut u32,
    pub width: usize,
    pub height: usize,
}

/// Leak a vector as a boxed slice; empty vectors become null.
pub(crate) fn vec_into_raw<T>(vec: Vec<T>) -> (*mut T, usize) {
    let len = vec.len();
    if len == 0 {
        (ptr::null_mut(), 0)
    } else {
        (Box::into_raw(vec.into_boxed_slice()) as *mut T, len)
    }
}

/// Reclaim a slice leaked by [`vec_into_raw`]. Returns whether anything
/// was freed.
///
/// # Safety
/// `ptr` must be null or come from [`vec_into_raw`] with the same `len`,
/// and must not be used afterwards.
pub(crate) unsafe fn free_boxed_slice<T>(ptr: *mut T, len: usize) -> bool {
    if ptr.is_null() || len == 0 {
        return false;
    }
    drop(unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(ptr, len)) });
    true
}

fn polygon_into_raw(polygon: Polygon) -> ElsdcPolygon {
    let points: Vec<ElsdcPoint> = polygon
        .into_points()
        .into_iter()
        .map(|p| ElsdcPoint { x: p.x, y: p.y })
        .collect();
    let (points, len) = vec_into_raw(points);
    ElsdcPolygon { len, points }
}

impl ElsdcResults {
    /// All-null value; releasing it frees nothing.
    pub const fn empty() -> Self {
        Self {
            ellipses: ptr::null_mut(),
            ellipse_labels: ptr::null_mut(),
            ell_count: 0,
            polygons: ptr::null_mut(),
            polygon_labels: ptr::null_mut(),
            poly_count: 0,
            label_image: ptr::null_mut(),
            width: 0,
            height: 0,
        }
    }

    /// Move a result set into C-owned buffers.
    pub fn from_result_set(results: ResultSet) -> Self {
        let (primitives, label_image) = results.into_parts();
        let (width, height) = (label_image.width(), label_image.height());
        let (ellipses, ellipse_labels, polygons, polygon_labels) = primitives.into_parts();

        let (ellipses, ell_count) = vec_into_raw(ellipses);
        let (ellipse_labels, _) = vec_into_raw(ellipse_labels);
        let polygons: Vec<ElsdcPolygon> = polygons.into_iter().map(polygon_into_raw).collect();
        let (polygons, poly_count) = vec_into_raw(polygons);
        let (polygon_labels, _) = vec_into_raw(polygon_labels);
        let (label_image, _) = vec_into_raw(label_image.into_raw());

        Self {
            ellipses,
            ellipse_labels,
            ell_count,
            polygons,
            polygon_labels,
            poly_count,
            label_image,
            width,
            height,
        }
    }

    /// Free every buffer.
    ///
    /// # Safety
    /// `self` must come from [`ElsdcResults::from_result_set`] (or be
    /// [`ElsdcResults::empty`]) and must not have been released before.
    pub unsafe fn release(self) -> FreedBuffers {
        unsafe {
            release_buffers(
                self.ellipses,
                self.ellipse_labels,
                self.ell_count,
                self.polygons,
                self.polygon_labels,
                self.poly_count,
                self.label_image,
                self.width.saturating_mul(self.height),
            )
        }
    }
}

/// Which buffers a release call actually freed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FreedBuffers {
    pub ellipse_arrays: usize,
    pub polygon_point_arrays: usize,
    pub polygon_arrays: usize,
    pub label_image: bool,
}

/// Free the buffers of one detection call.
///
/// Record arrays are freed only when non-null with a non-zero count, each
/// polygon's points before the polygon array, label arrays together with
/// their record arrays.
///
/// # Safety
/// Pointers and counts must be exactly those written by one detection call
/// and not yet released.
#[allow(clippy::too_many_arguments)]
pub(crate) unsafe fn release_buffers(
    ellipses: *mut EllipseArc,
    ellipse_labels: *mut u32,
    ell_count: usize,
    polygons: *mut ElsdcPolygon,
    polygon_labels: *mut u32,
    poly_count: usize,
    label_image: *mut u32,
    label_len: usize,
) -> FreedBuffers {
    let mut freed = FreedBuffers::default();

    if !ellipses.is_null() && ell_count > 0 {
        unsafe {
            free_boxed_slice(ellipses, ell_count);
            free_boxed_slice(ellipse_labels, ell_count);
        }
        freed.ellipse_arrays = 2;
    }

    if !polygons.is_null() && poly_count > 0 {
        let records = unsafe { std::slice::from_raw_parts(polygons, poly_count) };
        for poly in records {
            if unsafe { free_boxed_slice(poly.points, poly.len) } {
                freed.polygon_point_arrays += 1;
            }
        }
        unsafe {
            free_boxed_slice(polygons, poly_count);
            free_boxed_slice(polygon_labels, poly_count);
        }
        freed.polygon_arrays = 2;
    }

    freed.label_image = unsafe { free_boxed_slice(label_image, label_len) };
    freed
}
