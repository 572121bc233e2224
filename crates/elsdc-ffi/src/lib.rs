//! Foreign-language bindings for ELSDc detection results.
//!
//! Two ownership models are offered:
//!
//! - [`foreign`]: the caller receives Rust-allocated buffers and returns
//!   them through [`elsdc_release`];
//! - [`host`]: an embedding host supplies its own arrays and label storage,
//!   everything the engine allocated is released before returning.
//!
//! The detection engine is not part of this crate, so the C detect entry
//! point is generated for a concrete engine with [`export_detector!`].
//! The generated C header declares it as `elsdc_detect`; export under that
//! name to match.

use std::ffi::c_char;

pub mod foreign;
pub mod host;
mod raw;

pub use elsdc_core::EllipseArc;
pub use foreign::{detect_raw, elsdc_release, ElsdcStatus};
pub use host::{copy_out, copy_primitives, HostArrays, HostCopyError, MatrixLayout, VecHost};
pub use raw::{ElsdcPoint, ElsdcPolygon, ElsdcResults, FreedBuffers};

static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

/// Library version as a static NUL-terminated string. Do not free.
#[no_mangle]
pub extern "C" fn elsdc_version() -> *const c_char {
    VERSION.as_ptr().cast()
}

/// Define a `#[no_mangle]` C detect function bound to one engine.
///
/// ```ignore
/// elsdc_ffi::export_detector!(elsdc_detect, my_engine::Engine::default());
/// ```
///
/// The generated function has the signature of [`detect_raw`] minus the
/// detector argument and returns [`ElsdcStatus`]. `$detector` is evaluated
/// on every call.
#[macro_export]
macro_rules! export_detector {
    ($name:ident, $detector:expr) => {
        /// # Safety
        /// See [`detect_raw`](elsdc_ffi::detect_raw).
        #[no_mangle]
        #[allow(clippy::too_many_arguments)]
        pub unsafe extern "C" fn $name(
            out_ell: *mut *mut $crate::EllipseArc,
            out_ell_labels: *mut *mut u32,
            out_ell_count: *mut usize,
            out_poly: *mut *mut $crate::ElsdcPolygon,
            out_poly_labels: *mut *mut u32,
            out_poly_count: *mut usize,
            out_label_image: *mut *mut u32,
            image: *const f64,
            width: usize,
            height: usize,
        ) -> $crate::ElsdcStatus {
            let detector = $detector;
            unsafe {
                $crate::detect_raw(
                    &detector,
                    out_ell,
                    out_ell_labels,
                    out_ell_count,
                    out_poly,
                    out_poly_labels,
                    out_poly_count,
                    out_label_image,
                    image,
                    width,
                    height,
                )
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn header_declares_the_detect_entry_point() {
        let config = include_str!("../cbindgen.toml");
        assert!(config.contains("int32_t elsdc_detect("));
        assert!(config.contains("size_t height);"));
    }

    #[test]
    fn version_is_nul_terminated() {
        let v = unsafe { CStr::from_ptr(elsdc_version()) };
        assert_eq!(v.to_str().expect("utf8"), env!("CARGO_PKG_VERSION"));
    }
}
