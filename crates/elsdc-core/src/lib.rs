//! Core types for ELSDc ellipse and line-segment detection output.
//!
//! This crate describes what a detection run produces and who owns it:
//! - [`EllipseArc`] and [`Polygon`] records with their labels,
//! - the [`LabelImage`] attributing pixels to primitives,
//! - [`ResultSet`], the single owned value a detection call hands back,
//! - the [`PrimitiveDetector`] and [`SymmetricEigenSolver`] contracts an
//!   engine plugs into.
//!
//! It does not implement detection itself.

mod detector;
mod eigen;
mod ellipse;
mod image;
mod io;
mod label;
mod logger;
mod polygon;
mod result;

pub use detector::{detect, detect_with_labels, DetectError, PrimitiveDetector};
pub use eigen::{
    solve_symmetric_eigen, DefaultEigenSolver, EigenError, NalgebraEigenSolver,
    SymmetricEigenSolver,
};
pub use ellipse::{EllipseArc, CIRCLE_TOLERANCE};
pub use image::{ImageError, ImageView};
pub use io::ResultSetIoError;
pub use label::{LabelAllocator, LabelGridMut, LabelImage, LabelImageError, BACKGROUND};
pub use polygon::{Polygon, PolygonError};
pub use result::{PrimitiveKind, Primitives, PrimitivesBuilder, ResultSet, ResultSetError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_verbosity};

pub use nalgebra::Point2;
