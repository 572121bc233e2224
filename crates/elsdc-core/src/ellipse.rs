use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Absolute tolerance under which two semi-axes are considered equal.
///
/// Used to decide whether an arc is drawn as a circle or as a general
/// ellipse. The distinction only affects rendering, never the shape.
pub const CIRCLE_TOLERANCE: f64 = 1e-10;

/// A detected circular or elliptical arc.
///
/// The endpoints `(x1, y1)` and `(x2, y2)` delimit the arc in trigonometric
/// order, i.e. going from `ang_start` to `ang_end`. All angles are in
/// radians and measured in image coordinates.
///
/// The layout is `#[repr(C)]` so that arrays of arcs can be handed across
/// a C ABI without conversion.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EllipseArc {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Center of the supporting ellipse.
    pub cx: f64,
    pub cy: f64,
    /// Semi-major axis length.
    pub ax: f64,
    /// Semi-minor axis length.
    pub bx: f64,
    /// Angle between the semi-major axis and the x axis.
    pub theta: f64,
    pub ang_start: f64,
    pub ang_end: f64,
    /// Set by the engine when the arc covers the whole ellipse.
    #[serde(default)]
    pub full: bool,
}

impl EllipseArc {
    /// Whether the two semi-axes are equal within [`CIRCLE_TOLERANCE`].
    #[inline]
    pub fn is_circle(&self) -> bool {
        (self.ax - self.bx).abs() <= CIRCLE_TOLERANCE
    }

    /// Angle swept from `ang_start` to `ang_end` in trigonometric order,
    /// normalized to `(0, 2π]`.
    pub fn angular_span(&self) -> f64 {
        let span = (self.ang_end - self.ang_start).rem_euclid(TAU);
        if span <= f64::EPSILON {
            TAU
        } else {
            span
        }
    }

    /// True when the engine flagged the arc as full, or when it closes on
    /// itself (records read back from ASCII files carry no flag).
    pub fn is_full(&self) -> bool {
        if self.full {
            return true;
        }
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        let coincident = dx * dx + dy * dy <= 1e-12;
        coincident && (self.angular_span() - TAU).abs() <= 1e-9
    }

    /// Point on the supporting ellipse at parametric angle `t`.
    pub fn point_at(&self, t: f64) -> (f64, f64) {
        let (s, c) = self.theta.sin_cos();
        let (st, ct) = t.sin_cos();
        (
            self.cx + self.ax * ct * c - self.bx * st * s,
            self.cy + self.ax * ct * s + self.bx * st * c,
        )
    }

    /// Rotation angle in degrees, as expected by SVG transforms.
    #[inline]
    pub fn theta_degrees(&self) -> f64 {
        self.theta.to_degrees()
    }
}
