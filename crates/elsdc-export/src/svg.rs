//! SVG rendering of detected primitives.
//!
//! Arcs with equal semi-axes are written as circular arcs, the rest as
//! rotated elliptical arcs; closed arcs become `<circle>` / `<ellipse>`
//! since an SVG arc whose endpoints coincide draws nothing. Polygons become
//! `<polyline>` elements following the point order.

use std::f64::consts::PI;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use elsdc_core::{EllipseArc, Polygon, Primitives};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::ascii::FLOAT_PRECISION;
use crate::error::{io_error, ExportError};

/// Stroke settings for the SVG output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgStyle {
    pub circle_stroke: String,
    pub ellipse_stroke: String,
    pub polygon_stroke: String,
    pub stroke_width: f64,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            circle_stroke: "red".to_string(),
            ellipse_stroke: "blue".to_string(),
            polygon_stroke: "green".to_string(),
            stroke_width: 1.0,
        }
    }
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

struct Stroke {
    color: String,
    width: f64,
}

impl Stroke {
    fn new(color: &str, width: f64) -> Self {
        Self {
            color: escape_attr(color),
            width,
        }
    }

    fn attrs(&self) -> String {
        format!(
            "fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"",
            self.color, self.width
        )
    }
}

fn write_header<W: Write>(w: &mut W, width: usize, height: usize) -> io::Result<()> {
    writeln!(w, "<?xml version=\"1.0\" standalone=\"no\"?>")?;
    writeln!(
        w,
        "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \
         \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">"
    )?;
    writeln!(
        w,
        "<svg width=\"{width}px\" height=\"{height}px\" viewBox=\"0 0 {width} {height}\" \
         version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\">"
    )
}

fn large_arc_flag(e: &EllipseArc) -> u8 {
    u8::from(e.angular_span() > PI)
}

fn write_circle_arc<W: Write>(w: &mut W, e: &EllipseArc, stroke: &Stroke) -> io::Result<()> {
    let p = FLOAT_PRECISION;
    if e.is_full() {
        return writeln!(
            w,
            "<circle class=\"circle\" cx=\"{:.p$}\" cy=\"{:.p$}\" r=\"{:.p$}\" {}/>",
            e.cx,
            e.cy,
            e.ax,
            stroke.attrs()
        );
    }
    writeln!(
        w,
        "<path class=\"circle\" d=\"M {:.p$},{:.p$} A {:.p$},{:.p$} 0 {},1 {:.p$},{:.p$}\" {}/>",
        e.x1,
        e.y1,
        e.ax,
        e.ax,
        large_arc_flag(e),
        e.x2,
        e.y2,
        stroke.attrs()
    )
}

fn write_ellipse_arc<W: Write>(w: &mut W, e: &EllipseArc, stroke: &Stroke) -> io::Result<()> {
    let p = FLOAT_PRECISION;
    if e.is_full() {
        return writeln!(
            w,
            "<ellipse class=\"ellipse\" cx=\"{:.p$}\" cy=\"{:.p$}\" rx=\"{:.p$}\" ry=\"{:.p$}\" \
             transform=\"rotate({:.p$} {:.p$} {:.p$})\" {}/>",
            e.cx,
            e.cy,
            e.ax,
            e.bx,
            e.theta_degrees(),
            e.cx,
            e.cy,
            stroke.attrs()
        );
    }
    writeln!(
        w,
        "<path class=\"ellipse\" d=\"M {:.p$},{:.p$} A {:.p$},{:.p$} {:.p$} {},1 {:.p$},{:.p$}\" {}/>",
        e.x1,
        e.y1,
        e.ax,
        e.bx,
        e.theta_degrees(),
        large_arc_flag(e),
        e.x2,
        e.y2,
        stroke.attrs()
    )
}

fn write_polyline<W: Write>(w: &mut W, poly: &Polygon, stroke: &Stroke) -> io::Result<()> {
    let p = FLOAT_PRECISION;
    let points: Vec<String> = poly
        .points()
        .iter()
        .map(|pt| format!("{:.p$},{:.p$}", pt.x, pt.y))
        .collect();
    writeln!(
        w,
        "<polyline class=\"polygon\" points=\"{}\" {}/>",
        points.join(" "),
        stroke.attrs()
    )
}

/// Write a complete SVG document for `primitives` to `w`.
pub fn write_svg_document<W: Write>(
    w: &mut W,
    primitives: &Primitives,
    width: usize,
    height: usize,
    style: &SvgStyle,
) -> io::Result<()> {
    let circle = Stroke::new(&style.circle_stroke, style.stroke_width);
    let ellipse = Stroke::new(&style.ellipse_stroke, style.stroke_width);
    let polygon = Stroke::new(&style.polygon_stroke, style.stroke_width);

    write_header(w, width, height)?;
    for e in primitives.ellipses() {
        if e.is_circle() {
            write_circle_arc(w, e, &circle)?;
        } else {
            write_ellipse_arc(w, e, &ellipse)?;
        }
    }
    for poly in primitives.polygons() {
        write_polyline(w, poly, &polygon)?;
    }
    writeln!(w, "</svg>")
}

/// Write the SVG document at `path` on a `width` x `height` canvas.
///
/// Nothing is created when there are no primitives; returns whether a file
/// was written. The file is closed before returning on every path.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(primitives, style), fields(
        ellipses = primitives.ell_count(),
        polygons = primitives.poly_count()
    ))
)]
pub fn write_svg(
    path: &Path,
    primitives: &Primitives,
    width: usize,
    height: usize,
    style: &SvgStyle,
) -> Result<bool, ExportError> {
    if primitives.is_empty() {
        log::debug!("no primitives, skipping {}", path.display());
        return Ok(false);
    }
    let file = File::create(path).map_err(io_error(path))?;
    let mut w = BufWriter::new(file);
    write_svg_document(&mut w, primitives, width, height, style).map_err(io_error(path))?;
    w.flush().map_err(io_error(path))?;
    log::info!(
        "wrote {} ellipses and {} polygons to {}",
        primitives.ell_count(),
        primitives.poly_count(),
        path.display()
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use elsdc_core::{Point2, PrimitivesBuilder};
    use std::f64::consts::TAU;

    fn arc(ax: f64, bx: f64, ang_end: f64) -> EllipseArc {
        let mut e = EllipseArc {
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
            cx: 50.0,
            cy: 40.0,
            ax,
            bx,
            theta: 0.0,
            ang_start: 0.0,
            ang_end,
            full: false,
        };
        (e.x1, e.y1) = e.point_at(0.0);
        (e.x2, e.y2) = e.point_at(ang_end);
        e
    }

    fn render(prims: &Primitives) -> String {
        let mut out = Vec::new();
        write_svg_document(&mut out, prims, 100, 80, &SvgStyle::default()).expect("render");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn canvas_matches_image_size() {
        let mut b = PrimitivesBuilder::new();
        b.push_ellipse(arc(10.0, 10.0, PI / 2.0)).expect("label");
        let svg = render(&b.finish());
        assert!(svg.contains("<svg width=\"100px\" height=\"80px\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn equal_axes_render_as_circular_arc() {
        let mut b = PrimitivesBuilder::new();
        b.push_ellipse(arc(10.0, 10.0, PI / 2.0)).expect("label");
        b.push_ellipse(arc(10.0, 6.0, 1.5 * PI)).expect("label");
        let svg = render(&b.finish());
        assert!(svg.contains("class=\"circle\" d=\"M 60.000000,40.000000 A 10.000000,10.000000 0 0,1"));
        assert!(svg.contains("class=\"ellipse\" d=\"M 60.000000,40.000000 A 10.000000,6.000000 0.000000 1,1"));
    }

    #[test]
    fn full_arcs_become_closed_shapes() {
        let mut b = PrimitivesBuilder::new();
        b.push_ellipse(arc(10.0, 10.0, TAU)).expect("label");
        b.push_ellipse(arc(12.0, 4.0, TAU)).expect("label");
        let svg = render(&b.finish());
        assert!(svg.contains("<circle class=\"circle\" cx=\"50.000000\" cy=\"40.000000\" r=\"10.000000\""));
        assert!(svg.contains("<ellipse class=\"ellipse\""));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn engine_flagged_full_arc_is_closed_shape() {
        let mut e = arc(10.0, 10.0, 6.0);
        e.full = true;
        let mut b = PrimitivesBuilder::new();
        b.push_ellipse(e).expect("label");
        let svg = render(&b.finish());
        assert!(svg.contains("<circle class=\"circle\""));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn polygons_follow_point_order() {
        let mut b = PrimitivesBuilder::new();
        b.push_polygon(vec![
            Point2::new(1.0, 2.0),
            Point2::new(3.0, 4.0),
            Point2::new(3.0, 4.0),
            Point2::new(5.0, 0.5),
        ])
        .expect("label");
        let svg = render(&b.finish());
        assert!(svg.contains(
            "points=\"1.000000,2.000000 3.000000,4.000000 3.000000,4.000000 5.000000,0.500000\""
        ));
    }

    #[test]
    fn style_values_are_escaped() {
        let style = SvgStyle {
            polygon_stroke: "a\"b".to_string(),
            ..SvgStyle::default()
        };
        let stroke = Stroke::new(&style.polygon_stroke, 2.0);
        assert_eq!(
            stroke.attrs(),
            "fill=\"none\" stroke=\"a&quot;b\" stroke-width=\"2\""
        );
    }
}
