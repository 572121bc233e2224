use elsdc_core::{EllipseArc, LabelImage, Point2, Polygon, Primitives, ResultSet};
use elsdc_export::{
    export_all, parse_ellipse_line, write_ellipses, write_svg, ExportConfig, ExportError,
    ExportPaths, SvgStyle,
};
use std::f64::consts::PI;
use std::fs;
use std::path::Path;

fn arc(cx: f64, cy: f64, ax: f64, bx: f64, theta: f64, ang_end: f64) -> EllipseArc {
    let mut e = EllipseArc {
        x1: 0.0,
        y1: 0.0,
        x2: 0.0,
        y2: 0.0,
        cx,
        cy,
        ax,
        bx,
        theta,
        ang_start: 0.25,
        ang_end,
        full: false,
    };
    (e.x1, e.y1) = e.point_at(e.ang_start);
    (e.x2, e.y2) = e.point_at(ang_end);
    e
}

fn result_set(ellipses: Vec<(u32, EllipseArc)>, polygons: Vec<(u32, Polygon)>) -> ResultSet {
    let mut image = LabelImage::new(64, 48).expect("image");
    {
        let mut grid = image.as_grid_mut();
        for (i, label) in ellipses
            .iter()
            .map(|(l, _)| *l)
            .chain(polygons.iter().map(|(l, _)| *l))
            .enumerate()
        {
            grid.set(i, i, label).expect("pixel");
        }
    }
    let (ell_labels, ells) = ellipses.into_iter().unzip();
    let (poly_labels, polys) = polygons.into_iter().unzip();
    let prims = Primitives::new(ells, ell_labels, polys, poly_labels).expect("primitives");
    ResultSet::new(prims, image).expect("result set")
}

fn two_ellipses() -> ResultSet {
    result_set(
        vec![
            (5, arc(20.0, 20.0, 8.0, 8.0, 0.0, 2.0)),
            (9, arc(40.0, 25.0, 12.0, 5.0, 0.4, 4.5)),
        ],
        vec![],
    )
}

fn drawables(svg: &str) -> Vec<&str> {
    svg.lines()
        .map(str::trim_start)
        .filter(|l| {
            l.starts_with("<path")
                || l.starts_with("<circle")
                || l.starts_with("<ellipse")
                || l.starts_with("<polyline")
        })
        .collect()
}

#[test]
fn empty_result_creates_no_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = ExportPaths::in_dir(dir.path(), "empty");
    let cfg = ExportConfig {
        write_polygons: true,
        write_label_image: true,
        ..ExportConfig::default()
    };
    let rs = ResultSet::empty(16, 16).expect("empty");
    let report = export_all(&rs, &paths, &cfg).expect("export");
    assert_eq!(report, Default::default());
    assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 0);
    rs.release();
}

#[test]
fn two_ellipse_scenario() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = ExportPaths::in_dir(dir.path(), "scene");
    let rs = two_ellipses();
    let report = export_all(&rs, &paths, &ExportConfig::default()).expect("export");
    assert_eq!(report.ellipse_lines, 2);
    assert!(report.svg_written);
    assert!(!paths.polygons.exists());

    let text = fs::read_to_string(&paths.ellipses).expect("ascii");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("5 "));
    assert!(lines[1].starts_with("9 "));
    for line in &lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(fields.len(), 12);
        assert!(fields[0].parse::<u32>().is_ok());
        assert!(fields[1..].iter().all(|f| f.parse::<f64>().is_ok()));
    }

    let svg = fs::read_to_string(&paths.svg).expect("svg");
    let elements = drawables(&svg);
    assert_eq!(elements.len(), 2);
    assert!(elements[0].contains("class=\"circle\""));
    assert!(elements[1].contains("class=\"ellipse\""));
    assert!(!svg.contains("<polyline"));
    assert!(svg.contains("width=\"64px\" height=\"48px\""));
}

#[test]
fn svg_uses_the_values_written_to_ascii() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = ExportPaths::in_dir(dir.path(), "rt");
    let rs = two_ellipses();
    export_all(&rs, &paths, &ExportConfig::default()).expect("export");

    let text = fs::read_to_string(&paths.ellipses).expect("ascii");
    let svg = fs::read_to_string(&paths.svg).expect("svg");
    for (line, element) in text.lines().zip(drawables(&svg)) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let (x1, y1, x2, y2, ax, bx) = (
            fields[1], fields[2], fields[3], fields[4], fields[7], fields[8],
        );
        let (_, arc) = parse_ellipse_line(line).expect("parse");
        let radii = if arc.is_circle() {
            format!("A {ax},{ax} ")
        } else {
            format!("A {ax},{bx} ")
        };
        assert!(element.contains(&format!("M {x1},{y1} ")), "{element}");
        assert!(element.contains(&radii), "{element}");
        assert!(element.contains(&format!(",1 {x2},{y2}\"")), "{element}");
    }
}

#[test]
fn circle_classification_tolerance_in_output() {
    let rs = result_set(
        vec![
            (1, arc(20.0, 20.0, 8.0, 8.0 + 5e-11, 0.0, 2.0)),
            (2, arc(30.0, 20.0, 8.0, 8.0 + 1e-6, 0.0, 2.0)),
        ],
        vec![],
    );
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tol.svg");
    write_svg(&path, rs.primitives(), 64, 48, &SvgStyle::default()).expect("svg");
    let svg = fs::read_to_string(&path).expect("svg");
    let elements = drawables(&svg);
    assert!(elements[0].contains("class=\"circle\""));
    assert!(elements[1].contains("class=\"ellipse\""));
}

#[test]
fn polygon_file_is_opt_in() {
    let square = Polygon::new(vec![
        Point2::new(1.0, 1.0),
        Point2::new(9.0, 1.0),
        Point2::new(9.0, 1.0),
        Point2::new(9.0, 9.0),
    ])
    .expect("polygon");
    let rs = result_set(vec![], vec![(3, square)]);
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = ExportPaths::in_dir(dir.path(), "poly");

    let report = export_all(&rs, &paths, &ExportConfig::default()).expect("export");
    assert_eq!(report.polygon_lines, 0);
    assert!(!paths.polygons.exists());
    assert!(!paths.ellipses.exists());
    assert!(report.svg_written);

    let cfg = ExportConfig {
        write_polygons: true,
        write_label_image: true,
        ..ExportConfig::default()
    };
    let report = export_all(&rs, &paths, &cfg).expect("export");
    assert_eq!(report.polygon_lines, 1);
    assert!(report.label_image_written);
    let text = fs::read_to_string(&paths.polygons).expect("polygons");
    assert!(text.starts_with("3 4 1.000000 1.000000 9.000000 1.000000"));

    let svg = fs::read_to_string(&paths.svg).expect("svg");
    let elements = drawables(&svg);
    assert_eq!(elements.len(), 1);
    assert!(elements[0].starts_with("<polyline"));
}

#[test]
fn unopenable_path_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("out.txt");
    let err = write_ellipses(&path, two_ellipses().primitives()).unwrap_err();
    match err {
        ExportError::Io { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn existing_file_is_overwritten() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.txt");
    fs::write(&path, "stale\nstale\nstale\n").expect("seed");
    write_ellipses(&path, two_ellipses().primitives()).expect("write");
    let text = fs::read_to_string(Path::new(&path)).expect("read");
    assert_eq!(text.lines().count(), 2);
    assert!(!text.contains("stale"));
}

#[test]
fn arcs_longer_than_half_turn_use_large_arc_flag() {
    let rs = result_set(vec![(4, arc(30.0, 30.0, 10.0, 6.0, 0.0, 0.25 + 1.5 * PI))], vec![]);
    let mut out = Vec::new();
    elsdc_export::svg::write_svg_document(&mut out, rs.primitives(), 64, 48, &SvgStyle::default())
        .expect("render");
    let svg = String::from_utf8(out).expect("utf8");
    assert!(svg.contains(" 1,1 "));
}
