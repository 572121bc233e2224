use serde::Serialize;

use elsdc_core::{ResultSet, BACKGROUND};

/// Counts describing one result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub width: usize,
    pub height: usize,
    pub ellipses: usize,
    pub circles: usize,
    pub full_arcs: usize,
    pub polygons: usize,
    pub polygon_points: usize,
    pub labelled_pixels: usize,
}

impl Summary {
    pub fn of(results: &ResultSet) -> Self {
        let prims = results.primitives();
        Self {
            width: results.width(),
            height: results.height(),
            ellipses: prims.ell_count(),
            circles: prims.ellipses().iter().filter(|e| e.is_circle()).count(),
            full_arcs: prims.ellipses().iter().filter(|e| e.is_full()).count(),
            polygons: prims.poly_count(),
            polygon_points: prims.polygons().iter().map(|p| p.len()).sum(),
            labelled_pixels: results
                .label_image()
                .as_slice()
                .iter()
                .filter(|&&c| c != BACKGROUND)
                .count(),
        }
    }
}
