use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PolygonError {
    #[error("polygon has no points")]
    Empty,
    #[error("polygon point count must be even (got {0})")]
    OddPointCount(usize),
}

/// A chain of detected line segments.
///
/// Points are stored in order; a polygon with `n` points describes `n / 2`
/// segments and `n` is always even.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Polygon {
    points: Vec<Point2<f64>>,
}

impl Polygon {
    pub fn new(points: Vec<Point2<f64>>) -> Result<Self, PolygonError> {
        if points.is_empty() {
            return Err(PolygonError::Empty);
        }
        if points.len() % 2 != 0 {
            return Err(PolygonError::OddPointCount(points.len()));
        }
        Ok(Self { points })
    }

    #[inline]
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// Number of points (`n` in the ASCII format).
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Segments as `(start, end)` pairs of consecutive points.
    pub fn segments(&self) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
        self.points.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn into_points(self) -> Vec<Point2<f64>> {
        self.points
    }
}

impl<'de> Deserialize<'de> for Polygon {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            points: Vec<Point2<f64>>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Polygon::new(raw.points).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_odd_and_empty_point_lists() {
        assert_eq!(Polygon::new(Vec::new()), Err(PolygonError::Empty));
        let odd = vec![Point2::new(0.0, 0.0); 3];
        assert_eq!(Polygon::new(odd), Err(PolygonError::OddPointCount(3)));
    }

    #[test]
    fn segments_pair_consecutive_points() {
        let poly = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 2.0),
        ])
        .expect("even polygon");
        let segs: Vec<_> = poly.segments().collect();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1].1, Point2::new(1.0, 2.0));
    }

    #[test]
    fn deserialize_enforces_even_count() {
        let bad = r#"{"points":[[0.0,0.0],[1.0,1.0],[2.0,2.0]]}"#;
        assert!(serde_json::from_str::<Polygon>(bad).is_err());
        let ok = r#"{"points":[[0.0,0.0],[1.0,1.0]]}"#;
        let poly: Polygon = serde_json::from_str(ok).expect("valid polygon");
        assert_eq!(poly.len(), 2);
    }
}
