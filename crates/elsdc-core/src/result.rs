//! Detection output as a single owned value.
//!
//! A [`ResultSet`] is produced once per detection call and then moved to
//! exactly one owner. Releasing it is dropping it; once moved, the old
//! binding can no longer be used, so double release and use-after-release
//! are compile errors rather than runtime checks.

use std::collections::HashMap;
use std::fmt;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::ellipse::EllipseArc;
use crate::label::{LabelAllocator, LabelImage, LabelImageError, BACKGROUND};
use crate::polygon::{Polygon, PolygonError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Ellipse,
    Polygon,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveKind::Ellipse => f.write_str("ellipse"),
            PrimitiveKind::Polygon => f.write_str("polygon"),
        }
    }
}

/// Errors raised when detection output violates its invariants.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResultSetError {
    #[error("{kind} label count {labels} does not match record count {records}")]
    LabelCountMismatch {
        kind: PrimitiveKind,
        records: usize,
        labels: usize,
    },
    #[error("label 0 is reserved for background ({kind} #{index})")]
    ReservedLabel { kind: PrimitiveKind, index: usize },
    #[error("label {0} is used by more than one primitive")]
    DuplicateLabel(u32),
    #[error("label image cell ({x}, {y}) holds label {label} with no matching primitive")]
    OrphanLabel { x: usize, y: usize, label: u32 },
    #[error("label namespace exhausted")]
    LabelsExhausted,
    #[error(transparent)]
    Polygon(#[from] PolygonError),
    #[error(transparent)]
    LabelImage(#[from] LabelImageError),
}

/// Ellipse and polygon records with their parallel label arrays.
///
/// `ellipse_labels[i]` is the label of the pixels supporting `ellipses[i]`;
/// the same holds for polygons.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPrimitives")]
pub struct Primitives {
    ellipses: Vec<EllipseArc>,
    ellipse_labels: Vec<u32>,
    polygons: Vec<Polygon>,
    polygon_labels: Vec<u32>,
}

#[derive(Deserialize)]
struct RawPrimitives {
    #[serde(default)]
    ellipses: Vec<EllipseArc>,
    #[serde(default)]
    ellipse_labels: Vec<u32>,
    #[serde(default)]
    polygons: Vec<Polygon>,
    #[serde(default)]
    polygon_labels: Vec<u32>,
}

impl TryFrom<RawPrimitives> for Primitives {
    type Error = ResultSetError;

    fn try_from(raw: RawPrimitives) -> Result<Self, Self::Error> {
        Primitives::new(
            raw.ellipses,
            raw.ellipse_labels,
            raw.polygons,
            raw.polygon_labels,
        )
    }
}

impl Primitives {
    /// Validate and assemble detection records.
    pub fn new(
        ellipses: Vec<EllipseArc>,
        ellipse_labels: Vec<u32>,
        polygons: Vec<Polygon>,
        polygon_labels: Vec<u32>,
    ) -> Result<Self, ResultSetError> {
        if ellipses.len() != ellipse_labels.len() {
            return Err(ResultSetError::LabelCountMismatch {
                kind: PrimitiveKind::Ellipse,
                records: ellipses.len(),
                labels: ellipse_labels.len(),
            });
        }
        if polygons.len() != polygon_labels.len() {
            return Err(ResultSetError::LabelCountMismatch {
                kind: PrimitiveKind::Polygon,
                records: polygons.len(),
                labels: polygon_labels.len(),
            });
        }
        let out = Self {
            ellipses,
            ellipse_labels,
            polygons,
            polygon_labels,
        };
        out.label_index()?;
        Ok(out)
    }

    #[inline]
    pub fn ell_count(&self) -> usize {
        self.ellipses.len()
    }

    #[inline]
    pub fn poly_count(&self) -> usize {
        self.polygons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ellipses.is_empty() && self.polygons.is_empty()
    }

    #[inline]
    pub fn ellipses(&self) -> &[EllipseArc] {
        &self.ellipses
    }

    #[inline]
    pub fn ellipse_labels(&self) -> &[u32] {
        &self.ellipse_labels
    }

    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    #[inline]
    pub fn polygon_labels(&self) -> &[u32] {
        &self.polygon_labels
    }

    /// `(label, ellipse)` pairs in detection order.
    pub fn labeled_ellipses(&self) -> impl Iterator<Item = (u32, &EllipseArc)> + '_ {
        self.ellipse_labels.iter().copied().zip(self.ellipses.iter())
    }

    /// `(label, polygon)` pairs in detection order.
    pub fn labeled_polygons(&self) -> impl Iterator<Item = (u32, &Polygon)> + '_ {
        self.polygon_labels.iter().copied().zip(self.polygons.iter())
    }

    /// Which primitive kind owns `label`, if any.
    pub fn kind_of(&self, label: u32) -> Option<PrimitiveKind> {
        if self.ellipse_labels.contains(&label) {
            Some(PrimitiveKind::Ellipse)
        } else if self.polygon_labels.contains(&label) {
            Some(PrimitiveKind::Polygon)
        } else {
            None
        }
    }

    fn label_index(&self) -> Result<HashMap<u32, PrimitiveKind>, ResultSetError> {
        let mut index = HashMap::with_capacity(self.ellipses.len() + self.polygons.len());
        let tagged = self
            .ellipse_labels
            .iter()
            .enumerate()
            .map(|(i, &l)| (PrimitiveKind::Ellipse, i, l))
            .chain(
                self.polygon_labels
                    .iter()
                    .enumerate()
                    .map(|(i, &l)| (PrimitiveKind::Polygon, i, l)),
            );
        for (kind, i, label) in tagged {
            if label == BACKGROUND {
                return Err(ResultSetError::ReservedLabel { kind, index: i });
            }
            if index.insert(label, kind).is_some() {
                return Err(ResultSetError::DuplicateLabel(label));
            }
        }
        Ok(index)
    }

    /// Check that every non-background cell of a row-major label buffer
    /// names exactly one of these primitives.
    pub fn check_label_cells(&self, cells: &[u32], width: usize) -> Result<(), ResultSetError> {
        let index = self.label_index()?;
        for (i, &label) in cells.iter().enumerate() {
            if label != BACKGROUND && !index.contains_key(&label) {
                let (x, y) = if width == 0 {
                    (i, 0)
                } else {
                    (i % width, i / width)
                };
                return Err(ResultSetError::OrphanLabel { x, y, label });
            }
        }
        Ok(())
    }

    pub fn into_parts(self) -> (Vec<EllipseArc>, Vec<u32>, Vec<Polygon>, Vec<u32>) {
        (
            self.ellipses,
            self.ellipse_labels,
            self.polygons,
            self.polygon_labels,
        )
    }
}

/// Collects primitives while handing out collision-free labels.
#[derive(Debug, Default)]
pub struct PrimitivesBuilder {
    labels: LabelAllocator,
    ellipses: Vec<EllipseArc>,
    ellipse_labels: Vec<u32>,
    polygons: Vec<Polygon>,
    polygon_labels: Vec<u32>,
}

impl PrimitivesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allocator(labels: LabelAllocator) -> Self {
        Self {
            labels,
            ..Self::default()
        }
    }

    /// Record an arc and return its label.
    pub fn push_ellipse(&mut self, arc: EllipseArc) -> Result<u32, ResultSetError> {
        let label = self
            .labels
            .allocate()
            .ok_or(ResultSetError::LabelsExhausted)?;
        self.ellipses.push(arc);
        self.ellipse_labels.push(label);
        Ok(label)
    }

    /// Record a polygon and return its label.
    pub fn push_polygon(&mut self, points: Vec<Point2<f64>>) -> Result<u32, ResultSetError> {
        let polygon = Polygon::new(points)?;
        let label = self
            .labels
            .allocate()
            .ok_or(ResultSetError::LabelsExhausted)?;
        self.polygons.push(polygon);
        self.polygon_labels.push(label);
        Ok(label)
    }

    pub fn ell_count(&self) -> usize {
        self.ellipses.len()
    }

    pub fn poly_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn finish(self) -> Primitives {
        Primitives {
            ellipses: self.ellipses,
            ellipse_labels: self.ellipse_labels,
            polygons: self.polygons,
            polygon_labels: self.polygon_labels,
        }
    }
}

/// Full output of one detection call: primitives plus the label image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResultSet")]
pub struct ResultSet {
    primitives: Primitives,
    label_image: LabelImage,
}

#[derive(Deserialize)]
struct RawResultSet {
    primitives: Primitives,
    label_image: LabelImage,
}

impl TryFrom<RawResultSet> for ResultSet {
    type Error = ResultSetError;

    fn try_from(raw: RawResultSet) -> Result<Self, Self::Error> {
        ResultSet::new(raw.primitives, raw.label_image)
    }
}

impl ResultSet {
    pub fn new(primitives: Primitives, label_image: LabelImage) -> Result<Self, ResultSetError> {
        primitives.check_label_cells(label_image.as_slice(), label_image.width())?;
        Ok(Self {
            primitives,
            label_image,
        })
    }

    /// An empty result over an all-background label image.
    pub fn empty(width: usize, height: usize) -> Result<Self, ResultSetError> {
        Ok(Self {
            primitives: Primitives::default(),
            label_image: LabelImage::new(width, height)?,
        })
    }

    #[inline]
    pub fn primitives(&self) -> &Primitives {
        &self.primitives
    }

    #[inline]
    pub fn label_image(&self) -> &LabelImage {
        &self.label_image
    }

    #[inline]
    pub fn ell_count(&self) -> usize {
        self.primitives.ell_count()
    }

    #[inline]
    pub fn poly_count(&self) -> usize {
        self.primitives.poly_count()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.label_image.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.label_image.height()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn into_parts(self) -> (Primitives, LabelImage) {
        (self.primitives, self.label_image)
    }

    /// Give up ownership and free every buffer.
    ///
    /// Equivalent to dropping the value; spelled out for call sites that
    /// want the hand-back to be visible.
    pub fn release(self) {
        log::debug!(
            "releasing result set: {} ellipses, {} polygons",
            self.ell_count(),
            self.poly_count()
        );
        drop(self);
    }
}
