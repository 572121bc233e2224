//! Label image storage and the shared label namespace.
//!
//! Every pixel supporting a detected primitive is marked with that
//! primitive's label; `0` is background. Ellipses and polygons draw their
//! labels from one [`LabelAllocator`], so the two kinds never collide.

use serde::{Deserialize, Serialize};

/// Background value in a label image.
pub const BACKGROUND: u32 = 0;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelImageError {
    #[error("invalid label image dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },
    #[error("invalid label buffer length (expected {expected}, got {got})")]
    InvalidBuffer { expected: usize, got: usize },
    #[error("pixel ({x}, {y}) is outside a {width}x{height} label image")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

fn checked_len(width: usize, height: usize) -> Result<usize, LabelImageError> {
    width
        .checked_mul(height)
        .filter(|&n| n > 0)
        .ok_or(LabelImageError::InvalidDimensions { width, height })
}

/// Owned label image, row-major, `len = width * height`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLabelImage")]
pub struct LabelImage {
    width: usize,
    height: usize,
    data: Vec<u32>,
}

#[derive(Deserialize)]
struct RawLabelImage {
    width: usize,
    height: usize,
    data: Vec<u32>,
}

impl TryFrom<RawLabelImage> for LabelImage {
    type Error = LabelImageError;

    fn try_from(raw: RawLabelImage) -> Result<Self, Self::Error> {
        LabelImage::from_raw(raw.width, raw.height, raw.data)
    }
}

impl LabelImage {
    /// All-background image of the given size.
    pub fn new(width: usize, height: usize) -> Result<Self, LabelImageError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![BACKGROUND; len],
        })
    }

    pub fn from_raw(width: usize, height: usize, data: Vec<u32>) -> Result<Self, LabelImageError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(LabelImageError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// Writable view over the owned buffer.
    pub fn as_grid_mut(&mut self) -> LabelGridMut<'_> {
        LabelGridMut {
            width: self.width,
            height: self.height,
            data: &mut self.data,
        }
    }

    pub fn into_raw(self) -> Vec<u32> {
        self.data
    }
}

/// Writable label grid over storage owned by someone else.
///
/// This is how an embedding host lends its own buffer to the detector:
/// labels are written in place and nothing is copied or freed here.
#[derive(Debug)]
pub struct LabelGridMut<'a> {
    width: usize,
    height: usize,
    data: &'a mut [u32],
}

impl<'a> LabelGridMut<'a> {
    pub fn new(width: usize, height: usize, data: &'a mut [u32]) -> Result<Self, LabelImageError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(LabelImageError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        self.data
    }

    pub fn set(&mut self, x: usize, y: usize, label: u32) -> Result<(), LabelImageError> {
        if x >= self.width || y >= self.height {
            return Err(LabelImageError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        self.data[y * self.width + x] = label;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.data.fill(BACKGROUND);
    }
}

/// Monotonic label source shared by ellipse and polygon construction.
#[derive(Debug, Clone)]
pub struct LabelAllocator {
    next: u32,
}

impl Default for LabelAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start allocating at `first`; `0` is reserved for background and is
    /// bumped to `1`.
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: first.max(1),
        }
    }

    /// Hand out the next unused label, or `None` once the namespace is
    /// exhausted.
    pub fn allocate(&mut self) -> Option<u32> {
        let label = self.next;
        self.next = label.checked_add(1)?;
        Some(label)
    }

    /// Labels handed out so far are all `< peek()`.
    #[inline]
    pub fn peek(&self) -> u32 {
        self.next
    }
}
