/// Borrowed grayscale input image, row-major, `len = width * height`.
///
/// Samples are `f64` intensities; the detector never takes ownership.
#[derive(Clone, Copy, Debug)]
pub struct ImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [f64],
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },
    #[error("invalid image buffer length (expected {expected} samples, got {got})")]
    InvalidBuffer { expected: usize, got: usize },
}

impl<'a> ImageView<'a> {
    pub fn new(width: usize, height: usize, data: &'a [f64]) -> Result<Self, ImageError> {
        let Some(expected) = width.checked_mul(height).filter(|&n| n > 0) else {
            return Err(ImageError::InvalidDimensions { width, height });
        };
        if data.len() != expected {
            return Err(ImageError::InvalidBuffer {
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
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_buffer_length() {
        let px = [0.0; 6];
        assert!(ImageView::new(3, 2, &px).is_ok());
        assert_eq!(
            ImageView::new(4, 2, &px).unwrap_err(),
            ImageError::InvalidBuffer {
                expected: 8,
                got: 6
            }
        );
        assert!(ImageView::new(0, 2, &[]).is_err());
    }

    #[test]
    fn get_is_row_major() {
        let px = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let img = ImageView::new(3, 2, &px).expect("view");
        assert_eq!(img.get(2, 1), Some(5.0));
        assert_eq!(img.get(3, 0), None);
    }
}
