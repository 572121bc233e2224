use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use elsdc_core::LabelImage;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::{io_error, ExportError};

/// Encode the label image as a 16-bit grayscale PNG.
///
/// Pixel values are the raw labels, so a label above `u16::MAX` cannot be
/// represented and aborts the export before the file is created.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(labels), fields(width = labels.width(), height = labels.height()))
)]
pub fn write_label_png(path: &Path, labels: &LabelImage) -> Result<(), ExportError> {
    let (width, height) = (labels.width(), labels.height());
    let too_large = || ExportError::ImageTooLarge { width, height };
    let w = u32::try_from(width).map_err(|_| too_large())?;
    let h = u32::try_from(height).map_err(|_| too_large())?;

    let mut bytes = Vec::with_capacity(labels.as_slice().len() * 2);
    for &label in labels.as_slice() {
        let value = u16::try_from(label).map_err(|_| ExportError::LabelOutOfRange { label })?;
        bytes.extend_from_slice(&value.to_be_bytes());
    }

    let png_error = |source: png::EncodingError| ExportError::Png {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error(path))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), w, h);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Sixteen);
    let mut writer = encoder.write_header().map_err(png_error)?;
    writer.write_image_data(&bytes).map_err(png_error)?;
    writer.finish().map_err(png_error)?;
    log::info!("wrote {width}x{height} label image to {}", path.display());
    Ok(())
}
