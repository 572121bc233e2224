use std::io;
use std::path::{Path, PathBuf};

/// Errors returned by the exporters.
///
/// Every variant is fatal for the export call that produced it.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("png encoding failed for {}: {source}", path.display())]
    Png {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },
    #[error("label {label} does not fit a 16-bit label image")]
    LabelOutOfRange { label: u32 },
    #[error("label image {width}x{height} is too large to encode")]
    ImageTooLarge { width: usize, height: usize },
}

pub(crate) fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}
