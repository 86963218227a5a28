use std::path::PathBuf;

use thiserror::Error;

/// Failures of the software renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The handle was never compiled, or has already been released.
    #[error("unknown geometry handle {0}")]
    UnknownGeometry(u64),
    /// Writing the frame to disk failed.
    #[error("failed to save frame to '{}': {source}", path.display())]
    Save {
        /// Destination that could not be written.
        path: PathBuf,
        /// Underlying encoder or I/O error.
        source: image::ImageError,
    },
}
