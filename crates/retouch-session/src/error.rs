//! Session error taxonomy.

use retouch_io::CodecError;
use retouch_pipeline::PipelineError;

/// Errors returned by [`EditSession`](crate::EditSession) operations.
///
/// "Nothing to undo" and "nothing to redo" are not errors; those
/// operations return `None` instead.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The image could not be read: missing, corrupt or unsupported.
    #[error("failed to load image: {0}")]
    Load(#[source] CodecError),

    /// The operation needs a loaded image.
    #[error("no image loaded")]
    NoImage,

    /// A transform rejected its input or parameters.
    #[error(transparent)]
    InvalidInput(#[from] PipelineError),

    /// The image could not be written.
    #[error("failed to save image: {0}")]
    Io(#[source] CodecError),

    /// `save` was called without a remembered path.
    #[error("no output path; use save_as")]
    NoPath,
}
