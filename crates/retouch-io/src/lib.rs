//! retouch-io: File I/O for the retouch editor.
//!
//! Decodes image files into [`ImageBuffer`](retouch_pipeline::ImageBuffer)s
//! and encodes them back. The editing core in `retouch-pipeline` never
//! touches the filesystem; everything that does lives here, behind the
//! [`Codec`] trait so sessions can be driven by other sources.

pub mod codec;
pub mod format;

pub use codec::{Codec, CodecError, FileCodec};
pub use format::ImageFormat;
