//! The stateful editing session.

use std::path::{Path, PathBuf};
use std::time::Instant;

use retouch_io::{Codec, FileCodec};
use retouch_pipeline::{HistoryStore, ImageBuffer, ImageInfo, Transform};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::metrics::SessionMetrics;

/// One image being edited, with its original, undo history and metrics.
///
/// States move `Empty -> Loaded -> Edited`, with undo/redo walking the
/// history and [`reset_to_original`](Self::reset_to_original) returning
/// to `Loaded`. Every operation runs to completion before returning.
///
/// History is seeded with the loaded image, and each successful
/// [`apply`](Self::apply) pushes the result. The entry just below the
/// cursor is therefore always the state that existed before the most
/// recent edit.
///
/// All image accessors return owned copies.
#[derive(Debug)]
pub struct EditSession<C = FileCodec> {
    codec: C,
    config: SessionConfig,
    current: Option<ImageBuffer>,
    original: Option<ImageBuffer>,
    path: Option<PathBuf>,
    history: HistoryStore,
    metrics: SessionMetrics,
}

impl EditSession {
    /// An empty session reading and writing local files.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let codec = FileCodec::new(config.default_format).with_jpeg_quality(config.jpeg_quality);
        Self::with_codec(codec, config)
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl<C: Codec> EditSession<C> {
    /// An empty session using `codec` for load and save.
    #[must_use]
    pub fn with_codec(codec: C, config: SessionConfig) -> Self {
        Self {
            codec,
            config,
            current: None,
            original: None,
            path: None,
            history: HistoryStore::new(config.history_capacity),
            metrics: SessionMetrics::default(),
        }
    }

    /// Load the image at `path`, replacing any current image and
    /// starting a fresh history.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Load`] if the file is missing, corrupt or
    /// not a supported format. The session is unchanged on failure.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<ImageInfo, SessionError> {
        let path = path.as_ref();
        let start = Instant::now();
        let image = self.codec.decode(path).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "load failed");
            SessionError::Load(e)
        })?;

        let info = self.install(image);
        self.path = Some(path.to_path_buf());
        tracing::info!(
            path = %path.display(),
            %info,
            elapsed = ?start.elapsed(),
            "loaded image",
        );
        Ok(info)
    }

    /// Start editing an image already in memory. Any remembered path is
    /// forgotten, so [`save`](Self::save) needs a prior
    /// [`save_as`](Self::save_as).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidInput`] if `image` has no pixels.
    /// The session is unchanged on failure.
    pub fn load_buffer(&mut self, image: ImageBuffer) -> Result<ImageInfo, SessionError> {
        image.validate()?;
        let info = self.install(image);
        self.path = None;
        tracing::info!(%info, "loaded image buffer");
        Ok(info)
    }

    fn install(&mut self, image: ImageBuffer) -> ImageInfo {
        let info = image.info();
        self.history.clear();
        self.history.save(&image);
        self.original = Some(image.clone());
        self.current = Some(image);
        self.metrics.images_loaded += 1;
        info
    }

    /// Apply `transform` to the current image and record the result.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoImage`] if nothing is loaded and
    /// [`SessionError::InvalidInput`] if the transform rejects the image
    /// or its parameters. On error the current image and history are
    /// untouched.
    pub fn apply(&mut self, transform: &Transform) -> Result<ImageInfo, SessionError> {
        let current = self.current.as_ref().ok_or(SessionError::NoImage)?;
        let start = Instant::now();
        let result = transform.apply(current).map_err(|e| {
            tracing::warn!(%transform, error = %e, "transform failed");
            e
        })?;

        let info = result.info();
        self.history.save(&result);
        self.current = Some(result);
        self.metrics.transforms_applied += 1;
        tracing::debug!(
            transform = transform.name(),
            %info,
            elapsed = ?start.elapsed(),
            "applied transform",
        );
        Ok(info)
    }

    /// Step back to the previous snapshot.
    ///
    /// Returns `None` and leaves the session unchanged when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Option<ImageInfo> {
        let image = self.history.undo()?;
        let info = image.info();
        self.current = Some(image);
        self.metrics.undos += 1;
        tracing::debug!(%info, cursor = ?self.history.cursor(), "undo");
        Some(info)
    }

    /// Step forward to the next snapshot.
    ///
    /// Returns `None` and leaves the session unchanged when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> Option<ImageInfo> {
        let image = self.history.redo()?;
        let info = image.info();
        self.current = Some(image);
        self.metrics.redos += 1;
        tracing::debug!(%info, cursor = ?self.history.cursor(), "redo");
        Some(info)
    }

    /// Discard every edit and return to the loaded image. History is
    /// cleared and reseeded with the original.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoImage`] if nothing is loaded.
    pub fn reset_to_original(&mut self) -> Result<ImageInfo, SessionError> {
        let original = self.original.clone().ok_or(SessionError::NoImage)?;
        let info = original.info();
        self.history.clear();
        self.history.save(&original);
        self.current = Some(original);
        self.metrics.resets += 1;
        tracing::debug!(%info, "reset to original");
        Ok(info)
    }

    /// Write the current image back to the remembered path.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoImage`] if nothing is loaded,
    /// [`SessionError::NoPath`] if no path is remembered, and
    /// [`SessionError::Io`] if writing fails.
    pub fn save(&mut self) -> Result<PathBuf, SessionError> {
        if self.current.is_none() {
            return Err(SessionError::NoImage);
        }
        let path = self.path.clone().ok_or(SessionError::NoPath)?;
        self.save_as(path)
    }

    /// Write the current image to `path` and remember the path written.
    ///
    /// A path without an extension gets the configured default format's
    /// extension appended; the returned path reflects that.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoImage`] if nothing is loaded and
    /// [`SessionError::Io`] if the format is unsupported or writing
    /// fails.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<PathBuf, SessionError> {
        let path = path.as_ref();
        let current = self.current.as_ref().ok_or(SessionError::NoImage)?;
        let start = Instant::now();
        let written = self.codec.encode(current, path).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "save failed");
            SessionError::Io(e)
        })?;

        tracing::info!(
            path = %written.display(),
            info = %current.info(),
            elapsed = ?start.elapsed(),
            "saved image",
        );
        self.path = Some(written.clone());
        Ok(written)
    }

    /// A copy of the image being edited.
    #[must_use]
    pub fn current(&self) -> Option<ImageBuffer> {
        self.current.clone()
    }

    /// A copy of the image as loaded.
    #[must_use]
    pub fn original(&self) -> Option<ImageBuffer> {
        self.original.clone()
    }

    /// Dimensions and channels of the current image.
    #[must_use]
    pub fn info(&self) -> Option<ImageInfo> {
        self.current.as_ref().map(ImageBuffer::info)
    }

    /// The remembered file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether an image is loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// The undo/redo history, read-only.
    #[must_use]
    pub const fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Whether [`undo`](Self::undo) would move.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether [`redo`](Self::redo) would move.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Operation counters so far.
    #[must_use]
    pub const fn metrics(&self) -> SessionMetrics {
        self.metrics
    }

    /// Configuration the session was created with.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The codec used for load and save.
    #[must_use]
    pub const fn codec(&self) -> &C {
        &self.codec
    }
}
