//! retouch-session: Stateful editing over the retouch core.
//!
//! An [`EditSession`] owns the current image, the image as originally
//! loaded, a bounded [`HistoryStore`](retouch_pipeline::HistoryStore) and a
//! [`Codec`](retouch_io::Codec) for reading and writing files. It applies
//! [`Transform`](retouch_pipeline::Transform)s transactionally: a failed
//! transform leaves both the image and the history untouched.
//!
//! ```rust,no_run
//! use retouch_pipeline::Transform;
//! use retouch_session::{EditSession, SessionConfig};
//!
//! let mut session = EditSession::new(SessionConfig::default());
//! session.load("photo.jpg")?;
//! session.apply(&Transform::Blur { radius: 5 })?;
//! session.apply(&Transform::Brightness { delta: 20 })?;
//! session.undo();
//! session.save_as("photo-blurred.png")?;
//! # Ok::<(), retouch_session::SessionError>(())
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod session;

pub use config::SessionConfig;
pub use error::SessionError;
pub use metrics::SessionMetrics;
pub use session::EditSession;
