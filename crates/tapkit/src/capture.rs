//! Diagnostic capture.
//!
//! A [`Capture`] session redirects warnings and notices emitted on the
//! current thread into a text buffer, one line per message, so a test can
//! assert on what the code under test complained about:
//!
//! ```
//! use tapkit::Capture;
//!
//! let capture = Capture::begin();
//! tracing::warn!("disk full");
//! tracing::info!("retrying");
//! let errors = capture.end().unwrap();
//! assert_eq!(errors, "disk full\nretrying\n");
//! ```
//!
//! Sessions nest: ending (or dropping) one reinstates whatever handled
//! diagnostics before it began, including during a panic.
//!
//! Capture is per thread. Diagnostics from threads the code under test
//! spawns are not captured.

use crate::diagnostics::Channel;
use crate::result::{TapError, TapResult};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{trace, Dispatch, Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

/// Which diagnostics a session captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Capture `WARN` events
    pub warnings: bool,
    /// Capture `INFO` events
    pub notices: bool,
    /// Stop capturing once the buffer would exceed this many bytes
    pub max_bytes: Option<usize>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            warnings: true,
            notices: true,
            max_bytes: None,
        }
    }
}

impl CaptureConfig {
    /// Capture both channels without a size limit
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture warnings, let notices through
    #[must_use]
    pub const fn warnings_only(mut self) -> Self {
        self.warnings = true;
        self.notices = false;
        self
    }

    /// Capture notices, let warnings through
    #[must_use]
    pub const fn notices_only(mut self) -> Self {
        self.warnings = false;
        self.notices = true;
        self
    }

    /// Limit the buffer size
    #[must_use]
    pub const fn with_max_bytes(mut self, max: usize) -> Self {
        self.max_bytes = Some(max);
        self
    }

    /// Whether events at `level` are captured
    #[must_use]
    pub fn captures(&self, level: Level) -> bool {
        match Channel::from_level(level) {
            Some(Channel::Warning) => self.warnings,
            Some(Channel::Notice) => self.notices,
            None => false,
        }
    }
}

/// Accumulated text plus the first failure, if any
#[derive(Debug, Default)]
struct CaptureBuffer {
    text: String,
    max_bytes: Option<usize>,
    failure: Option<TapError>,
}

impl CaptureBuffer {
    fn new(max_bytes: Option<usize>) -> Self {
        Self {
            max_bytes,
            ..Self::default()
        }
    }

    /// Append `message` and a newline. After a failure nothing more is kept.
    fn append(&mut self, message: &str) {
        if self.failure.is_some() {
            return;
        }
        let needed = message.len() + 1;
        if let Some(limit) = self.max_bytes {
            if self.text.len() + needed > limit {
                self.failure = Some(TapError::CaptureLimitExceeded { limit });
                return;
            }
        }
        if self.text.try_reserve(needed).is_err() {
            self.failure = Some(TapError::CaptureAllocation { requested: needed });
            return;
        }
        self.text.push_str(message);
        self.text.push('\n');
    }
}

/// Renders an event as its message followed by any other fields
#[derive(Debug, Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn render(self) -> String {
        if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            self.message + &self.fields
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Layer appending captured events to the shared buffer
///
/// Events it does not capture go to `fallback`, the dispatcher that was
/// current when the session began.
struct CaptureLayer {
    buffer: Arc<Mutex<CaptureBuffer>>,
    config: CaptureConfig,
    fallback: Dispatch,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if self.config.captures(*metadata.level()) {
            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);
            self.buffer.lock().append(&visitor.render());
        } else if self.fallback.enabled(metadata) {
            self.fallback.event(event);
        }
    }
}

/// An active capture session
///
/// Diagnostics emitted on the creating thread land in this session's buffer
/// until it is ended or dropped. Events on channels the session does not
/// capture, and errors, still reach the previous handler.
///
/// Only the creating thread is captured. Warnings from threads spawned by
/// the code under test, including pool and async runtime workers, go to
/// their own thread's default handler and never reach this buffer.
#[derive(Debug)]
pub struct Capture {
    buffer: Arc<Mutex<CaptureBuffer>>,
    guard: DefaultGuard,
}

impl Capture {
    /// Start capturing warnings and notices
    #[must_use = "capture stops when the session is dropped"]
    pub fn begin() -> Self {
        Self::with_config(CaptureConfig::default())
    }

    /// Start capturing with an explicit configuration
    #[must_use = "capture stops when the session is dropped"]
    pub fn with_config(config: CaptureConfig) -> Self {
        trace!(?config, "beginning diagnostic capture");
        let buffer = Arc::new(Mutex::new(CaptureBuffer::new(config.max_bytes)));
        let layer = CaptureLayer {
            buffer: Arc::clone(&buffer),
            config,
            fallback: tracing::dispatcher::get_default(Dispatch::clone),
        };
        let guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(layer));
        Self { buffer, guard }
    }

    /// Text captured so far
    #[must_use]
    pub fn text(&self) -> String {
        self.buffer.lock().text.clone()
    }

    /// Stop capturing and return everything captured
    ///
    /// Fails if an append could not be stored, either for lack of memory or
    /// because the configured limit was reached. The text stored before the
    /// failure is dropped; use [`Capture::into_parts`] to keep it.
    pub fn end(self) -> TapResult<String> {
        match self.into_parts() {
            (_, Some(err)) => Err(err),
            (text, None) => Ok(text),
        }
    }

    /// Stop capturing and return the captured text with the first append
    /// failure, if any
    ///
    /// On failure the text holds every message stored before it.
    pub fn into_parts(self) -> (String, Option<TapError>) {
        let Self { buffer, guard } = self;
        drop(guard);

        let mut buffer = buffer.lock();
        let text = std::mem::take(&mut buffer.text);
        trace!(bytes = text.len(), "diagnostic capture ended");
        (text, buffer.failure.take())
    }
}

/// Run `body` inside a capture session
///
/// Returns the body's value together with the captured text.
pub fn capture<R>(body: impl FnOnce() -> R) -> TapResult<(R, String)> {
    let session = Capture::begin();
    let value = body();
    let text = session.end()?;
    Ok((value, text))
}
