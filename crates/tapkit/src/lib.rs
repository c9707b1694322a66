//! Tapkit: result reporting and diagnostic capture for test programs
//!
//! A test program built on Tapkit prints a line-oriented stream that an
//! external harness reads: a plan count, then one `ok`/`not ok` line per
//! check, with wanted/seen detail for failed comparisons and `# skip`
//! markers for skipped checks.
//!
//! # Architecture
//!
//! ```text
//!  test code ──► Reporter ──► Directive ──► stdout (line-buffered)
//!      │
//!      └──► Capture ◄── tracing::warn! / tracing::info! (code under test)
//!              │
//!              └──► captured text, checked with report_string
//! ```
//!
//! # Example
//!
//! ```
//! use tapkit::{Capture, Reporter};
//!
//! let mut reporter = Reporter::new(Vec::new());
//! reporter.initialize(2);
//!
//! let capture = Capture::begin();
//! tracing::warn!("disk full");
//! let errors = capture.end().unwrap();
//!
//! reporter.report_string(1, Some("disk full\n"), Some(errors.as_str()));
//! reporter.report_double(2, 0.5, 1.0 / 2.0);
//!
//! let output = String::from_utf8(reporter.into_inner().unwrap()).unwrap();
//! assert_eq!(output, "2\nok 1\nok 2\n");
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod capture;
pub mod diagnostics;
mod directive;
pub mod format;
mod reporter;
mod result;

pub use capture::{capture, Capture, CaptureConfig};
pub use diagnostics::Channel;
pub use directive::{Directive, Mismatch};
pub use reporter::{Reporter, NULL_TEXT};
pub use result::{TapError, TapResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::capture::*;
    pub use super::diagnostics::Channel;
    pub use super::directive::*;
    pub use super::reporter::*;
    pub use super::result::*;
}
