//! Diagnostic channels and their default handlers.
//!
//! Code under test reports problems through `tracing`: a *warning* is an
//! event at `WARN`, a *notice* an event at `INFO`. By default warnings go
//! to stderr and notices to stdout, each printed as the bare message.
//! [`crate::Capture`] redirects both channels into a buffer instead.

use crate::result::{TapError, TapResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::writer::{MakeWriter, MakeWriterExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{prelude::*, EnvFilter, Layer};

/// Filter used when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "info";

/// A capturable diagnostic channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// `tracing::warn!`
    Warning,
    /// `tracing::info!`
    Notice,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Notice => write!(f, "notice"),
        }
    }
}

impl Channel {
    /// The `tracing` level events on this channel use
    #[must_use]
    pub const fn level(self) -> Level {
        match self {
            Self::Warning => Level::WARN,
            Self::Notice => Level::INFO,
        }
    }

    /// The channel an event level belongs to, if any
    ///
    /// `ERROR`, `DEBUG` and `TRACE` are never captured.
    #[must_use]
    pub fn from_level(level: Level) -> Option<Self> {
        if level == Level::WARN {
            Some(Self::Warning)
        } else if level == Level::INFO {
            Some(Self::Notice)
        } else {
            None
        }
    }
}

/// Install the default handlers process-wide
///
/// Warnings and errors are written to stderr, everything else to stdout.
/// `RUST_LOG` overrides the default `info` filter. Fails if a global
/// subscriber is already set.
pub fn init() -> TapResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(default_layer(io::stderr, io::stdout))
        .try_init()
        .map_err(|e| TapError::LoggingInit(e.to_string()))
}

/// Bare-message output: `WARN` and `ERROR` to `err`, everything else to `out`
pub(crate) fn default_layer<S, E, O>(err: E, out: O) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    E: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    O: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(err.with_max_level(Level::WARN).or_else(out))
        .without_time()
        .with_target(false)
        .with_level(false)
        .with_ansi(false)
}
