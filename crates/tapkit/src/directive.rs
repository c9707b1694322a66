//! Protocol directives.
//!
//! Each value renders, via `Display`, to the exact text of one protocol
//! entry without its final newline:
//!
//! ```text
//! 12                      plan
//! ok 3                    pass
//! not ok 4                fail
//! not ok 5                fail with values
//!   wanted: 10
//!     seen: 11
//! ok 6 # skip - no network
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wanted/seen detail attached to a failed comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Expected value, already rendered
    pub wanted: String,
    /// Observed value, already rendered
    pub seen: String,
}

impl Mismatch {
    /// Create a mismatch from two displayable values
    #[must_use]
    pub fn new(wanted: impl fmt::Display, seen: impl fmt::Display) -> Self {
        Self {
            wanted: wanted.to_string(),
            seen: seen.to_string(),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  wanted: {}\n    seen: {}", self.wanted, self.seen)
    }
}

/// One entry of the output protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directive {
    /// Number of checks the program will report
    Plan(i64),
    /// Check passed
    Pass(i64),
    /// Check failed, optionally with the compared values
    Fail {
        /// Test number
        number: i64,
        /// Values that differed
        mismatch: Option<Mismatch>,
    },
    /// Check skipped, optionally with a reason
    Skip {
        /// Test number
        number: i64,
        /// Why the check was skipped
        reason: Option<String>,
    },
}

impl Directive {
    /// Pass or plain fail depending on `success`
    #[must_use]
    pub const fn outcome(number: i64, success: bool) -> Self {
        if success {
            Self::Pass(number)
        } else {
            Self::Fail {
                number,
                mismatch: None,
            }
        }
    }

    /// Pass when `wanted == seen`, otherwise a fail carrying both values
    #[must_use]
    pub fn compare<T>(number: i64, wanted: T, seen: T) -> Self
    where
        T: PartialEq + fmt::Display,
    {
        if wanted == seen {
            Self::Pass(number)
        } else {
            Self::Fail {
                number,
                mismatch: Some(Mismatch::new(wanted, seen)),
            }
        }
    }

    /// Skip with an optional reason
    #[must_use]
    pub fn skip(number: i64, reason: Option<&str>) -> Self {
        Self::Skip {
            number,
            reason: reason.map(str::to_string),
        }
    }

    /// Test number, or `None` for a plan
    #[must_use]
    pub const fn number(&self) -> Option<i64> {
        match self {
            Self::Plan(_) => None,
            Self::Pass(number) | Self::Fail { number, .. } | Self::Skip { number, .. } => {
                Some(*number)
            }
        }
    }

    /// Whether the line reads as `ok` to a harness
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Pass(_) | Self::Skip { .. })
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plan(count) => write!(f, "{count}"),
            Self::Pass(number) => write!(f, "ok {number}"),
            Self::Fail { number, mismatch } => {
                write!(f, "not ok {number}")?;
                if let Some(mismatch) = mismatch {
                    write!(f, "\n{mismatch}")?;
                }
                Ok(())
            }
            Self::Skip { number, reason } => {
                write!(f, "ok {number} # skip")?;
                if let Some(reason) = reason {
                    write!(f, " - {reason}")?;
                }
                Ok(())
            }
        }
    }
}
