//! Reporter - protocol output for test programs.
//!
//! A test program declares its plan once, then reports every check in
//! increasing test-number order:
//!
//! ```
//! use tapkit::Reporter;
//!
//! let mut reporter = Reporter::new(Vec::new());
//! reporter.initialize(3);
//! reporter.report(1, true);
//! reporter.report_int(2, 4, 2 + 2);
//! reporter.skip(3, Some("needs network"));
//!
//! let output = String::from_utf8(reporter.into_inner().unwrap()).unwrap();
//! assert_eq!(output, "3\nok 1\nok 2\nok 3 # skip - needs network\n");
//! ```
//!
//! Numbering is the caller's job; nothing here checks that numbers are
//! sequential or that the plan matches the number of checks reported.

use crate::directive::{Directive, Mismatch};
use crate::format;
use std::io::{self, IntoInnerError, LineWriter, Stdout, Write};
use tracing::warn;

/// Text standing in for a missing string in `report_string`
pub const NULL_TEXT: &str = "(null)";

/// Writes protocol lines to a line-buffered sink
///
/// Reporting never fails from the caller's point of view: a mismatch is a
/// `not ok` line, and an I/O failure is logged as a warning.
#[derive(Debug)]
pub struct Reporter<W: Write = Stdout> {
    out: LineWriter<W>,
    failures: usize,
}

impl Reporter<Stdout> {
    /// Reporter writing to the process's standard output
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl Default for Reporter<Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write> Reporter<W> {
    /// Reporter writing to `writer`, flushed after every line
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            out: LineWriter::new(writer),
            failures: 0,
        }
    }

    /// Flush pending output and hand back the sink
    pub fn into_inner(self) -> io::Result<W> {
        self.out.into_inner().map_err(IntoInnerError::into_error)
    }

    /// Write the plan line
    ///
    /// Call once, before any result.
    pub fn initialize(&mut self, count: i64) {
        if let Err(err) = self.write(&Directive::Plan(count)) {
            warn!("cannot write test plan: {err}");
        }
    }

    /// Number of `not ok` lines emitted so far
    ///
    /// Lines that could not be written still count.
    pub const fn failures(&self) -> usize {
        self.failures
    }

    /// Write any directive as its own line(s)
    pub fn emit(&mut self, directive: &Directive) {
        if directive.number().is_some() && !directive.is_ok() {
            self.failures += 1;
        }
        if let Err(err) = self.write(directive) {
            warn!("cannot write test output: {err}");
        }
    }

    /// `ok` if `success`, else `not ok`
    pub fn report(&mut self, number: i64, success: bool) {
        self.emit(&Directive::outcome(number, success));
    }

    /// Compare two integers
    pub fn report_int(&mut self, number: i64, wanted: i64, seen: i64) {
        self.emit(&Directive::compare(number, wanted, seen));
    }

    /// Compare two strings byte for byte; `None` reads as `(null)`
    pub fn report_string(&mut self, number: i64, wanted: Option<&str>, seen: Option<&str>) {
        let wanted = wanted.unwrap_or(NULL_TEXT);
        let seen = seen.unwrap_or(NULL_TEXT);
        self.emit(&Directive::compare(number, wanted, seen));
    }

    /// Compare two doubles for exact IEEE equality
    ///
    /// `NaN` never matches and `0.0` matches `-0.0`. Mismatched values are
    /// shown with [`format::general`].
    pub fn report_double(&mut self, number: i64, wanted: f64, seen: f64) {
        let directive = if wanted == seen {
            Directive::Pass(number)
        } else {
            Directive::Fail {
                number,
                mismatch: Some(Mismatch::new(
                    format::general(wanted),
                    format::general(seen),
                )),
            }
        };
        self.emit(&directive);
    }

    /// Skip a check
    ///
    /// A supplied reason is appended after ` - `, even when empty.
    pub fn skip(&mut self, number: i64, reason: Option<&str>) {
        self.emit(&Directive::skip(number, reason));
    }

    /// Report the same status for `count` checks starting at `number`
    pub fn report_block(&mut self, number: i64, count: i64, success: bool) {
        for offset in 0..count {
            self.report(number.wrapping_add(offset), success);
        }
    }

    /// Skip `count` checks starting at `number`
    pub fn skip_block(&mut self, number: i64, count: i64, reason: Option<&str>) {
        for offset in 0..count {
            self.skip(number.wrapping_add(offset), reason);
        }
    }

    fn write(&mut self, directive: &Directive) -> io::Result<()> {
        writeln!(self.out, "{directive}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn render(run: impl FnOnce(&mut Reporter<Vec<u8>>)) -> String {
        let mut reporter = Reporter::new(Vec::new());
        run(&mut reporter);
        String::from_utf8(reporter.into_inner().unwrap()).unwrap()
    }

    mod plan_tests {
        use super::*;

        #[test]
        fn test_initialize_writes_count() {
            assert_eq!(render(|r| r.initialize(42)), "42\n");
        }

        #[test]
        fn test_initialize_zero() {
            assert_eq!(render(|r| r.initialize(0)), "0\n");
        }
    }

    mod report_tests {
        use super::*;

        #[test]
        fn test_report_success() {
            assert_eq!(render(|r| r.report(1, true)), "ok 1\n");
        }

        #[test]
        fn test_report_failure() {
            assert_eq!(render(|r| r.report(2, false)), "not ok 2\n");
        }

        #[test]
        fn test_report_accepts_any_number() {
            assert_eq!(render(|r| r.report(-5, true)), "ok -5\n");
            assert_eq!(render(|r| r.report(0, false)), "not ok 0\n");
        }

        #[test]
        fn test_call_order_is_line_order() {
            let output = render(|r| {
                r.initialize(3);
                r.report(1, true);
                r.report(2, false);
                r.report(3, true);
            });
            assert_eq!(output, "3\nok 1\nnot ok 2\nok 3\n");
        }
    }

    mod report_int_tests {
        use super::*;

        #[test]
        fn test_equal() {
            assert_eq!(render(|r| r.report_int(1, 7, 7)), "ok 1\n");
        }

        #[test]
        fn test_mismatch_block() {
            assert_eq!(
                render(|r| r.report_int(4, 10, -3)),
                "not ok 4\n  wanted: 10\n    seen: -3\n"
            );
        }
    }

    mod report_string_tests {
        use super::*;

        #[test]
        fn test_equal() {
            assert_eq!(render(|r| r.report_string(1, Some("abc"), Some("abc"))), "ok 1\n");
        }

        #[test]
        fn test_both_null_are_equal() {
            assert_eq!(render(|r| r.report_string(1, None, None)), "ok 1\n");
        }

        #[test]
        fn test_null_matches_literal_null_text() {
            assert_eq!(render(|r| r.report_string(2, None, Some("(null)"))), "ok 2\n");
        }

        #[test]
        fn test_null_against_text() {
            assert_eq!(
                render(|r| r.report_string(3, None, Some("value"))),
                "not ok 3\n  wanted: (null)\n    seen: value\n"
            );
        }

        #[test]
        fn test_mismatch_is_case_sensitive() {
            assert_eq!(
                render(|r| r.report_string(5, Some("Hello"), Some("hello"))),
                "not ok 5\n  wanted: Hello\n    seen: hello\n"
            );
        }

        #[test]
        fn test_empty_strings_are_equal() {
            assert_eq!(render(|r| r.report_string(6, Some(""), Some(""))), "ok 6\n");
        }
    }

    mod report_double_tests {
        use super::*;

        #[test]
        fn test_equal() {
            assert_eq!(render(|r| r.report_double(2, 1.5, 1.5)), "ok 2\n");
        }

        #[test]
        fn test_nearly_equal_is_mismatch() {
            assert_eq!(
                render(|r| r.report_double(3, 1.5, 1.500_000_1)),
                "not ok 3\n  wanted: 1.5\n    seen: 1.5000001\n"
            );
        }

        #[test]
        fn test_nan_never_matches() {
            assert_eq!(
                render(|r| r.report_double(4, f64::NAN, f64::NAN)),
                "not ok 4\n  wanted: nan\n    seen: nan\n"
            );
        }

        #[test]
        fn test_signed_zeros_match() {
            assert_eq!(render(|r| r.report_double(5, 0.0, -0.0)), "ok 5\n");
        }

        #[test]
        fn test_scientific_rendering() {
            assert_eq!(
                render(|r| r.report_double(6, 1e20, 2.5e-9)),
                "not ok 6\n  wanted: 1e+20\n    seen: 2.5e-09\n"
            );
        }
    }

    mod skip_tests {
        use super::*;

        #[test]
        fn test_skip_without_reason() {
            assert_eq!(render(|r| r.skip(1, None)), "ok 1 # skip\n");
        }

        #[test]
        fn test_skip_with_reason() {
            assert_eq!(
                render(|r| r.skip(2, Some("no network"))),
                "ok 2 # skip - no network\n"
            );
        }

        #[test]
        fn test_skip_with_empty_reason_keeps_separator() {
            assert_eq!(render(|r| r.skip(1, Some(""))), "ok 1 # skip - \n");
        }
    }

    mod block_tests {
        use super::*;

        #[test]
        fn test_report_block() {
            assert_eq!(
                render(|r| r.report_block(3, 5, true)),
                "ok 3\nok 4\nok 5\nok 6\nok 7\n"
            );
        }

        #[test]
        fn test_report_block_failure() {
            assert_eq!(render(|r| r.report_block(1, 2, false)), "not ok 1\nnot ok 2\n");
        }

        #[test]
        fn test_skip_block() {
            assert_eq!(
                render(|r| r.skip_block(10, 3, Some("reason"))),
                "ok 10 # skip - reason\nok 11 # skip - reason\nok 12 # skip - reason\n"
            );
        }

        #[test]
        fn test_skip_block_without_reason() {
            assert_eq!(render(|r| r.skip_block(1, 2, None)), "ok 1 # skip\nok 2 # skip\n");
        }

        #[test]
        fn test_empty_and_negative_counts_emit_nothing() {
            assert_eq!(render(|r| r.report_block(1, 0, true)), "");
            assert_eq!(render(|r| r.skip_block(1, -4, None)), "");
        }
    }

    mod failure_count_tests {
        use super::*;

        #[test]
        fn test_counts_only_not_ok_lines() {
            let mut reporter = Reporter::new(Vec::new());
            reporter.initialize(6);
            reporter.report(1, true);
            reporter.report(2, false);
            reporter.report_int(3, 1, 2);
            reporter.report_string(4, None, None);
            reporter.skip(5, Some("offline"));
            reporter.report_double(6, f64::NAN, f64::NAN);
            assert_eq!(reporter.failures(), 3);
        }

        #[test]
        fn test_blocks_count_each_check() {
            let mut reporter = Reporter::new(Vec::new());
            reporter.report_block(1, 4, false);
            reporter.skip_block(5, 2, None);
            assert_eq!(reporter.failures(), 4);
        }

        #[test]
        fn test_plan_is_not_a_failure() {
            let mut reporter = Reporter::new(Vec::new());
            reporter.emit(&Directive::Plan(0));
            assert_eq!(reporter.failures(), 0);
        }
    }

    #[test]
    fn test_emit_writes_directive() {
        let output = render(|r| r.emit(&Directive::compare(9, "a", "b")));
        assert_eq!(output, "not ok 9\n  wanted: a\n    seen: b\n");
    }
}
