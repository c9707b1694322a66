//! Tap Program - a complete test program
//!
//! Prints a plan and nine results on stdout for a harness to read.
//! A parse helper stands in for the code under test; its warnings are
//! captured and compared like any other value.
//!
//! # Running
//!
//! ```bash
//! cargo run --example tap_program -p tapkit
//! ```

#![allow(clippy::unwrap_used)]

use tapkit::{diagnostics, Capture, Reporter};
use tracing::warn;

/// Parse a port number, warning about anything unusable
fn parse_port(text: &str) -> Option<u16> {
    match text.parse::<u16>() {
        Ok(0) => {
            warn!("port 0 is reserved");
            None
        }
        Ok(port) => Some(port),
        Err(err) => {
            warn!("invalid port {text:?}: {err}");
            None
        }
    }
}

fn main() {
    if let Err(err) = diagnostics::init() {
        eprintln!("{err}");
    }

    let mut reporter = Reporter::stdout();
    reporter.initialize(9);

    reporter.report(1, parse_port("8080").is_some());
    reporter.report_int(2, 443, i64::from(parse_port("443").unwrap_or(0)));

    let session = Capture::begin();
    let reserved = parse_port("0");
    let invalid = parse_port("http");
    let errors = session.end().unwrap();
    reporter.report(3, reserved.is_none());
    reporter.report(4, invalid.is_none());
    reporter.report_string(
        5,
        Some("port 0 is reserved\ninvalid port \"http\": invalid digit found in string\n"),
        Some(errors.as_str()),
    );

    // Exact comparison: reported as not ok with both values shown
    reporter.report_double(6, 0.3, 0.1 + 0.2);
    reporter.skip_block(7, 2, Some("ipv6 not configured"));
    reporter.skip(9, None);

    // Summary goes to stderr so the protocol stream stays clean
    if reporter.failures() > 0 {
        warn!("{} of 9 checks failed", reporter.failures());
    }
}
