//! Startup failure report

use lcm_provider::Attempt;
use std::fmt::Write;

/// Every candidate that was tried, with the reason it failed
pub fn attempts(attempts: &[Attempt]) -> String {
    let mut out = String::from("Tried the following container runtimes:\n");
    for attempt in attempts {
        let _ = writeln!(
            out,
            "  - {} ({}): {}",
            attempt.name, attempt.address, attempt.error
        );
    }
    out.push_str("\nPlease ensure one of the above container runtimes is running.\n\n");
    out
}
