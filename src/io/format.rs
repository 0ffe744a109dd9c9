//! Layout of the `cidets` main output.
//!
//! The main output is a plain-text report sent to the `cidets-output` log target, which the
//! binary routes to `<output>.out` or to standard output. Each input stage is bracketed by
//! begin/end markers, each driver opens with a boxed title, and each block of a driver report
//! (parameters, source determinants, tallies, listings) sits under an underlined subtitle.

use std::fmt;

use log;

#[cfg(test)]
#[path = "format_tests.rs"]
mod format_tests;

/// Width of the boxed titles and stage markers.
const REPORT_WIDTH: usize = 103;

/// Logs an error both to the diagnostics log and to the report.
macro_rules! cidets_error {
    ($fmt:expr $(, $($arg:tt)*)?) => {{
        log::error!($fmt, $($($arg)*)?);
        log::error!(target: "cidets-output", $fmt, $($($arg)*)?);
    }}
}

/// Logs a warning to the report.
macro_rules! cidets_warn {
    ($fmt:expr $(, $($arg:tt)*)?) => {{
        log::warn!(target: "cidets-output", $fmt, $($($arg)*)?);
    }}
}

/// Logs one line of the report.
macro_rules! cidets_output {
    ($fmt:expr $(, $($arg:tt)*)?) => {{
        log::info!(target: "cidets-output", $fmt, $($($arg)*)?);
    }}
}

pub(crate) use {cidets_error, cidets_output, cidets_warn};

/// The three lines of a boxed title, centred in a box at least [`REPORT_WIDTH`] wide.
fn title_lines(title: &str) -> [String; 3] {
    let inner = title.chars().count().max(REPORT_WIDTH - 6);
    let bar = "─".repeat(inner);
    [
        format!("┌──{bar}──┐"),
        format!("│§ {title:^inner$} §│"),
        format!("└──{bar}──┘"),
    ]
}

/// The subtitle followed by a double underline of the same length.
fn subtitle_lines(subtitle: &str) -> [String; 2] {
    [
        subtitle.to_string(),
        "═".repeat(subtitle.chars().count()),
    ]
}

/// Writes a boxed driver title.
pub(crate) fn write_title(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    title_lines(title)
        .iter()
        .try_for_each(|line| writeln!(f, "{line}"))
}

/// Logs a boxed driver title to the report.
pub(crate) fn log_title(title: &str) {
    title_lines(title).iter().for_each(|line| {
        cidets_output!("{line}");
    });
}

/// Writes an underlined report subtitle.
pub(crate) fn write_subtitle(f: &mut fmt::Formatter<'_>, subtitle: &str) -> fmt::Result {
    subtitle_lines(subtitle)
        .iter()
        .try_for_each(|line| writeln!(f, "{line}"))
}

/// Logs an underlined report subtitle.
pub(crate) fn log_subtitle(subtitle: &str) {
    subtitle_lines(subtitle).iter().for_each(|line| {
        cidets_output!("{line}");
    });
}

/// A stage marker padded with `fill` out to [`REPORT_WIDTH`].
fn stage_marker(lead: &str, tag: &str, stage: &str, fill: char) -> String {
    let width = REPORT_WIDTH - 14;
    let label = format!("{stage} ");
    let padding = fill
        .to_string()
        .repeat(width.saturating_sub(label.chars().count()));
    format!("{lead} [{tag}] {label}{padding}")
}

/// Logs the marker opening an input stage.
pub(crate) fn log_macsec_begin(stage: &str) {
    cidets_output!("{}", stage_marker("❬❬❬❬❬", "Begin", stage, '❬'));
}

/// Logs the marker closing an input stage.
pub(crate) fn log_macsec_end(stage: &str) {
    cidets_output!("{}", stage_marker("❭❭❭❭❭", " End ", stage, '❭'));
}

/// `yes` or `no`, for boolean parameters in reports.
pub(crate) fn nice_bool(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

/// Report logging for anything with a multi-line `Display`: parameter blocks, driver results
/// and determinant listings.
pub(crate) trait CidetsOutput: fmt::Debug + fmt::Display {
    /// Logs each line of the `Display` output to the report.
    fn log_output_display(&self) {
        self.to_string().lines().for_each(|line| {
            cidets_output!("{line}");
        })
    }
}

impl<T> CidetsOutput for T where T: fmt::Debug + fmt::Display {}
