//! Raw and overall build statuses, and the precedence rule that collapses
//! a set of raw statuses into the single status shown per package.

use std::fmt;

/// The per-stage-per-node outcome string produced by the build nodes,
/// before aggregation. Unknown inputs degrade to [`RawStatus::Unknown`],
/// they never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawStatus {
    Ok,
    Warnings,
    Error,
    Timeout,
    Na,
    Skipped,
    Unknown,
}

impl RawStatus {
    /// Case-insensitive parse; anything unrecognized is `Unknown`.
    #[must_use]
    pub fn parse(s: &str) -> RawStatus {
        match s.trim().to_ascii_lowercase().as_str() {
            "ok" => RawStatus::Ok,
            "warnings" => RawStatus::Warnings,
            "error" => RawStatus::Error,
            "timeout" => RawStatus::Timeout,
            "na" => RawStatus::Na,
            "skipped" => RawStatus::Skipped,
            _ => RawStatus::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RawStatus::Ok => "OK",
            RawStatus::Warnings => "WARNINGS",
            RawStatus::Error => "ERROR",
            RawStatus::Timeout => "TIMEOUT",
            RawStatus::Na => "NA",
            RawStatus::Skipped => "skipped",
            RawStatus::Unknown => "unknown",
        }
    }

    /// CSS class driving the glyph color for this status.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            RawStatus::Ok => "status-ok",
            RawStatus::Warnings => "status-warnings",
            RawStatus::Error => "status-error",
            RawStatus::Timeout => "status-timeout",
            RawStatus::Na => "status-na",
            RawStatus::Skipped => "status-skipped",
            RawStatus::Unknown => "status-unknown",
        }
    }
}

impl fmt::Display for RawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single status shown per package, derived from all of its raw
/// statuses. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverallStatus {
    Ok,
    Warnings,
    Error,
    Timeout,
    Na,
    Unknown,
}

impl OverallStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OverallStatus::Ok => "OK",
            OverallStatus::Warnings => "WARNINGS",
            OverallStatus::Error => "ERROR",
            OverallStatus::Timeout => "TIMEOUT",
            OverallStatus::Na => "NA",
            OverallStatus::Unknown => "unknown",
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            OverallStatus::Ok => "status-ok",
            OverallStatus::Warnings => "status-warnings",
            OverallStatus::Error => "status-error",
            OverallStatus::Timeout => "status-timeout",
            OverallStatus::Na => "status-na",
            OverallStatus::Unknown => "status-unknown",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Precedence table for [`overall_status`], highest priority first. A
/// skipped package short-circuits to `ERROR` before the table is
/// consulted.
const PRECEDENCE: [(RawStatus, OverallStatus); 5] = [
    (RawStatus::Error, OverallStatus::Error),
    (RawStatus::Timeout, OverallStatus::Timeout),
    (RawStatus::Warnings, OverallStatus::Warnings),
    (RawStatus::Na, OverallStatus::Na),
    (RawStatus::Ok, OverallStatus::Ok),
];

/// Collapses a package's raw per-node-per-stage statuses into its overall
/// status. Total and deterministic: first precedence match wins, and a
/// set matching nothing yields `Unknown`.
pub fn overall_status<I>(raw_statuses: I, is_skipped: bool) -> OverallStatus
where
    I: IntoIterator<Item = RawStatus>,
{
    let mut present = [false; 7];
    for status in raw_statuses {
        present[status as usize] = true;
    }
    if is_skipped {
        return OverallStatus::Error;
    }
    for (raw, overall) in PRECEDENCE {
        if present[raw as usize] {
            return overall;
        }
    }
    OverallStatus::Unknown
}

/// String-set convenience used where statuses arrive untyped; matching is
/// case-insensitive.
pub fn overall_status_of<'a, I>(raw_statuses: I, is_skipped: bool) -> OverallStatus
where
    I: IntoIterator<Item = &'a str>,
{
    overall_status(raw_statuses.into_iter().map(RawStatus::parse), is_skipped)
}
