//! Severity vocabulary shared by the range classifier and the hierarchy filter.
//!
//! [`Status`] is the set of statuses a threshold range can carry, totally
//! ordered by precedence. [`Severity`] is what a classified reading resolves
//! to: one of the range statuses or one of the two sentinel outcomes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status attached to a threshold range.
///
/// The derived `Ord` follows declaration order, which is precedence order:
/// `Ok < Info < Warning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    Info,
    Warning,
    Critical,
}

impl Status {
    /// All statuses, highest precedence first.
    pub const ALL: [Status; 4] = [
        Status::Critical,
        Status::Warning,
        Status::Info,
        Status::Ok,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Info => "Info",
            Status::Warning => "Warning",
            Status::Critical => "Critical",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::Validation(format!("unknown range status '{s}'")))
    }
}

/// Outcome of classifying a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Warning,
    Info,
    #[serde(rename = "OK")]
    Ok,
    /// The reading could not be parsed or fell outside every range.
    Invalid,
    /// The reading was the timeout sentinel.
    Timeout,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Critical,
        Severity::Warning,
        Severity::Info,
        Severity::Ok,
        Severity::Invalid,
        Severity::Timeout,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
            Severity::Ok => "OK",
            Severity::Invalid => "Invalid",
            Severity::Timeout => "Timeout",
        }
    }
}

impl From<Status> for Severity {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => Severity::Ok,
            Status::Info => Severity::Info,
            Status::Warning => Severity::Warning,
            Status::Critical => Severity::Critical,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::Validation(format!("unknown severity '{s}'")))
    }
}
