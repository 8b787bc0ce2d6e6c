//! Boundary markers for the per-metric classification index.
//!
//! Each canonical range is published as two markers, one at its `min` and one
//! at its `max`. A reading is classified by looking up the smallest-scored
//! marker at or above it: landing on a max-marker means the reading is inside
//! that range; landing on a min-marker only counts when the reading sits
//! exactly on the range start.
//!
//! Labels are `"{order}:{kind}:{status}:{score}"` with a zero-padded order so
//! that, at equal scores, lexicographic label order puts a range's min-marker
//! before its max-marker.

use std::fmt;

use crate::error::CoreError;
use crate::ranges::Range;
use crate::severity::{Severity, Status};

/// Width of the zero-padded order prefix.
const ORDER_WIDTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Min,
    Max,
}

impl MarkerKind {
    fn as_str(self) -> &'static str {
        match self {
            MarkerKind::Min => "min",
            MarkerKind::Max => "max",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(score, label)` pair ready to be written to the boundary index.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryMarker {
    pub score: f64,
    pub label: String,
}

/// The fields packed into a marker label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerLabel {
    pub order: usize,
    pub kind: MarkerKind,
    pub status: Status,
    pub score: f64,
}

impl MarkerLabel {
    pub fn encode(&self) -> String {
        format!(
            "{:0width$}:{}:{}:{}",
            self.order,
            self.kind,
            self.status,
            self.score,
            width = ORDER_WIDTH
        )
    }

    pub fn decode(label: &str) -> Result<Self, CoreError> {
        let malformed = || CoreError::InvalidRecord(format!("malformed boundary label '{label}'"));

        let mut parts = label.splitn(4, ':');
        let (Some(order), Some(kind), Some(status), Some(score)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let order = order.parse().map_err(|_| malformed())?;
        let kind = match kind {
            "min" => MarkerKind::Min,
            "max" => MarkerKind::Max,
            _ => return Err(malformed()),
        };
        let status = status.parse().map_err(|_| malformed())?;
        let score = score.parse().map_err(|_| malformed())?;

        Ok(Self {
            order,
            kind,
            status,
            score,
        })
    }
}

/// Two markers per canonical range, in ascending order.
pub fn markers_for(ranges: &[Range]) -> Vec<BoundaryMarker> {
    ranges
        .iter()
        .enumerate()
        .flat_map(|(i, range)| {
            [
                (2 * i, MarkerKind::Min, range.min),
                (2 * i + 1, MarkerKind::Max, range.max),
            ]
            .map(|(order, kind, score)| BoundaryMarker {
                score,
                label: MarkerLabel {
                    order,
                    kind,
                    status: range.status,
                    score,
                }
                .encode(),
            })
        })
        .collect()
}

/// Decode the first marker at or above `value` into a severity.
///
/// `marker` is the `(label, score)` returned by the boundary index, or `None`
/// when nothing sits at or above the value.
pub fn resolve(marker: Option<(&str, f64)>, value: f64) -> Severity {
    let Some((label, score)) = marker else {
        return Severity::Invalid;
    };

    match MarkerLabel::decode(label) {
        Ok(MarkerLabel {
            kind: MarkerKind::Max,
            status,
            ..
        }) => status.into(),
        Ok(MarkerLabel {
            kind: MarkerKind::Min,
            status,
            ..
        }) if score == value => status.into(),
        Ok(_) => Severity::Invalid,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable boundary marker, treating reading as invalid");
            Severity::Invalid
        }
    }
}
