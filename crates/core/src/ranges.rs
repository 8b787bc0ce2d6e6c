//! Threshold ranges and the canonical merge.
//!
//! A metric's raw [`ThresholdDefinition`] may carry overlapping or touching
//! ranges for different statuses. [`build_ranges`] validates and sorts them,
//! and [`merge_overlaps`] collapses them into a canonical, non-overlapping
//! list where every contested point belongs to the higher-precedence status.
//!
//! Pure logic, no storage access.

use std::cmp::Ordering;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::severity::Status;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A closed interval `[min, max]` carrying a status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub status: Status,
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(status: Status, min: f64, max: f64) -> Self {
        Self { status, min, max }
    }

    /// Build a range, or `None` when the bounds are inverted.
    fn bounded(status: Status, min: f64, max: f64) -> Option<Self> {
        (min <= max).then_some(Self { status, min, max })
    }

    /// A single-point range (`min == max`).
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    fn cmp_bounds(&self, other: &Self) -> Ordering {
        self.min
            .total_cmp(&other.min)
            .then(self.max.total_cmp(&other.max))
    }
}

/// Raw per-metric threshold input, one optional `[min, max]` per status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdDefinition {
    #[serde(default)]
    pub critical_range: Option<[f64; 2]>,
    #[serde(default)]
    pub warning_range: Option<[f64; 2]>,
    #[serde(default)]
    pub info_range: Option<[f64; 2]>,
    #[serde(default)]
    pub ok_range: Option<[f64; 2]>,
}

impl ThresholdDefinition {
    /// The raw ranges keyed by status, highest precedence first.
    pub fn ranges_by_status(&self) -> [(Status, Option<[f64; 2]>); 4] {
        [
            (Status::Critical, self.critical_range),
            (Status::Warning, self.warning_range),
            (Status::Info, self.info_range),
            (Status::Ok, self.ok_range),
        ]
    }
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Drop absent ranges, reject malformed ones, and sort by `(min, max)`.
///
/// A range is malformed when a bound is not finite or `min > max`; the whole
/// definition is rejected before any merge happens.
pub fn build_ranges(definition: &ThresholdDefinition) -> Result<Vec<Range>, CoreError> {
    let mut ranges = Vec::with_capacity(4);
    for (status, raw) in definition.ranges_by_status() {
        let Some([min, max]) = raw else {
            continue;
        };
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(CoreError::MalformedThreshold {
                status: status.as_str(),
                min,
                max,
            });
        }
        ranges.push(Range::new(status, min, max));
    }
    ranges.sort_by(Range::cmp_bounds);
    Ok(ranges)
}

// ---------------------------------------------------------------------------
// Smallest-step adjustment
// ---------------------------------------------------------------------------

/// Smallest decimal step (0.1, 0.01, ...) that still changes `value` when
/// applied in the given direction (`+1.0` or `-1.0`).
///
/// For magnitudes where 0.1 is already absorbed, the step grows by powers of
/// ten until it registers.
pub fn smallest_step(value: f64, direction: f64) -> f64 {
    let shifts = |step: f64| value + direction * step != value;

    let mut step = 0.1;
    if !shifts(step) {
        while !shifts(step) {
            step *= 10.0;
        }
        return step;
    }

    loop {
        let next = step / 10.0;
        if !shifts(next) {
            return step;
        }
        step = next;
    }
}

/// `value` moved up by its smallest decimal step.
pub fn nudge_up(value: f64) -> f64 {
    value + smallest_step(value, 1.0)
}

/// `value` moved down by its smallest decimal step.
pub fn nudge_down(value: f64) -> f64 {
    value - smallest_step(value, -1.0)
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Geometric relation between two ranges where `first.min <= second.min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Disjoint,
    /// `first.max == second.min`.
    Touching,
    /// Partial intersection.
    Overlapping,
    FirstContainsSecond,
    SecondContainsFirst,
}

impl Relation {
    pub fn between(first: &Range, second: &Range) -> Self {
        if first.max < second.min {
            Relation::Disjoint
        } else if first.max == second.min {
            Relation::Touching
        } else if second.max <= first.max {
            Relation::FirstContainsSecond
        } else if first.min == second.min {
            Relation::SecondContainsFirst
        } else {
            Relation::Overlapping
        }
    }
}

/// Collapse sorted ranges into the canonical, non-overlapping set.
///
/// Work-queue fixed point: the two front ranges are compared, a disjoint
/// front is finalized, and anything else is resolved by precedence into 0-3
/// ranges that go back into the queue in `(min, max)` order.
pub fn merge_overlaps(sorted: &[Range]) -> Vec<Range> {
    let mut queue: VecDeque<Range> = sorted.iter().copied().collect();
    queue.make_contiguous().sort_by(Range::cmp_bounds);

    let mut merged = Vec::with_capacity(queue.len());
    while let Some(first) = queue.pop_front() {
        let Some(second) = queue.pop_front() else {
            merged.push(first);
            break;
        };

        let relation = Relation::between(&first, &second);
        if relation == Relation::Disjoint {
            merged.push(first);
            queue.push_front(second);
            continue;
        }

        let pieces = resolve(relation, first, second);
        tracing::trace!(?relation, ?first, ?second, ?pieces, "Resolved range conflict");
        for piece in pieces {
            let at = queue.partition_point(|queued| queued.cmp_bounds(&piece) != Ordering::Greater);
            queue.insert(at, piece);
        }
    }
    merged
}

/// Resolve two intersecting ranges into at most three non-overlapping ones.
fn resolve(relation: Relation, first: Range, second: Range) -> Vec<Range> {
    if first.status == second.status {
        return vec![Range::new(
            first.status,
            first.min,
            first.max.max(second.max),
        )];
    }
    let first_wins = first.status > second.status;

    match relation {
        Relation::Disjoint => vec![first, second],
        Relation::Touching => {
            let lower = if first_wins { second } else { first };
            if lower.is_degenerate() {
                return vec![if first_wins { first } else { second }];
            }
            if first_wins {
                keep_some([
                    Some(first),
                    Range::bounded(second.status, nudge_up(second.min), second.max),
                ])
            } else {
                keep_some([
                    Range::bounded(first.status, first.min, nudge_down(first.max)),
                    Some(second),
                ])
            }
        }
        Relation::Overlapping => {
            if first_wins {
                keep_some([
                    Some(first),
                    Range::bounded(second.status, nudge_up(first.max), second.max),
                ])
            } else {
                keep_some([
                    Range::bounded(first.status, first.min, nudge_down(second.min)),
                    Some(second),
                ])
            }
        }
        Relation::FirstContainsSecond => carve(first, second),
        Relation::SecondContainsFirst => carve(second, first),
    }
}

/// Resolve `outer` fully containing `inner`.
fn carve(outer: Range, inner: Range) -> Vec<Range> {
    if outer.status > inner.status {
        return vec![outer];
    }
    keep_some([
        Range::bounded(outer.status, outer.min, nudge_down(inner.min)),
        Some(inner),
        Range::bounded(outer.status, nudge_up(inner.max), outer.max),
    ])
}

fn keep_some<const N: usize>(pieces: [Option<Range>; N]) -> Vec<Range> {
    pieces.into_iter().flatten().collect()
}

/// Whether any two ranges in a sorted list share a point.
pub fn has_overlap(ranges: &[Range]) -> bool {
    ranges.windows(2).any(|pair| pair[0].max >= pair[1].min)
}
