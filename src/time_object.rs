//! `TimeObject`: a half-open calendar interval, and the calendar helpers
//! built on top of it (`round`, `shift`, `end`, `intersect`, ...).
//!
//! Port of Duckling's `TimeObject` and the `timePlus`/`timeEnd`/
//! `timeIntersect`/`timeStartsBeforeTheEndOf` family from
//! `Duckling.Time.Types`.

use chrono::{DateTime, Utc};

use crate::grain::{add_grain, grain_start, Grain};

/// A half-open calendar interval: `[start, end)` when `end` is present,
/// otherwise `[start, start + one `grain`)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeObject {
    pub start: DateTime<Utc>,
    pub grain: Grain,
    pub end: Option<DateTime<Utc>>,
}

impl TimeObject {
    /// A point TimeObject: start only, implicit width of one `grain`.
    pub fn point(start: DateTime<Utc>, grain: Grain) -> Self {
        TimeObject {
            start,
            grain,
            end: None,
        }
    }

    /// An explicit interval TimeObject. `grain` still records the finest
    /// granularity contributing to the interval, per the data model.
    pub fn interval_of(start: DateTime<Utc>, end: DateTime<Utc>, grain: Grain) -> Self {
        debug_assert!(end > start, "TimeObject end must be strictly after start");
        TimeObject {
            start,
            grain,
            end: Some(end),
        }
    }

    /// End of this interval: the explicit `end` if set, otherwise
    /// `start + one grain`.
    pub fn end(&self) -> DateTime<Utc> {
        self.end.unwrap_or_else(|| add_grain(self.start, self.grain, 1))
    }

    /// Shift this TimeObject by `n` units of `grain`, preserving any
    /// explicit end by shifting it the same amount.
    pub fn shift(&self, grain: Grain, n: i64) -> TimeObject {
        TimeObject {
            start: add_grain(self.start, grain, n),
            grain: grain.min(self.grain),
            end: self.end.map(|e| add_grain(e, grain, n)),
        }
    }

    /// Truncate down to the start of the grain period containing `self`,
    /// discarding any explicit end.
    pub fn round(&self, grain: Grain) -> TimeObject {
        TimeObject::point(grain_start(self.start, grain), grain)
    }

    /// `self.start < other.end()`.
    pub fn starts_before_end_of(&self, other: &TimeObject) -> bool {
        self.start < other.end()
    }
}

/// Whether an `interval()` constructor excludes or includes `t2`'s end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalKind {
    /// `[t1.start, t2.start)` — `t2` is the exclusive boundary.
    Open,
    /// `[t1.start, end(t2))` — `t2` is fully included.
    Closed,
}

/// Build an interval TimeObject spanning from `t1`'s start to `t2`'s
/// start (Open) or end (Closed).
pub fn interval(kind: IntervalKind, t1: &TimeObject, t2: &TimeObject) -> TimeObject {
    let end = match kind {
        IntervalKind::Open => t2.start,
        IntervalKind::Closed => t2.end(),
    };
    TimeObject {
        start: t1.start,
        grain: t1.grain.min(t2.grain),
        end: Some(end),
    }
}

/// Overlap of two TimeObjects, or `None` if they do not overlap.
///
/// `grain` of the result is `min(a.grain, b.grain)`. Ties prefer the
/// operand with an explicit end, so that e.g. intersecting a Day-interval
/// with an Hour-point yields the hour.
pub fn intersect(a: &TimeObject, b: &TimeObject) -> Option<TimeObject> {
    if a.start > b.start {
        return intersect(b, a);
    }
    // a.start <= b.start
    let (a_end, b_end) = (a.end(), b.end());
    let grain = a.grain.min(b.grain);
    if a_end <= b.start {
        return None;
    }
    if a_end < b_end || (a.start == b.start && a_end == b_end && a.end.is_some()) {
        Some(TimeObject {
            start: b.start,
            grain,
            end: a.end,
        })
    } else {
        Some(TimeObject {
            start: b.start,
            grain,
            end: b.end,
        })
    }
}
