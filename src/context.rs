//! Evaluation context: bounds for sequence generation, and the
//! read-only time-zone series consulted at render time.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::grain::{add_grain, Grain};
use crate::time_object::TimeObject;

/// A read-only, `Copy` handle onto an IANA time-zone's transition series.
///
/// Carries no mutable state and may be freely shared across concurrent
/// queries; it is consulted only when rendering a [`TimeObject`] into an
/// [`crate::value::InstantValue`], never during predicate evaluation (which
/// always operates on UTC instants).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeZoneSeries(pub Tz);

impl TimeZoneSeries {
    pub fn new(tz: Tz) -> Self {
        TimeZoneSeries(tz)
    }

    /// Look up the zone offset in effect at `instant`, DST-aware.
    pub fn offset_at(&self, instant: DateTime<Utc>) -> chrono::FixedOffset {
        use chrono::Offset;
        instant.with_timezone(&self.0).offset().fix()
    }
}

/// Bounds and ambient data threaded through sequence evaluation.
///
/// `min`/`max` bound how far a runner or the composer will search; by
/// convention the resolver sets them to `ref ± 2000 years`, and the
/// composer narrows them to a single right-hand hit when recursing into
/// the left operand of an `Intersect` (§4.5).
#[derive(Debug, Clone, Copy)]
pub struct TimeContext {
    pub reference: TimeObject,
    pub tz_series: TimeZoneSeries,
    pub min: TimeObject,
    pub max: TimeObject,
}

/// How far `ctx.min`/`ctx.max` extend from the reference by default.
pub const DEFAULT_BOUND_YEARS: i64 = 2000;

impl TimeContext {
    /// Build a context bounded `DEFAULT_BOUND_YEARS` years either side of
    /// `reference`.
    pub fn new(reference: TimeObject, tz_series: TimeZoneSeries) -> Self {
        let min = TimeObject::point(
            add_grain(reference.start, Grain::Year, -DEFAULT_BOUND_YEARS),
            Grain::Year,
        );
        let max = TimeObject::point(
            add_grain(reference.start, Grain::Year, DEFAULT_BOUND_YEARS),
            Grain::Year,
        );
        TimeContext {
            reference,
            tz_series,
            min,
            max,
        }
    }

    /// Narrow this context to a single admissible window, as the composer
    /// does when re-evaluating its left operand against one right-hand hit.
    pub fn narrowed_to(&self, window: TimeObject) -> Self {
        TimeContext {
            reference: self.reference,
            tz_series: self.tz_series,
            min: window,
            max: window,
        }
    }
}
