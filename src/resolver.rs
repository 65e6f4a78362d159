//! The resolver (§4.6): turns a predicate plus a reference instant into a
//! rendered [`TimeValue`], applying the "immediate vs. next" policy and
//! gathering a short lookahead of alternatives.

use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::context::{TimeContext, TimeZoneSeries};
use crate::grain::Grain;
use crate::predicate::Predicate;
use crate::time_object::{intersect, TimeObject};
use crate::value::{Direction, InstantValue, SingleTimeValue, TimeValue};

/// How many alternatives the resolver reports, regardless of which
/// `future` element ended up chosen (§9, preserved as an open question).
const ALTERNATIVE_COUNT: usize = 3;

/// The inputs the external parser would normally attach to a predicate
/// before handing it to the resolver.
#[derive(Clone)]
pub struct TimeData {
    pub predicate: Rc<Predicate>,
    /// A latent predicate (e.g. a bare grain with no anchor) never resolves.
    pub latent: bool,
    /// Overrides the rendered grain; `None` uses the chosen TimeObject's own.
    pub time_grain: Option<Grain>,
    /// Skip the immediately-overlapping match in favor of the next one.
    pub not_immediate: bool,
    /// `Some` renders an open interval instead of a point/closed interval.
    pub direction: Option<Direction>,
}

/// The reference instant and the zone series used to render output.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub reference: DateTime<Utc>,
    pub tz_series: TimeZoneSeries,
}

/// Resolve `data` against `ctx`, or `None` if the predicate is latent or
/// unsatisfiable (§4.6, §7).
pub fn resolve(data: &TimeData, ctx: &Context) -> Option<TimeValue> {
    if data.latent {
        log::debug!("predicate is latent, no resolution");
        return None;
    }

    let reference = TimeObject::point(ctx.reference, Grain::Second);
    let tctx = TimeContext::new(reference, ctx.tz_series);
    let (mut past, future) = data.predicate.run(reference, tctx);

    let ahead: Vec<TimeObject> = future.take(ALTERNATIVE_COUNT).collect();

    let chosen = if ahead.is_empty() {
        let Some(most_recent_past) = past.next() else {
            log::debug!("predicate has no future or past matches, no resolution");
            return None;
        };
        log::debug!("no future matches; falling back to most recent past match");
        most_recent_past
    } else {
        let candidate = ahead[0];
        if data.not_immediate && intersect(&candidate, &reference).is_some() && ahead.len() > 1 {
            log::debug!("notImmediate skips the immediately-overlapping match");
            ahead[1]
        } else {
            candidate
        }
    };

    let alternatives = ahead
        .into_iter()
        .map(|obj| render(obj, data, ctx.tz_series))
        .collect();

    Some(TimeValue {
        chosen: render(chosen, data, ctx.tz_series),
        alternatives,
    })
}

fn render(obj: TimeObject, data: &TimeData, tz_series: TimeZoneSeries) -> SingleTimeValue {
    let grain = data.time_grain.unwrap_or(obj.grain);
    let instant = InstantValue::new(obj.start, grain, tz_series);
    match data.direction {
        Some(direction) => SingleTimeValue::OpenInterval(instant, direction),
        None => match obj.end {
            Some(end) => SingleTimeValue::Interval(instant, InstantValue::new(end, grain, tz_series)),
            None => SingleTimeValue::Simple(instant),
        },
    }
}
