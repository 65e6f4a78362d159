//! The intersection composer (§4.5): combines two bidirectional sequences
//! by treating the right-hand predicate as the outer loop (coarser,
//! fewer hits) and re-running the left-hand predicate, narrowed to each
//! outer hit, as the inner producer.

use std::rc::Rc;

use crate::context::TimeContext;
use crate::predicate::Predicate;
use crate::sequence::BiSeq;
use crate::time_object::intersect;
use crate::time_object::TimeObject;

/// Caps how many outer (right-hand) hits the composer will examine in
/// either direction before giving up on finding an overlap. Matches the
/// bound the reference engine uses to keep pathological intersections
/// (e.g. Feb 30) from searching forever.
const SAFE_MAX: usize = 10;

/// Evaluate `Intersect(left, right)` around `reference`, bounded by `ctx`.
pub(crate) fn compose(
    left: Rc<Predicate>,
    right: Rc<Predicate>,
    reference: TimeObject,
    ctx: TimeContext,
) -> BiSeq {
    let (right_past, right_future) = right.run(reference, ctx);

    let future_hits: Vec<TimeObject> = right_future
        .take_while(|r| r.starts_before_end_of(&ctx.max))
        .take(SAFE_MAX)
        .collect();
    let past_hits: Vec<TimeObject> = right_past
        .take_while(|r| ctx.min.starts_before_end_of(r))
        .take(SAFE_MAX)
        .collect();

    let future: Vec<TimeObject> = future_hits
        .into_iter()
        .flat_map(|r| left_hits_within(&left, r, ctx))
        .collect();
    let past: Vec<TimeObject> = past_hits
        .into_iter()
        .flat_map(|r| left_hits_within(&left, r, ctx))
        .collect();

    (Box::new(past.into_iter()), Box::new(future.into_iter()))
}

/// Re-run `left` with its context narrowed to the outer hit `r`, taking
/// the local future sequence of left hits that start before `r` ends and
/// intersecting each with `r` (§4.5 step 3). `r` itself is both the new
/// reference and the new bound.
fn left_hits_within(left: &Predicate, r: TimeObject, ctx: TimeContext) -> Vec<TimeObject> {
    let narrowed = ctx.narrowed_to(r);
    let (_, left_future) = left.run(r, narrowed);

    let hits: Vec<TimeObject> = left_future
        .take_while(|l| l.starts_before_end_of(&r))
        .take(SAFE_MAX)
        .collect();

    hits.into_iter()
        .filter_map(|l| match intersect(&l, &r) {
            Some(hit) => Some(hit),
            None => {
                log::trace!("composer: left hit {:?} does not overlap right hit {:?}, discarding", l, r);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TimeZoneSeries;
    use crate::grain::Grain;
    use crate::predicate::{day_of_week, hour, intersect as pred_intersect, month};
    use chrono::{TimeZone, Utc};

    fn dt(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, s).unwrap()
    }

    fn reference() -> TimeObject {
        TimeObject::point(dt(2013, 2, 12, 4, 30, 0), Grain::Second)
    }

    fn ctx() -> TimeContext {
        TimeContext::new(reference(), TimeZoneSeries::new(chrono_tz::UTC))
    }

    #[test]
    fn tuesday_at_four_pm_composes_via_intersect() {
        let p = pred_intersect(hour(false, 16), day_of_week(2));
        let (_, mut future) = p.run(reference(), ctx());
        let first = future.next().unwrap();
        assert_eq!(first.start, dt(2013, 2, 12, 16, 0, 0));
    }

    #[test]
    fn march_at_four_pm_finds_every_occurrence_in_the_month() {
        let p = pred_intersect(hour(false, 16), month(3));
        let (_, future) = p.run(reference(), ctx());
        let hits: Vec<_> = future.take(3).collect();
        assert_eq!(hits[0].start, dt(2013, 3, 1, 16, 0, 0));
        assert_eq!(hits[1].start, dt(2013, 3, 2, 16, 0, 0));
        assert_eq!(hits[2].start, dt(2013, 3, 3, 16, 0, 0));
    }

    #[test]
    fn unsatisfiable_conjunction_is_empty_via_composer_too() {
        // hour(30) is nonsensical paired with day_of_week via a forced
        // Intersect node (bypassing the TimeDate-unify smart constructor).
        let left = Rc::new(Predicate::TimeDate(crate::predicate::TimeDateFields {
            day_of_month: Some(31),
            ..Default::default()
        }));
        let right = Rc::new(Predicate::TimeDate(crate::predicate::TimeDateFields {
            month: Some(2),
            ..Default::default()
        }));
        let (_, mut future) = compose(left, right, reference(), ctx());
        // Feb never has a 31st.
        assert!(future.next().is_none());
    }
}
