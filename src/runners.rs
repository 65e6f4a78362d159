//! Field runners: one bidirectional sequence producer per calendar-field
//! constraint (§4.4), plus the fold that combines a `TimeDateFields` bag
//! into a single sequence via the composer (§4.3).

use std::rc::Rc;

use chrono::{Datelike, Duration, Timelike};

use crate::context::TimeContext;
use crate::grain::{days_in_month, Grain};
use crate::predicate::{AmPm, HourField, Predicate, TimeDateFields};
use crate::sequence::{empty_bi_seq, BiSeq, TimeSeq};
use crate::time_object::{intersect, TimeObject};

/// Dispatch a `TimeDateFields` bag to the right runner(s), folding
/// multiple fields finest-grain-first with the composer (§4.3).
pub(crate) fn run_time_date(fields: &TimeDateFields, reference: TimeObject, ctx: TimeContext) -> BiSeq {
    if fields.is_ampm_without_hour() {
        return empty_bi_seq();
    }
    if fields.is_ampm_alone() {
        return run_ampm_alone(fields.ampm.unwrap(), reference, ctx);
    }
    if is_single_field(fields) {
        return run_single(fields, reference);
    }

    let mut nodes: Vec<Predicate> = Vec::new();
    if let Some(n) = fields.second {
        nodes.push(single_field_node(TimeDateFields {
            second: Some(n),
            ..Default::default()
        }));
    }
    if let Some(n) = fields.minute {
        nodes.push(single_field_node(TimeDateFields {
            minute: Some(n),
            ..Default::default()
        }));
    }
    if fields.hour.is_some() {
        nodes.push(single_field_node(TimeDateFields {
            hour: fields.hour,
            ampm: fields.ampm,
            ..Default::default()
        }));
    }
    if let Some(n) = fields.day_of_week {
        nodes.push(single_field_node(TimeDateFields {
            day_of_week: Some(n),
            ..Default::default()
        }));
    }
    if let Some(n) = fields.day_of_month {
        nodes.push(single_field_node(TimeDateFields {
            day_of_month: Some(n),
            ..Default::default()
        }));
    }
    if let Some(n) = fields.month {
        nodes.push(single_field_node(TimeDateFields {
            month: Some(n),
            ..Default::default()
        }));
    }
    if let Some(n) = fields.year {
        nodes.push(single_field_node(TimeDateFields {
            year: Some(n),
            ..Default::default()
        }));
    }

    fold_right(nodes, reference, ctx)
}

fn single_field_node(fields: TimeDateFields) -> Predicate {
    Predicate::TimeDate(fields)
}

/// `true` if exactly one of the seven ordinary fields is set (`ampm` does
/// not count on its own: it is either folded into `hour` or handled by
/// `is_ampm_alone` before this is reached).
fn is_single_field(fields: &TimeDateFields) -> bool {
    let set = [
        fields.second.is_some(),
        fields.minute.is_some(),
        fields.hour.is_some(),
        fields.day_of_week.is_some(),
        fields.day_of_month.is_some(),
        fields.month.is_some(),
        fields.year.is_some(),
    ];
    set.iter().filter(|b| **b).count() == 1
}

/// Fold `nodes` (ordered finest-grain-first) into a right-nested
/// `Intersect` tree and evaluate it: `compose(nodes[0], compose(nodes[1],
/// ...))`, so the coarsest field is the composer's outer ("right") loop
/// and the finest is re-evaluated within each outer hit ("left").
fn fold_right(mut nodes: Vec<Predicate>, reference: TimeObject, ctx: TimeContext) -> BiSeq {
    match nodes.len() {
        0 => empty_bi_seq(),
        1 => match nodes.pop().unwrap() {
            Predicate::TimeDate(fields) => run_single(&fields, reference),
            other => other.run(reference, ctx),
        },
        _ => {
            let mut acc = nodes.pop().unwrap();
            while let Some(node) = nodes.pop() {
                acc = Predicate::Intersect(Rc::new(node), Rc::new(acc));
            }
            acc.run(reference, ctx)
        }
    }
}

/// Step `anchor` by `(period, step)` in both directions, forever. Callers
/// take bounded prefixes (§5) — this never materializes its output.
fn cyclic_pair(anchor: TimeObject, period: Grain, step: i64) -> BiSeq {
    let future = Box::new(std::iter::successors(Some(anchor), move |t| {
        Some(t.shift(period, step))
    }));
    let first_past = anchor.shift(period, -step);
    let past = Box::new(std::iter::successors(Some(first_past), move |t| {
        Some(t.shift(period, -step))
    }));
    (past, future)
}

/// Second n (0-59): period Minute, step 1.
fn run_second(n: u32, reference: TimeObject) -> BiSeq {
    let rounded = reference.round(Grain::Second);
    let current = reference.start.second();
    let delta = (n as i64 - current as i64).rem_euclid(60);
    let anchor = rounded.shift(Grain::Second, delta);
    cyclic_pair(anchor, Grain::Minute, 1)
}

/// Minute n (0-59): period Hour, step 1.
fn run_minute(n: u32, reference: TimeObject) -> BiSeq {
    let rounded = reference.round(Grain::Minute);
    let current = reference.start.minute();
    let delta = (n as i64 - current as i64).rem_euclid(60);
    let anchor = rounded.shift(Grain::Minute, delta);
    cyclic_pair(anchor, Grain::Hour, 1)
}

/// Hour (is_12h, n) with optional AM/PM: step 12 or 24, canonicalized to
/// 0-23 first (§4.4).
fn run_hour(field: HourField, ampm: Option<AmPm>, reference: TimeObject) -> BiSeq {
    let step: i64 = if field.is_12h && field.hour <= 12 && ampm.is_none() {
        12
    } else {
        24
    };
    let canonical = match ampm {
        Some(AmPm::Am) => field.hour % 12,
        Some(AmPm::Pm) => (field.hour % 12) + 12,
        None => field.hour,
    };
    let rounded = reference.round(Grain::Hour);
    let current = reference.start.hour();
    let delta = (canonical as i64 - current as i64).rem_euclid(step);
    let anchor = rounded.shift(Grain::Hour, delta);
    cyclic_pair(anchor, Grain::Hour, step)
}

/// Day-of-week n (1=Monday..7=Sunday): period Day, step 7.
fn run_day_of_week(n: u32, reference: TimeObject) -> BiSeq {
    let rounded = reference.round(Grain::Day);
    let current = reference.start.weekday().number_from_monday();
    let delta = (n as i64 - current as i64).rem_euclid(7);
    let anchor = rounded.shift(Grain::Day, delta);
    cyclic_pair(anchor, Grain::Day, 7)
}

/// Month n (1-12): period Year, step 1. Advances a year if the target
/// month has already fully elapsed this year.
fn run_month(n: u32, reference: TimeObject) -> BiSeq {
    let rounded_year = reference.round(Grain::Year);
    let candidate = rounded_year.shift(Grain::Month, n as i64 - 1);
    let anchor = if reference.starts_before_end_of(&candidate) {
        candidate
    } else {
        candidate.shift(Grain::Year, 1)
    };
    cyclic_pair(anchor, Grain::Year, 1)
}

/// Two-digit year `n` expands into the fixed window `[1950, 2049]`,
/// pivoting at `n = 50` (§4.4, §6) — reference-independent, like POSIX
/// `strptime`'s `%y`.
fn expand_two_digit_year(n: i32) -> i32 {
    1950 + (n + 50).rem_euclid(100)
}

/// Year n: two-digit years expand via the fixed 100-year window above;
/// produces a single TimeObject, past or future depending on whether it is
/// at or after the reference year.
fn run_year(n: i32, reference: TimeObject) -> BiSeq {
    let ref_year = reference.start.year();
    let year = if (0..=99).contains(&n) {
        expand_two_digit_year(n)
    } else {
        n
    };
    let rounded = reference.round(Grain::Year);
    let obj = rounded.shift(Grain::Year, (year - ref_year) as i64);
    if ref_year <= year {
        (Box::new(std::iter::empty()), Box::new(std::iter::once(obj)))
    } else {
        (Box::new(std::iter::once(obj)), Box::new(std::iter::empty()))
    }
}

/// Day-of-month n (1-31): steps one month at a time, skipping months
/// that are too short to have day `n` (e.g. Feb 30).
struct DayOfMonthSeq {
    day: u32,
    cursor: TimeObject,
    step: i64,
}

impl Iterator for DayOfMonthSeq {
    type Item = TimeObject;

    fn next(&mut self) -> Option<TimeObject> {
        loop {
            let candidate = self.cursor;
            let has_enough_days =
                days_in_month(candidate.start.year(), candidate.start.month()) >= self.day;
            self.cursor = self.cursor.shift(Grain::Month, self.step);
            if has_enough_days {
                return Some(candidate.shift(Grain::Day, self.day as i64 - 1));
            }
        }
    }
}

fn run_day_of_month(n: u32, reference: TimeObject) -> BiSeq {
    let rounded = reference.round(Grain::Month);
    let current_day = reference.start.day();
    let anchor = if current_day <= n {
        rounded
    } else {
        rounded.shift(Grain::Month, 1)
    };
    let future: TimeSeq = Box::new(DayOfMonthSeq {
        day: n,
        cursor: anchor,
        step: 1,
    });
    let past: TimeSeq = Box::new(DayOfMonthSeq {
        day: n,
        cursor: anchor.shift(Grain::Month, -1),
        step: -1,
    });
    (past, future)
}

/// The standalone "AM/PM alone" predicate (§4.4): a daily cycle of
/// clipped 12-hour intervals.
pub(crate) fn run_ampm_alone(which: AmPm, reference: TimeObject, _ctx: TimeContext) -> BiSeq {
    let day = reference.round(Grain::Day);
    let offset: i64 = match which {
        AmPm::Am => 0,
        AmPm::Pm => 12,
    };
    let start = day.start + Duration::hours(offset);
    let raw_anchor = TimeObject::interval_of(start, start + Duration::hours(12), Grain::Hour);

    // The anchor is built from `reference`'s own calendar day, so by
    // construction it always overlaps that day (§4.4's clip never drops it
    // here); advance past any anchor that has already fully elapsed.
    let enclosing_day = reference.round(Grain::Day);
    debug_assert!(intersect(&raw_anchor, &enclosing_day).is_some());
    let mut anchor = raw_anchor;
    while anchor.end() <= reference.start {
        anchor = anchor.shift(Grain::Day, 1);
    }
    cyclic_pair(anchor, Grain::Day, 1)
}

/// Dispatch for a single-field `TimeDateFields` (exactly one field set,
/// or `hour` possibly paired with `ampm`). Used by [`Predicate::run`] via
/// [`run_time_date`].
pub(crate) fn run_single(fields: &TimeDateFields, reference: TimeObject) -> BiSeq {
    if let Some(n) = fields.second {
        return run_second(n, reference);
    }
    if let Some(n) = fields.minute {
        return run_minute(n, reference);
    }
    if let Some(h) = fields.hour {
        return run_hour(h, fields.ampm, reference);
    }
    if let Some(n) = fields.day_of_week {
        return run_day_of_week(n, reference);
    }
    if let Some(n) = fields.day_of_month {
        return run_day_of_month(n, reference);
    }
    if let Some(n) = fields.month {
        return run_month(n, reference);
    }
    if let Some(n) = fields.year {
        return run_year(n, reference);
    }
    empty_bi_seq()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    fn dt(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, s).unwrap()
    }

    fn reference() -> TimeObject {
        TimeObject::point(dt(2013, 2, 12, 4, 30, 0), Grain::Second)
    }

    #[test]
    fn day_of_week_future_includes_the_current_day_in_progress() {
        // reference is itself a Tuesday; today's occurrence hasn't ended yet.
        let (_, mut future) = run_day_of_week(2, reference());
        let first = future.next().unwrap();
        let second = future.next().unwrap();
        assert!(first.start <= second.start);
        assert_eq!(first.start, dt(2013, 2, 12, 0, 0, 0));
        assert_eq!(second.start, dt(2013, 2, 19, 0, 0, 0));
    }

    #[test]
    fn day_of_week_past_is_strictly_decreasing() {
        let (mut past, _) = run_day_of_week(2, reference());
        let first = past.next().unwrap();
        let second = past.next().unwrap();
        assert!(first.start > second.start);
        assert_eq!(first.start, dt(2013, 2, 5, 0, 0, 0));
    }

    #[test]
    fn day_of_month_skips_short_months() {
        let (_, future) = run_day_of_month(30, reference());
        let hits: Vec<_> = future.take(3).collect();
        // Feb 2013 has 28 days: the 30th cannot occur in Feb, March has 31.
        assert_eq!(hits[0].start.month(), 3);
        assert_eq!(hits[0].start.day(), 30);
    }

    #[test]
    fn hour_12h_pm_resolves_to_16() {
        let (_, mut future) = run_hour(HourField { is_12h: true, hour: 4 }, Some(AmPm::Pm), reference());
        let first = future.next().unwrap();
        assert_eq!(first.start, dt(2013, 2, 12, 16, 0, 0));
    }

    #[test]
    fn month_already_elapsed_advances_a_year() {
        let ref_april = TimeObject::point(dt(2013, 4, 20, 0, 0, 0), Grain::Second);
        let (_, mut future) = run_month(3, ref_april);
        let first = future.next().unwrap();
        assert_eq!(first.start.year(), 2014);
        assert_eq!(first.start.month(), 3);
    }

    #[test]
    fn month_in_progress_stays_this_year() {
        let ref_march = TimeObject::point(dt(2013, 3, 20, 0, 0, 0), Grain::Second);
        let (_, mut future) = run_month(3, ref_march);
        let first = future.next().unwrap();
        assert_eq!(first.start, dt(2013, 3, 1, 0, 0, 0));
    }

    #[test]
    fn two_digit_year_expands_via_fifty_year_window() {
        let (_, mut future) = run_year(13, reference());
        let first = future.next().unwrap();
        assert_eq!(first.start, dt(2013, 1, 1, 0, 0, 0));
    }

    #[test]
    fn ampm_pm_alone_clips_to_current_day() {
        let (_, mut future) = run_ampm_alone(AmPm::Pm, reference(), ctx_for_test());
        let first = future.next().unwrap();
        assert_eq!(first.start, dt(2013, 2, 12, 12, 0, 0));
        assert_eq!(first.end(), dt(2013, 2, 13, 0, 0, 0));
    }

    fn ctx_for_test() -> TimeContext {
        use crate::context::TimeZoneSeries;
        TimeContext::new(reference(), TimeZoneSeries::new(chrono_tz::UTC))
    }
}
