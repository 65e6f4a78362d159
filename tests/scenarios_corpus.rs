//! Integration tests exercising `resolve` end to end against the
//! concrete scenarios fixed at reference = 2013-02-12T04:30:00 UTC,
//! zone America/Los_Angeles.

use std::rc::Rc;

use chrono::{Datelike, TimeZone, Timelike, Utc};

use chronopred::context::TimeZoneSeries;
use chronopred::predicate::{ampm, day_of_month, day_of_week, hour, intersect, month, year, AmPm};
use chronopred::resolver::{resolve, Context, TimeData};
use chronopred::value::SingleTimeValue;
use chronopred::Grain;

fn ctx() -> Context {
    Context {
        reference: Utc.with_ymd_and_hms(2013, 2, 12, 4, 30, 0).unwrap(),
        tz_series: TimeZoneSeries::new(chrono_tz::America::Los_Angeles),
    }
}

fn data(predicate: chronopred::Predicate) -> TimeData {
    TimeData {
        predicate: Rc::new(predicate),
        latent: false,
        time_grain: None,
        not_immediate: false,
        direction: None,
    }
}

#[test]
fn tuesday_resolves_to_the_next_weeks_tuesday_when_not_immediate() {
    // `ahead` is the unconditional `future.take(3)` (src/resolver.rs), built
    // before `not_immediate` is applied: the current Tuesday (Feb 12), then
    // the next two. `not_immediate` then skips ahead[0] since it overlaps
    // the reference, choosing ahead[1]. Every hit is UTC midnight; rendered
    // in America/Los_Angeles (-08:00 in February) the local calendar date
    // falls back by one day.
    let mut d = data(day_of_week(2));
    d.not_immediate = true;
    let resolved = resolve(&d, &ctx()).unwrap();
    let SingleTimeValue::Simple(chosen) = resolved.chosen else {
        panic!("expected Simple");
    };
    assert_eq!(chosen.grain, Grain::Day);
    assert_eq!(chosen.value.date_naive(), chrono::NaiveDate::from_ymd_opt(2013, 2, 18).unwrap());

    let dates: Vec<_> = resolved
        .alternatives
        .iter()
        .map(|v| match v {
            SingleTimeValue::Simple(i) => i.value.date_naive(),
            _ => panic!("expected Simple"),
        })
        .collect();
    assert_eq!(
        dates,
        vec![
            chrono::NaiveDate::from_ymd_opt(2013, 2, 11).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2013, 2, 18).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2013, 2, 25).unwrap(),
        ]
    );
}

#[test]
fn twelve_hour_pm_without_not_immediate_resolves_today_at_four() {
    let d = data(intersect(hour(true, 4), ampm(AmPm::Pm)));
    let resolved = resolve(&d, &ctx()).unwrap();
    let SingleTimeValue::Simple(chosen) = resolved.chosen else {
        panic!("expected Simple");
    };
    assert_eq!(chosen.grain, Grain::Hour);
    assert_eq!(chosen.value.date_naive(), chrono::NaiveDate::from_ymd_opt(2013, 2, 12).unwrap());
    assert_eq!(chosen.value.hour(), 8); // 16:00 UTC == 08:00 PST
}

#[test]
fn february_thirtieth_is_unsatisfiable() {
    let d = data(intersect(month(2), day_of_month(30)));
    assert!(resolve(&d, &ctx()).is_none());
}

#[test]
fn march_with_not_immediate_skips_to_next_march_when_already_in_march() {
    let march_ref = Context {
        reference: Utc.with_ymd_and_hms(2013, 3, 15, 0, 0, 0).unwrap(),
        ..ctx()
    };
    let mut d = data(month(3));
    d.not_immediate = true;
    let resolved = resolve(&d, &march_ref).unwrap();
    let SingleTimeValue::Simple(chosen) = resolved.chosen else {
        panic!("expected Simple");
    };
    assert_eq!(chosen.value.year(), 2014);
}

#[test]
fn march_with_not_immediate_is_unaffected_when_ref_is_in_february() {
    // notImmediate only skips a match that overlaps ref; March doesn't
    // overlap a February reference, so it is chosen outright.
    let mut d = data(month(3));
    d.not_immediate = true;
    let resolved = resolve(&d, &ctx()).unwrap();
    let SingleTimeValue::Simple(chosen) = resolved.chosen else {
        panic!("expected Simple");
    };
    assert_eq!(chosen.value.year(), 2013);
    assert_eq!(chosen.value.month(), 3);
}

#[test]
fn two_digit_year_resolves_to_year_grain_new_years_day() {
    let resolved = resolve(&data(year(13)), &ctx()).unwrap();
    let SingleTimeValue::Simple(chosen) = resolved.chosen else {
        panic!("expected Simple");
    };
    assert_eq!(chosen.grain, Grain::Year);
    assert_eq!(chosen.value.year(), 2013);
    assert_eq!(chosen.value.month(), 1);
    assert_eq!(chosen.value.day(), 1);
}

#[test]
fn ampm_alone_clips_to_the_current_day_at_hour_grain() {
    let resolved = resolve(&data(ampm(AmPm::Pm)), &ctx()).unwrap();
    match resolved.chosen {
        SingleTimeValue::Interval(from, to) => {
            assert_eq!(from.grain, Grain::Hour);
            assert_eq!(from.value.hour(), 4); // 12:00 UTC rendered in PST (-08:00)
            assert_eq!(to.value.hour(), 16); // 00:00Z next day rendered in PST
        }
        other => panic!("expected Interval, got {other:?}"),
    }
}
