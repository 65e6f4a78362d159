//! Micro-benchmarks for the composer/resolver hot path.

use std::rc::Rc;

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chronopred::context::TimeZoneSeries;
use chronopred::predicate::{day_of_month, day_of_week, hour, intersect, month};
use chronopred::resolver::{resolve, Context, TimeData};

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

fn bench_single_field(c: &mut Criterion) {
    let ctx = ctx();
    c.bench_function("resolve day_of_week", |b| {
        b.iter(|| resolve(&data(day_of_week(black_box(2))), &ctx))
    });
}

fn bench_composed_intersection(c: &mut Criterion) {
    let ctx = ctx();
    c.bench_function("resolve hour ∩ day_of_week", |b| {
        b.iter(|| resolve(&data(intersect(hour(false, black_box(16)), day_of_week(2))), &ctx))
    });
}

fn bench_vacuous_intersection(c: &mut Criterion) {
    // Exercises the SAFE_MAX-bounded search for an unsatisfiable
    // conjunction (no February has 30 days).
    let ctx = ctx();
    c.bench_function("resolve unsatisfiable february 30th", |b| {
        b.iter(|| resolve(&data(intersect(month(2), day_of_month(30))), &ctx))
    });
}

criterion_group!(
    benches,
    bench_single_field,
    bench_composed_intersection,
    bench_vacuous_intersection
);
criterion_main!(benches);
