//! The predicate algebra: `Empty`, `Series`, `TimeDate` (the bag-of-fields
//! form), and `Intersect` (conjunction), plus the smart constructors that
//! keep their invariants (§4.2).

use std::fmt;
use std::rc::Rc;

use crate::composer;
use crate::context::TimeContext;
use crate::runners;
use crate::sequence::{empty_bi_seq, BiSeq};
use crate::time_object::TimeObject;

/// AM or PM, as carried by an hour field or by a standalone AMPM predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmPm {
    Am,
    Pm,
}

/// An hour constraint: the literal hour value plus whether the source text
/// was 12-hour form (`is_12h`). `hour` is 0–23 for 24h text, 1–12 for 12h
/// text (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourField {
    pub is_12h: bool,
    pub hour: u32,
}

/// The bag-of-fields predicate form. Invariant: at least one field is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeDateFields {
    pub second: Option<u32>,
    pub minute: Option<u32>,
    pub hour: Option<HourField>,
    pub ampm: Option<AmPm>,
    pub day_of_week: Option<u32>,
    pub day_of_month: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl TimeDateFields {
    fn is_empty(&self) -> bool {
        self.second.is_none()
            && self.minute.is_none()
            && self.hour.is_none()
            && self.ampm.is_none()
            && self.day_of_week.is_none()
            && self.day_of_month.is_none()
            && self.month.is_none()
            && self.year.is_none()
    }

    /// `true` if exactly one field is set among `ampm` and the others —
    /// i.e. this is the standalone "AM/PM alone" form (§4.4), not a
    /// combination that happens to carry `ampm` without `hour`.
    pub(crate) fn is_ampm_alone(&self) -> bool {
        self.ampm.is_some()
            && self.hour.is_none()
            && self.second.is_none()
            && self.minute.is_none()
            && self.day_of_week.is_none()
            && self.day_of_month.is_none()
            && self.month.is_none()
            && self.year.is_none()
    }
}

/// An opaque series producer: `(reference, context) -> (past, future)`.
/// `Rc`-wrapped so predicate trees remain cheaply `Clone`.
pub type SeriesFn = Rc<dyn Fn(TimeObject, TimeContext) -> BiSeq>;

/// The predicate algebra (§3).
#[derive(Clone)]
pub enum Predicate {
    /// Matches nothing.
    Empty,
    /// A free-form series function, escaping the TimeDate bag-of-fields
    /// form (used e.g. for the standalone AM/PM runner, §4.4).
    Series(SeriesFn),
    /// The bag-of-fields form.
    TimeDate(TimeDateFields),
    /// Conjunction of two predicates.
    Intersect(Rc<Predicate>, Rc<Predicate>),
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Empty => write!(f, "Empty"),
            Predicate::Series(_) => write!(f, "Series(..)"),
            Predicate::TimeDate(fields) => write!(f, "TimeDate({fields:?})"),
            Predicate::Intersect(a, b) => write!(f, "Intersect({a:?}, {b:?})"),
        }
    }
}

impl Predicate {
    /// Evaluate this predicate around `reference`, bounded by `ctx`.
    /// See §4.3 for the sequence-ordering and past/future-boundary
    /// invariants this must uphold.
    pub fn run(&self, reference: TimeObject, ctx: TimeContext) -> BiSeq {
        match self {
            Predicate::Empty => empty_bi_seq(),
            Predicate::Series(f) => f(reference, ctx),
            Predicate::TimeDate(fields) => runners::run_time_date(fields, reference, ctx),
            Predicate::Intersect(left, right) => {
                composer::compose(Rc::clone(left), Rc::clone(right), reference, ctx)
            }
        }
    }
}

// ============================================================
// Smart constructors (§4.2)
// ============================================================

pub fn second(n: u32) -> Predicate {
    Predicate::TimeDate(TimeDateFields {
        second: Some(n),
        ..Default::default()
    })
}

pub fn minute(n: u32) -> Predicate {
    Predicate::TimeDate(TimeDateFields {
        minute: Some(n),
        ..Default::default()
    })
}

/// `is_12h`: whether the source text was 12-hour form. `n` is 0–23 for 24h
/// text, 1–12 for 12h text.
pub fn hour(is_12h: bool, n: u32) -> Predicate {
    Predicate::TimeDate(TimeDateFields {
        hour: Some(HourField { is_12h, hour: n }),
        ..Default::default()
    })
}

/// An AM/PM constraint. Alone (no `hour` unified in) this is the
/// standalone "AM/PM alone" predicate of §4.4, a daily cycle of clipped
/// 12-hour intervals; intersected with an `hour` predicate it instead
/// disambiguates that hour's canonical 24h value (§4.2, §4.4).
pub fn ampm(which: AmPm) -> Predicate {
    Predicate::TimeDate(TimeDateFields {
        ampm: Some(which),
        ..Default::default()
    })
}

/// 1 = Monday … 7 = Sunday.
pub fn day_of_week(n: u32) -> Predicate {
    Predicate::TimeDate(TimeDateFields {
        day_of_week: Some(n),
        ..Default::default()
    })
}

/// 1–31.
pub fn day_of_month(n: u32) -> Predicate {
    Predicate::TimeDate(TimeDateFields {
        day_of_month: Some(n),
        ..Default::default()
    })
}

/// 1–12.
pub fn month(n: u32) -> Predicate {
    Predicate::TimeDate(TimeDateFields {
        month: Some(n),
        ..Default::default()
    })
}

/// Either a 4-digit year or a 2-digit year (expanded at evaluation time
/// per the 50-years-forward window in §4.4).
pub fn year(n: i32) -> Predicate {
    Predicate::TimeDate(TimeDateFields {
        year: Some(n),
        ..Default::default()
    })
}

/// Conjunction, preserving the invariants in §4.2: `Empty` absorbs,
/// two `TimeDate`s unify field-by-field (conflicting fields collapse the
/// whole conjunction to `Empty`), anything else wraps in `Intersect`.
pub fn intersect(p1: Predicate, p2: Predicate) -> Predicate {
    match (p1, p2) {
        (Predicate::Empty, _) | (_, Predicate::Empty) => Predicate::Empty,
        (Predicate::TimeDate(a), Predicate::TimeDate(b)) => match unify(a, b) {
            Some(fields) => Predicate::TimeDate(fields),
            None => Predicate::Empty,
        },
        (a, b) => Predicate::Intersect(Rc::new(a), Rc::new(b)),
    }
}

/// Unify two field bags, field by field. `None` in both -> `None`; `Some`
/// in one -> that value; equal `Some` in both -> that value; unequal
/// `Some` in both -> the whole unification fails (conjunction
/// unsatisfiable).
fn unify(a: TimeDateFields, b: TimeDateFields) -> Option<TimeDateFields> {
    fn merge<T: PartialEq + Copy>(a: Option<T>, b: Option<T>) -> Option<Option<T>> {
        match (a, b) {
            (None, None) => Some(None),
            (Some(v), None) | (None, Some(v)) => Some(Some(v)),
            (Some(x), Some(y)) if x == y => Some(Some(x)),
            _ => None,
        }
    }

    let fields = TimeDateFields {
        second: merge(a.second, b.second)?,
        minute: merge(a.minute, b.minute)?,
        hour: merge(a.hour, b.hour)?,
        ampm: merge(a.ampm, b.ampm)?,
        day_of_week: merge(a.day_of_week, b.day_of_week)?,
        day_of_month: merge(a.day_of_month, b.day_of_month)?,
        month: merge(a.month, b.month)?,
        year: merge(a.year, b.year)?,
    };
    if fields.is_empty() {
        log::trace!("unify: conflicting fields collapse conjunction to Empty");
        None
    } else {
        Some(fields)
    }
}

impl TimeDateFields {
    pub(crate) fn is_ampm_without_hour(&self) -> bool {
        self.ampm.is_some() && self.hour.is_none() && !self.is_ampm_alone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_empty_absorbs() {
        assert!(matches!(intersect(Predicate::Empty, month(3)), Predicate::Empty));
        assert!(matches!(intersect(month(3), Predicate::Empty), Predicate::Empty));
    }

    #[test]
    fn intersect_unifies_disjoint_fields() {
        let p = intersect(month(3), day_of_month(15));
        match p {
            Predicate::TimeDate(fields) => {
                assert_eq!(fields.month, Some(3));
                assert_eq!(fields.day_of_month, Some(15));
            }
            _ => panic!("expected TimeDate"),
        }
    }

    #[test]
    fn intersect_conflicting_fields_is_empty() {
        let p = intersect(month(3), month(4));
        assert!(matches!(p, Predicate::Empty));
    }

    #[test]
    fn intersect_equal_fields_keeps_value() {
        let p = intersect(month(3), month(3));
        match p {
            Predicate::TimeDate(fields) => assert_eq!(fields.month, Some(3)),
            _ => panic!("expected TimeDate"),
        }
    }

    #[test]
    fn intersect_non_timedate_wraps() {
        let series = Predicate::Series(Rc::new(|_reference, _ctx| empty_bi_seq()));
        let p = intersect(series, month(3));
        assert!(matches!(p, Predicate::Intersect(..)));
    }
}
