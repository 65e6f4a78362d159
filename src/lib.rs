//! A lazy, bidirectional time-predicate engine.
//!
//! Given a symbolic temporal pattern (a [`Predicate`]) and a reference
//! instant, this crate produces the chronologically ordered sequences of
//! concrete calendar intervals — past and future — that satisfy it, and
//! resolves one of them (plus a short lookahead of alternatives) into a
//! rendered, timezone-aware [`TimeValue`]. It does not parse text: callers
//! build predicates themselves (via the smart constructors in
//! [`predicate`]) or receive them from an external parser.
//!
//! ```
//! use std::rc::Rc;
//! use chrono::{TimeZone, Utc};
//! use chronopred::context::TimeZoneSeries;
//! use chronopred::predicate::day_of_week;
//! use chronopred::resolver::{resolve, Context, TimeData};
//!
//! let data = TimeData {
//!     predicate: Rc::new(day_of_week(2)), // Tuesday
//!     latent: false,
//!     time_grain: None,
//!     not_immediate: false,
//!     direction: None,
//! };
//! let ctx = Context {
//!     reference: Utc.with_ymd_and_hms(2013, 2, 12, 4, 30, 0).unwrap(),
//!     tz_series: TimeZoneSeries::new(chrono_tz::America::Los_Angeles),
//! };
//! let resolved = resolve(&data, &ctx).unwrap();
//! assert_eq!(resolved.alternatives.len(), 3);
//! ```

#![warn(clippy::arithmetic_side_effects)]

mod composer;
pub mod context;
pub mod grain;
pub mod predicate;
pub mod resolver;
mod runners;
pub mod sequence;
pub mod time_object;
pub mod value;

pub use context::{TimeContext, TimeZoneSeries};
pub use grain::Grain;
pub use predicate::Predicate;
pub use resolver::{resolve, Context, TimeData};
pub use sequence::{BiSeq, TimeSeq};
pub use time_object::TimeObject;
pub use value::{Direction, InstantValue, SingleTimeValue, TimeValue};
