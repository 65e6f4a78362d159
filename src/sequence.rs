//! The lazy bidirectional sequence type shared by runners and the composer.

use crate::time_object::TimeObject;

/// A lazily-generated, possibly unbounded sequence of matches.
///
/// Laziness here is a data-structure property, not a scheduling one (§5):
/// a `TimeSeq` is an iterator that computes its next element on demand.
/// Callers are responsible for taking bounded prefixes — no `TimeSeq`
/// implementation materializes its full output up front.
pub type TimeSeq = Box<dyn Iterator<Item = TimeObject>>;

/// Both directions of a predicate's match sequence around a reference:
/// `past` strictly decreasing in `start`, `future` non-decreasing.
pub type BiSeq = (TimeSeq, TimeSeq);

/// The empty sequence pair, used by [`crate::predicate::Predicate::Empty`]
/// and by any runner that cannot produce a valid anchor.
pub fn empty_bi_seq() -> BiSeq {
    (Box::new(std::iter::empty()), Box::new(std::iter::empty()))
}
