//! Iteration protocol + the operator surface shared by every adapter.
//!
//! `Iterator` is the pull protocol. On top of it:
//! - `Traversal` is the explicit state every adapter carries between pulls.
//! - `Cursor` exposes the "move next / read current" form of the protocol.
//! - `SequenceExt` makes every operator chainable from any iterator.
//!
//! Adapters never pull their upstream again once they report `Exhausted`.

use std::hash::Hash;

use lazyseq_core::{Group, InstanceOf, SeqError};

use crate::distinct::{Distinct, DistinctByScan};
use crate::filter::Where;
use crate::first;
use crate::group::{GroupBy, GroupByKey, GroupByScan};
use crate::map::Select;
use crate::of_type::OfType;
use crate::plan::OpKind;
use crate::quantify;
use crate::sort::OrderBy;

/// Where a single traversal currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    #[default]
    NotStarted,
    /// `step` counts the elements yielded so far.
    InProgress { step: usize },
    Exhausted,
}

impl Traversal {
    pub fn is_exhausted(self) -> bool {
        matches!(self, Traversal::Exhausted)
    }

    /// Elements yielded so far.
    pub fn yielded(self) -> Option<usize> {
        match self {
            Traversal::NotStarted => Some(0),
            Traversal::InProgress { step } => Some(step),
            Traversal::Exhausted => None,
        }
    }

    /// Mark the traversal as started without yielding.
    pub(crate) fn begin(&mut self) {
        if let Traversal::NotStarted = self {
            *self = Traversal::InProgress { step: 0 };
        }
    }

    /// Record one yielded element.
    pub(crate) fn advance(&mut self) {
        *self = match *self {
            Traversal::NotStarted => Traversal::InProgress { step: 1 },
            Traversal::InProgress { step } => Traversal::InProgress { step: step + 1 },
            Traversal::Exhausted => Traversal::Exhausted,
        };
    }

    pub(crate) fn finish(&mut self) {
        *self = Traversal::Exhausted;
    }

    /// Record the outcome of one pull and pass it through.
    pub(crate) fn record<T>(&mut self, item: Option<T>) -> Option<T> {
        match item {
            Some(item) => {
                self.advance();
                Some(item)
            }
            None => {
                self.finish();
                None
            }
        }
    }
}

/// Implemented by every sequence-producing adapter.
pub trait Operator {
    fn kind(&self) -> OpKind;

    /// Current position of this adapter's traversal.
    fn traversal(&self) -> Traversal;
}

/// "Has next / get current" view over any iterator.
///
/// `move_next` pulls exactly one element; `current` reads it back as many
/// times as needed without pulling again.
#[derive(Debug, Clone)]
pub struct Cursor<I: Iterator> {
    source: I,
    current: Option<I::Item>,
    state: Traversal,
}

impl<I: Iterator> Cursor<I> {
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            source: source.into_iter(),
            current: None,
            state: Traversal::NotStarted,
        }
    }

    /// Advance one element. Returns `false` once the source is exhausted,
    /// and keeps returning `false` without touching the source again.
    pub fn move_next(&mut self) -> bool {
        if self.state.is_exhausted() {
            return false;
        }
        self.current = self.state.record(self.source.next());
        self.current.is_some()
    }

    /// The element produced by the last successful `move_next`.
    pub fn current(&self) -> Option<&I::Item> {
        self.current.as_ref()
    }

    /// Take ownership of the current element, leaving the cursor positioned
    /// but empty until the next `move_next`.
    pub fn take_current(&mut self) -> Option<I::Item> {
        self.current.take()
    }

    pub fn traversal(&self) -> Traversal {
        self.state
    }
}

/// Chainable operator methods for every iterator.
pub trait SequenceExt: Iterator + Sized {
    /// Lazily keep the elements for which `predicate` holds.
    fn where_matching<P>(self, predicate: P) -> Where<Self, P>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        Where::new(self, predicate)
    }

    /// Lazily map every element through `selector`.
    fn select<R, F>(self, selector: F) -> Select<Self, F>
    where
        F: FnMut(Self::Item) -> R,
    {
        Select::new(self, selector)
    }

    /// Lazily keep the elements that are instances of `T`, as `T`.
    fn of_type<T>(self) -> OfType<Self, T>
    where
        Self::Item: InstanceOf<T>,
    {
        OfType::new(self)
    }

    /// First element satisfying `predicate`, or `SeqError::NoMatch`.
    fn first_matching<P>(self, predicate: P) -> Result<Self::Item, SeqError>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        first::first(self, predicate)
    }

    /// First element satisfying `predicate`, or `Default::default()`.
    fn first_or_default<P>(self, predicate: P) -> Self::Item
    where
        P: FnMut(&Self::Item) -> bool,
        Self::Item: Default,
    {
        first::first_or_default(self, predicate)
    }

    /// First element satisfying `predicate`, or `fallback`.
    fn first_or<P>(self, predicate: P, fallback: Self::Item) -> Self::Item
    where
        P: FnMut(&Self::Item) -> bool,
    {
        first::first_or(self, predicate, fallback)
    }

    /// First element, or `SeqError::Empty`.
    fn first_element(self) -> Result<Self::Item, SeqError> {
        first::first_element(self)
    }

    /// Bucket by key, project each element, then reduce each bucket.
    /// Consumes the whole source on the first pull.
    fn group_by<K, E, R, KF, EF, RF>(
        self,
        key_selector: KF,
        element_selector: EF,
        result_selector: RF,
    ) -> GroupBy<Self, K, E, KF, EF, RF>
    where
        K: Eq + Hash + Clone,
        KF: FnMut(&Self::Item) -> K,
        EF: FnMut(Self::Item) -> E,
        RF: FnMut(K, Vec<E>) -> R,
    {
        GroupBy::new(self, key_selector, element_selector, result_selector)
    }

    /// `group_by` for keys that only offer `PartialEq`, such as floats.
    fn group_by_scan<K, E, R, KF, EF, RF>(
        self,
        key_selector: KF,
        element_selector: EF,
        result_selector: RF,
    ) -> GroupByScan<Self, K, E, KF, EF, RF>
    where
        K: PartialEq,
        KF: FnMut(&Self::Item) -> K,
        EF: FnMut(Self::Item) -> E,
        RF: FnMut(K, Vec<E>) -> R,
    {
        GroupByScan::new(self, key_selector, element_selector, result_selector)
    }

    /// Bucket by key, yielding the raw `Group`s.
    fn group_by_key<K, KF>(self, key_selector: KF) -> GroupByKey<Self, K, KF>
    where
        K: Eq + Hash + Clone,
        KF: FnMut(&Self::Item) -> K,
    {
        GroupBy::new(
            self,
            key_selector,
            std::convert::identity as fn(Self::Item) -> Self::Item,
            Group::from_parts as fn(K, Vec<Self::Item>) -> Group<K, Self::Item>,
        )
    }

    /// Stable ascending sort by key. Consumes the whole source on the first pull.
    fn order_by<K, KF>(self, key_selector: KF) -> OrderBy<Self, K, KF>
    where
        K: Ord,
        KF: FnMut(&Self::Item) -> K,
    {
        OrderBy::ascending(self, key_selector)
    }

    /// Stable descending sort by key.
    fn order_by_descending<K, KF>(self, key_selector: KF) -> OrderBy<Self, K, KF>
    where
        K: Ord,
        KF: FnMut(&Self::Item) -> K,
    {
        OrderBy::descending(self, key_selector)
    }

    /// Lazily drop elements equal to one already yielded (hash-based).
    fn distinct(self) -> Distinct<Self>
    where
        Self::Item: Eq + Hash + Clone,
    {
        Distinct::new(self)
    }

    /// Like [`SequenceExt::distinct`] but only needs `PartialEq`; O(n) per element.
    fn distinct_by_scan(self) -> DistinctByScan<Self>
    where
        Self::Item: PartialEq + Clone,
    {
        DistinctByScan::new(self)
    }

    /// Whether the sequence has at least one element. Pulls at most once.
    fn any_element(self) -> bool {
        quantify::any_element(self)
    }

    fn any_matching<P>(self, predicate: P) -> bool
    where
        P: FnMut(&Self::Item) -> bool,
    {
        quantify::any_matching(self, predicate)
    }

    fn all_matching<P>(self, predicate: P) -> bool
    where
        P: FnMut(&Self::Item) -> bool,
    {
        quantify::all_matching(self, predicate)
    }
}

impl<I: Iterator> SequenceExt for I {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn cursor_reads_current_without_pulling() {
        let pulls = Cell::new(0);
        let source = [9, 34, 65].into_iter().inspect(|_| pulls.set(pulls.get() + 1));
        let mut cursor = Cursor::new(source);

        assert_eq!(cursor.traversal(), Traversal::NotStarted);
        assert_eq!(cursor.current(), None);

        assert!(cursor.move_next());
        assert_eq!(cursor.current(), Some(&9));
        assert_eq!(cursor.current(), Some(&9));
        assert_eq!(pulls.get(), 1);
        assert_eq!(cursor.traversal(), Traversal::InProgress { step: 1 });

        assert!(cursor.move_next());
        assert_eq!(cursor.take_current(), Some(34));
        assert_eq!(cursor.current(), None);
        assert!(cursor.move_next());
        assert!(!cursor.move_next());
        assert_eq!(cursor.traversal(), Traversal::Exhausted);
        assert_eq!(pulls.get(), 3);
    }

    #[test]
    fn exhausted_cursor_stays_exhausted() {
        let mut flip = false;
        // Yields None, then Some forever; a fused cursor must never see the Some.
        let flaky = std::iter::from_fn(move || {
            flip = !flip;
            if flip {
                None
            } else {
                Some(1)
            }
        });
        let mut cursor = Cursor::new(flaky);
        assert!(!cursor.move_next());
        assert!(!cursor.move_next());
        assert!(!cursor.move_next());
    }

    #[test]
    fn traversal_counts_yields() {
        let mut t = Traversal::default();
        assert_eq!(t.yielded(), Some(0));
        t.begin();
        assert_eq!(t, Traversal::InProgress { step: 0 });
        t.advance();
        t.advance();
        assert_eq!(t.yielded(), Some(2));
        assert_eq!(t.record::<u8>(None), None);
        assert!(t.is_exhausted());
        t.advance();
        assert!(t.is_exhausted());
    }

    #[test]
    fn operators_chain() {
        let out: Vec<i32> = (1..=10)
            .where_matching(|x| x % 2 == 0)
            .select(|x| x * x)
            .order_by_descending(|x| *x)
            .collect();
        assert_eq!(out, vec![100, 64, 36, 16, 4]);
    }
}
