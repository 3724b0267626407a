//! `OrderBy`: stable sort by key via key buckets.
//!
//! Elements are bucketed by key in one full pass (each bucket keeps source
//! order), then buckets are emitted in key order. Equal keys therefore keep
//! their relative order, which makes the sort stable in both directions.

use std::collections::BTreeMap;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::bucket::Stage;
use crate::plan::OpKind;
use crate::traits::{Operator, Traversal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Yields the elements of `source` ordered by `key_selector`.
///
/// `K: Ord` is the static total-order requirement on keys. The first pull
/// consumes the whole source.
#[must_use = "sequences are lazy and do nothing unless traversed"]
pub struct OrderBy<I: Iterator, K, KF> {
    stage: Stage<(I, KF), I::Item>,
    direction: Direction,
    state: Traversal,
    _key: PhantomData<fn() -> K>,
}

impl<I: Iterator, K, KF> OrderBy<I, K, KF> {
    pub fn new(source: I, key_selector: KF, direction: Direction) -> Self {
        Self {
            stage: Stage::Pending((source, key_selector)),
            direction,
            state: Traversal::NotStarted,
            _key: PhantomData,
        }
    }

    pub fn ascending(source: I, key_selector: KF) -> Self {
        Self::new(source, key_selector, Direction::Ascending)
    }

    pub fn descending(source: I, key_selector: KF) -> Self {
        Self::new(source, key_selector, Direction::Descending)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// `OrderBy(source, keySelector)`.
pub fn order_by<S, K, KF>(source: S, key_selector: KF) -> OrderBy<S::IntoIter, K, KF>
where
    S: IntoIterator,
    K: Ord,
    KF: FnMut(&S::Item) -> K,
{
    OrderBy::ascending(source.into_iter(), key_selector)
}

/// Descending counterpart of [`order_by`]; equal keys still keep source order.
pub fn order_by_descending<S, K, KF>(source: S, key_selector: KF) -> OrderBy<S::IntoIter, K, KF>
where
    S: IntoIterator,
    K: Ord,
    KF: FnMut(&S::Item) -> K,
{
    OrderBy::descending(source.into_iter(), key_selector)
}

fn bucket_sort<I, K, KF>((source, mut key_selector): (I, KF), direction: Direction) -> Vec<I::Item>
where
    I: Iterator,
    K: Ord,
    KF: FnMut(&I::Item) -> K,
{
    let mut buckets: BTreeMap<K, Vec<I::Item>> = BTreeMap::new();
    let mut total = 0usize;
    for item in source {
        buckets.entry(key_selector(&item)).or_default().push(item);
        total += 1;
    }
    #[cfg(feature = "tracing")]
    tracing::trace!(
        operator = "order_by",
        elements = total,
        keys = buckets.len(),
        ?direction,
        "materialized source"
    );

    let mut sorted = Vec::with_capacity(total);
    match direction {
        Direction::Ascending => buckets.into_values().for_each(|b| sorted.extend(b)),
        Direction::Descending => buckets.into_values().rev().for_each(|b| sorted.extend(b)),
    }
    sorted
}

impl<I, K, KF> Iterator for OrderBy<I, K, KF>
where
    I: Iterator,
    K: Ord,
    KF: FnMut(&I::Item) -> K,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        let direction = self.direction;
        let item = self.stage.pull(|pending| bucket_sort(pending, direction));
        self.state.record(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.stage.remaining() {
            Some(n) => (n, Some(n)),
            None => self.pending_hint(),
        }
    }
}

impl<I: Iterator, K, KF> OrderBy<I, K, KF> {
    // Before materializing, the output length is exactly the source length.
    fn pending_hint(&self) -> (usize, Option<usize>) {
        match &self.stage {
            Stage::Pending((source, _)) => source.size_hint(),
            _ => (0, Some(0)),
        }
    }
}

impl<I, K, KF> FusedIterator for OrderBy<I, K, KF>
where
    I: Iterator,
    K: Ord,
    KF: FnMut(&I::Item) -> K,
{
}

impl<I: Iterator, K, KF> Operator for OrderBy<I, K, KF> {
    fn kind(&self) -> OpKind {
        match self.direction {
            Direction::Ascending => OpKind::OrderBy,
            Direction::Descending => OpKind::OrderByDescending,
        }
    }

    fn traversal(&self) -> Traversal {
        self.state
    }
}

impl<I: Iterator, K, KF> fmt::Debug for OrderBy<I, K, KF> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBy")
            .field("direction", &self.direction)
            .field("remaining", &self.stage.remaining())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
