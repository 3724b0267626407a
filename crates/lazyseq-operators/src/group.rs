//! `GroupBy`: key bucketing with element and result projection.
//!
//! Grouping cannot be incremental: a key's bucket is only complete once the
//! whole source has been seen. The adapter is still lazy about *when* it does
//! that work (nothing happens until the first pull), but the first pull
//! consumes the entire source.

use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;

use lazyseq_core::Group;

use crate::bucket::{KeyedBuckets, ScannedBuckets, Stage};
use crate::plan::OpKind;
use crate::traits::{Operator, Traversal};

/// `GroupBy` with identity elements and `Group` results.
pub type GroupByKey<I, K, KF> = GroupBy<
    I,
    K,
    <I as Iterator>::Item,
    KF,
    fn(<I as Iterator>::Item) -> <I as Iterator>::Item,
    fn(K, Vec<<I as Iterator>::Item>) -> Group<K, <I as Iterator>::Item>,
>;

/// Yields `result_selector(key, bucket)` once per distinct key, in the order
/// keys were first seen.
///
/// For each source element the key selector runs first, then the element
/// selector; both run exactly once per element, in source order.
#[must_use = "sequences are lazy and do nothing unless traversed"]
pub struct GroupBy<I, K, E, KF, EF, RF> {
    stage: Stage<(I, KF, EF), (K, Vec<E>)>,
    result_selector: RF,
    state: Traversal,
}

impl<I, K, E, KF, EF, RF> GroupBy<I, K, E, KF, EF, RF> {
    pub fn new(source: I, key_selector: KF, element_selector: EF, result_selector: RF) -> Self {
        Self {
            stage: Stage::Pending((source, key_selector, element_selector)),
            result_selector,
            state: Traversal::NotStarted,
        }
    }
}

/// `GroupBy(source, keySelector, elementSelector, resultSelector)`.
pub fn group_by<S, K, E, R, KF, EF, RF>(
    source: S,
    key_selector: KF,
    element_selector: EF,
    result_selector: RF,
) -> GroupBy<S::IntoIter, K, E, KF, EF, RF>
where
    S: IntoIterator,
    K: Eq + Hash + Clone,
    KF: FnMut(&S::Item) -> K,
    EF: FnMut(S::Item) -> E,
    RF: FnMut(K, Vec<E>) -> R,
{
    GroupBy::new(
        source.into_iter(),
        key_selector,
        element_selector,
        result_selector,
    )
}

/// Group elements by key, yielding each bucket as a [`Group`].
pub fn group_by_key<S, K, KF>(source: S, key_selector: KF) -> GroupByKey<S::IntoIter, K, KF>
where
    S: IntoIterator,
    K: Eq + Hash + Clone,
    KF: FnMut(&S::Item) -> K,
{
    crate::traits::SequenceExt::group_by_key(source.into_iter(), key_selector)
}

fn materialize<I, K, E, KF, EF>(
    (source, mut key_selector, mut element_selector): (I, KF, EF),
) -> Vec<(K, Vec<E>)>
where
    I: Iterator,
    K: Eq + Hash + Clone,
    KF: FnMut(&I::Item) -> K,
    EF: FnMut(I::Item) -> E,
{
    let mut buckets = KeyedBuckets::new();
    let mut _elements = 0usize;
    for item in source {
        let key = key_selector(&item);
        buckets.insert(key, element_selector(item));
        _elements += 1;
    }
    #[cfg(feature = "tracing")]
    tracing::trace!(
        operator = "group_by",
        elements = _elements,
        groups = buckets.len(),
        "materialized source"
    );
    buckets.into_buckets()
}

impl<I, K, E, R, KF, EF, RF> Iterator for GroupBy<I, K, E, KF, EF, RF>
where
    I: Iterator,
    K: Eq + Hash + Clone,
    KF: FnMut(&I::Item) -> K,
    EF: FnMut(I::Item) -> E,
    RF: FnMut(K, Vec<E>) -> R,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        let bucket = self.stage.pull(materialize);
        let (key, elements) = self.state.record(bucket)?;
        Some((self.result_selector)(key, elements))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.stage.remaining() {
            Some(n) => (n, Some(n)),
            None => (0, None),
        }
    }
}

impl<I, K, E, R, KF, EF, RF> FusedIterator for GroupBy<I, K, E, KF, EF, RF>
where
    I: Iterator,
    K: Eq + Hash + Clone,
    KF: FnMut(&I::Item) -> K,
    EF: FnMut(I::Item) -> E,
    RF: FnMut(K, Vec<E>) -> R,
{
}

impl<I, K, E, KF, EF, RF> Operator for GroupBy<I, K, E, KF, EF, RF> {
    fn kind(&self) -> OpKind {
        OpKind::GroupBy
    }

    fn traversal(&self) -> Traversal {
        self.state
    }
}

impl<I, K, E, KF, EF, RF> fmt::Debug for GroupBy<I, K, E, KF, EF, RF> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupBy")
            .field("remaining", &self.stage.remaining())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// `GroupBy` for keys that only offer `PartialEq` (e.g. `f64`).
///
/// Same ordering and selector contract as [`GroupBy`]; key lookup is a linear
/// scan over the keys seen so far.
#[must_use = "sequences are lazy and do nothing unless traversed"]
pub struct GroupByScan<I, K, E, KF, EF, RF> {
    stage: Stage<(I, KF, EF), (K, Vec<E>)>,
    result_selector: RF,
    state: Traversal,
}

impl<I, K, E, KF, EF, RF> GroupByScan<I, K, E, KF, EF, RF> {
    pub fn new(source: I, key_selector: KF, element_selector: EF, result_selector: RF) -> Self {
        Self {
            stage: Stage::Pending((source, key_selector, element_selector)),
            result_selector,
            state: Traversal::NotStarted,
        }
    }
}

pub fn group_by_scan<S, K, E, R, KF, EF, RF>(
    source: S,
    key_selector: KF,
    element_selector: EF,
    result_selector: RF,
) -> GroupByScan<S::IntoIter, K, E, KF, EF, RF>
where
    S: IntoIterator,
    K: PartialEq,
    KF: FnMut(&S::Item) -> K,
    EF: FnMut(S::Item) -> E,
    RF: FnMut(K, Vec<E>) -> R,
{
    GroupByScan::new(
        source.into_iter(),
        key_selector,
        element_selector,
        result_selector,
    )
}

fn materialize_scanned<I, K, E, KF, EF>(
    (source, mut key_selector, mut element_selector): (I, KF, EF),
) -> Vec<(K, Vec<E>)>
where
    I: Iterator,
    K: PartialEq,
    KF: FnMut(&I::Item) -> K,
    EF: FnMut(I::Item) -> E,
{
    let mut buckets = ScannedBuckets::new();
    for item in source {
        let key = key_selector(&item);
        buckets.insert(key, element_selector(item));
    }
    #[cfg(feature = "tracing")]
    tracing::trace!(operator = "group_by_scan", groups = buckets.len(), "materialized source");
    buckets.into_buckets()
}

impl<I, K, E, R, KF, EF, RF> Iterator for GroupByScan<I, K, E, KF, EF, RF>
where
    I: Iterator,
    K: PartialEq,
    KF: FnMut(&I::Item) -> K,
    EF: FnMut(I::Item) -> E,
    RF: FnMut(K, Vec<E>) -> R,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        let bucket = self.stage.pull(materialize_scanned);
        let (key, elements) = self.state.record(bucket)?;
        Some((self.result_selector)(key, elements))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.stage.remaining() {
            Some(n) => (n, Some(n)),
            None => (0, None),
        }
    }
}

impl<I, K, E, R, KF, EF, RF> FusedIterator for GroupByScan<I, K, E, KF, EF, RF>
where
    I: Iterator,
    K: PartialEq,
    KF: FnMut(&I::Item) -> K,
    EF: FnMut(I::Item) -> E,
    RF: FnMut(K, Vec<E>) -> R,
{
}

impl<I, K, E, KF, EF, RF> Operator for GroupByScan<I, K, E, KF, EF, RF> {
    fn kind(&self) -> OpKind {
        OpKind::GroupBy
    }

    fn traversal(&self) -> Traversal {
        self.state
    }
}

impl<I, K, E, KF, EF, RF> fmt::Debug for GroupByScan<I, K, E, KF, EF, RF> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupByScan")
            .field("remaining", &self.stage.remaining())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
