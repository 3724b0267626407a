//! `Distinct`: first-occurrence de-duplication.
//!
//! Unlike grouping and ordering this stays lazy: an element is yielded the
//! moment it is first seen. The seen-set grows with the number of distinct
//! elements and lives as long as the adapter.

use std::collections::HashSet;
use std::hash::Hash;
use std::iter::FusedIterator;

use crate::plan::OpKind;
use crate::traits::{Operator, Traversal};

/// Hash-based distinct: O(1) expected membership checks.
#[derive(Debug, Clone)]
#[must_use = "sequences are lazy and do nothing unless traversed"]
pub struct Distinct<I: Iterator> {
    source: I,
    seen: HashSet<I::Item>,
    state: Traversal,
}

impl<I: Iterator> Distinct<I> {
    pub fn new(source: I) -> Self {
        Self {
            source,
            seen: HashSet::new(),
            state: Traversal::NotStarted,
        }
    }
}

/// `Distinct(source)`.
pub fn distinct<S>(source: S) -> Distinct<S::IntoIter>
where
    S: IntoIterator,
    S::Item: Eq + Hash + Clone,
{
    Distinct::new(source.into_iter())
}

impl<I> Iterator for Distinct<I>
where
    I: Iterator,
    I::Item: Eq + Hash + Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.state.is_exhausted() {
            return None;
        }
        self.state.begin();
        for item in self.source.by_ref() {
            if !self.seen.contains(&item) {
                self.seen.insert(item.clone());
                self.state.advance();
                return Some(item);
            }
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(operator = "distinct", distinct = self.seen.len(), "source exhausted");
        self.state.finish();
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state.is_exhausted() {
            return (0, Some(0));
        }
        let (lo, hi) = self.source.size_hint();
        // Anything left is a duplicate only if something was already seen.
        let lo = if self.seen.is_empty() { lo.min(1) } else { 0 };
        (lo, hi)
    }
}

impl<I> FusedIterator for Distinct<I>
where
    I: Iterator,
    I::Item: Eq + Hash + Clone,
{
}

impl<I: Iterator> Operator for Distinct<I> {
    fn kind(&self) -> OpKind {
        OpKind::Distinct
    }

    fn traversal(&self) -> Traversal {
        self.state
    }
}

/// Distinct for types that only offer `PartialEq` (e.g. floats).
///
/// Membership is a linear scan of the elements yielded so far, so a full
/// traversal costs O(n * d) comparisons for `d` distinct elements.
#[derive(Debug, Clone)]
#[must_use = "sequences are lazy and do nothing unless traversed"]
pub struct DistinctByScan<I: Iterator> {
    source: I,
    seen: Vec<I::Item>,
    state: Traversal,
}

impl<I: Iterator> DistinctByScan<I> {
    pub fn new(source: I) -> Self {
        Self {
            source,
            seen: Vec::new(),
            state: Traversal::NotStarted,
        }
    }
}

pub fn distinct_by_scan<S>(source: S) -> DistinctByScan<S::IntoIter>
where
    S: IntoIterator,
    S::Item: PartialEq + Clone,
{
    DistinctByScan::new(source.into_iter())
}

impl<I> Iterator for DistinctByScan<I>
where
    I: Iterator,
    I::Item: PartialEq + Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.state.is_exhausted() {
            return None;
        }
        self.state.begin();
        for item in self.source.by_ref() {
            if !self.seen.contains(&item) {
                self.seen.push(item.clone());
                self.state.advance();
                return Some(item);
            }
        }
        self.state.finish();
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state.is_exhausted() {
            (0, Some(0))
        } else {
            (0, self.source.size_hint().1)
        }
    }
}

impl<I> FusedIterator for DistinctByScan<I>
where
    I: Iterator,
    I::Item: PartialEq + Clone,
{
}

impl<I: Iterator> Operator for DistinctByScan<I> {
    fn kind(&self) -> OpKind {
        OpKind::Distinct
    }

    fn traversal(&self) -> Traversal {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_repeats_keeping_first_occurrence() {
        let ages = [21, 46, 46, 55, 17, 21, 55, 55];
        let out: Vec<i32> = distinct(ages).collect();
        assert_eq!(out, vec![21, 46, 55, 17]);

        let short: Vec<i32> = distinct([21, 46, 46, 55]).collect();
        assert_eq!(short, vec![21, 46, 55]);
    }

    #[test]
    fn idempotent() {
        let ages = [3, 1, 3, 2, 1, 1, 4];
        let once: Vec<i32> = distinct(ages).collect();
        let twice: Vec<i32> = distinct(distinct(ages)).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn yields_before_source_is_exhausted() {
        let mut seq = distinct(std::iter::repeat(7).take(1_000).chain(0..));
        assert_eq!(seq.next(), Some(7));
        assert_eq!(seq.next(), Some(0));
        assert_eq!(seq.next(), Some(1));
        assert_eq!(seq.next(), Some(2));
    }

    #[test]
    fn scan_variant_handles_floats() {
        let readings = [1.5, 2.0, 1.5, 0.25, 2.0];
        let out: Vec<f64> = distinct_by_scan(readings).collect();
        assert_eq!(out, vec![1.5, 2.0, 0.25]);
    }

    #[test]
    fn size_hint_lower_bound() {
        let seq = distinct(vec![1, 1, 1]);
        assert_eq!(seq.size_hint(), (1, Some(3)));
        let empty = distinct(Vec::<i32>::new());
        assert_eq!(empty.size_hint(), (0, Some(0)));
    }
}
