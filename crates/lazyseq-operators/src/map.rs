//! `Select`: lazy per-element projection.

use std::fmt;
use std::iter::FusedIterator;

use crate::plan::OpKind;
use crate::traits::{Operator, Traversal};

/// Yields `selector(element)` for every element of `source`, in order.
#[derive(Clone)]
#[must_use = "sequences are lazy and do nothing unless traversed"]
pub struct Select<I, F> {
    source: I,
    selector: F,
    state: Traversal,
}

impl<I, F> Select<I, F> {
    pub fn new(source: I, selector: F) -> Self {
        Self {
            source,
            selector,
            state: Traversal::NotStarted,
        }
    }
}

/// `Select(source, selector)`.
pub fn select<S, R, F>(source: S, selector: F) -> Select<S::IntoIter, F>
where
    S: IntoIterator,
    F: FnMut(S::Item) -> R,
{
    Select::new(source.into_iter(), selector)
}

impl<I, R, F> Iterator for Select<I, F>
where
    I: Iterator,
    F: FnMut(I::Item) -> R,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        if self.state.is_exhausted() {
            return None;
        }
        let item = self.source.next().map(&mut self.selector);
        self.state.record(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state.is_exhausted() {
            (0, Some(0))
        } else {
            self.source.size_hint()
        }
    }
}

impl<I, R, F> ExactSizeIterator for Select<I, F>
where
    I: ExactSizeIterator,
    F: FnMut(I::Item) -> R,
{
}

impl<I, R, F> FusedIterator for Select<I, F>
where
    I: Iterator,
    F: FnMut(I::Item) -> R,
{
}

impl<I, F> Operator for Select<I, F> {
    fn kind(&self) -> OpKind {
        OpKind::Select
    }

    fn traversal(&self) -> Traversal {
        self.state
    }
}

impl<I: fmt::Debug, F> fmt::Debug for Select<I, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("source", &self.source)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squares_one_to_ten() {
        let squares: Vec<i32> = select(1..=10, |x| x * x).collect();
        assert_eq!(squares, vec![1, 4, 9, 16, 25, 36, 49, 64, 81, 100]);
    }

    #[test]
    fn preserves_length() {
        let seq = select(vec!["a", "bb", "ccc"], str::len);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn selector_runs_only_on_pull() {
        let mut calls = 0;
        {
            let mut seq = select(0..100, |x| {
                calls += 1;
                x + 1
            });
            assert_eq!(seq.next(), Some(1));
            assert_eq!(seq.next(), Some(2));
        }
        assert_eq!(calls, 2);
    }

    #[test]
    fn clone_restarts_from_clone_point() {
        let mut seq = select(vec![1, 2, 3], |x| x * 10);
        assert_eq!(seq.next(), Some(10));
        let rest: Vec<i32> = seq.clone().collect();
        assert_eq!(rest, vec![20, 30]);
        assert_eq!(seq.traversal(), Traversal::InProgress { step: 1 });
    }
}
