//! `Where`: lazy predicate filtering.

use std::fmt;
use std::iter::FusedIterator;

use crate::plan::OpKind;
use crate::traits::{Operator, Traversal};

/// Yields the elements of `source`, in order, for which `predicate` holds.
///
/// The predicate runs exactly once per pulled source element, interleaved with
/// the consumer's pulls, so infinite sources are fine.
#[derive(Clone)]
#[must_use = "sequences are lazy and do nothing unless traversed"]
pub struct Where<I, P> {
    source: I,
    predicate: P,
    state: Traversal,
}

impl<I, P> Where<I, P> {
    pub fn new(source: I, predicate: P) -> Self {
        Self {
            source,
            predicate,
            state: Traversal::NotStarted,
        }
    }
}

/// `Where(source, predicate)`.
pub fn where_matching<S, P>(source: S, predicate: P) -> Where<S::IntoIter, P>
where
    S: IntoIterator,
    P: FnMut(&S::Item) -> bool,
{
    Where::new(source.into_iter(), predicate)
}

impl<I, P> Iterator for Where<I, P>
where
    I: Iterator,
    P: FnMut(&I::Item) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.state.is_exhausted() {
            return None;
        }
        self.state.begin();
        while let Some(item) = self.source.next() {
            if (self.predicate)(&item) {
                self.state.advance();
                return Some(item);
            }
        }
        self.state.finish();
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state.is_exhausted() {
            return (0, Some(0));
        }
        // Can't know how many elements pass
        (0, self.source.size_hint().1)
    }
}

impl<I, P> FusedIterator for Where<I, P>
where
    I: Iterator,
    P: FnMut(&I::Item) -> bool,
{
}

impl<I, P> Operator for Where<I, P> {
    fn kind(&self) -> OpKind {
        OpKind::Where
    }

    fn traversal(&self) -> Traversal {
        self.state
    }
}

impl<I: fmt::Debug, P> fmt::Debug for Where<I, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Where")
            .field("source", &self.source)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn keeps_matching_elements_in_order() {
        let fruits = [
            "apple",
            "passionfruit",
            "banana",
            "mango",
            "orange",
            "blueberry",
            "grape",
            "strawberry",
        ];
        let short: Vec<&str> = where_matching(fruits, |f| f.len() < 6).collect();
        assert_eq!(short, vec!["apple", "mango", "grape"]);
    }

    #[test]
    fn predicate_calls_interleave_with_pulls() {
        let log = RefCell::new(Vec::new());
        let mut seq = where_matching(1..=6, |x| {
            log.borrow_mut().push(format!("test {x}"));
            x % 3 == 0
        });

        assert!(log.borrow().is_empty(), "nothing runs before the first pull");
        assert_eq!(seq.next(), Some(3));
        assert_eq!(*log.borrow(), vec!["test 1", "test 2", "test 3"]);
        assert_eq!(seq.traversal(), Traversal::InProgress { step: 1 });

        assert_eq!(seq.next(), Some(6));
        assert_eq!(log.borrow().len(), 6);
        assert_eq!(seq.next(), None);
        assert_eq!(seq.traversal(), Traversal::Exhausted);
    }

    #[test]
    fn works_on_infinite_sources() {
        let first_three: Vec<u64> = where_matching(0u64.., |x| x % 7 == 0).take(3).collect();
        assert_eq!(first_three, vec![0, 7, 14]);
    }

    #[test]
    fn borrowed_source_is_left_untouched() {
        let numbers = vec![5, 10, 15];
        let big: Vec<&i32> = where_matching(&numbers, |x| **x > 7).collect();
        assert_eq!(big, vec![&10, &15]);
        assert_eq!(numbers, vec![5, 10, 15]);
    }

    #[test]
    fn size_hint_is_bounded_by_source() {
        let seq = where_matching(vec![1, 2, 3], |_| true);
        assert_eq!(seq.size_hint(), (0, Some(3)));
        assert_eq!(seq.kind(), OpKind::Where);
    }
}
