//! `OfType`: lazy runtime type filtering via the `InstanceOf` capability.

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use lazyseq_core::InstanceOf;

use crate::plan::OpKind;
use crate::traits::{Operator, Traversal};

/// Yields the elements of `source` that are instances of `T`, in order.
///
/// Elements that fail the query are dropped without further inspection.
#[must_use = "sequences are lazy and do nothing unless traversed"]
pub struct OfType<I, T> {
    source: I,
    state: Traversal,
    _target: PhantomData<fn() -> T>,
}

impl<I, T> OfType<I, T> {
    pub fn new(source: I) -> Self {
        Self {
            source,
            state: Traversal::NotStarted,
            _target: PhantomData,
        }
    }
}

/// `OfType<T>(source)`.
pub fn of_type<T, S>(source: S) -> OfType<S::IntoIter, T>
where
    S: IntoIterator,
    S::Item: InstanceOf<T>,
{
    OfType::new(source.into_iter())
}

impl<I, T> Iterator for OfType<I, T>
where
    I: Iterator,
    I::Item: InstanceOf<T>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.state.is_exhausted() {
            return None;
        }
        self.state.begin();
        for item in self.source.by_ref() {
            if let Ok(hit) = item.instance_of() {
                self.state.advance();
                return Some(hit);
            }
        }
        self.state.finish();
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state.is_exhausted() {
            return (0, Some(0));
        }
        (0, self.source.size_hint().1)
    }
}

impl<I, T> FusedIterator for OfType<I, T>
where
    I: Iterator,
    I::Item: InstanceOf<T>,
{
}

impl<I: Clone, T> Clone for OfType<I, T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            state: self.state,
            _target: PhantomData,
        }
    }
}

impl<I, T> Operator for OfType<I, T> {
    fn kind(&self) -> OpKind {
        OpKind::OfType
    }

    fn traversal(&self) -> Traversal {
        self.state
    }
}

impl<I: fmt::Debug, T> fmt::Debug for OfType<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfType")
            .field("source", &self.source)
            .field("target", &std::any::type_name::<T>())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyseq_core::Value;
    use std::any::Any;

    fn mixed() -> Vec<Value> {
        vec![
            Value::Int(6),
            Value::Int(5),
            Value::from("apple"),
            Value::from("dfdf"),
            Value::Int(2),
            Value::Int(1),
        ]
    }

    #[test]
    fn keeps_only_strings() {
        let strings: Vec<String> = of_type::<String, _>(mixed()).collect();
        assert_eq!(strings, vec!["apple".to_string(), "dfdf".to_string()]);
    }

    #[test]
    fn keeps_only_ints_in_order() {
        let ints: Vec<i64> = of_type::<i64, _>(mixed()).collect();
        assert_eq!(ints, vec![6, 5, 2, 1]);
    }

    #[test]
    fn no_instances_yields_nothing() {
        let mut floats = of_type::<f64, _>(mixed());
        assert_eq!(floats.next(), None);
        assert!(floats.traversal().is_exhausted());
    }

    #[test]
    fn open_set_through_any() {
        let objects: Vec<Box<dyn Any>> = vec![
            Box::new(6_i32),
            Box::new("apple"),
            Box::new(2.5_f64),
            Box::new("dfdf"),
        ];
        let strs: Vec<&str> = of_type::<&'static str, _>(objects).collect();
        assert_eq!(strs, vec!["apple", "dfdf"]);
    }
}
