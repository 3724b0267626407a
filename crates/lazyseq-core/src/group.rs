//! Materialized groups produced by `group_by`.

use serde::{Deserialize, Serialize};

/// A key paired with every element that mapped to it, in source order.
///
/// Groups are built eagerly; once a grouping operator hands one out it no
/// longer references the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group<K, E> {
    key: K,
    #[serde(rename = "values")]
    elements: Vec<E>,
}

impl<K, E> Group<K, E> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            elements: Vec::new(),
        }
    }

    pub fn from_parts(key: K, elements: Vec<E>) -> Self {
        Self { key, elements }
    }

    /// Append an element to the end of the bucket.
    pub fn push(&mut self, element: E) {
        self.elements.push(element);
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.elements.iter()
    }

    pub fn into_parts(self) -> (K, Vec<E>) {
        (self.key, self.elements)
    }
}

impl<K, E> IntoIterator for Group<K, E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a, K, E> IntoIterator for &'a Group<K, E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_insertion_order() {
        let mut group = Group::new("odd");
        group.push(1);
        group.push(3);
        assert_eq!(group.key(), &"odd");
        assert_eq!(group.elements(), &[1, 3]);
        assert_eq!(group.len(), 2);
        assert!(!group.is_empty());
    }

    #[test]
    fn serializes_elements_as_values() {
        let group = Group::from_parts(0, vec![2, 4]);
        assert_eq!(
            serde_json::to_string(&group).unwrap(),
            r#"{"key":0,"values":[2,4]}"#
        );
    }

    #[test]
    fn iterates_by_ref_and_by_value() {
        let group = Group::from_parts('k', vec![10, 20]);
        let sum: i32 = (&group).into_iter().sum();
        assert_eq!(sum, 30);
        let (key, elements) = group.clone().into_parts();
        assert_eq!((key, elements), ('k', vec![10, 20]));
        assert_eq!(group.into_iter().collect::<Vec<_>>(), vec![10, 20]);
    }
}
