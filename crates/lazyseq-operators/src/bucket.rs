//! Internal buffering helpers shared by `group_by` and `order_by`.

use std::collections::HashMap;
use std::hash::Hash;

use lazyseq_core::Group;

/// Explicit state of a buffering adapter.
///
/// `Pending` holds whatever is needed to materialize (source + callbacks);
/// the first pull turns it into `Draining` over the materialized output.
pub(crate) enum Stage<P, T> {
    Pending(P),
    Draining(std::vec::IntoIter<T>),
    Exhausted,
}

impl<P, T> Stage<P, T> {
    /// Pull one output element, materializing on the first call.
    pub(crate) fn pull(&mut self, materialize: impl FnOnce(P) -> Vec<T>) -> Option<T> {
        if let Stage::Pending(_) = self {
            // Leave `Exhausted` behind in case `materialize` unwinds.
            if let Stage::Pending(pending) = std::mem::replace(self, Stage::Exhausted) {
                *self = Stage::Draining(materialize(pending).into_iter());
            }
        }
        match self {
            Stage::Draining(out) => {
                let next = out.next();
                if next.is_none() {
                    *self = Stage::Exhausted;
                }
                next
            }
            _ => None,
        }
    }

    pub(crate) fn remaining(&self) -> Option<usize> {
        match self {
            Stage::Pending(_) => None,
            Stage::Draining(out) => Some(out.len()),
            Stage::Exhausted => Some(0),
        }
    }
}

/// Key -> bucket map that remembers first-seen key order.
///
/// Linear bucket storage plus a hash index; bucket order is the order in which
/// keys were first inserted, and each bucket keeps insertion order.
pub(crate) struct KeyedBuckets<K, V> {
    index: HashMap<K, usize>,
    groups: Vec<Group<K, V>>,
}

impl<K: Eq + Hash + Clone, V> KeyedBuckets<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: K, value: V) {
        match self.index.get(&key) {
            Some(&slot) => self.groups[slot].push(value),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                open_group(&mut self.groups, key, value);
            }
        }
    }

    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn into_buckets(self) -> Vec<(K, Vec<V>)> {
        self.groups.into_iter().map(Group::into_parts).collect()
    }
}

/// Same contract as [`KeyedBuckets`] for keys that only offer `PartialEq`.
///
/// Each insert scans the existing keys, so `n` elements over `k` keys cost
/// O(n * k) comparisons.
pub(crate) struct ScannedBuckets<K, V> {
    groups: Vec<Group<K, V>>,
}

impl<K: PartialEq, V> ScannedBuckets<K, V> {
    pub(crate) fn new() -> Self {
        Self { groups: Vec::new() }
    }

    pub(crate) fn insert(&mut self, key: K, value: V) {
        match self.groups.iter_mut().find(|g| g.key() == &key) {
            Some(group) => group.push(value),
            None => open_group(&mut self.groups, key, value),
        }
    }

    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn into_buckets(self) -> Vec<(K, Vec<V>)> {
        self.groups.into_iter().map(Group::into_parts).collect()
    }
}

fn open_group<K, V>(groups: &mut Vec<Group<K, V>>, key: K, value: V) {
    let mut group = Group::new(key);
    group.push(value);
    groups.push(group);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_keep_first_seen_key_order() {
        let mut b = KeyedBuckets::new();
        for (k, v) in [("b", 1), ("a", 2), ("b", 3), ("c", 4), ("a", 5)] {
            b.insert(k, v);
        }
        assert_eq!(b.len(), 3);
        assert_eq!(
            b.into_buckets(),
            vec![("b", vec![1, 3]), ("a", vec![2, 5]), ("c", vec![4])]
        );
    }

    #[test]
    fn scanned_buckets_accept_float_keys() {
        let mut b = ScannedBuckets::new();
        for (k, v) in [(8.0, "Barley"), (4.0, "Boots"), (1.0, "Whiskers"), (4.0, "Daisy")] {
            b.insert(k, v);
        }
        assert_eq!(b.len(), 3);
        assert_eq!(
            b.into_buckets(),
            vec![
                (8.0, vec!["Barley"]),
                (4.0, vec!["Boots", "Daisy"]),
                (1.0, vec!["Whiskers"])
            ]
        );
    }

    #[test]
    fn stage_is_exhausted_after_materialize_panics() {
        let mut stage: Stage<Vec<i32>, i32> = Stage::Pending(vec![1, 2]);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            stage.pull(|_| -> Vec<i32> { panic!("materialize failed") })
        }));
        assert!(result.is_err());
        assert!(matches!(stage, Stage::Exhausted));
        assert_eq!(stage.pull(|v| v), None);
    }

    #[test]
    fn stage_materializes_once() {
        let mut calls = 0;
        let mut stage: Stage<Vec<i32>, i32> = Stage::Pending(vec![3, 1, 2]);
        assert_eq!(stage.remaining(), None);
        let mut out = Vec::new();
        while let Some(x) = stage.pull(|mut v| {
            calls += 1;
            v.sort();
            v
        }) {
            out.push(x);
        }
        assert_eq!(out, vec![1, 2, 3]);
        assert_eq!(calls, 1);
        assert_eq!(stage.remaining(), Some(0));
        assert!(matches!(stage, Stage::Exhausted));
    }
}
