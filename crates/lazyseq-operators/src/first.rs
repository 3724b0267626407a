//! `First` / `FirstOrDefault`: short-circuiting search.
//!
//! None of these pull past the matching element.

use lazyseq_core::SeqError;

/// First element satisfying `predicate`.
///
/// Fails with [`SeqError::NoMatch`] when the source runs out first.
pub fn first<S, P>(source: S, mut predicate: P) -> Result<S::Item, SeqError>
where
    S: IntoIterator,
    P: FnMut(&S::Item) -> bool,
{
    let mut scanned = 0;
    for item in source {
        scanned += 1;
        if predicate(&item) {
            return Ok(item);
        }
    }
    Err(SeqError::NoMatch { scanned })
}

/// First element satisfying `predicate`, or the type's default when none does.
pub fn first_or_default<S, P>(source: S, predicate: P) -> S::Item
where
    S: IntoIterator,
    S::Item: Default,
    P: FnMut(&S::Item) -> bool,
{
    first(source, predicate).unwrap_or_default()
}

/// First element satisfying `predicate`, or `fallback` when none does.
pub fn first_or<S, P>(source: S, predicate: P, fallback: S::Item) -> S::Item
where
    S: IntoIterator,
    P: FnMut(&S::Item) -> bool,
{
    first(source, predicate).unwrap_or(fallback)
}

/// First element of the source. Fails with [`SeqError::Empty`] when there is none.
pub fn first_element<S: IntoIterator>(source: S) -> Result<S::Item, SeqError> {
    source.into_iter().next().ok_or(SeqError::Empty)
}
