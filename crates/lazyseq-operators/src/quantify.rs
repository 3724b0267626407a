//! `Any` / `All`: short-circuiting boolean queries.

/// Whether `source` has at least one element. Pulls at most one element.
pub fn any_element<S: IntoIterator>(source: S) -> bool {
    source.into_iter().next().is_some()
}

/// Whether any element satisfies `predicate`. Stops at the first match.
pub fn any_matching<S, P>(source: S, mut predicate: P) -> bool
where
    S: IntoIterator,
    P: FnMut(&S::Item) -> bool,
{
    for item in source {
        if predicate(&item) {
            return true;
        }
    }
    false
}

/// Whether every element satisfies `predicate`. Stops at the first failure;
/// vacuously true for an empty source.
pub fn all_matching<S, P>(source: S, mut predicate: P) -> bool
where
    S: IntoIterator,
    P: FnMut(&S::Item) -> bool,
{
    for item in source {
        if !predicate(&item) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_on_empty_and_non_empty() {
        assert!(any_element([1, 2]));
        assert!(!any_element(Vec::<i32>::new()));
    }

    #[test]
    fn any_pulls_once_even_from_infinite_source() {
        let mut pulled = 0;
        assert!(any_element((0..).inspect(|_| pulled += 1)));
        assert_eq!(pulled, 1);
    }

    #[test]
    fn any_with_predicate() {
        let numbers = [1, 2, 3, 4, 5, 6];
        assert!(any_matching(numbers, |n| *n > 5));
        assert!(any_matching(numbers, |n| *n < 7));
        assert!(!any_matching(numbers, |n| *n > 6));
    }

    #[test]
    fn all_with_predicate() {
        let numbers = [1, 2, 3, 4, 5, 6];
        assert!(!all_matching(numbers, |n| *n < 6));
        assert!(all_matching(numbers, |n| *n < 7));
    }

    #[test]
    fn all_is_vacuously_true() {
        assert!(all_matching(Vec::<i32>::new(), |_| false));
        assert!(!any_matching(Vec::<i32>::new(), |_| true));
    }

    #[test]
    fn all_stops_at_first_failure() {
        let mut checked = Vec::new();
        let result = all_matching([2, 4, 5, 6, 8], |n| {
            checked.push(*n);
            n % 2 == 0
        });
        assert!(!result);
        assert_eq!(checked, vec![2, 4, 5]);
    }
}
