//! Ordered union of two ID sequences.

use std::collections::HashSet;
use std::hash::Hash;

/// Union of `first` and `second` in left-to-right reading order.
///
/// A value that recurs is dropped; its first occurrence is kept, so values
/// shared by both inputs belong to `first`'s block. With `swap`, the block
/// contributed by `second` comes first and `first`'s block follows, each
/// keeping its internal order.
pub fn join<T>(first: &[T], second: &[T], swap: bool) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen: HashSet<&T> = HashSet::with_capacity(first.len() + second.len());
    let head: Vec<&T> = first.iter().filter(|v| seen.insert(*v)).collect();
    let tail: Vec<&T> = second.iter().filter(|v| seen.insert(*v)).collect();

    let (lead, rest) = if swap { (tail, head) } else { (head, tail) };
    lead.into_iter().chain(rest).cloned().collect()
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn appends_unseen_values() {
        assert_eq!(join(&[1, 2, 3], &[3, 4, 1], false), vec![1, 2, 3, 4]);
    }

    #[test]
    fn swap_puts_second_block_first() {
        assert_eq!(join(&[1, 2, 3], &[3, 4, 1], true), vec![4, 1, 2, 3]);
        assert_eq!(join(&[1, 2], &[2, 3], true), vec![3, 1, 2]);
        assert_eq!(join(&[5], &[5, 6], true), vec![6, 5]);
    }

    #[test]
    fn empty_inputs() {
        let empty: [u32; 0] = [];
        assert_eq!(join(&empty, &[3, 1, 2], false), vec![3, 1, 2]);
        assert_eq!(join(&empty, &[3, 1, 2], true), vec![3, 1, 2]);
        assert_eq!(join(&[3, 1, 2], &empty, false), vec![3, 1, 2]);
        assert_eq!(join(&[3, 1, 2], &empty, true), vec![3, 1, 2]);
        assert!(join(&empty, &empty, true).is_empty());
    }

    #[test]
    fn duplicates_within_one_input_keep_first() {
        assert_eq!(join(&[1, 2, 1], &[2, 3, 3], false), vec![1, 2, 3]);
        assert_eq!(join(&[1, 2, 1], &[2, 3, 3], true), vec![3, 1, 2]);
    }

    #[test]
    fn fully_overlapping_second_adds_nothing() {
        assert_eq!(join(&[1, 2], &[2, 1], true), vec![1, 2]);
    }

    #[test]
    fn works_with_strings() {
        let first = vec!["a".to_string(), "b".to_string()];
        let second = vec!["b".to_string(), "c".to_string()];
        assert_eq!(join(&first, &second, false), vec!["a", "b", "c"]);
    }
}
