use crate::mining::itemset::{Item, Itemset};
use std::collections::BTreeSet;

/// Apriori join step: build size-(k+1) candidates from size-k itemsets
///
/// Two itemsets are joined when their canonically sorted first k-1 items
/// agree, i.e. they differ only in their last item. Duplicate unions are
/// collapsed and candidates come back in canonical order.
///
/// # Example
/// ```
/// use apriori_miner::mining::{join_candidates, Itemset};
///
/// let level = vec![
///     Itemset::new(vec!["a", "b"]),
///     Itemset::new(vec!["a", "c"]),
///     Itemset::new(vec!["b", "c"]),
/// ];
/// let next = join_candidates(&level);
/// assert_eq!(next, vec![Itemset::new(vec!["a", "b", "c"])]);
/// ```
pub fn join_candidates<I: Item>(itemsets: &[Itemset<I>]) -> Vec<Itemset<I>> {
    let mut sorted: Vec<&Itemset<I>> = itemsets.iter().collect();
    sorted.sort();
    sorted.dedup();

    let mut candidates = BTreeSet::new();
    for (i, left) in sorted.iter().enumerate() {
        // Equal prefixes are contiguous once sorted
        for right in sorted[i + 1..]
            .iter()
            .take_while(|right| right.len() == left.len() && right.prefix() == left.prefix())
        {
            candidates.insert(left.union(right));
        }
    }
    candidates.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(groups: &[&[&'static str]]) -> Vec<Itemset<&'static str>> {
        groups.iter().map(|g| Itemset::new(g.to_vec())).collect()
    }

    #[test]
    fn test_join_singletons() {
        let next = join_candidates(&sets(&[&["a"], &["c"], &["b"]]));
        assert_eq!(next, sets(&[&["a", "b"], &["a", "c"], &["b", "c"]]));
    }

    #[test]
    fn test_join_pairs_requires_shared_prefix() {
        let next = join_candidates(&sets(&[&["a", "b"], &["b", "c"], &["a", "c"]]));
        assert_eq!(next, sets(&[&["a", "b", "c"]]));

        // {a,b} and {c,d} share no prefix
        assert!(join_candidates(&sets(&[&["a", "b"], &["c", "d"]])).is_empty());
    }

    #[test]
    fn test_join_deduplicates() {
        let next = join_candidates(&sets(&[&["a"], &["b"], &["a"], &["b"]]));
        assert_eq!(next, sets(&[&["a", "b"]]));
    }

    #[test]
    fn test_join_empty_and_single() {
        assert!(join_candidates::<&str>(&[]).is_empty());
        assert!(join_candidates(&sets(&[&["a"]])).is_empty());
    }

    #[test]
    fn test_join_triples() {
        let next = join_candidates(&sets(&[
            &["a", "b", "c"],
            &["a", "b", "d"],
            &["a", "c", "d"],
            &["b", "c", "d"],
        ]));
        assert_eq!(next, sets(&[&["a", "b", "c", "d"]]));
    }
}
