// Level-wise frequent itemset generation (Apriori)
//
// Level 1 holds every distinct item whose support reaches the threshold.
// Each further level joins the previous level's survivors (see
// `join_candidates`) and keeps the candidates that still reach it. The
// search stops at the first level with no survivors. Levels are strictly
// processed in increasing size, which is what makes the anti-monotone
// pruning sound.

use crate::error::{check_threshold, Result};
use crate::mining::candidates::join_candidates;
use crate::mining::itemset::{Item, Itemset};
use crate::mining::support::{Support, SupportCounter};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Frequent itemsets with their exact supports
///
/// Supports are stored as exact counts; `get` and `iter` report them rounded
/// to `REPORT_PRECISION` decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequentItemsets<I> {
    itemsets: BTreeMap<Itemset<I>, Support>,
    min_support: f64,
    transactions: usize,
}

impl<I: Item> FrequentItemsets<I> {
    fn empty(min_support: f64, transactions: usize) -> Self {
        Self {
            itemsets: BTreeMap::new(),
            min_support,
            transactions,
        }
    }

    pub fn len(&self) -> usize {
        self.itemsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }

    pub fn contains(&self, itemset: &Itemset<I>) -> bool {
        self.itemsets.contains_key(itemset)
    }

    /// Reported (rounded) support of a frequent itemset
    pub fn get(&self, itemset: &Itemset<I>) -> Option<f64> {
        self.itemsets.get(itemset).map(Support::reported)
    }

    /// Exact support of a frequent itemset
    pub fn support(&self, itemset: &Itemset<I>) -> Option<Support> {
        self.itemsets.get(itemset).copied()
    }

    /// Itemsets in canonical order with their reported supports
    pub fn iter(&self) -> impl Iterator<Item = (&Itemset<I>, f64)> + '_ {
        self.itemsets
            .iter()
            .map(|(itemset, support)| (itemset, support.reported()))
    }

    pub fn iter_exact(&self) -> impl Iterator<Item = (&Itemset<I>, &Support)> + '_ {
        self.itemsets.iter()
    }

    /// Frequent itemsets of exactly `size` items
    pub fn of_size(&self, size: usize) -> Vec<&Itemset<I>> {
        self.itemsets.keys().filter(|s| s.len() == size).collect()
    }

    /// Size of the largest frequent itemset (0 when empty)
    pub fn max_size(&self) -> usize {
        self.itemsets.keys().map(Itemset::len).max().unwrap_or(0)
    }

    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    pub fn transactions(&self) -> usize {
        self.transactions
    }
}

/// Count and threshold a batch of candidates
pub fn prune_candidates<I: Item, C: SupportCounter<I>>(
    counter: &C,
    candidates: Vec<Itemset<I>>,
    min_support: f64,
) -> Result<BTreeMap<Itemset<I>, Support>> {
    let mut frequent = BTreeMap::new();
    for candidate in candidates {
        let support = counter.support(&candidate)?;
        if support.meets(min_support) {
            frequent.insert(candidate, support);
        }
    }
    Ok(frequent)
}

/// Run the full level-wise search
///
/// # Example
/// ```
/// use apriori_miner::mining::{generate_frequent_itemsets, Dataset, Itemset, TransactionScan};
///
/// let dataset = Dataset::from_groups(vec![vec!["a", "b"], vec!["a"], vec!["b", "c"]]).unwrap();
/// let frequent = generate_frequent_itemsets(&TransactionScan::new(&dataset), 0.5).unwrap();
/// assert_eq!(frequent.len(), 2);
/// assert!(frequent.contains(&Itemset::single("a")));
/// assert!(!frequent.contains(&Itemset::single("c")));
/// ```
pub fn generate_frequent_itemsets<I: Item, C: SupportCounter<I>>(
    counter: &C,
    min_support: f64,
) -> Result<FrequentItemsets<I>> {
    let min_support = check_threshold("min_support", min_support)?;
    let mut result = FrequentItemsets::empty(min_support, counter.transactions());

    let singletons = counter
        .items()
        .into_iter()
        .map(Itemset::single)
        .collect::<Vec<_>>();
    let singleton_count = singletons.len();
    let mut level = prune_candidates(counter, singletons, min_support)?;
    debug!(
        "Apriori level 1: {} candidates, {} frequent",
        singleton_count,
        level.len()
    );

    let mut size = 1;
    while !level.is_empty() {
        let previous: Vec<Itemset<I>> = level.keys().cloned().collect();
        result.itemsets.append(&mut level);

        size += 1;
        let candidates = join_candidates(&previous);
        let candidate_count = candidates.len();
        level = prune_candidates(counter, candidates, min_support)?;
        debug!(
            "Apriori level {}: {} candidates, {} frequent",
            size,
            candidate_count,
            level.len()
        );
    }

    info!(
        "Found {} frequent itemsets (largest size {}) at min_support {}",
        result.len(),
        result.max_size(),
        min_support
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::{Dataset, InvertedIndex, TransactionScan};

    fn basket() -> Dataset<&'static str> {
        Dataset::from_groups(vec![
            vec!["bread", "milk"],
            vec!["bread", "diapers", "beer", "eggs"],
            vec!["milk", "diapers", "beer", "cola"],
            vec!["bread", "milk", "diapers", "beer"],
            vec!["bread", "milk", "diapers", "cola"],
        ])
        .unwrap()
    }

    #[test]
    fn test_textbook_basket() {
        let dataset = basket();
        let frequent =
            generate_frequent_itemsets(&TransactionScan::new(&dataset), 0.6).unwrap();

        // Singletons: bread, milk, diapers (4/5), beer (3/5)
        assert_eq!(frequent.of_size(1).len(), 4);
        // Pairs at 3/5: bread+milk, bread+diapers, milk+diapers, diapers+beer
        assert_eq!(frequent.of_size(2).len(), 4);
        assert!(frequent.contains(&Itemset::new(vec!["beer", "diapers"])));
        assert!(!frequent.contains(&Itemset::new(vec!["beer", "bread"])));
        // No triple reaches 3/5
        assert_eq!(frequent.max_size(), 2);
        assert_eq!(frequent.get(&Itemset::single("beer")), Some(0.6));
    }

    #[test]
    fn test_zero_threshold_keeps_every_occurring_itemset() {
        let dataset = Dataset::from_groups(vec![vec![1, 2], vec![3]]).unwrap();
        let frequent =
            generate_frequent_itemsets(&TransactionScan::new(&dataset), 0.0).unwrap();
        // {1},{2},{3},{1,2}; joined candidates with zero count also pass a 0 threshold
        assert!(frequent.contains(&Itemset::new(vec![1, 2])));
        assert!(frequent.contains(&Itemset::new(vec![1, 3])));
        assert_eq!(frequent.get(&Itemset::new(vec![1, 2, 3])), Some(0.0));
    }

    #[test]
    fn test_threshold_above_every_item() {
        let dataset = basket();
        let frequent =
            generate_frequent_itemsets(&TransactionScan::new(&dataset), 1.0).unwrap();
        assert!(frequent.is_empty());
        assert_eq!(frequent.max_size(), 0);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let dataset = basket();
        assert!(generate_frequent_itemsets(&TransactionScan::new(&dataset), 1.2).is_err());
    }

    #[test]
    fn test_index_and_scan_agree() {
        let dataset = basket();
        let scan =
            generate_frequent_itemsets(&TransactionScan::new(&dataset), 0.4).unwrap();
        let index =
            generate_frequent_itemsets(&InvertedIndex::build(&dataset), 0.4).unwrap();
        assert_eq!(scan, index);
    }

    #[test]
    fn test_level_one_comes_from_counter() {
        let index = InvertedIndex::build(&basket());
        let frequent = generate_frequent_itemsets(&index, 0.4).unwrap();
        let expected =
            generate_frequent_itemsets(&TransactionScan::new(&basket()), 0.4).unwrap();
        assert_eq!(frequent, expected);
        assert!(frequent.contains(&Itemset::single("bread")));
    }
}
