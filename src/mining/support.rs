// Support calculation
//
// support(X) = |{t in dataset : X ⊆ t}| / n
//
// Counts are kept as integers so threshold comparisons are made on the exact
// ratio `count / n`; rounding happens only when a value is reported.

use crate::error::{MiningError, Result};
use crate::mining::dataset::Dataset;
use crate::mining::itemset::{round_report, Item, Itemset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Exact support of an itemset: matching transactions out of the total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Support {
    pub count: usize,
    pub transactions: usize,
}

impl Support {
    /// Unrounded ratio used for every comparison
    pub fn ratio(&self) -> f64 {
        self.count as f64 / self.transactions as f64
    }

    /// Ratio rounded to the reporting precision
    pub fn reported(&self) -> f64 {
        round_report(self.ratio())
    }

    pub fn meets(&self, threshold: f64) -> bool {
        self.ratio() >= threshold
    }
}

/// How supports are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportCounting {
    /// Linear scan over every transaction per query
    #[default]
    Scan,
    /// Item → transaction-index postings, intersected per query
    Index,
}

/// Counts the transactions containing an itemset
pub trait SupportCounter<I: Item> {
    /// Number of transactions that are supersets of `itemset`
    fn count(&self, itemset: &Itemset<I>) -> usize;

    /// Total number of transactions
    fn transactions(&self) -> usize;

    /// Distinct items of the counted transactions, sorted
    fn items(&self) -> Vec<I>;

    fn support(&self, itemset: &Itemset<I>) -> Result<Support> {
        let transactions = self.transactions();
        if transactions == 0 {
            return Err(MiningError::DatasetEmpty);
        }
        Ok(Support {
            count: self.count(itemset),
            transactions,
        })
    }
}

/// Scan-based counter borrowing the dataset
#[derive(Debug, Clone, Copy)]
pub struct TransactionScan<'a, I> {
    dataset: &'a Dataset<I>,
}

impl<'a, I: Item> TransactionScan<'a, I> {
    pub fn new(dataset: &'a Dataset<I>) -> Self {
        Self { dataset }
    }
}

impl<I: Item> SupportCounter<I> for TransactionScan<'_, I> {
    fn count(&self, itemset: &Itemset<I>) -> usize {
        self.dataset
            .iter()
            .filter(|transaction| itemset.is_subset_of(transaction))
            .count()
    }

    fn transactions(&self) -> usize {
        self.dataset.len()
    }

    fn items(&self) -> Vec<I> {
        self.dataset.distinct_items()
    }
}

/// Inverted index: for each item, the sorted indices of transactions holding it
#[derive(Debug, Clone)]
pub struct InvertedIndex<I> {
    postings: HashMap<I, Vec<usize>>,
    transactions: usize,
}

impl<I: Item> InvertedIndex<I> {
    pub fn build(dataset: &Dataset<I>) -> Self {
        let mut postings: HashMap<I, Vec<usize>> = HashMap::new();
        for (index, transaction) in dataset.iter().enumerate() {
            for item in transaction.iter() {
                postings.entry(item.clone()).or_default().push(index);
            }
        }
        Self {
            postings,
            transactions: dataset.len(),
        }
    }
}

impl<I: Item> SupportCounter<I> for InvertedIndex<I> {
    fn count(&self, itemset: &Itemset<I>) -> usize {
        // The empty set is contained in every transaction
        if itemset.is_empty() {
            return self.transactions;
        }

        let mut lists = Vec::with_capacity(itemset.len());
        for item in itemset.iter() {
            match self.postings.get(item) {
                Some(list) => lists.push(list.as_slice()),
                None => return 0,
            }
        }
        // Shortest list first keeps the intersection small
        lists.sort_by_key(|list| list.len());

        let mut survivors: Vec<usize> = lists[0].to_vec();
        for list in &lists[1..] {
            survivors.retain(|index| list.binary_search(index).is_ok());
            if survivors.is_empty() {
                break;
            }
        }
        survivors.len()
    }

    fn transactions(&self) -> usize {
        self.transactions
    }

    fn items(&self) -> Vec<I> {
        let mut items: Vec<I> = self.postings.keys().cloned().collect();
        items.sort();
        items
    }
}

/// Counter chosen at run time from a `SupportCounting` strategy
pub enum Counter<'a, I: Item> {
    Scan(TransactionScan<'a, I>),
    Index(InvertedIndex<I>),
}

impl<'a, I: Item> Counter<'a, I> {
    pub fn new(dataset: &'a Dataset<I>, strategy: SupportCounting) -> Self {
        match strategy {
            SupportCounting::Scan => Counter::Scan(TransactionScan::new(dataset)),
            SupportCounting::Index => Counter::Index(InvertedIndex::build(dataset)),
        }
    }
}

impl<I: Item> SupportCounter<I> for Counter<'_, I> {
    fn count(&self, itemset: &Itemset<I>) -> usize {
        match self {
            Counter::Scan(scan) => scan.count(itemset),
            Counter::Index(index) => index.count(itemset),
        }
    }

    fn transactions(&self) -> usize {
        match self {
            Counter::Scan(scan) => scan.transactions(),
            Counter::Index(index) => index.transactions(),
        }
    }

    fn items(&self) -> Vec<I> {
        match self {
            Counter::Scan(scan) => scan.items(),
            Counter::Index(index) => index.items(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset<&'static str> {
        Dataset::from_groups(vec![
            vec!["a", "b", "c"],
            vec!["a", "c"],
            vec!["b"],
            vec!["a"],
        ])
        .unwrap()
    }

    #[test]
    fn test_scan_counts() {
        let dataset = sample();
        let scan = TransactionScan::new(&dataset);
        assert_eq!(scan.count(&Itemset::single("a")), 3);
        assert_eq!(scan.count(&Itemset::new(vec!["a", "c"])), 2);
        assert_eq!(scan.count(&Itemset::new(vec!["a", "b", "c"])), 1);
        assert_eq!(scan.count(&Itemset::single("z")), 0);
    }

    #[test]
    fn test_index_matches_scan() {
        let dataset = sample();
        let scan = TransactionScan::new(&dataset);
        let index = InvertedIndex::build(&dataset);
        for items in [
            vec![],
            vec!["a"],
            vec!["b"],
            vec!["a", "b"],
            vec!["b", "c"],
            vec!["a", "b", "c"],
            vec!["a", "z"],
        ] {
            let itemset = Itemset::new(items);
            assert_eq!(scan.count(&itemset), index.count(&itemset), "{:?}", itemset);
        }
    }

    #[test]
    fn test_support_ratio_exact() {
        let dataset = sample();
        let support = TransactionScan::new(&dataset)
            .support(&Itemset::single("a"))
            .unwrap();
        assert_eq!(support, Support { count: 3, transactions: 4 });
        assert_eq!(support.ratio(), 0.75);
        assert!(support.meets(0.75));
        assert!(!support.meets(0.7500001));
    }

    #[test]
    fn test_support_rejects_zero_transactions() {
        struct Nothing;
        impl SupportCounter<u8> for Nothing {
            fn count(&self, _: &Itemset<u8>) -> usize {
                0
            }
            fn transactions(&self) -> usize {
                0
            }
            fn items(&self) -> Vec<u8> {
                Vec::new()
            }
        }
        assert_eq!(
            Nothing.support(&Itemset::single(1)),
            Err(MiningError::DatasetEmpty)
        );
    }

    #[test]
    fn test_counter_dispatch() {
        let dataset = sample();
        let itemset = Itemset::new(vec!["a", "c"]);
        for strategy in [SupportCounting::Scan, SupportCounting::Index] {
            let counter = Counter::new(&dataset, strategy);
            assert_eq!(counter.transactions(), 4);
            assert_eq!(counter.count(&itemset), 2);
            assert_eq!(counter.items(), vec!["a", "b", "c"]);
        }
    }

    #[test]
    fn test_counts_deserialized_itemset() {
        let dataset = sample();
        let itemset: Itemset<&str> = serde_json::from_str(r#"["c","a","a"]"#).unwrap();
        assert_eq!(TransactionScan::new(&dataset).count(&itemset), 2);
        assert_eq!(InvertedIndex::build(&dataset).count(&itemset), 2);
    }
}
