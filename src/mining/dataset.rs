// Transaction store
//
// Normalizes the two accepted input shapes into one ordered list of
// transactions:
// - item groups (one collection of items per transaction)
// - long-format tables of (transaction id, item) rows
//
// A dataset is never empty; every constructor rejects zero transactions so
// support ratios never divide by zero.

use crate::error::{MiningError, Result};
use crate::mining::itemset::{Item, Itemset};
use crate::table::Table;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// A transaction is the set of items bought/observed together
pub type Transaction<I> = Itemset<I>;

/// Ordered, immutable collection of transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset<I> {
    transactions: Vec<Transaction<I>>,
}

impl<I: Item> Dataset<I> {
    /// Build from raw item groups; duplicates inside a group collapse
    ///
    /// # Example
    /// ```
    /// use apriori_miner::mining::Dataset;
    ///
    /// let dataset = Dataset::from_groups(vec![vec!["a", "b"], vec!["b", "b"]]).unwrap();
    /// assert_eq!(dataset.len(), 2);
    /// assert_eq!(dataset.transactions()[1].len(), 1);
    /// ```
    pub fn from_groups<G, T>(groups: G) -> Result<Self>
    where
        G: IntoIterator<Item = T>,
        T: IntoIterator<Item = I>,
    {
        let transactions: Vec<Transaction<I>> = groups
            .into_iter()
            .map(|group| group.into_iter().collect())
            .collect();
        if transactions.is_empty() {
            return Err(MiningError::DatasetEmpty);
        }
        Ok(Self { transactions })
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Always false for a constructed dataset
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn transactions(&self) -> &[Transaction<I>] {
        &self.transactions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction<I>> {
        self.transactions.iter()
    }

    /// Every distinct item, in canonical order
    pub fn distinct_items(&self) -> Vec<I> {
        let items: BTreeSet<&I> = self.transactions.iter().flat_map(|t| t.iter()).collect();
        items.into_iter().cloned().collect()
    }
}

/// Sort key for transaction ids: numeric when every id is an integer
#[derive(Debug, Clone, PartialEq, Eq)]
enum TransactionKey {
    Integer(i64, String),
    Text(String),
}

impl Ord for TransactionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (TransactionKey::Integer(a, sa), TransactionKey::Integer(b, sb)) => {
                a.cmp(b).then_with(|| sa.cmp(sb))
            }
            (TransactionKey::Text(a), TransactionKey::Text(b)) => a.cmp(b),
            (TransactionKey::Integer(..), TransactionKey::Text(_)) => Ordering::Less,
            (TransactionKey::Text(_), TransactionKey::Integer(..)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for TransactionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Dataset<String> {
    /// Group a long-format table into transactions
    ///
    /// Rows with a missing id or item are dropped and repeated
    /// (id, item) pairs collapse. Transactions come out in ascending id
    /// order with items in ascending order. Nothing is returned unless
    /// both columns exist and at least one transaction survives.
    ///
    /// # Example
    /// ```
    /// use apriori_miner::mining::Dataset;
    /// use apriori_miner::table::Table;
    ///
    /// let table = Table::from_csv_str("tid,product\n2,milk\n1,bread\n1,milk\n2,milk\n").unwrap();
    /// let dataset = Dataset::from_table(&table, "tid", "product").unwrap();
    /// assert_eq!(dataset.len(), 2);
    /// assert_eq!(dataset.transactions()[0].items(), &["bread", "milk"]);
    /// assert_eq!(dataset.transactions()[1].items(), &["milk"]);
    /// ```
    pub fn from_table(table: &Table, id_column: &str, item_column: &str) -> Result<Self> {
        let pairs = table.column_pairs(id_column, item_column)?;

        let all_integer = pairs
            .iter()
            .filter_map(|(id, _)| *id)
            .all(|id| id.parse::<i64>().is_ok());

        let mut grouped: BTreeMap<TransactionKey, BTreeSet<String>> = BTreeMap::new();
        let mut dropped = 0usize;
        for (id, item) in pairs {
            let (Some(id), Some(item)) = (id, item) else {
                dropped += 1;
                continue;
            };
            let key = match id.parse::<i64>() {
                Ok(n) if all_integer => TransactionKey::Integer(n, id.to_string()),
                _ => TransactionKey::Text(id.to_string()),
            };
            grouped.entry(key).or_default().insert(item.to_string());
        }

        if dropped > 0 {
            warn!(
                "Dropped {} of {} rows with a missing '{}' or '{}' value",
                dropped,
                table.len(),
                id_column,
                item_column
            );
        }

        let transactions: Vec<Transaction<String>> = grouped
            .into_values()
            .map(|items| Itemset::new(items.into_iter().collect()))
            .collect();
        if transactions.is_empty() {
            return Err(MiningError::DatasetEmpty);
        }
        debug!(
            "Loaded {} transactions from {} table rows",
            transactions.len(),
            table.len()
        );
        Ok(Self { transactions })
    }

    /// One transaction per non-blank line, items separated by commas
    pub fn from_basket_lines(text: &str) -> Result<Self> {
        let groups: Vec<Vec<String>> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .collect();
        Self::from_groups(groups)
    }
}
