use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::hash::Hash;

/// Number of decimal places used when reporting supports, confidences and lifts
pub const REPORT_PRECISION: i32 = 7;

/// Round a ratio for reporting (never used for threshold comparisons)
pub fn round_report(value: f64) -> f64 {
    let scale = 10f64.powi(REPORT_PRECISION);
    (value * scale).round() / scale
}

/// Anything usable as an item label: equality, hashing and a total order
pub trait Item: Ord + Clone + Hash + fmt::Debug {}

impl<T: Ord + Clone + Hash + fmt::Debug> Item for T {}

/// Set of items kept as a sorted, deduplicated sequence
///
/// The canonical order makes structural equality, hashing and the
/// prefix comparison used by the Apriori join well-defined.
///
/// # Example
/// ```
/// use apriori_miner::mining::Itemset;
///
/// let a = Itemset::new(vec!["c", "a", "c"]);
/// let b = Itemset::new(vec!["a", "c"]);
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Itemset<I>(Vec<I>);

impl<I: Item> From<Vec<I>> for Itemset<I> {
    fn from(items: Vec<I>) -> Self {
        Itemset::new(items)
    }
}

/// Deserialized sequences are sorted and deduplicated like any other input
impl<'de, I: Item + Deserialize<'de>> Deserialize<'de> for Itemset<I> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<I>::deserialize(deserializer).map(Itemset::from)
    }
}

impl<I: Item> Itemset<I> {
    pub fn new(mut items: Vec<I>) -> Self {
        items.sort();
        items.dedup();
        Self(items)
    }

    pub fn single(item: I) -> Self {
        Self(vec![item])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn items(&self) -> &[I] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, I> {
        self.0.iter()
    }

    pub fn contains(&self, item: &I) -> bool {
        self.0.binary_search(item).is_ok()
    }

    /// All items except the last one in canonical order
    pub fn prefix(&self) -> &[I] {
        &self.0[..self.0.len().saturating_sub(1)]
    }

    /// Subset test by merging the two sorted sequences
    pub fn is_subset_of(&self, other: &Itemset<I>) -> bool {
        if self.len() > other.len() {
            return false;
        }
        let mut theirs = other.0.iter();
        'outer: for item in &self.0 {
            for candidate in theirs.by_ref() {
                match candidate.cmp(item) {
                    std::cmp::Ordering::Less => continue,
                    std::cmp::Ordering::Equal => continue 'outer,
                    std::cmp::Ordering::Greater => return false,
                }
            }
            return false;
        }
        true
    }

    pub fn is_disjoint(&self, other: &Itemset<I>) -> bool {
        self.0.iter().all(|item| !other.contains(item))
    }

    pub fn union(&self, other: &Itemset<I>) -> Itemset<I> {
        let mut items = Vec::with_capacity(self.len() + other.len());
        items.extend(self.0.iter().cloned());
        items.extend(other.0.iter().cloned());
        Itemset::new(items)
    }

    pub fn difference(&self, other: &Itemset<I>) -> Itemset<I> {
        Itemset(
            self.0
                .iter()
                .filter(|item| !other.contains(item))
                .cloned()
                .collect(),
        )
    }

    /// Each item wrapped as its own one-element itemset
    pub fn singletons(&self) -> Vec<Itemset<I>> {
        self.0.iter().cloned().map(Itemset::single).collect()
    }

    pub fn into_items(self) -> Vec<I> {
        self.0
    }
}

impl<I: Item> FromIterator<I> for Itemset<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Itemset::new(iter.into_iter().collect())
    }
}

impl<I: Item + fmt::Display> fmt::Display for Itemset<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "}}")
    }
}
