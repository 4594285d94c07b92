use crate::config::MinerConfig;
use crate::error::{check_threshold, MiningError, Result};
use crate::mining::dataset::Dataset;
use crate::mining::frequent::{generate_frequent_itemsets, FrequentItemsets};
use crate::mining::itemset::{Item, Itemset};
use crate::mining::rules::{generate_rules, AssociationRules};
use crate::mining::support::{Counter, SupportCounter, SupportCounting, TransactionScan};
use crate::table::Table;
use tracing::info;

/// Apriori mining engine
///
/// Holds the dataset and both thresholds, and owns the results computed
/// from them. Changing the dataset or the support threshold discards both
/// result maps; changing the confidence threshold discards the rules.
///
/// # Example
/// ```
/// use apriori_miner::mining::{AprioriMiner, Dataset, Itemset};
///
/// # fn main() -> apriori_miner::Result<()> {
/// let dataset = Dataset::from_groups(vec![vec!["a", "b"], vec!["a", "b"], vec!["b"]])?;
/// let mut miner = AprioriMiner::new()
///     .with_dataset(dataset)
///     .with_min_support(0.5)?
///     .with_min_confidence(0.8)?;
///
/// let rules = miner.generate_all_frequent_itemsets()?.generate_all_rules()?.rules();
/// assert_eq!(rules.map(|r| r.len()), Some(1));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AprioriMiner<I> {
    dataset: Option<Dataset<I>>,
    min_support: Option<f64>,
    min_confidence: Option<f64>,
    support_counting: SupportCounting,
    frequent_itemsets: Option<FrequentItemsets<I>>,
    rules: Option<AssociationRules<I>>,
}

impl<I: Item> Default for AprioriMiner<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Item> AprioriMiner<I> {
    /// Unconfigured miner; set a dataset and thresholds before generating
    pub fn new() -> Self {
        Self {
            dataset: None,
            min_support: None,
            min_confidence: None,
            support_counting: SupportCounting::default(),
            frequent_itemsets: None,
            rules: None,
        }
    }

    /// Miner with thresholds and counting strategy taken from a config
    pub fn from_config(config: &MinerConfig) -> Result<Self> {
        config.validate()?;
        let mut miner = Self::new();
        miner
            .set_min_support(config.min_support)?
            .set_min_confidence(config.min_confidence)?
            .set_support_counting(config.support_counting);
        Ok(miner)
    }

    pub fn with_dataset(mut self, dataset: Dataset<I>) -> Self {
        self.set_dataset(dataset);
        self
    }

    pub fn with_min_support(mut self, min_support: f64) -> Result<Self> {
        self.set_min_support(min_support)?;
        Ok(self)
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Result<Self> {
        self.set_min_confidence(min_confidence)?;
        Ok(self)
    }

    pub fn with_support_counting(mut self, strategy: SupportCounting) -> Self {
        self.set_support_counting(strategy);
        self
    }

    /// Replace the dataset; previous results are discarded
    pub fn set_dataset(&mut self, dataset: Dataset<I>) -> &mut Self {
        self.dataset = Some(dataset);
        self.frequent_itemsets = None;
        self.rules = None;
        self
    }

    /// Set the minimum support; `InvalidThreshold` outside `[0, 1]`
    pub fn set_min_support(&mut self, min_support: f64) -> Result<&mut Self> {
        let min_support = check_threshold("min_support", min_support)?;
        self.min_support = Some(min_support);
        self.frequent_itemsets = None;
        self.rules = None;
        Ok(self)
    }

    /// Set the minimum confidence; `InvalidThreshold` outside `[0, 1]`
    pub fn set_min_confidence(&mut self, min_confidence: f64) -> Result<&mut Self> {
        let min_confidence = check_threshold("min_confidence", min_confidence)?;
        self.min_confidence = Some(min_confidence);
        self.rules = None;
        Ok(self)
    }

    /// Choose how supports are counted; results do not depend on it
    pub fn set_support_counting(&mut self, strategy: SupportCounting) -> &mut Self {
        self.support_counting = strategy;
        self
    }

    pub fn dataset(&self) -> Option<&Dataset<I>> {
        self.dataset.as_ref()
    }

    pub fn min_support(&self) -> Option<f64> {
        self.min_support
    }

    pub fn min_confidence(&self) -> Option<f64> {
        self.min_confidence
    }

    pub fn support_counting(&self) -> SupportCounting {
        self.support_counting
    }

    /// Result of the last `generate_all_frequent_itemsets`, if still current
    pub fn frequent_itemsets(&self) -> Option<&FrequentItemsets<I>> {
        self.frequent_itemsets.as_ref()
    }

    /// Result of the last `generate_all_rules`, if still current
    pub fn rules(&self) -> Option<&AssociationRules<I>> {
        self.rules.as_ref()
    }

    /// Exact support ratio of any itemset against the loaded dataset
    pub fn support(&self, itemset: &Itemset<I>) -> Result<f64> {
        let dataset = self
            .dataset
            .as_ref()
            .ok_or(MiningError::NotConfigured("dataset"))?;
        Ok(TransactionScan::new(dataset).support(itemset)?.ratio())
    }

    /// Recompute the frequent-itemset map from scratch
    pub fn generate_all_frequent_itemsets(&mut self) -> Result<&mut Self> {
        let dataset = self
            .dataset
            .as_ref()
            .ok_or(MiningError::NotConfigured("dataset"))?;
        let min_support = self
            .min_support
            .ok_or(MiningError::NotConfigured("min_support"))?;
        if dataset.is_empty() {
            return Err(MiningError::DatasetEmpty);
        }

        info!(
            "Mining {} transactions (min_support {}, {:?} counting)",
            dataset.len(),
            min_support,
            self.support_counting
        );
        let frequent = {
            let counter = Counter::new(dataset, self.support_counting);
            generate_frequent_itemsets(&counter, min_support)?
        };

        self.frequent_itemsets = Some(frequent);
        self.rules = None;
        Ok(self)
    }

    /// Recompute the rule map, mining frequent itemsets first if needed
    pub fn generate_all_rules(&mut self) -> Result<&mut Self> {
        let min_confidence = self
            .min_confidence
            .ok_or(MiningError::NotConfigured("min_confidence"))?;
        if self.frequent_itemsets.is_none() {
            self.generate_all_frequent_itemsets()?;
        }
        let frequent = self
            .frequent_itemsets
            .as_ref()
            .ok_or(MiningError::NotConfigured("frequent itemsets"))?;

        let rules = generate_rules(frequent, min_confidence)?;
        info!(
            "Generated {} rules at min_confidence {}",
            rules.len(),
            min_confidence
        );
        self.rules = Some(rules);
        Ok(self)
    }
}

impl AprioriMiner<String> {
    /// Bulk-load transactions from a long-format (id, item) table
    ///
    /// On any error the current dataset and results are left untouched.
    pub fn set_transaction_table(
        &mut self,
        table: &Table,
        id_column: &str,
        item_column: &str,
    ) -> Result<&mut Self> {
        let dataset = Dataset::from_table(table, id_column, item_column)?;
        Ok(self.set_dataset(dataset))
    }
}
