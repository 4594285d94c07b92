// Frequent Itemset and Association Rule Mining (Apriori)
//
// Pipeline:
//   Dataset (transaction store)
//     -> SupportCounter (scan or inverted index)
//     -> generate_frequent_itemsets (level-wise search with join + prune)
//     -> generate_rules (confidence-pruned consequent growth)
//
// Reference:
// Agrawal, R., & Srikant, R. (1994). Fast algorithms for mining association
//     rules. VLDB. The join step, the anti-monotone prune and the
//     consequent-growth rule search all follow this paper.
//
// All threshold comparisons use exact counts. Values are rounded to
// REPORT_PRECISION decimals only when they are reported.

mod candidates;
mod dataset;
mod frequent;
mod itemset;
mod miner;
mod rules;
mod support;

pub use candidates::join_candidates;
pub use dataset::{Dataset, Transaction};
pub use frequent::{generate_frequent_itemsets, prune_candidates, FrequentItemsets};
pub use itemset::{round_report, Item, Itemset, REPORT_PRECISION};
pub use miner::AprioriMiner;
pub use rules::{generate_rules, AssociationRules, Rule, RuleMetrics};
pub use support::{
    Counter, InvertedIndex, Support, SupportCounter, SupportCounting, TransactionScan,
};
