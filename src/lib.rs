//! apriori-miner - Frequent itemset and association rule mining
//!
//! This library implements the Apriori algorithm: level-wise discovery of
//! itemsets whose support reaches a threshold, followed by derivation of
//! antecedent → consequent rules scored by confidence and lift.
//! Transactions can be given directly or grouped from a long-format
//! (transaction id, item) table.

pub mod cli;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod json_output;
pub mod mining;
pub mod table;

pub use error::{MiningError, Result};
pub use mining::AprioriMiner;
