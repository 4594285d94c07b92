//! JSON output format for mining results
//!
//! `--format json`: frequent itemsets and rules for downstream tooling.

use crate::mining::{AssociationRules, FrequentItemsets, Item};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A frequent itemset with its reported support
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonItemset {
    /// Items in canonical order
    pub items: Vec<String>,
    /// Support rounded to 7 decimals
    pub support: f64,
}

/// An association rule with its measures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRule {
    pub antecedent: Vec<String>,
    pub consequent: Vec<String>,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

/// Run summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    /// Number of transactions mined
    pub transactions: usize,
    /// Support threshold used
    pub min_support: f64,
    /// Confidence threshold used (absent when rules were not generated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
    /// Number of frequent itemsets found
    pub total_itemsets: usize,
    /// Number of rules found
    pub total_rules: usize,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    pub summary: JsonSummary,
    pub itemsets: Vec<JsonItemset>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub rules: Vec<JsonRule>,
}

fn labels<I: Item + Display>(items: &[I]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

impl JsonReport {
    /// Build a report from mining results; `rules` may be absent
    pub fn new<I: Item + Display>(
        frequent: &FrequentItemsets<I>,
        rules: Option<&AssociationRules<I>>,
    ) -> Self {
        let itemsets = frequent
            .iter()
            .map(|(itemset, support)| JsonItemset {
                items: labels(itemset.items()),
                support,
            })
            .collect();

        let rules_out: Vec<JsonRule> = rules
            .map(|rules| {
                rules
                    .iter()
                    .map(|(rule, metrics)| JsonRule {
                        antecedent: labels(rule.antecedent.items()),
                        consequent: labels(rule.consequent.items()),
                        support: metrics.support,
                        confidence: metrics.confidence,
                        lift: metrics.lift,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "apriori-json-v1".to_string(),
            summary: JsonSummary {
                transactions: frequent.transactions(),
                min_support: frequent.min_support(),
                min_confidence: rules.map(AssociationRules::min_confidence),
                total_itemsets: frequent.len(),
                total_rules: rules_out.len(),
            },
            itemsets,
            rules: rules_out,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
