//! CSV output format for mining results
//!
//! `--format csv`: one row per itemset or rule for spreadsheet analysis.
//! Items sharing a cell are joined with `|`; a `|` or `\` inside an item
//! label is written as `\|` or `\\`.

use crate::mining::{AssociationRules, FrequentItemsets, Item};
use std::fmt::Display;

const ITEM_SEPARATOR: &str = "|";

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Backslash-escape the separator so a cell splits back into the same items
fn escape_item(label: &str) -> String {
    label.replace('\\', "\\\\").replace('|', "\\|")
}

fn join_items<I: Item + Display>(items: &[I]) -> String {
    let labels: Vec<String> = items
        .iter()
        .map(|item| escape_item(&item.to_string()))
        .collect();
    escape_field(&labels.join(ITEM_SEPARATOR))
}

/// CSV formatter for frequent itemsets
#[derive(Debug)]
pub struct CsvItemsetOutput {
    rows: Vec<(String, usize, f64)>,
}

impl CsvItemsetOutput {
    pub fn new<I: Item + Display>(frequent: &FrequentItemsets<I>) -> Self {
        let rows = frequent
            .iter()
            .map(|(itemset, support)| (join_items(itemset.items()), itemset.len(), support))
            .collect();
        Self { rows }
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::from("items,size,support\n");
        for (items, size, support) in &self.rows {
            output.push_str(&format!("{},{},{}\n", items, size, support));
        }
        output
    }
}

/// CSV formatter for association rules
#[derive(Debug)]
pub struct CsvRuleOutput {
    rows: Vec<[String; 5]>,
}

impl CsvRuleOutput {
    pub fn new<I: Item + Display>(rules: &AssociationRules<I>) -> Self {
        let rows = rules
            .iter()
            .map(|(rule, metrics)| {
                [
                    join_items(rule.antecedent.items()),
                    join_items(rule.consequent.items()),
                    metrics.support.to_string(),
                    metrics.confidence.to_string(),
                    metrics.lift.to_string(),
                ]
            })
            .collect();
        Self { rows }
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::from("antecedent,consequent,support,confidence,lift\n");
        for row in &self.rows {
            output.push_str(&row.join(","));
            output.push('\n');
        }
        output
    }
}
