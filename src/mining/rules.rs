// Association rule derivation
//
// For every frequent itemset S with at least two items, consequents are
// grown level by level starting from single items. A consequent c yields
// the rule (S - c) -> c when
//
//     confidence = support(S) / support(S - c) >= min_confidence
//
// A consequent that fails is dropped before the next level is joined: a
// larger consequent means a smaller antecedent, whose support can only be
// higher, so confidence can only fall. Consequents stop growing one item
// short of |S| so the antecedent is never empty.

use crate::error::{check_threshold, Result};
use crate::mining::candidates::join_candidates;
use crate::mining::frequent::FrequentItemsets;
use crate::mining::itemset::{round_report, Item, Itemset};
use crate::mining::support::Support;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, trace};

/// Antecedent → consequent; the two sides are disjoint
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Rule<I> {
    pub antecedent: Itemset<I>,
    pub consequent: Itemset<I>,
}

impl<I: Item> Rule<I> {
    pub fn new(antecedent: Itemset<I>, consequent: Itemset<I>) -> Self {
        Self {
            antecedent,
            consequent,
        }
    }

    /// The frequent itemset this rule was split from
    pub fn itemset(&self) -> Itemset<I> {
        self.antecedent.union(&self.consequent)
    }
}

impl<I: Item + fmt::Display> fmt::Display for Rule<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.antecedent, self.consequent)
    }
}

/// Reported measures of a rule (rounded to `REPORT_PRECISION`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleMetrics {
    /// Support of antecedent ∪ consequent
    pub support: f64,
    /// support(antecedent ∪ consequent) / support(antecedent)
    pub confidence: f64,
    /// confidence / support(consequent); 1.0 means independence
    pub lift: f64,
}

/// Rules keyed by (antecedent, consequent)
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationRules<I> {
    rules: BTreeMap<Rule<I>, RuleMetrics>,
    min_confidence: f64,
}

impl<I: Item> AssociationRules<I> {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, rule: &Rule<I>) -> Option<&RuleMetrics> {
        self.rules.get(rule)
    }

    pub fn contains(&self, rule: &Rule<I>) -> bool {
        self.rules.contains_key(rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Rule<I>, &RuleMetrics)> + '_ {
        self.rules.iter()
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Rules ordered by descending lift, ties by confidence then canonical order
    pub fn sorted_by_lift(&self) -> Vec<(&Rule<I>, &RuleMetrics)> {
        let mut ranked: Vec<_> = self.rules.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.lift
                .total_cmp(&a.1.lift)
                .then_with(|| b.1.confidence.total_cmp(&a.1.confidence))
                .then_with(|| a.0.cmp(b.0))
        });
        ranked
    }

    /// The `k` most confident rules
    pub fn top_by_confidence(&self, k: usize) -> Vec<(&Rule<I>, &RuleMetrics)> {
        let mut ranked: Vec<_> = self.rules.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.confidence
                .total_cmp(&a.1.confidence)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked.into_iter().take(k).collect()
    }
}

fn ratio(numerator: &Support, denominator: &Support) -> f64 {
    if denominator.count == 0 {
        // Only reachable with a zero support threshold; 0/0 is no evidence
        return 0.0;
    }
    numerator.count as f64 / denominator.count as f64
}

/// Derive every rule meeting `min_confidence` from a frequent-itemset map
///
/// # Example
/// ```
/// use apriori_miner::mining::{generate_frequent_itemsets, generate_rules, Dataset, Itemset, Rule, TransactionScan};
///
/// let dataset = Dataset::from_groups(vec![vec!["a", "b"], vec!["a", "b"], vec!["a"]]).unwrap();
/// let frequent = generate_frequent_itemsets(&TransactionScan::new(&dataset), 0.5).unwrap();
/// let rules = generate_rules(&frequent, 0.9).unwrap();
///
/// // b always comes with a, but a only sometimes with b
/// assert_eq!(rules.len(), 1);
/// assert!(rules.contains(&Rule::new(Itemset::single("b"), Itemset::single("a"))));
/// ```
pub fn generate_rules<I: Item>(
    frequent: &FrequentItemsets<I>,
    min_confidence: f64,
) -> Result<AssociationRules<I>> {
    let min_confidence = check_threshold("min_confidence", min_confidence)?;
    let mut rules = BTreeMap::new();

    for (itemset, support) in frequent.iter_exact() {
        if itemset.len() < 2 {
            continue;
        }
        rules_for_itemset(itemset, support, frequent, min_confidence, &mut rules);
    }

    debug!(
        "Derived {} rules from {} frequent itemsets at min_confidence {}",
        rules.len(),
        frequent.len(),
        min_confidence
    );
    Ok(AssociationRules {
        rules,
        min_confidence,
    })
}

fn rules_for_itemset<I: Item>(
    itemset: &Itemset<I>,
    support: &Support,
    frequent: &FrequentItemsets<I>,
    min_confidence: f64,
    rules: &mut BTreeMap<Rule<I>, RuleMetrics>,
) {
    let mut consequents = itemset.singletons();

    loop {
        let mut survivors = Vec::with_capacity(consequents.len());

        for consequent in consequents {
            let antecedent = itemset.difference(&consequent);
            // Subsets of a frequent itemset are frequent, so both lookups hit
            let (Some(antecedent_support), Some(consequent_support)) =
                (frequent.support(&antecedent), frequent.support(&consequent))
            else {
                continue;
            };

            let confidence = ratio(support, &antecedent_support);
            if confidence < min_confidence {
                continue;
            }

            let consequent_ratio = consequent_support.ratio();
            let lift = if consequent_ratio > 0.0 {
                confidence / consequent_ratio
            } else {
                0.0
            };
            let metrics = RuleMetrics {
                support: support.reported(),
                confidence: round_report(confidence),
                lift: round_report(lift),
            };
            trace!("rule {:?} -> {:?}: {:?}", antecedent, consequent, metrics);
            rules.insert(Rule::new(antecedent, consequent.clone()), metrics);
            survivors.push(consequent);
        }

        // The next level would leave the antecedent empty
        if survivors.is_empty() || survivors[0].len() + 1 >= itemset.len() {
            break;
        }
        consequents = join_candidates(&survivors);
        if consequents.is_empty() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::{generate_frequent_itemsets, Dataset, TransactionScan};

    fn mine(groups: Vec<Vec<&'static str>>, minsup: f64) -> FrequentItemsets<&'static str> {
        let dataset = Dataset::from_groups(groups).unwrap();
        generate_frequent_itemsets(&TransactionScan::new(&dataset), minsup).unwrap()
    }

    fn rule(antecedent: &[&'static str], consequent: &[&'static str]) -> Rule<&'static str> {
        Rule::new(
            Itemset::new(antecedent.to_vec()),
            Itemset::new(consequent.to_vec()),
        )
    }

    #[test]
    fn test_multi_item_consequents() {
        // a, b and c always appear together
        let frequent = mine(vec![vec!["a", "b", "c"], vec!["a", "b", "c"], vec!["d"]], 0.5);
        let rules = generate_rules(&frequent, 1.0).unwrap();

        // 3 pairs x 2 splits + 3 single-item + 3 two-item consequents of {a,b,c}
        assert_eq!(rules.len(), 12);
        let metrics = rules.get(&rule(&["a"], &["b", "c"])).unwrap();
        assert_eq!(metrics.confidence, 1.0);
        assert_eq!(metrics.support, round_report(2.0 / 3.0));
        assert_eq!(metrics.lift, 1.5);
    }

    #[test]
    fn test_failed_consequent_is_not_extended() {
        // {x,y,z} once; x appears alone often, so every rule with x in the
        // consequent has low confidence
        let frequent = mine(
            vec![
                vec!["x", "y", "z"],
                vec!["y", "z"],
                vec!["x"],
                vec!["x"],
            ],
            0.25,
        );
        let rules = generate_rules(&frequent, 0.6).unwrap();

        // {y,z} -> {x}: 1/2 fails, so no {x,?} consequent is ever built
        assert!(!rules.contains(&rule(&["y", "z"], &["x"])));
        assert!(!rules.contains(&rule(&["z"], &["x", "y"])));
        assert!(!rules.contains(&rule(&["y"], &["x", "z"])));
        // {x,y} -> {z} and {x,z} -> {y} hold with confidence 1
        assert!(rules.contains(&rule(&["x", "y"], &["z"])));
        assert!(rules.contains(&rule(&["x", "z"], &["y"])));
        // {x} -> {y,z}: 1/3 fails
        assert!(!rules.contains(&rule(&["x"], &["y", "z"])));
    }

    #[test]
    fn test_rules_are_disjoint_splits_of_frequent_itemsets() {
        let frequent = mine(
            vec![
                vec!["a", "b", "c", "d"],
                vec!["a", "b", "c"],
                vec!["a", "b", "d"],
                vec!["b", "c", "d"],
                vec!["a", "c"],
            ],
            0.2,
        );
        let rules = generate_rules(&frequent, 0.0).unwrap();
        assert!(!rules.is_empty());
        for (rule, metrics) in rules.iter() {
            assert!(!rule.antecedent.is_empty());
            assert!(!rule.consequent.is_empty());
            assert!(rule.antecedent.is_disjoint(&rule.consequent));
            assert!(frequent.contains(&rule.itemset()));
            assert!(frequent.contains(&rule.antecedent));
            assert!(frequent.contains(&rule.consequent));
            assert_eq!(Some(metrics.support), frequent.get(&rule.itemset()));
        }
    }

    #[test]
    fn test_every_split_with_zero_confidence_threshold() {
        let frequent = mine(vec![vec!["a", "b", "c"]], 1.0);
        let rules = generate_rules(&frequent, 0.0).unwrap();
        // 3 pairs x 2 + 6 splits of the triple
        assert_eq!(rules.len(), 12);
    }

    #[test]
    fn test_ranking_helpers() {
        let frequent = mine(
            vec![vec!["a", "b"], vec!["a", "b"], vec!["a"], vec!["c"]],
            0.25,
        );
        let rules = generate_rules(&frequent, 0.0).unwrap();
        let top = rules.top_by_confidence(1);
        assert_eq!(top.len(), 1);
        assert_eq!(*top[0].0, rule(&["b"], &["a"]));

        let by_lift = rules.sorted_by_lift();
        assert_eq!(by_lift.len(), rules.len());
        assert!(by_lift.windows(2).all(|w| w[0].1.lift >= w[1].1.lift));
    }

    #[test]
    fn test_invalid_confidence_rejected() {
        let frequent = mine(vec![vec!["a", "b"]], 0.5);
        assert!(generate_rules(&frequent, -0.1).is_err());
    }

    #[test]
    fn test_display_rule() {
        assert_eq!(rule(&["a", "b"], &["c"]).to_string(), "{a, b} => {c}");
    }
}
