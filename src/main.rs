use anyhow::{Context, Result};
use apriori_miner::cli::{Cli, InputLayout, OutputFormat};
use apriori_miner::config::MinerConfig;
use apriori_miner::csv_output::{CsvItemsetOutput, CsvRuleOutput};
use apriori_miner::json_output::JsonReport;
use apriori_miner::mining::{AprioriMiner, AssociationRules, Dataset, FrequentItemsets};
use apriori_miner::table::Table;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Config file first, then command-line overrides
fn resolve_config(args: &Cli) -> Result<MinerConfig> {
    let mut config = match &args.config {
        Some(path) => MinerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MinerConfig::default(),
    };
    if let Some(min_support) = args.min_support {
        config.min_support = min_support;
    }
    if let Some(min_confidence) = args.min_confidence {
        config.min_confidence = min_confidence;
    }
    if let Some(counting) = args.support_counting {
        config.support_counting = counting.into();
    }
    config.validate()?;
    Ok(config)
}

fn load_dataset(args: &Cli) -> Result<Dataset<String>> {
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let dataset = match args.layout {
        InputLayout::Long => {
            let table = Table::from_csv_str(&text)?;
            Dataset::from_table(&table, &args.id_column, &args.item_column)?
        }
        InputLayout::Basket => Dataset::from_basket_lines(&text)?,
    };
    Ok(dataset)
}

/// Print itemsets and rules as plain text
fn print_text(frequent: &FrequentItemsets<String>, rules: Option<&AssociationRules<String>>) {
    println!(
        "=== Frequent Itemsets ({} of {} transactions, min_support {}) ===",
        frequent.len(),
        frequent.transactions(),
        frequent.min_support()
    );
    for (itemset, support) in frequent.iter() {
        println!("{:<40} support={}", itemset.to_string(), support);
    }

    if let Some(rules) = rules {
        println!();
        println!(
            "=== Association Rules ({}, min_confidence {}) ===",
            rules.len(),
            rules.min_confidence()
        );
        for (rule, metrics) in rules.sorted_by_lift() {
            println!(
                "{:<40} support={} confidence={} lift={}",
                rule.to_string(),
                metrics.support,
                metrics.confidence,
                metrics.lift
            );
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = resolve_config(&args)?;
    let dataset = load_dataset(&args)?;

    let mut miner = AprioriMiner::from_config(&config)?;
    miner.set_dataset(dataset);
    if args.itemsets_only {
        miner.generate_all_frequent_itemsets()?;
    } else {
        miner.generate_all_frequent_itemsets()?.generate_all_rules()?;
    }

    let frequent = miner
        .frequent_itemsets()
        .context("Frequent itemsets were not generated")?;
    let rules = miner.rules();

    match args.format {
        OutputFormat::Text => print_text(frequent, rules),
        OutputFormat::Json => {
            println!("{}", JsonReport::new(frequent, rules).to_json()?);
        }
        OutputFormat::Csv => {
            print!("{}", CsvItemsetOutput::new(frequent).to_csv());
            if let Some(rules) = rules {
                println!();
                print!("{}", CsvRuleOutput::new(rules).to_csv());
            }
        }
    }

    Ok(())
}
