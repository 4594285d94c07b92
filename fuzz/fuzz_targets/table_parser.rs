#![no_main]

use apriori_miner::mining::Dataset;
use apriori_miner::table::Table;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing and grouping must never panic, whatever the input
        if let Ok(table) = Table::from_csv_str(input) {
            if let (Some(id), Some(item)) = (table.columns().first(), table.columns().last()) {
                let _ = Dataset::from_table(&table, id, item);
            }
        }
        let _ = Dataset::from_basket_lines(input);
    }
});
