//! Fuzz target for the full pipeline.
//!
//! Any input that parses must either decompose or fail with an error,
//! never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mixshift::{Dataset, Decomposition, Parser};

fuzz_target!(|data: &[u8]| {
    if data.len() > 50_000 {
        return;
    }

    let Ok(table) = Parser::new().parse_bytes(data) else {
        return;
    };
    let Ok(dataset) = Dataset::from_table(&table) else {
        return;
    };
    let _ = Decomposition::new().with_combinations(true).run(&dataset);
});
