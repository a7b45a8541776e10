//! Fuzz target for mapping rule parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use mixshift::MappingRules;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(rules) = MappingRules::parse(text) {
            // Every member must resolve to a label that exists
            let lookup = rules.to_lookup();
            for label in lookup.values() {
                assert!(rules.groups().any(|(l, _)| l == label.as_str()));
            }
        }
    }
});
