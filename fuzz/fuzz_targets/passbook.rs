#![no_main]

use libfuzzer_sys::fuzz_target;
use passbook::parser::{parse_with, Options};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = passbook::parse_date(input);

        let options = Options {
            skip_header: false,
            lenient: true,
        };
        if let Ok(ledger) = parse_with(input, &options, None) {
            assert!(ledger.is_empty() || ledger.start_date() <= ledger.end_date());
            let _ = ledger.date_range(ledger.end_date(), ledger.start_date());
            let _ = ledger.serialize();
        }
    }
});
