//! Fuzz target: `Command::from_payload` and `decode_report`
//!
//! Arbitrary bytes must never panic either decoder.  A command is decided
//! by the first byte alone, and a report only decodes from exactly 28
//! bytes that re-encode to the same text.
//!
//! cargo fuzz run fuzz_command_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use linecounter::app::codec::{decode_report, encode_report, REPORT_LEN};
use linecounter::app::commands::Command;

fuzz_target!(|data: &[u8]| {
    let cmd = Command::from_payload(data);
    if let Some(first) = data.first() {
        assert_eq!(cmd, Command::from_payload(&[*first]));
    } else {
        assert!(cmd.is_none(), "empty payload must not decode");
    }

    if let Ok(snapshot) = decode_report(data) {
        assert_eq!(data.len(), REPORT_LEN);
        assert_eq!(encode_report(&snapshot).as_bytes(), data);
    }
});
