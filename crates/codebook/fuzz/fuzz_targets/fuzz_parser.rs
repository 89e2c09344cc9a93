//! Fuzz target for the map loader.
//!
//! Checks that loading arbitrary bytes never panics, and that any map that
//! loads can be written back out.

#![no_main]

use codebook::Parser;
use codebook::input::write_map;
use libfuzzer_sys::fuzz_target;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            if let Ok((map, _)) = Parser::new().parse_file(temp_file.path()) {
                let mut out = Vec::new();
                let _ = write_map(&map, &mut out, b'\t');
            }
        }
    }
});
