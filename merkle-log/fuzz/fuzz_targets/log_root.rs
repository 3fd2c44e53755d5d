#![no_main]

use libfuzzer_sys::fuzz_target;
use merkle_log_fuzz::fuzz_log_root;

fuzz_target!(|data: Vec<Vec<u8>>| {
	fuzz_log_root(data);
});
