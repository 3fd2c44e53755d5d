#![no_main]

use libfuzzer_sys::fuzz_target;
use merkle_log_fuzz::{fuzz_proof_invalid, InvalidProofInput};

fuzz_target!(|data: InvalidProofInput| {
	fuzz_proof_invalid(data);
});
