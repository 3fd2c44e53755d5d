#![no_main]

use libfuzzer_sys::fuzz_target;
use merkle_log_fuzz::{fuzz_consistency_proof, ProofInput};

fuzz_target!(|data: ProofInput| {
	fuzz_consistency_proof(data);
});
