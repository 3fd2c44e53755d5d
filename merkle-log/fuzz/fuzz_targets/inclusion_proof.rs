#![no_main]

use libfuzzer_sys::fuzz_target;
use merkle_log_fuzz::{fuzz_inclusion_proof, ProofInput};

fuzz_target!(|data: ProofInput| {
	fuzz_inclusion_proof(data);
});
