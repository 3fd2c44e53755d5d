// Copyright 2021 Parity Technologies
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use arbitrary::Arbitrary;
use log_hasher::TreeHasher;
use merkle_log::{
	proof::{root_from_consistency_proof, root_from_inclusion_proof, verify_consistency, verify_inclusion},
	MerkleLog,
};
use reference_log::{leaf_data, rfc9162, RefHasher};

/// Entries are capped so that a single input stays fast.
const MAX_ENTRIES: usize = 512;

fn build_log(entries: &[Vec<u8>]) -> MerkleLog<RefHasher> {
	let mut log = MerkleLog::new();
	log.extend(entries.iter().take(MAX_ENTRIES)).expect("appends to a fresh log never fail");
	log
}

fn leaf_hashes<H: TreeHasher>(entries: &[Vec<u8>]) -> Vec<H::Out> {
	entries.iter().take(MAX_ENTRIES).map(|entry| H::hash_leaf(entry)).collect()
}

/// Every root of an incrementally built log matches the recursive definition.
pub fn fuzz_log_root(entries: Vec<Vec<u8>>) {
	let log = build_log(&entries);
	let leaves = leaf_hashes::<RefHasher>(&entries);
	for size in 0..=leaves.len() {
		assert_eq!(log.root_at(size as u64).unwrap(), rfc9162::root::<RefHasher>(&leaves[..size]));
	}
}

#[derive(Debug, Arbitrary)]
pub struct ProofInput {
	entries: Vec<Vec<u8>>,
	a: u16,
	b: u16,
}

impl ProofInput {
	/// Two sizes drawn from the input.
	fn sizes(&self, len: u64) -> (u64, u64) {
		let size2 = self.b as u64 % (len + 1);
		(self.a as u64 % (size2 + 1), size2)
	}
}

pub fn fuzz_inclusion_proof(input: ProofInput) {
	let log = build_log(&input.entries);
	let (index, size) = input.sizes(log.size());
	if size == 0 {
		return
	}
	let index = index.min(size - 1);
	let proof = log.inclusion_proof(index, size).unwrap();
	let leaves = leaf_hashes::<RefHasher>(&input.entries);
	assert_eq!(proof, rfc9162::inclusion_proof::<RefHasher>(index as usize, &leaves[..size as usize]));
	let root = log.root_at(size).unwrap();
	verify_inclusion::<RefHasher>(index, size, &leaves[index as usize], &proof, &root).unwrap();
}

pub fn fuzz_consistency_proof(input: ProofInput) {
	let log = build_log(&input.entries);
	let (size1, size2) = input.sizes(log.size());
	let proof = log.consistency_proof(size1, size2).unwrap();
	let leaves = leaf_hashes::<RefHasher>(&input.entries);
	assert_eq!(proof, rfc9162::consistency_proof::<RefHasher>(size1 as usize, &leaves[..size2 as usize]));
	let (root1, root2) = (log.root_at(size1).unwrap(), log.root_at(size2).unwrap());
	verify_consistency::<RefHasher>(size1, size2, &proof, &root1, &root2).unwrap();
}

/// Change applied to a valid proof.
#[derive(Debug, Arbitrary)]
pub enum Edit {
	Flip { at: u8, byte: u8, mask: u8 },
	Drop { at: u8 },
	Insert { at: u8, digest: [u8; 32] },
}

impl Edit {
	fn apply(&self, proof: &mut Vec<[u8; 32]>) {
		match *self {
			Edit::Flip { at, byte, mask } =>
				if !proof.is_empty() {
					let len = proof.len();
					proof[at as usize % len][byte as usize % 32] ^= mask;
				},
			Edit::Drop { at } =>
				if !proof.is_empty() {
					let len = proof.len();
					proof.remove(at as usize % len);
				},
			Edit::Insert { at, digest } => {
				let at = at as usize % (proof.len() + 1);
				proof.insert(at, digest);
			},
		}
	}
}

#[derive(Debug, Arbitrary)]
pub struct InvalidProofInput {
	size: u16,
	index: u16,
	size1: u16,
	edit: Edit,
	raw_index: u64,
	raw_size: u64,
	raw_proof: Vec<[u8; 32]>,
}

/// Verification never panics, and rejects any change to a valid proof.
pub fn fuzz_proof_invalid(input: InvalidProofInput) {
	let leaf = RefHasher::hash_leaf(&input.raw_index.to_be_bytes());
	let _ = verify_inclusion::<RefHasher>(input.raw_index, input.raw_size, &leaf, &input.raw_proof, &leaf);
	let _ = verify_consistency::<RefHasher>(input.raw_index, input.raw_size, &input.raw_proof, &leaf, &leaf);
	let _ = root_from_consistency_proof::<RefHasher>(input.raw_index, input.raw_size, &input.raw_proof, &leaf);
	let _ = root_from_inclusion_proof::<RefHasher>(input.raw_index, input.raw_size, &leaf, &input.raw_proof);

	let size = (input.size as u64 % MAX_ENTRIES as u64).max(1);
	let mut log = MerkleLog::<RefHasher>::new();
	log.extend((0..size).map(leaf_data)).expect("appends to a fresh log never fail");
	let root = log.root_at(size).unwrap();

	let index = input.index as u64 % size;
	let proof = log.inclusion_proof(index, size).unwrap();
	let mut edited = proof.clone();
	input.edit.apply(&mut edited);
	if edited != proof {
		let leaf = log.leaf_hash(index).unwrap();
		assert!(verify_inclusion::<RefHasher>(index, size, &leaf, &edited, &root).is_err());
	}

	let size1 = input.size1 as u64 % (size + 1);
	let proof = log.consistency_proof(size1, size).unwrap();
	let mut edited = proof.clone();
	input.edit.apply(&mut edited);
	if edited != proof {
		let root1 = log.root_at(size1).unwrap();
		assert!(verify_consistency::<RefHasher>(size1, size, &edited, &root1, &root).is_err());
	}
}
