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

use merkle_log::{
	proof::{root_from_inclusion_proof, verify_inclusion, VerifyError},
	ErrorKind, LogError, MerkleLog, TreeHasher,
};
use reference_log::{test_hashers, RangeHasher};

use crate::{build_log, init_logger, random_entries};

test_hashers!(every_leaf_is_included, every_leaf_is_included_internal);
fn every_leaf_is_included_internal<H: TreeHasher>() {
	init_logger();
	let log = build_log::<H>(40);
	for size in 1..=40 {
		let root = log.root_at(size).unwrap();
		for index in 0..size {
			let proof = log.inclusion_proof(index, size).unwrap();
			let leaf = log.leaf_hash(index).unwrap();
			assert_eq!(verify_inclusion::<H>(index, size, &leaf, &proof, &root), Ok(()));
			assert_eq!(root_from_inclusion_proof::<H>(index, size, &leaf, &proof), Ok(root));
		}
	}
}

test_hashers!(proofs_outlive_growth, proofs_outlive_growth_internal);
fn proofs_outlive_growth_internal<H: TreeHasher>() {
	// A proof against a past size stays the same as the log grows.
	let mut log = MerkleLog::<H>::new();
	let entries = random_entries(7, 50);
	log.extend(&entries[..13]).unwrap();
	let before: Vec<_> = (0..13).map(|i| log.inclusion_proof(i, 13).unwrap()).collect();
	log.extend(&entries[13..]).unwrap();
	for (index, proof) in before.into_iter().enumerate() {
		assert_eq!(log.inclusion_proof(index as u64, 13).unwrap(), proof);
	}
}

test_hashers!(proof_length_follows_shape, proof_length_follows_shape_internal);
fn proof_length_follows_shape_internal<H: TreeHasher>() {
	let log = build_log::<H>(33);
	// Perfect trees need one digest per level.
	for index in 0..32 {
		assert_eq!(log.inclusion_proof(index, 32).unwrap().len(), 5);
	}
	// The last leaf of 33 only needs the root of the first 32.
	assert_eq!(log.inclusion_proof(32, 33).unwrap().len(), 1);
	assert!(log.inclusion_proof(0, 1).unwrap().is_empty());
}

#[test]
fn single_leaf_tree() {
	let log = build_log::<RangeHasher>(1);
	let leaf = log.leaf_hash(0).unwrap();
	assert_eq!(log.root(), Ok(leaf));
	assert_eq!(verify_inclusion::<RangeHasher>(0, 1, &leaf, &[], &leaf), Ok(()));
	assert_eq!(
		verify_inclusion::<RangeHasher>(0, 1, &leaf, &[leaf], &leaf),
		Err(VerifyError::WrongProofSize { got: 1, expected: 0 }),
	);
}

#[test]
fn generation_errors() {
	let log = build_log::<RangeHasher>(10);
	let err = log.inclusion_proof(10, 10).unwrap_err();
	assert_eq!(err, LogError::IndexOutOfRange { index: 10, size: 10 });
	assert!(err.kind().is_caller_bug());

	let err = log.inclusion_proof(3, 11).unwrap_err();
	assert_eq!(err, LogError::SizeOutOfRange { size: 11, current: 10 });
	assert_eq!(err.kind(), ErrorKind::PreconditionViolation);
}

#[test]
fn verification_errors() {
	type R = RangeHasher;
	let log = build_log::<R>(10);
	let root = log.root().unwrap();
	let leaf = log.leaf_hash(6).unwrap();
	let proof = log.inclusion_proof(6, 10).unwrap();

	let err = verify_inclusion::<R>(10, 10, &leaf, &proof, &root).unwrap_err();
	assert_eq!(err, VerifyError::IndexOutOfRange { index: 10, size: 10 });
	assert_eq!(err.kind(), ErrorKind::OutOfRange);

	let mut longer = proof.clone();
	longer.push(root);
	let err = verify_inclusion::<R>(6, 10, &leaf, &longer, &root).unwrap_err();
	assert_eq!(err, VerifyError::WrongProofSize { got: proof.len() + 1, expected: proof.len() });
	assert_eq!(err.kind(), ErrorKind::Shape);

	// Right proof, other leaf.
	let other = log.leaf_hash(7).unwrap();
	let err = verify_inclusion::<R>(6, 10, &other, &proof, &root).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::RootMismatch);
	assert!(!err.kind().is_caller_bug());
}
