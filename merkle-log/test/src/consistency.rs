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
	proof::{root_from_consistency_proof, verify_consistency, VerifyError},
	LogError, TreeHasher,
};
use reference_log::{test_hashers, RangeHasher};

use crate::{build_log, init_logger};

test_hashers!(every_prefix_is_consistent, every_prefix_is_consistent_internal);
fn every_prefix_is_consistent_internal<H: TreeHasher>() {
	init_logger();
	let log = build_log::<H>(36);
	for size2 in 0..=36 {
		let root2 = log.root_at(size2).unwrap();
		for size1 in 0..=size2 {
			let root1 = log.root_at(size1).unwrap();
			let proof = log.consistency_proof(size1, size2).unwrap();
			assert_eq!(
				verify_consistency::<H>(size1, size2, &proof, &root1, &root2),
				Ok(()),
				"{} -> {}",
				size1,
				size2,
			);
			if size1 > 0 {
				assert_eq!(root_from_consistency_proof::<H>(size1, size2, &proof, &root1), Ok(root2));
			}
		}
	}
}

test_hashers!(consistency_is_transitive, consistency_is_transitive_internal);
fn consistency_is_transitive_internal<H: TreeHasher>() {
	let log = build_log::<H>(21);
	let root = |size| log.root_at(size).unwrap();
	let proof = |size1, size2| log.consistency_proof(size1, size2).unwrap();
	for size3 in 1..=21u64 {
		for size2 in 1..=size3 {
			for size1 in 1..=size2 {
				// Chaining the two steps reaches the same root as the direct proof.
				let step = root_from_consistency_proof::<H>(size1, size2, &proof(size1, size2), &root(size1))
					.and_then(|root2| {
						root_from_consistency_proof::<H>(size2, size3, &proof(size2, size3), &root2)
					});
				let direct =
					root_from_consistency_proof::<H>(size1, size3, &proof(size1, size3), &root(size1));
				assert_eq!(step, direct);
				assert_eq!(direct, Ok(root(size3)));
			}
		}
	}
}

test_hashers!(proofs_against_other_sizes_fail, proofs_against_other_sizes_fail_internal);
fn proofs_against_other_sizes_fail_internal<H: TreeHasher>() {
	let log = build_log::<H>(16);
	let proof = log.consistency_proof(5, 13).unwrap();
	let (root5, root13) = (log.root_at(5).unwrap(), log.root_at(13).unwrap());
	assert_eq!(verify_consistency::<H>(5, 13, &proof, &root5, &root13), Ok(()));
	for size2 in 6..=16 {
		if size2 != 13 {
			let root2 = log.root_at(size2).unwrap();
			assert!(verify_consistency::<H>(5, size2, &proof, &root5, &root2).is_err());
		}
	}
}

#[test]
fn generation_errors() {
	let log = build_log::<RangeHasher>(8);
	assert_eq!(log.consistency_proof(5, 4), Err(LogError::SizeOrder { size1: 5, size2: 4 }));
	assert_eq!(log.consistency_proof(2, 9), Err(LogError::SizeOutOfRange { size: 9, current: 8 }));
	assert_eq!(log.consistency_proof(0, 8), Ok(vec![]));
	assert_eq!(log.consistency_proof(8, 8), Ok(vec![]));
}

#[test]
fn empty_and_equal_trees() {
	type R = RangeHasher;
	let log = build_log::<R>(8);
	let root = log.root().unwrap();
	let empty = log.root_at(0).unwrap();
	assert_eq!(verify_consistency::<R>(0, 8, &[], &empty, &root), Ok(()));
	assert_eq!(verify_consistency::<R>(0, 0, &[], &empty, &empty), Ok(()));
	assert_eq!(verify_consistency::<R>(8, 8, &[], &root, &root), Ok(()));
	assert_eq!(
		verify_consistency::<R>(0, 8, &[root], &empty, &root),
		Err(VerifyError::UnexpectedProof(1)),
	);
	assert_eq!(
		verify_consistency::<R>(0, 8, &[], &root, &root),
		Err(VerifyError::RootMismatch(empty)),
	);
	assert_eq!(
		verify_consistency::<R>(8, 8, &[], &root, &empty),
		Err(VerifyError::RootMismatch(root)),
	);
}
