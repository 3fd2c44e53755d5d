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

//! Recursive Merkle tree definitions of RFC 9162, section 2.1.
//!
//! All functions take the list of leaf digests `D[n]` rather than raw entries.

use log_hasher::TreeHasher;

/// Largest power of two strictly smaller than `n`, for `n > 1`.
pub fn split_point(n: usize) -> usize {
	debug_assert!(n > 1);
	1 << (usize::BITS - 1 - (n - 1).leading_zeros())
}

/// `MTH(D[n])`, the Merkle Tree Hash.
pub fn root<H: TreeHasher>(leaves: &[H::Out]) -> H::Out {
	match leaves.len() {
		0 => H::empty_root(),
		1 => leaves[0],
		n => {
			let k = split_point(n);
			H::hash_children(&root::<H>(&leaves[..k]), &root::<H>(&leaves[k..]))
		},
	}
}

/// `PATH(m, D[n])`, the inclusion proof of leaf `m`.
pub fn inclusion_proof<H: TreeHasher>(m: usize, leaves: &[H::Out]) -> Vec<H::Out> {
	let n = leaves.len();
	assert!(m < n, "leaf {} is not in a tree of {} leaves", m, n);
	if n == 1 {
		return Vec::new()
	}
	let k = split_point(n);
	if m < k {
		let mut path = inclusion_proof::<H>(m, &leaves[..k]);
		path.push(root::<H>(&leaves[k..]));
		path
	} else {
		let mut path = inclusion_proof::<H>(m - k, &leaves[k..]);
		path.push(root::<H>(&leaves[..k]));
		path
	}
}

/// `PROOF(m, D[n])`, the consistency proof between the first `m` leaves and
/// the whole list.
///
/// `m == 0` is not defined by the RFC; an empty proof is returned.
pub fn consistency_proof<H: TreeHasher>(m: usize, leaves: &[H::Out]) -> Vec<H::Out> {
	assert!(m <= leaves.len(), "size {} is above {}", m, leaves.len());
	if m == 0 {
		return Vec::new()
	}
	subproof::<H>(m, leaves, true)
}

fn subproof<H: TreeHasher>(m: usize, leaves: &[H::Out], complete: bool) -> Vec<H::Out> {
	let n = leaves.len();
	if m == n {
		return if complete { Vec::new() } else { vec![root::<H>(leaves)] }
	}
	let k = split_point(n);
	if m <= k {
		let mut proof = subproof::<H>(m, &leaves[..k], complete);
		proof.push(root::<H>(&leaves[k..]));
		proof
	} else {
		let mut proof = subproof::<H>(m - k, &leaves[k..], false);
		proof.push(root::<H>(&leaves[..k]));
		proof
	}
}
