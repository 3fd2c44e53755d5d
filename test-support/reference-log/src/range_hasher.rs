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

use log_hasher::TreeHasher;

/// Digest of [`RangeHasher`]: big endian `begin` followed by big endian `end`.
pub type RangeDigest = [u8; 16];

/// Deterministic, non cryptographic tree hasher whose digest of a node is the
/// leaf range `[begin, end)` it covers.
///
/// Leaves must be built from [`crate::leaf_data`], so that leaf `i` hashes to
/// `[i, i + 1)`. Combining two adjacent ranges yields their union; anything
/// else (non adjacent or empty children, foreign leaf data) yields
/// [`RangeHasher::POISON`], which then propagates to the root.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct RangeHasher;

impl RangeHasher {
	/// Digest of a malformed node.
	pub const POISON: RangeDigest = [0xff; 16];

	/// Digest of the range `[begin, end)`.
	pub fn digest(begin: u64, end: u64) -> RangeDigest {
		let mut out = [0u8; 16];
		out[..8].copy_from_slice(&begin.to_be_bytes());
		out[8..].copy_from_slice(&end.to_be_bytes());
		out
	}

	/// Range covered by a digest, `None` for [`RangeHasher::POISON`].
	pub fn range(digest: &RangeDigest) -> Option<(u64, u64)> {
		if *digest == Self::POISON {
			return None
		}
		let mut begin = [0u8; 8];
		let mut end = [0u8; 8];
		begin.copy_from_slice(&digest[..8]);
		end.copy_from_slice(&digest[8..]);
		Some((u64::from_be_bytes(begin), u64::from_be_bytes(end)))
	}
}

impl TreeHasher for RangeHasher {
	type Out = RangeDigest;

	const LENGTH: usize = 16;

	fn empty_root() -> Self::Out {
		Self::digest(0, 0)
	}

	fn hash_leaf(data: &[u8]) -> Self::Out {
		if data.len() != 8 {
			return Self::POISON
		}
		let mut index = [0u8; 8];
		index.copy_from_slice(data);
		let index = u64::from_be_bytes(index);
		match index.checked_add(1) {
			Some(end) => Self::digest(index, end),
			None => Self::POISON,
		}
	}

	fn hash_children(left: &Self::Out, right: &Self::Out) -> Self::Out {
		match (Self::range(left), Self::range(right)) {
			(Some((lb, le)), Some((rb, re))) if lb < le && le == rb && rb < re =>
				Self::digest(lb, re),
			_ => Self::POISON,
		}
	}
}
