// Copyright 2017, 2021 Parity Technologies
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

//! Root computation from a stream of leaves, without keeping the tree.

use crate::proof::VerifyError;
use crate::rstd::{fmt, result::Result};
use log_hasher::TreeHasher;
use smallvec::SmallVec;

/// Stack of pending perfect subtree roots, one per set bit of the number of
/// leaves pushed so far.
pub struct RootBuilder<H: TreeHasher> {
	stack: SmallVec<[H::Out; 16]>,
	count: u64,
}

impl<H: TreeHasher> RootBuilder<H> {
	pub fn new() -> Self {
		RootBuilder { stack: SmallVec::new(), count: 0 }
	}

	/// Number of leaves pushed.
	pub fn count(&self) -> u64 {
		self.count
	}

	pub fn push_leaf(&mut self, data: &[u8]) {
		self.push(H::hash_leaf(data))
	}

	/// Push a leaf digest.
	///
	/// The new leaf completes one subtree per trailing one of the previous
	/// leaf count, each merged with its left neighbour on the stack.
	pub fn push(&mut self, leaf_hash: H::Out) {
		let mut node = leaf_hash;
		for _ in 0..self.count.trailing_ones() {
			match self.stack.pop() {
				Some(left) => node = H::hash_children(&left, &node),
				None => break,
			}
		}
		self.stack.push(node);
		self.count += 1;
	}

	/// Root of the leaves pushed so far.
	pub fn root(&self) -> H::Out {
		let mut pending = self.stack.iter().rev();
		match pending.next() {
			Some(last) => pending.fold(*last, |acc, left| H::hash_children(left, &acc)),
			None => H::empty_root(),
		}
	}
}

impl<H: TreeHasher> Default for RootBuilder<H> {
	fn default() -> Self {
		Self::new()
	}
}

impl<H: TreeHasher> Clone for RootBuilder<H> {
	fn clone(&self) -> Self {
		RootBuilder { stack: self.stack.clone(), count: self.count }
	}
}

impl<H: TreeHasher> fmt::Debug for RootBuilder<H> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("RootBuilder")
			.field("count", &self.count)
			.field("pending", &self.stack.len())
			.finish()
	}
}

impl<H: TreeHasher> Extend<H::Out> for RootBuilder<H> {
	fn extend<I: IntoIterator<Item = H::Out>>(&mut self, iter: I) {
		for leaf_hash in iter {
			self.push(leaf_hash);
		}
	}
}

/// Root of the tree with the given leaf digests.
pub fn root_from_leaf_hashes<H, I>(leaf_hashes: I) -> H::Out
where
	H: TreeHasher,
	I: IntoIterator<Item = H::Out>,
{
	let mut builder = RootBuilder::<H>::new();
	builder.extend(leaf_hashes);
	builder.root()
}

/// Root of the tree with the given entries.
pub fn root_from_leaves<H, I, D>(leaves: I) -> H::Out
where
	H: TreeHasher,
	I: IntoIterator<Item = D>,
	D: AsRef<[u8]>,
{
	root_from_leaf_hashes::<H, _>(leaves.into_iter().map(|data| H::hash_leaf(data.as_ref())))
}

/// Check that the full list of leaf digests hashes to `root`.
pub fn verify_tree<H, I>(root: &H::Out, leaf_hashes: I) -> Result<(), VerifyError<H::Out>>
where
	H: TreeHasher,
	I: IntoIterator<Item = H::Out>,
{
	let computed = root_from_leaf_hashes::<H, _>(leaf_hashes);
	if computed == *root {
		Ok(())
	} else {
		Err(VerifyError::RootMismatch(computed))
	}
}
