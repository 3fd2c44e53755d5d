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

//! Log shared between one writer and concurrent readers.

use crate::rstd::sync::Arc;
use crate::{ConsistencyReceipt, MerkleLog, Receipt, Result};
use log::debug;
use log_hasher::TreeHasher;
use parking_lot::RwLock;

/// Cloneable handle to a [`MerkleLog`] behind a read-write lock.
///
/// Appends take the write lock, so a reader sees the size and the rows of the
/// log change together: a size is only observable once every digest of its
/// append is stored.
pub struct SharedLog<H: TreeHasher> {
	inner: Arc<RwLock<MerkleLog<H>>>,
}

impl<H: TreeHasher> SharedLog<H> {
	pub fn new() -> Self {
		Self::from_log(MerkleLog::new())
	}

	pub fn from_log(log: MerkleLog<H>) -> Self {
		SharedLog { inner: Arc::new(RwLock::new(log)) }
	}

	/// Append an entry, returning the index of its leaf.
	pub fn append(&self, data: &[u8]) -> Result<u64> {
		self.append_hash(H::hash_leaf(data))
	}

	pub fn append_hash(&self, leaf_hash: H::Out) -> Result<u64> {
		let index = self.inner.write().append_hash(leaf_hash)?;
		debug!(target: "merkle-log", "shared log appended leaf {}", index);
		Ok(index)
	}

	/// Append all entries under one write lock, returning the new size.
	pub fn extend<I, D>(&self, entries: I) -> Result<u64>
	where
		I: IntoIterator<Item = D>,
		D: AsRef<[u8]>,
	{
		self.inner.write().extend(entries)
	}

	pub fn size(&self) -> u64 {
		self.inner.read().size()
	}

	pub fn root(&self) -> Result<H::Out> {
		self.inner.read().root()
	}

	pub fn root_at(&self, size: u64) -> Result<H::Out> {
		self.inner.read().root_at(size)
	}

	/// Size and root of the log, read together.
	pub fn checkpoint(&self) -> Result<(u64, H::Out)> {
		let log = self.inner.read();
		Ok((log.size(), log.root()?))
	}

	pub fn leaf_hash(&self, index: u64) -> Result<H::Out> {
		self.inner.read().leaf_hash(index)
	}

	pub fn inclusion_proof(&self, index: u64, size: u64) -> Result<Vec<H::Out>> {
		self.inner.read().inclusion_proof(index, size)
	}

	pub fn consistency_proof(&self, size1: u64, size2: u64) -> Result<Vec<H::Out>> {
		self.inner.read().consistency_proof(size1, size2)
	}

	pub fn receipt(&self, index: u64, size: u64) -> Result<Receipt<H::Out>> {
		self.inner.read().receipt(index, size)
	}

	pub fn consistency_receipt(&self, size1: u64, size2: u64) -> Result<ConsistencyReceipt<H::Out>> {
		self.inner.read().consistency_receipt(size1, size2)
	}

	/// Owned copy of the log as it is now.
	pub fn snapshot(&self) -> MerkleLog<H> {
		self.inner.read().clone()
	}
}

impl<H: TreeHasher> Default for SharedLog<H> {
	fn default() -> Self {
		Self::new()
	}
}

impl<H: TreeHasher> Clone for SharedLog<H> {
	fn clone(&self) -> Self {
		SharedLog { inner: self.inner.clone() }
	}
}

impl<H: TreeHasher> From<MerkleLog<H>> for SharedLog<H> {
	fn from(log: MerkleLog<H>) -> Self {
		Self::from_log(log)
	}
}
