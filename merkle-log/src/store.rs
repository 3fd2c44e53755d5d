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

//! In-memory append-only Merkle log.

use crate::node::{range_nodes, NodeId};
use crate::proof::{self, ProofNodes};
use crate::rstd::{fmt, vec::Vec};
use crate::tile::{self, Tile, TileStore};
use crate::{ConsistencyReceipt, LogError, Receipt, Result, ToHex};
use log::trace;
use log_hasher::TreeHasher;
use smallvec::SmallVec;

/// Append-only Merkle log over the tree hasher `H`.
///
/// Row `L` holds, left to right, the digests of every complete perfect
/// subtree of `2^L` leaves. A row therefore always has `size >> L` digests,
/// and any node addressed by a proof against a size not above `size` is
/// stored, except the ephemeral node which proofs rebuild on demand.
///
/// ```
/// use merkle_log::{proof, MerkleLog, Rfc6962};
/// use sha256_hasher::Sha256Hasher;
///
/// type Hasher = Rfc6962<Sha256Hasher>;
///
/// let mut log = MerkleLog::<Hasher>::new();
/// log.extend(["A", "B", "C"]).unwrap();
/// let root = log.root().unwrap();
/// let proof = log.inclusion_proof(1, 3).unwrap();
/// let leaf = log.leaf_hash(1).unwrap();
/// assert!(proof::verify_inclusion::<Hasher>(1, 3, &leaf, &proof, &root).is_ok());
/// ```
pub struct MerkleLog<H: TreeHasher> {
	size: u64,
	rows: Vec<Vec<H::Out>>,
}

impl<H: TreeHasher> MerkleLog<H> {
	/// Create an empty log.
	pub fn new() -> Self {
		MerkleLog { size: 0, rows: Vec::new() }
	}

	/// Number of leaves.
	pub fn size(&self) -> u64 {
		self.size
	}

	pub fn is_empty(&self) -> bool {
		self.size == 0
	}

	/// Append an entry, returning the index of its leaf.
	pub fn append(&mut self, data: &[u8]) -> Result<u64> {
		self.append_hash(H::hash_leaf(data))
	}

	/// Append a leaf digest, returning its index.
	///
	/// The leaf completes one perfect subtree per trailing one bit of the
	/// current size; each is hashed with its left sibling and stored one level
	/// up, like a carry in a binary counter.
	pub fn append_hash(&mut self, leaf_hash: H::Out) -> Result<u64> {
		let index = self.size;
		let carries = (!index).trailing_zeros();
		if carries as usize > self.rows.len() {
			return Err(LogError::AppendGap { level: carries })
		}
		// Each row a carry passes through must end with the left sibling.
		for level in 0..carries {
			if self.rows[level as usize].len() as u64 != index >> level {
				return Err(LogError::AppendGap { level })
			}
		}

		let mut node = leaf_hash;
		for row in self.rows.iter_mut().take(carries as usize) {
			let parent = match row.last() {
				Some(left) => H::hash_children(left, &node),
				None => return Err(LogError::AppendGap { level: 0 }),
			};
			row.push(node);
			node = parent;
		}
		match self.rows.get_mut(carries as usize) {
			Some(row) => row.push(node),
			None => {
				let mut row = Vec::with_capacity(1);
				row.push(node);
				self.rows.push(row);
			},
		}
		self.size += 1;
		trace!(
			target: "merkle-log",
			"append: leaf {} ({:?}), {} carries",
			index,
			ToHex(leaf_hash.as_ref()),
			carries,
		);
		Ok(index)
	}

	/// Append all entries, returning the new size.
	pub fn extend<I, D>(&mut self, entries: I) -> Result<u64>
	where
		I: IntoIterator<Item = D>,
		D: AsRef<[u8]>,
	{
		for data in entries {
			self.append(data.as_ref())?;
		}
		Ok(self.size)
	}

	fn check_size(&self, size: u64) -> Result<()> {
		if size > self.size {
			return Err(LogError::SizeOutOfRange { size, current: self.size })
		}
		Ok(())
	}

	/// Stored digest of a node.
	pub fn node(&self, id: NodeId) -> Result<H::Out> {
		self.rows
			.get(id.level as usize)
			.and_then(|row| row.get(usize::try_from(id.index).ok()?))
			.copied()
			.ok_or(LogError::MissingNode(id))
	}

	/// Stored digests of the given nodes, in order.
	pub fn digests<I: IntoIterator<Item = NodeId>>(&self, ids: I) -> Result<Vec<H::Out>> {
		ids.into_iter().map(|id| self.node(id)).collect()
	}

	/// Digest of leaf `index`.
	pub fn leaf_hash(&self, index: u64) -> Result<H::Out> {
		if index >= self.size {
			return Err(LogError::IndexOutOfRange { index, size: self.size })
		}
		self.node(NodeId::leaf(index))
	}

	/// Root of the tree made of the first `size` leaves.
	pub fn root_at(&self, size: u64) -> Result<H::Out> {
		self.check_size(size)?;
		let ids: SmallVec<[NodeId; 64]> = range_nodes(0, size).collect();
		let mut nodes = ids.iter().rev();
		let mut root = match nodes.next() {
			Some(id) => self.node(*id)?,
			None => return Ok(H::empty_root()),
		};
		for id in nodes {
			root = H::hash_children(&self.node(*id)?, &root);
		}
		trace!(target: "merkle-log", "root at {}: {:?}", size, ToHex(root.as_ref()));
		Ok(root)
	}

	/// Current root.
	pub fn root(&self) -> Result<H::Out> {
		self.root_at(self.size)
	}

	/// Digests of the minimal set of perfect subtrees covering the leaves
	/// `[begin, end)`, from left to right.
	pub fn compact_range(&self, begin: u64, end: u64) -> Result<Vec<H::Out>> {
		if begin > end {
			return Err(LogError::InvalidRange { begin, end })
		}
		self.check_size(end)?;
		self.digests(range_nodes(begin, end))
	}

	/// Fetch the digests of a node selection and fold its ephemeral span.
	pub fn proof_digests(&self, nodes: &ProofNodes) -> Result<Vec<H::Out>> {
		let digests = self.digests(nodes.ids().iter().copied())?;
		nodes.rehash::<H>(digests)
	}

	/// Inclusion proof of leaf `index` in the tree of the first `size`
	/// leaves.
	pub fn inclusion_proof(&self, index: u64, size: u64) -> Result<Vec<H::Out>> {
		self.check_size(size)?;
		let nodes = proof::inclusion(index, size)?;
		trace!(
			target: "merkle-log",
			"inclusion proof of {} in {}: {} nodes, ephemeral {:?}",
			index,
			size,
			nodes.len(),
			nodes.ephemeral_span(),
		);
		self.proof_digests(&nodes)
	}

	/// Consistency proof between the trees of the first `size1` and `size2`
	/// leaves.
	pub fn consistency_proof(&self, size1: u64, size2: u64) -> Result<Vec<H::Out>> {
		self.check_size(size2)?;
		let nodes = proof::consistency(size1, size2)?;
		trace!(
			target: "merkle-log",
			"consistency proof from {} to {}: {} nodes, ephemeral {:?}",
			size1,
			size2,
			nodes.len(),
			nodes.ephemeral_span(),
		);
		self.proof_digests(&nodes)
	}

	/// Inclusion proof of leaf `index` bundled with the tree size and root.
	pub fn receipt(&self, index: u64, size: u64) -> Result<Receipt<H::Out>> {
		let proof = self.inclusion_proof(index, size)?;
		Ok(Receipt { leaf: index, size, root: self.root_at(size)?, proof })
	}

	pub fn consistency_receipt(&self, size1: u64, size2: u64) -> Result<ConsistencyReceipt<H::Out>> {
		let proof = self.consistency_proof(size1, size2)?;
		Ok(ConsistencyReceipt { size1, size2, proof })
	}

	/// Digests of a tile.
	pub fn tile(&self, tile: &Tile) -> Result<Vec<H::Out>> {
		tile.check()?;
		self.digests(tile.node_ids())
	}

	/// Published data of a tile, its digests one after the other.
	pub fn tile_data(&self, tile: &Tile) -> Result<Vec<u8>> {
		let digests = self.tile(tile)?;
		let mut data = Vec::with_capacity(digests.len() * H::LENGTH);
		for digest in &digests {
			data.extend_from_slice(digest.as_ref());
		}
		Ok(data)
	}

	/// Tiles of the given height changed since the log had `old_size`
	/// leaves.
	pub fn new_tiles(&self, height: u8, old_size: u64) -> Result<Vec<Tile>> {
		self.check_size(old_size)?;
		Ok(tile::new_tiles(height, old_size, self.size))
	}
}

impl<H: TreeHasher> TileStore for MerkleLog<H> {
	fn get(&self, tile: &Tile) -> Option<Vec<u8>> {
		self.tile_data(tile).ok()
	}
}

impl<H: TreeHasher> Default for MerkleLog<H> {
	fn default() -> Self {
		Self::new()
	}
}

impl<H: TreeHasher> Clone for MerkleLog<H> {
	fn clone(&self) -> Self {
		MerkleLog { size: self.size, rows: self.rows.clone() }
	}
}

impl<H: TreeHasher> fmt::Debug for MerkleLog<H> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("MerkleLog")
			.field("size", &self.size)
			.field("height", &self.rows.len())
			.finish()
	}
}
