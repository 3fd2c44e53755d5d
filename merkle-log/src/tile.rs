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

//! Tiles: fixed-height slabs of stored digests.
//!
//! A log can be published as static files, each holding the digests of a
//! horizontal slice of the tree. A tile of height `h` at tile level `l`
//! holds up to `2^h` consecutive digests of tree level `l * h`. A full tile
//! hashes to a single digest of tree level `(l + 1) * h`, which is itself part
//! of a tile one tile level up.
//!
//! The data of a tile is the concatenation of its digests. [`TileReader`]
//! reads node digests out of tiles fetched from an untrusted [`TileStore`],
//! once the tiles are checked against the root of the tree.

use crate::bits::{low_mask, shl_clamped};
use crate::iter_build::root_from_leaf_hashes;
use crate::node::{range_nodes, NodeId};
use crate::proof;
use crate::rstd::{fmt, ops::Range, vec::Vec};
use crate::{LogError, Result};
use log::trace;
use log_hasher::TreeHasher;

/// Largest supported tile height.
pub const MAX_TILE_HEIGHT: u8 = 30;

fn check_height(height: u8) -> Result<()> {
	if height == 0 || height > MAX_TILE_HEIGHT {
		return Err(LogError::TileHeight(height))
	}
	Ok(())
}

/// A tile, addressed as `tile/{height}/{level}/{index}.{width}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Tile {
	pub height: u8,
	/// Tile level, tree level divided by `height`.
	pub level: u8,
	/// Position among the tiles of the same level.
	pub index: u64,
	/// Number of digests, at most `2^height`.
	pub width: u64,
}

impl Tile {
	pub fn new(height: u8, level: u8, index: u64, width: u64) -> Self {
		Tile { height, level, index, width }
	}

	/// Smallest tile holding the digests node `id` hashes from, and the
	/// positions of those digests in the tile.
	pub fn for_node(height: u8, id: NodeId) -> Result<(Tile, Range<u64>)> {
		check_height(height)?;
		let h = height as u32;
		let sub = id.level % h;
		if id.level >= u64::BITS || id.index > u64::MAX >> sub {
			return Err(LogError::MissingNode(id))
		}
		let first = id.index << sub;
		let offset = first & low_mask(h);
		let end = offset + (1 << sub);
		Ok((Tile::new(height, (id.level / h) as u8, first >> h, end), offset..end))
	}

	/// Check that the height is supported, that the width is in
	/// `1..=2^height` and that the digests lie on an addressable row.
	pub fn check(&self) -> Result<()> {
		check_height(self.height)?;
		let span = 1u64 << self.height;
		let end = self.index.checked_mul(span).and_then(|start| start.checked_add(self.width));
		let fits = self.width >= 1 &&
			self.width <= span &&
			self.row_level() < u64::BITS &&
			end.is_some();
		if !fits {
			return Err(LogError::InvalidTile(*self))
		}
		Ok(())
	}

	/// Path of the tile file.
	#[cfg(feature = "std")]
	pub fn path(&self) -> String {
		self.to_string()
	}

	pub fn is_full(&self) -> bool {
		1u64.checked_shl(self.height as u32) == Some(self.width)
	}

	/// Tree level of the digests in the tile.
	pub fn row_level(&self) -> u32 {
		self.level as u32 * self.height as u32
	}

	/// Indices of the tile digests on their row.
	///
	/// Bounds of tiles that fail [`Tile::check`] are clamped to `u64::MAX`.
	pub fn node_range(&self) -> Range<u64> {
		let start = shl_clamped(self.index as u128, self.height as u32);
		start..start.saturating_add(self.width)
	}

	/// Nodes whose digests the tile holds.
	pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
		let level = self.row_level();
		self.node_range().map(move |index| NodeId::new(level, index))
	}

	/// Node one tile level up that a full tile hashes to.
	pub fn root_node(&self) -> NodeId {
		NodeId::new(self.row_level() + self.height as u32, self.index)
	}

	/// Tile `k` tile levels up, holding the ancestors of the digests of this
	/// one, cut to the complete nodes of the tree of `size` leaves.
	///
	/// A tile past the end of that tree has width zero.
	pub fn parent(&self, k: u8, size: u64) -> Tile {
		let h = self.height as u32;
		let level = self.level.saturating_add(k);
		let index = self.index.checked_shr(k as u32 * h).unwrap_or(0);
		let row = size.checked_shr(level as u32 * h).unwrap_or(0);
		let span = 1u64.checked_shl(h).unwrap_or(u64::MAX);
		let width = row.saturating_sub(shl_clamped(index as u128, h)).min(span);
		Tile::new(self.height, level, index, width)
	}
}

impl fmt::Display for Tile {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "tile/{}/{}/{}.{}", self.height, self.level, self.index, self.width)
	}
}

/// Tiles written or rewritten when the log grows from `old_size` to
/// `new_size` leaves, lowest tile level first.
///
/// For each tile level these are the tiles newly completed, followed by the
/// partial tile at the end of the row if it is not empty. Heights outside
/// `1..=MAX_TILE_HEIGHT` have no tiles.
pub fn new_tiles(height: u8, old_size: u64, new_size: u64) -> Vec<Tile> {
	let mut tiles = Vec::new();
	if check_height(height).is_err() {
		return tiles
	}
	let h = height as u32;
	let mut level = 0u32;
	loop {
		let shift = level * h;
		let new_count = new_size.checked_shr(shift).unwrap_or(0);
		if new_count == 0 {
			break
		}
		let old_count = old_size.checked_shr(shift).unwrap_or(0);
		if old_count != new_count {
			for index in (old_count >> h)..(new_count >> h) {
				tiles.push(Tile::new(height, level as u8, index, 1 << h));
			}
			let index = new_count >> h;
			let width = new_count - (index << h);
			if width > 0 {
				tiles.push(Tile::new(height, level as u8, index, width));
			}
		}
		level += 1;
	}
	tiles
}

/// Root of the subtree spanned by the digests of a tile.
///
/// For a full tile this is the digest of [`Tile::root_node`].
pub fn tile_root<H: TreeHasher>(digests: &[H::Out]) -> H::Out {
	root_from_leaf_hashes::<H, _>(digests.iter().copied())
}

/// Split tile data into the digests of the tile.
pub fn read_tile_digests<H: TreeHasher>(tile: &Tile, data: &[u8]) -> Result<Vec<H::Out>> {
	tile.check()?;
	if data.len() as u64 != tile.width.saturating_mul(H::LENGTH as u64) {
		return Err(LogError::TileData { tile: *tile, len: data.len() })
	}
	Ok(data
		.chunks_exact(H::LENGTH)
		.map(|chunk| {
			let mut digest = H::Out::default();
			digest.as_mut().copy_from_slice(chunk);
			digest
		})
		.collect())
}

/// Digest of node `id` computed from the data of `tile`.
pub fn hash_from_tile<H: TreeHasher>(tile: &Tile, data: &[u8], id: NodeId) -> Result<H::Out> {
	let digests = read_tile_digests::<H>(tile, data)?;
	node_from_digests::<H>(tile, &digests, id)
}

fn node_from_digests<H: TreeHasher>(
	tile: &Tile,
	digests: &[H::Out],
	id: NodeId,
) -> Result<H::Out> {
	let (holder, positions) = Tile::for_node(tile.height, id)?;
	if holder.level != tile.level || holder.index != tile.index || holder.width > tile.width {
		return Err(LogError::NodeNotInTile { id, tile: *tile })
	}
	Ok(tile_root::<H>(&digests[positions.start as usize..positions.end as usize]))
}

/// Source of published tile data.
pub trait TileStore {
	/// Data of `tile`, or `None` if it is not available.
	fn get(&self, tile: &Tile) -> Option<Vec<u8>>;
}

#[cfg(feature = "std")]
impl TileStore for std::collections::HashMap<Tile, Vec<u8>> {
	fn get(&self, tile: &Tile) -> Option<Vec<u8>> {
		std::collections::HashMap::get(self, tile).cloned()
	}
}

fn position_or_push(tiles: &mut Vec<Tile>, tile: Tile) -> usize {
	match tiles.iter().position(|known| *known == tile) {
		Some(at) => at,
		None => {
			tiles.push(tile);
			tiles.len() - 1
		},
	}
}

/// Reader of node digests from the tiles of a tree of known size and root.
///
/// The tiles holding the root's subtrees are checked against the root, and
/// any other tile against its parent tile, before a digest is taken out of
/// them.
pub struct TileReader<'db, H: TreeHasher> {
	store: &'db dyn TileStore,
	height: u8,
	size: u64,
	root: H::Out,
}

impl<'db, H: TreeHasher> TileReader<'db, H> {
	pub fn new(store: &'db dyn TileStore, height: u8, size: u64, root: H::Out) -> Result<Self> {
		check_height(height)?;
		Ok(TileReader { store, height, size, root })
	}

	pub fn size(&self) -> u64 {
		self.size
	}

	pub fn root(&self) -> &H::Out {
		&self.root
	}

	/// Authenticated digests of the given nodes, in order.
	pub fn read_hashes(&self, ids: &[NodeId]) -> Result<Vec<H::Out>> {
		let roots: Vec<NodeId> = range_nodes(0, self.size).collect();
		let mut tiles = Vec::new();
		let mut root_tiles = Vec::with_capacity(roots.len());
		for id in &roots {
			let (tile, _) = Tile::for_node(self.height, *id)?;
			root_tiles.push(position_or_push(&mut tiles, tile.parent(0, self.size)));
		}
		let checked_by_root = tiles.len();

		let mut id_tiles = Vec::with_capacity(ids.len());
		for id in ids {
			if id.coverage().end > self.size {
				return Err(LogError::MissingNode(*id))
			}
			let (tile, _) = Tile::for_node(self.height, *id)?;
			let mut k = 0u8;
			while !tiles.contains(&tile.parent(k, self.size)) {
				if tile.level as u32 + k as u32 >= u64::BITS {
					return Err(LogError::MissingNode(*id))
				}
				k += 1;
			}
			// Parents go before their children, and only full tiles have one.
			for k in (1..k).rev() {
				let below = tile.parent(k, self.size);
				if !below.is_full() {
					return Err(LogError::InvalidTile(below))
				}
				position_or_push(&mut tiles, below);
			}
			let own = tile.parent(0, self.size);
			if k > 0 && !own.is_full() {
				return Err(LogError::InvalidTile(own))
			}
			id_tiles.push(position_or_push(&mut tiles, own));
		}

		trace!(
			target: "merkle-log",
			"tile reader: {} tiles for {} nodes of tree {}",
			tiles.len(),
			ids.len(),
			self.size,
		);
		let digests = tiles
			.iter()
			.map(|tile| {
				let data = self.store.get(tile).ok_or(LogError::MissingTile(*tile))?;
				read_tile_digests::<H>(tile, &data)
			})
			.collect::<Result<Vec<_>>>()?;

		let mut computed: Option<H::Out> = None;
		for (id, at) in roots.iter().zip(&root_tiles).rev() {
			let node = node_from_digests::<H>(&tiles[*at], &digests[*at], *id)?;
			computed = Some(match computed {
				Some(right) => H::hash_children(&node, &right),
				None => node,
			});
		}
		if computed.unwrap_or_else(H::empty_root) != self.root {
			return Err(LogError::InconsistentTiles { size: self.size })
		}

		for at in checked_by_root..tiles.len() {
			let tile = tiles[at];
			let parent = tile.parent(1, self.size);
			let parent_at = match tiles[..at].iter().position(|known| *known == parent) {
				Some(parent_at) => parent_at,
				None => return Err(LogError::InconsistentTile(tile)),
			};
			let expected = node_from_digests::<H>(&parent, &digests[parent_at], tile.root_node())?;
			if tile_root::<H>(&digests[at]) != expected {
				return Err(LogError::InconsistentTile(tile))
			}
		}

		ids.iter()
			.zip(id_tiles)
			.map(|(id, at)| node_from_digests::<H>(&tiles[at], &digests[at], *id))
			.collect()
	}

	/// Inclusion proof of leaf `index`, built from the tiles.
	pub fn inclusion_proof(&self, index: u64) -> Result<Vec<H::Out>> {
		let nodes = proof::inclusion(index, self.size)?;
		nodes.rehash::<H>(self.read_hashes(nodes.ids())?)
	}

	/// Consistency proof from the tree of `size1` leaves, built from the
	/// tiles.
	pub fn consistency_proof(&self, size1: u64) -> Result<Vec<H::Out>> {
		let nodes = proof::consistency(size1, self.size)?;
		nodes.rehash::<H>(self.read_hashes(nodes.ids())?)
	}
}
