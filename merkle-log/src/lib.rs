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
#![cfg_attr(not(feature = "std"), no_std)]

//! Append-only Merkle log with inclusion and consistency proofs.
//!
//! The log stores, for every level of the tree, the digests of the perfect
//! subtrees completed so far. Any historical root and any proof against a
//! historical size can be produced from those rows, and checked with the
//! functions of [`proof`] without access to the log.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
mod rstd {
	pub use std::{cmp, error::Error, fmt, iter, marker, mem, ops, result, sync, vec};
}

#[cfg(not(feature = "std"))]
mod rstd {
	pub use alloc::{sync, vec};
	pub use core::{cmp, fmt, iter, marker, mem, ops, result};
	pub trait Error {}
	impl<T> Error for T {}
}

#[cfg(feature = "std")]
use self::rstd::Error;
use self::rstd::fmt;

pub mod bits;
pub mod node;
pub mod proof;
pub mod tile;

mod iter_build;
mod receipt;
#[cfg(feature = "std")]
mod shared;
mod store;

pub use crate::{
	iter_build::{root_from_leaf_hashes, root_from_leaves, verify_tree, RootBuilder},
	node::{range_nodes, range_size, NodeId},
	proof::{ProofNodes, VerifyError},
	receipt::{ConsistencyReceipt, Receipt},
	store::MerkleLog,
	tile::{Tile, TileReader, TileStore},
};
pub use log_hasher::{Rfc6962, TreeHasher};

#[cfg(feature = "std")]
pub use crate::shared::SharedLog;

/// Classification shared by [`LogError`] and [`VerifyError`].
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ErrorKind {
	/// A node, leaf or size that the log or the proof does not address.
	OutOfRange,
	/// Malformed input: wrong proof length, inverted sizes or ranges.
	Shape,
	/// The recomputed root differs from the claimed one.
	RootMismatch,
	/// A documented precondition of the call was not met.
	PreconditionViolation,
}

impl ErrorKind {
	/// Errors that can only come from a wrong call, as opposed to bad data.
	pub fn is_caller_bug(&self) -> bool {
		matches!(self, ErrorKind::OutOfRange | ErrorKind::PreconditionViolation)
	}
}

/// Errors of log operations and proof generation.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum LogError {
	/// A node that was never stored was requested.
	MissingNode(NodeId),
	/// Leaf index at or beyond the tree size.
	IndexOutOfRange { index: u64, size: u64 },
	/// Requested tree size above the current size of the log.
	SizeOutOfRange { size: u64, current: u64 },
	/// Consistency between a larger and a smaller tree.
	SizeOrder { size1: u64, size2: u64 },
	/// Leaf range with `begin > end`.
	InvalidRange { begin: u64, end: u64 },
	/// Number of digests does not match the number of proof nodes.
	DigestCount { got: usize, expected: usize },
	/// Node selection for a node that does not diverge from the tree size.
	NoFork { index: u64, level: u32, size: u64 },
	/// Append would carry into a level above the highest stored row.
	AppendGap { level: u32 },
	/// Tile height outside `1..=MAX_TILE_HEIGHT`.
	TileHeight(u8),
	/// Tile whose width or position does not fit its height.
	InvalidTile(Tile),
	/// Tile data whose length is not `width` digests.
	TileData { tile: Tile, len: usize },
	/// The tile does not hold the digests of the node.
	NodeNotInTile { id: NodeId, tile: Tile },
	/// A tile needed to read a node is not available.
	MissingTile(Tile),
	/// Tile data that does not hash to its parent tile.
	InconsistentTile(Tile),
	/// Tile data that does not hash to the root of the tree.
	InconsistentTiles { size: u64 },
}

impl LogError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			LogError::MissingNode(_) |
			LogError::IndexOutOfRange { .. } |
			LogError::NodeNotInTile { .. } |
			LogError::MissingTile(_) => ErrorKind::OutOfRange,
			LogError::SizeOrder { .. } |
			LogError::InvalidRange { .. } |
			LogError::DigestCount { .. } |
			LogError::TileHeight(_) |
			LogError::InvalidTile(_) |
			LogError::TileData { .. } => ErrorKind::Shape,
			LogError::InconsistentTile(_) | LogError::InconsistentTiles { .. } =>
				ErrorKind::RootMismatch,
			LogError::SizeOutOfRange { .. } |
			LogError::NoFork { .. } |
			LogError::AppendGap { .. } => ErrorKind::PreconditionViolation,
		}
	}
}

#[cfg(feature = "std")]
impl fmt::Display for LogError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			LogError::MissingNode(ref id) => write!(f, "Node {} is not stored in the log", id),
			LogError::IndexOutOfRange { index, size } =>
				write!(f, "Leaf index {} out of range for tree size {}", index, size),
			LogError::SizeOutOfRange { size, current } =>
				write!(f, "Tree size {} is above the log size {}", size, current),
			LogError::SizeOrder { size1, size2 } =>
				write!(f, "Tree size {} is larger than tree size {}", size1, size2),
			LogError::InvalidRange { begin, end } =>
				write!(f, "Invalid leaf range [{}, {})", begin, end),
			LogError::DigestCount { got, expected } =>
				write!(f, "Got {} digests for {} proof nodes", got, expected),
			LogError::NoFork { index, level, size } => write!(
				f,
				"Node ({}, {}) does not diverge from tree size {}",
				level, index, size
			),
			LogError::AppendGap { level } => write!(f, "Gap in tree appends at level {}", level),
			LogError::TileHeight(height) => write!(f, "Invalid tile height {}", height),
			LogError::InvalidTile(ref tile) => write!(f, "Invalid {}", tile),
			LogError::TileData { ref tile, len } =>
				write!(f, "Data of {} bytes does not match {}", len, tile),
			LogError::NodeNotInTile { ref id, ref tile } =>
				write!(f, "Node {} is not in {}", id, tile),
			LogError::MissingTile(ref tile) => write!(f, "Missing {}", tile),
			LogError::InconsistentTile(ref tile) =>
				write!(f, "Downloaded {} does not match its parent tile", tile),
			LogError::InconsistentTiles { size } =>
				write!(f, "Downloaded tiles do not match the root of tree size {}", size),
		}
	}
}

#[cfg(feature = "std")]
impl Error for LogError {}

/// Log operation result type.
pub type Result<T> = rstd::result::Result<T, LogError>;

/// Lower-case hex rendering of digests in logs and error messages.
pub(crate) struct ToHex<'a>(pub &'a [u8]);

impl<'a> fmt::Debug for ToHex<'a> {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		let hex = rustc_hex::ToHexIter::new(self.0.iter());
		for b in hex {
			write!(fmt, "{}", b)?;
		}
		Ok(())
	}
}
