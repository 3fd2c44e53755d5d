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

//! Addressing of perfect subtrees and dyadic decomposition of leaf ranges.
//!
//! A node `(level, index)` is the root of the perfect subtree of `2^level`
//! leaves starting at leaf `index << level`. Such nodes never change once the
//! log has grown past their last leaf, which is what makes them storable.

use crate::bits::{bit_len, low_mask, shl_clamped};
use crate::rstd::{fmt, iter::FusedIterator, ops::Range};

/// Identifier of a perfect subtree root.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct NodeId {
	/// Height above the leaves, leaves are at level 0.
	pub level: u32,
	/// Position among the nodes of the same level, from the left.
	pub index: u64,
}

impl NodeId {
	pub const fn new(level: u32, index: u64) -> Self {
		NodeId { level, index }
	}

	/// The node of leaf `index`.
	pub const fn leaf(index: u64) -> Self {
		NodeId { level: 0, index }
	}

	/// Parent node. The top level `u32::MAX` is its own parent level.
	pub fn parent(&self) -> Self {
		NodeId { level: self.level.saturating_add(1), index: self.index >> 1 }
	}

	pub fn sibling(&self) -> Self {
		NodeId { level: self.level, index: self.index ^ 1 }
	}

	/// Leaf range `[begin, end)` under this node.
	///
	/// Bounds past the last addressable leaf are clamped to `u64::MAX`.
	pub fn coverage(&self) -> Range<u64> {
		let index = self.index as u128;
		shl_clamped(index, self.level)..shl_clamped(index + 1, self.level)
	}

	/// Whether this node is the left child of its parent.
	pub fn is_left(&self) -> bool {
		self.index & 1 == 0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "({}, {})", self.level, self.index)
	}
}

/// Split the leaf range `[begin, end)` into the masks of its left and right
/// borders.
///
/// The set bits of `left` are the levels of the perfect subtrees hanging to
/// the right of the path to leaf `begin - 1`, the set bits of `right` the
/// levels of those hanging to the left of the path to leaf `end`. Together
/// they form the smallest set of perfect subtrees covering the range. An
/// inverted range is empty.
pub fn decompose(begin: u64, end: u64) -> (u64, u64) {
	if begin >= end {
		return (0, 0)
	}
	if begin == 0 {
		return (0, end)
	}
	let before = begin - 1;
	// Only levels strictly below the point where the paths to `before` and
	// `end` merge belong to the range.
	let mask = low_mask(bit_len(before ^ end) - 1);
	(!before & mask, end & mask)
}

/// Number of nodes in the dyadic decomposition of `[begin, end)`.
pub fn range_size(begin: u64, end: u64) -> usize {
	let (left, right) = decompose(begin, end);
	(left.count_ones() + right.count_ones()) as usize
}

/// Nodes of the dyadic decomposition of `[begin, end)`, from left to right.
///
/// The left border comes first, ordered by increasing level, then the right
/// border by decreasing level.
pub fn range_nodes(begin: u64, end: u64) -> RangeNodes {
	let (left, right) = decompose(begin, end);
	RangeNodes { left, right, pos: begin }
}

/// Iterator returned by [`range_nodes`].
#[derive(Clone, Debug)]
pub struct RangeNodes {
	left: u64,
	right: u64,
	pos: u64,
}

impl RangeNodes {
	fn take(&mut self, level: u32) -> NodeId {
		let id = NodeId::new(level, self.pos >> level);
		self.pos += 1 << level;
		id
	}
}

impl Iterator for RangeNodes {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		if self.left != 0 {
			let level = self.left.trailing_zeros();
			self.left ^= 1 << level;
			return Some(self.take(level))
		}
		if self.right != 0 {
			let level = bit_len(self.right) - 1;
			self.right ^= 1 << level;
			return Some(self.take(level))
		}
		None
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let len = (self.left.count_ones() + self.right.count_ones()) as usize;
		(len, Some(len))
	}
}

impl ExactSizeIterator for RangeNodes {}

impl FusedIterator for RangeNodes {}
