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

use crate::bits::divergence;
use crate::node::{range_nodes, range_size, NodeId};
use crate::rstd::{ops::Range, vec::Vec};
use crate::{LogError, Result};
use log_hasher::TreeHasher;

/// Tree nodes whose digests make up a proof, in proof order.
///
/// The digests of `ids[ephemeral_span]` are not proof digests themselves:
/// they are folded into the digest of the ephemeral node, which is never
/// stored because its subtree is incomplete.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ProofNodes {
	ids: Vec<NodeId>,
	ephemeral_span: Option<Range<usize>>,
	ephemeral: Option<NodeId>,
}

impl ProofNodes {
	/// Selection of an empty proof.
	pub fn empty() -> Self {
		ProofNodes::default()
	}

	/// Nodes to fetch from the log, in order.
	pub fn ids(&self) -> &[NodeId] {
		&self.ids
	}

	/// Positions in [`Self::ids`] that are folded into one digest. Never
	/// shorter than two nodes.
	pub fn ephemeral_span(&self) -> Option<Range<usize>> {
		self.ephemeral_span.clone()
	}

	/// The node standing on the right of the fork node, whose subtree may be
	/// incomplete.
	pub fn ephemeral(&self) -> Option<NodeId> {
		self.ephemeral
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	/// Number of digests in the proof once the ephemeral span is folded.
	pub fn proof_len(&self) -> usize {
		match self.ephemeral_span {
			Some(ref span) => self.ids.len() + 1 - span.len(),
			None => self.ids.len(),
		}
	}

	/// Turn the digests of [`Self::ids`] into proof digests.
	pub fn rehash<H: TreeHasher>(&self, digests: Vec<H::Out>) -> Result<Vec<H::Out>> {
		self.rehash_with(digests, H::hash_children)
	}

	/// Same as [`Self::rehash`] with an explicit interior node hash.
	///
	/// The span is ordered from the lowest node up, so each next digest is the
	/// left child of what has been folded so far.
	pub fn rehash_with<HO, F>(&self, mut digests: Vec<HO>, hash_children: F) -> Result<Vec<HO>>
	where
		HO: Copy,
		F: Fn(&HO, &HO) -> HO,
	{
		if digests.len() != self.ids.len() {
			return Err(LogError::DigestCount { got: digests.len(), expected: self.ids.len() })
		}
		if let Some(ref span) = self.ephemeral_span {
			let mut acc = digests[span.start];
			for digest in &digests[span.start + 1..span.end] {
				acc = hash_children(digest, &acc);
			}
			digests[span.start] = acc;
			digests.drain(span.start + 1..span.end);
		}
		Ok(digests)
	}

	fn skip_first(mut self) -> Self {
		if !self.ids.is_empty() {
			self.ids.remove(0);
			if let Some(ref mut span) = self.ephemeral_span {
				*span = span.start - 1..span.end - 1;
			}
		}
		self
	}
}

/// Nodes of the path from node `(level, index)` to the root of a tree of
/// `size` leaves, the node itself included as the first id.
///
/// The node must lie strictly left of the right border of the tree at its
/// level, that is `index < size >> level`; otherwise there is no fork node and
/// [`LogError::NoFork`] is returned.
///
/// The path climbs through the siblings of the node's ancestors up to the fork
/// node, the highest ancestor whose subtree is complete. From there the
/// remaining proof is the compact range on the right of the fork node, lowest
/// node first, followed by the compact range on its left.
pub fn nodes(index: u64, level: u32, size: u64) -> Result<ProofNodes> {
	let border = size.checked_shr(level).unwrap_or(0);
	let inner = match divergence(index, border) {
		Some(inner) if index < border => inner,
		_ => return Err(LogError::NoFork { index, level, size }),
	};
	let fork = NodeId::new(level + inner, index >> inner);
	let cover = fork.coverage();

	let mut ids = Vec::with_capacity(
		1 + inner as usize + range_size(cover.end, size) + range_size(0, cover.start),
	);
	let mut node = NodeId::new(level, index);
	ids.push(node);
	while node.level < fork.level {
		ids.push(node.sibling());
		node = node.parent();
	}

	let span_begin = ids.len();
	ids.extend(range_nodes(cover.end, size));
	ids[span_begin..].reverse();
	let span_end = ids.len();
	ids.extend(range_nodes(0, cover.start));
	ids[span_end..].reverse();

	let ephemeral_span = if span_end - span_begin > 1 { Some(span_begin..span_end) } else { None };
	Ok(ProofNodes { ids, ephemeral_span, ephemeral: Some(fork.sibling()) })
}

/// Nodes of the inclusion proof of leaf `index` in a tree of `size` leaves.
pub fn inclusion(index: u64, size: u64) -> Result<ProofNodes> {
	if index >= size {
		return Err(LogError::IndexOutOfRange { index, size })
	}
	Ok(nodes(index, 0, size)?.skip_first())
}

/// Nodes of the consistency proof between trees of `size1` and `size2`
/// leaves.
///
/// The proof is the path from the last perfect subtree of the smaller tree to
/// the root of the larger one. That subtree is the seed of the path; when it
/// is the whole smaller tree the verifier already knows its digest as the old
/// root, so it is left out.
pub fn consistency(size1: u64, size2: u64) -> Result<ProofNodes> {
	if size1 > size2 {
		return Err(LogError::SizeOrder { size1, size2 })
	}
	if size1 == size2 || size1 == 0 {
		return Ok(ProofNodes::empty())
	}
	let level = size1.trailing_zeros();
	let index = (size1 - 1) >> level;
	let nodes = nodes(index, level, size2)?;
	Ok(if index == 0 { nodes.skip_first() } else { nodes })
}
