// Copyright 2019, 2021 Parity Technologies
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

use crate::bits::bit_len;
use crate::rstd::result::Result;
use crate::ErrorKind;
use log_hasher::TreeHasher;

/// Errors that may occur during proof verification. Apart from
/// [`Error::RootMismatch`], they indicate that the proof does not have the
/// shape implied by the sizes and index being verified.
#[derive(PartialEq, Eq, Clone)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum Error<HO> {
	/// The leaf index is not below the tree size.
	IndexOutOfRange { index: u64, size: u64 },
	/// The first tree is larger than the second one.
	SizeOrder { size1: u64, size2: u64 },
	/// The proof does not have the number of digests the tree shape requires.
	WrongProofSize { got: usize, expected: usize },
	/// A consistency proof from a non-empty tree must contain digests.
	EmptyProof,
	/// Digests were given where the proof must be empty. The parameter is the
	/// number of digests.
	UnexpectedProof(usize),
	/// The root computed from the proof differs from the expected one. The
	/// parameter is the computed root.
	RootMismatch(HO),
}

impl<HO> Error<HO> {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::IndexOutOfRange { .. } => ErrorKind::OutOfRange,
			Error::SizeOrder { .. } |
			Error::WrongProofSize { .. } |
			Error::EmptyProof |
			Error::UnexpectedProof(_) => ErrorKind::Shape,
			Error::RootMismatch(_) => ErrorKind::RootMismatch,
		}
	}
}

#[cfg(feature = "std")]
impl<HO: AsRef<[u8]>> std::fmt::Display for Error<HO> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
		match self {
			Error::IndexOutOfRange { index, size } =>
				write!(f, "Leaf index {} out of range for tree size {}", index, size),
			Error::SizeOrder { size1, size2 } =>
				write!(f, "Tree size {} is larger than tree size {}", size1, size2),
			Error::WrongProofSize { got, expected } =>
				write!(f, "Proof has {} digests, expected {}", got, expected),
			Error::EmptyProof => write!(f, "Proof is empty"),
			Error::UnexpectedProof(len) => write!(f, "Expected an empty proof, got {} digests", len),
			Error::RootMismatch(hash) =>
				write!(f, "Computed incorrect root {:?} from proof", crate::ToHex(hash.as_ref())),
		}
	}
}

#[cfg(feature = "std")]
impl<HO: std::fmt::Debug + AsRef<[u8]>> std::error::Error for Error<HO> {}

/// Number of proof digests below the fork node, and on the left border above
/// it, for leaf `index` in a tree of `size` leaves.
fn decompose_inclusion(index: u64, size: u64) -> (usize, usize) {
	let inner = bit_len(index ^ (size - 1));
	let border = index.checked_shr(inner).unwrap_or(0).count_ones();
	(inner as usize, border as usize)
}

fn chain_inner<H: TreeHasher>(seed: H::Out, proof: &[H::Out], index: u64) -> H::Out {
	proof.iter().enumerate().fold(seed, |acc, (i, digest)| {
		if (index >> i) & 1 == 0 {
			H::hash_children(&acc, digest)
		} else {
			H::hash_children(digest, &acc)
		}
	})
}

/// Like [`chain_inner`], only applying the steps where the running digest is
/// the right child.
fn chain_inner_right<H: TreeHasher>(seed: H::Out, proof: &[H::Out], index: u64) -> H::Out {
	proof.iter().enumerate().fold(seed, |acc, (i, digest)| {
		if (index >> i) & 1 == 1 {
			H::hash_children(digest, &acc)
		} else {
			acc
		}
	})
}

fn chain_border_right<H: TreeHasher>(seed: H::Out, proof: &[H::Out]) -> H::Out {
	proof.iter().fold(seed, |acc, digest| H::hash_children(digest, &acc))
}

fn check_root<HO: PartialEq>(computed: HO, expected: &HO) -> Result<(), Error<HO>> {
	if computed == *expected {
		Ok(())
	} else {
		Err(Error::RootMismatch(computed))
	}
}

/// Root of a tree of `size` leaves computed from the inclusion proof of leaf
/// `index`.
pub fn root_from_inclusion_proof<H: TreeHasher>(
	index: u64,
	size: u64,
	leaf_hash: &H::Out,
	proof: &[H::Out],
) -> Result<H::Out, Error<H::Out>> {
	if index >= size {
		return Err(Error::IndexOutOfRange { index, size })
	}
	let (inner, border) = decompose_inclusion(index, size);
	if proof.len() != inner + border {
		return Err(Error::WrongProofSize { got: proof.len(), expected: inner + border })
	}
	let root = chain_inner::<H>(*leaf_hash, &proof[..inner], index);
	Ok(chain_border_right::<H>(root, &proof[inner..]))
}

/// Check that leaf `index` with digest `leaf_hash` is in the tree of `size`
/// leaves with the given root.
pub fn verify_inclusion<H: TreeHasher>(
	index: u64,
	size: u64,
	leaf_hash: &H::Out,
	proof: &[H::Out],
	root: &H::Out,
) -> Result<(), Error<H::Out>> {
	let computed = root_from_inclusion_proof::<H>(index, size, leaf_hash, proof)?;
	check_root(computed, root)
}

/// Rebuild both roots from a consistency proof between two different,
/// non-empty sizes.
fn consistency_roots<H: TreeHasher>(
	size1: u64,
	size2: u64,
	proof: &[H::Out],
	root1: &H::Out,
) -> Result<(H::Out, H::Out), Error<H::Out>> {
	if proof.is_empty() {
		return Err(Error::EmptyProof)
	}
	let (inner, border) = decompose_inclusion(size1 - 1, size2);
	let shift = size1.trailing_zeros();
	let inner = inner - shift as usize;

	// A power of two sized first tree is a single node known to the verifier.
	let (seed, start) = if size1.is_power_of_two() { (*root1, 0) } else { (proof[0], 1) };
	let expected = start + inner + border;
	if proof.len() != expected {
		return Err(Error::WrongProofSize { got: proof.len(), expected })
	}
	let proof = &proof[start..];
	let mask = (size1 - 1) >> shift;

	let hash1 = chain_inner_right::<H>(seed, &proof[..inner], mask);
	let hash1 = chain_border_right::<H>(hash1, &proof[inner..]);
	let hash2 = chain_inner::<H>(seed, &proof[..inner], mask);
	let hash2 = chain_border_right::<H>(hash2, &proof[inner..]);
	Ok((hash1, hash2))
}

/// Check that the tree of `size2` leaves with root `root2` extends the tree of
/// `size1` leaves with root `root1`.
///
/// Equal sizes need an empty proof and equal roots. An empty first tree is
/// consistent with any tree, as long as `root1` is the empty root and the
/// proof is empty.
pub fn verify_consistency<H: TreeHasher>(
	size1: u64,
	size2: u64,
	proof: &[H::Out],
	root1: &H::Out,
	root2: &H::Out,
) -> Result<(), Error<H::Out>> {
	if size1 > size2 {
		return Err(Error::SizeOrder { size1, size2 })
	}
	if size1 == size2 {
		if !proof.is_empty() {
			return Err(Error::UnexpectedProof(proof.len()))
		}
		return check_root(*root1, root2)
	}
	if size1 == 0 {
		if !proof.is_empty() {
			return Err(Error::UnexpectedProof(proof.len()))
		}
		return check_root(H::empty_root(), root1)
	}
	let (hash1, hash2) = consistency_roots::<H>(size1, size2, proof, root1)?;
	check_root(hash1, root1)?;
	check_root(hash2, root2)
}

/// Root of the tree of `size2` leaves computed from a consistency proof, after
/// checking that the proof rebuilds `root1`.
///
/// An empty first tree does not bind the second one in any way, so it is
/// rejected with [`Error::EmptyProof`].
pub fn root_from_consistency_proof<H: TreeHasher>(
	size1: u64,
	size2: u64,
	proof: &[H::Out],
	root1: &H::Out,
) -> Result<H::Out, Error<H::Out>> {
	if size1 > size2 {
		return Err(Error::SizeOrder { size1, size2 })
	}
	if size1 == size2 {
		if !proof.is_empty() {
			return Err(Error::UnexpectedProof(proof.len()))
		}
		return Ok(*root1)
	}
	if size1 == 0 {
		return Err(Error::EmptyProof)
	}
	let (hash1, hash2) = consistency_roots::<H>(size1, size2, proof, root1)?;
	check_root(hash1, root1)?;
	Ok(hash2)
}
