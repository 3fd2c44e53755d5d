// Copyright 2017, 2018 Parity Technologies
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

//! Digest algebra for append-only Merkle logs.
//!
//! A log is generic over a [`TreeHasher`]: the three operations needed to
//! build a tree (empty root, leaf hash, interior node hash). Byte-level hash
//! functions implement [`Hasher`] and [`BinaryHasher`], and [`Rfc6962`] turns
//! any such hasher into a domain separated [`TreeHasher`].

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
use std::fmt::Debug;
#[cfg(feature = "std")]
use std::hash;
#[cfg(not(feature = "std"))]
use core::hash;
use core::marker::PhantomData;

#[cfg(feature = "std")]
pub trait MaybeDebug: Debug {}
#[cfg(feature = "std")]
impl<T: Debug> MaybeDebug for T {}
#[cfg(not(feature = "std"))]
pub trait MaybeDebug {}
#[cfg(not(feature = "std"))]
impl<T> MaybeDebug for T {}

/// Prefix byte of a leaf hash input.
pub const LEAF_PREFIX: u8 = 0x00;

/// Prefix byte of an interior node hash input.
pub const NODE_PREFIX: u8 = 0x01;

/// Trait describing an object that can hash a slice of bytes. Used to abstract
/// other types over the hashing algorithm. Defines a single `hash` method and an
/// `Out` associated type with the necessary bounds.
pub trait Hasher: Sync + Send {
	/// The output type of the `Hasher`
	type Out: AsRef<[u8]> + AsMut<[u8]> + Default + MaybeDebug + PartialEq + Eq
		+ hash::Hash + Send + Sync + Clone + Copy;
	/// The length in bytes of the `Hasher` output.
	const LENGTH: usize;

	/// Compute the hash of the provided slice of bytes returning the `Out` type of the `Hasher`.
	fn hash(x: &[u8]) -> Self::Out;
}

/// Hasher with an incremental state, so that prefixed and concatenated inputs
/// can be hashed without building an intermediate buffer.
pub trait BinaryHasher: Hasher {
	/// Hash for the empty content (is hash(&[])).
	const NULL_HASH: &'static [u8];

	/// State buffer for hashing.
	type Buffer;

	fn init_buffer() -> Self::Buffer;
	fn reset_buffer(buf: &mut Self::Buffer);
	fn buffer_hash(buff: &mut Self::Buffer, x: &[u8]);

	/// After calling `buffer_finalize`, one do not have to call `reset_buffer`.
	fn buffer_finalize(buff: &mut Self::Buffer) -> Self::Out;
}

#[cfg(feature = "std")]
/// Test function to use on any binary buffer implementation.
pub fn test_binary_hasher<H: BinaryHasher>() {
	let size = <H as Hasher>::LENGTH * 2;
	let half_size = <H as Hasher>::LENGTH / 2;
	let mut val = vec![0u8; size];
	val[0] = 1;
	let mut buf = <H as BinaryHasher>::init_buffer();
	H::buffer_hash(&mut buf, &val[..half_size]);
	H::buffer_hash(&mut buf, &val[half_size..<H as Hasher>::LENGTH]);
	let three = core::cmp::min(3, half_size);
	H::buffer_hash(&mut buf, &val[<H as Hasher>::LENGTH..<H as Hasher>::LENGTH + three]);
	H::buffer_hash(&mut buf, &val[<H as Hasher>::LENGTH + three..]);
	let h = H::buffer_finalize(&mut buf);
	let h2 = H::hash(&val[..]);
	assert_eq!(h, h2);
	H::buffer_hash(&mut buf, &val[..]);
	let h = H::buffer_finalize(&mut buf);
	assert_eq!(h, h2);
	let null_hash = H::hash(&[]);
	H::reset_buffer(&mut buf);
	let null_hash2 = H::buffer_finalize(&mut buf);
	assert_eq!(H::NULL_HASH, null_hash.as_ref());
	assert_eq!(H::NULL_HASH, null_hash2.as_ref());
}

/// Hash algebra of a binary Merkle tree.
///
/// Leaf and interior hashing must be domain separated: no leaf hash may be
/// mistaken for the hash of two children.
pub trait TreeHasher: Sync + Send {
	/// The digest type stored in the tree.
	type Out: AsRef<[u8]> + AsMut<[u8]> + Default + MaybeDebug + PartialEq + Eq
		+ hash::Hash + Send + Sync + Clone + Copy;
	/// The length in bytes of a digest.
	const LENGTH: usize;

	/// Root of a tree without leaves.
	fn empty_root() -> Self::Out;

	/// Digest of the leaf holding `data`.
	fn hash_leaf(data: &[u8]) -> Self::Out;

	/// Digest of an interior node from its two children.
	fn hash_children(left: &Self::Out, right: &Self::Out) -> Self::Out;
}

/// RFC 6962 tree hashing over a byte hasher.
///
/// `hash_leaf(d) = H(0x00 || d)`, `hash_children(l, r) = H(0x01 || l || r)`
/// and the empty root is `H()`.
pub struct Rfc6962<H>(PhantomData<H>);

impl<H: BinaryHasher> TreeHasher for Rfc6962<H> {
	type Out = H::Out;

	const LENGTH: usize = H::LENGTH;

	fn empty_root() -> Self::Out {
		let mut out = H::Out::default();
		out.as_mut().copy_from_slice(H::NULL_HASH);
		out
	}

	fn hash_leaf(data: &[u8]) -> Self::Out {
		let mut buf = H::init_buffer();
		H::buffer_hash(&mut buf, &[LEAF_PREFIX]);
		H::buffer_hash(&mut buf, data);
		H::buffer_finalize(&mut buf)
	}

	fn hash_children(left: &Self::Out, right: &Self::Out) -> Self::Out {
		let mut buf = H::init_buffer();
		H::buffer_hash(&mut buf, &[NODE_PREFIX]);
		H::buffer_hash(&mut buf, left.as_ref());
		H::buffer_hash(&mut buf, right.as_ref());
		H::buffer_finalize(&mut buf)
	}
}
