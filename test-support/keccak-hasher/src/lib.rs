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

//! Hasher implementation for the Keccak-256 hash

#![cfg_attr(not(feature = "std"), no_std)]

use hex_literal::hex;
use log_hasher::{BinaryHasher, Hasher, Rfc6962};
use tiny_keccak::{Hasher as _, Keccak};

/// Concrete `Hasher` impl for the Keccak-256 hash
#[derive(Default, Debug, Clone, PartialEq)]
pub struct KeccakHasher;

impl Hasher for KeccakHasher {
	type Out = [u8; 32];

	const LENGTH: usize = 32;

	fn hash(x: &[u8]) -> Self::Out {
		let mut keccak = Keccak::v256();
		keccak.update(x);
		let mut out = [0u8; 32];
		keccak.finalize(&mut out);
		out
	}
}

impl BinaryHasher for KeccakHasher {
	const NULL_HASH: &'static [u8] =
		&hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");

	type Buffer = Keccak;

	fn init_buffer() -> Self::Buffer {
		Keccak::v256()
	}

	fn reset_buffer(buf: &mut Self::Buffer) {
		*buf = Keccak::v256();
	}

	fn buffer_hash(buff: &mut Self::Buffer, x: &[u8]) {
		buff.update(x)
	}

	fn buffer_finalize(buff: &mut Self::Buffer) -> Self::Out {
		let keccak = core::mem::replace(buff, Keccak::v256());
		let mut out = [0u8; 32];
		keccak.finalize(&mut out);
		out
	}
}

/// Keccak-256 tree hashing with RFC 6962 domain separation.
pub type KeccakTreeHasher = Rfc6962<KeccakHasher>;
