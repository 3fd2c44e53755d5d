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

//! Hasher implementation for the SHA-256 hash

#![cfg_attr(not(feature = "std"), no_std)]

use hex_literal::hex;
use log_hasher::{BinaryHasher, Hasher, Rfc6962};
use sha2::{Digest, Sha256};

/// Concrete `Hasher` impl for the SHA-256 hash
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
	type Out = [u8; 32];

	const LENGTH: usize = 32;

	fn hash(x: &[u8]) -> Self::Out {
		Sha256::digest(x).into()
	}
}

impl BinaryHasher for Sha256Hasher {
	const NULL_HASH: &'static [u8] =
		&hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");

	type Buffer = Sha256;

	fn init_buffer() -> Self::Buffer {
		Sha256::new()
	}

	fn reset_buffer(buf: &mut Self::Buffer) {
		Digest::reset(buf);
	}

	fn buffer_hash(buff: &mut Self::Buffer, x: &[u8]) {
		Digest::update(buff, x);
	}

	fn buffer_finalize(buff: &mut Self::Buffer) -> Self::Out {
		buff.finalize_reset().into()
	}
}

/// RFC 6962 / RFC 9162 `SHA-256` tree hashing, as used by certificate
/// transparency logs.
pub type Sha256TreeHasher = Rfc6962<Sha256Hasher>;
