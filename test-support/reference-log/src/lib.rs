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

//! Reference Merkle tree algorithms and hashers for testing logs.
//!
//! The functions in [`rfc9162`] follow the recursive definitions of RFC 9162
//! section 2.1 literally. They are slow and allocate, but they share no code
//! with an incremental log, which makes them a useful oracle.

mod range_hasher;
pub mod rfc9162;

pub use keccak_hasher::{KeccakHasher, KeccakTreeHasher};
pub use log_hasher::TreeHasher;
pub use range_hasher::{RangeDigest, RangeHasher};
pub use sha256_hasher::{Sha256Hasher, Sha256TreeHasher};

/// Reference hasher is the certificate transparency hasher.
pub type RefHasher = Sha256TreeHasher;

/// Apply a test method on every test hasher.
#[macro_export]
macro_rules! test_hashers {
	($test:ident, $test_internal:ident) => {
		#[test]
		fn $test() {
			eprintln!("Running with hasher `Sha256TreeHasher`");
			$test_internal::<$crate::Sha256TreeHasher>();
			eprintln!("Running with hasher `KeccakTreeHasher`");
			$test_internal::<$crate::KeccakTreeHasher>();
			eprintln!("Running with hasher `RangeHasher`");
			$test_internal::<$crate::RangeHasher>();
		}
	};
}

/// Apply a test method on the cryptographic test hashers only.
///
/// Tests that rely on collision resistance (tampering is detected) cannot run
/// against [`RangeHasher`].
#[macro_export]
macro_rules! test_crypto_hashers {
	($test:ident, $test_internal:ident) => {
		#[test]
		fn $test() {
			eprintln!("Running with hasher `Sha256TreeHasher`");
			$test_internal::<$crate::Sha256TreeHasher>();
			eprintln!("Running with hasher `KeccakTreeHasher`");
			$test_internal::<$crate::KeccakTreeHasher>();
		}
	};
}

/// Entry data for leaf `index`: its big endian encoding.
///
/// [`RangeHasher`] understands this encoding, so logs built from it can be
/// checked against readable digests.
pub fn leaf_data(index: u64) -> Vec<u8> {
	index.to_be_bytes().to_vec()
}

/// Leaf digests of the first `count` entries produced by [`leaf_data`].
pub fn leaf_hashes<H: TreeHasher>(count: u64) -> Vec<H::Out> {
	(0..count).map(|i| H::hash_leaf(&leaf_data(i))).collect()
}
