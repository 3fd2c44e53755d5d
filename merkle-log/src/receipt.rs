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

//! Self-contained proof artifacts.
//!
//! With the `serde` feature, receipts serialize to objects whose digests are
//! standard padded base64 strings, e.g. for JSON:
//!
//! ```json
//! { "leaf": 0, "size": 2, "root": "<base64 digest>", "proof": ["<base64 digest>"] }
//! ```

use crate::proof::{self, VerifyError};
use crate::rstd::{result::Result, vec::Vec};
use log_hasher::TreeHasher;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inclusion proof of leaf `leaf` in the tree of `size` leaves with root
/// `root`.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
	feature = "serde",
	serde(bound(serialize = "HO: AsRef<[u8]>", deserialize = "HO: AsMut<[u8]> + Default"))
)]
pub struct Receipt<HO> {
	pub leaf: u64,
	pub size: u64,
	#[cfg_attr(feature = "serde", serde(with = "base64_digest"))]
	pub root: HO,
	#[cfg_attr(feature = "serde", serde(with = "base64_digests"))]
	pub proof: Vec<HO>,
}

impl<HO> Receipt<HO> {
	/// Root rebuilt from the proof and the digest of the leaf.
	pub fn root_from_leaf<H>(&self, leaf_hash: &HO) -> Result<HO, VerifyError<HO>>
	where
		H: TreeHasher<Out = HO>,
	{
		proof::root_from_inclusion_proof::<H>(self.leaf, self.size, leaf_hash, &self.proof)
	}

	/// Check that `leaf_hash` is the digest of leaf `self.leaf` under
	/// `self.root`.
	pub fn verify<H>(&self, leaf_hash: &HO) -> Result<(), VerifyError<HO>>
	where
		H: TreeHasher<Out = HO>,
	{
		proof::verify_inclusion::<H>(self.leaf, self.size, leaf_hash, &self.proof, &self.root)
	}

	/// Check the receipt against an entry rather than its digest.
	pub fn verify_leaf<H>(&self, data: &[u8]) -> Result<(), VerifyError<HO>>
	where
		H: TreeHasher<Out = HO>,
	{
		self.verify::<H>(&H::hash_leaf(data))
	}
}

/// Consistency proof between the trees of `size1` and `size2` leaves.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
	feature = "serde",
	serde(bound(serialize = "HO: AsRef<[u8]>", deserialize = "HO: AsMut<[u8]> + Default"))
)]
pub struct ConsistencyReceipt<HO> {
	pub size1: u64,
	pub size2: u64,
	#[cfg_attr(feature = "serde", serde(with = "base64_digests"))]
	pub proof: Vec<HO>,
}

impl<HO> ConsistencyReceipt<HO> {
	pub fn verify<H>(&self, root1: &HO, root2: &HO) -> Result<(), VerifyError<HO>>
	where
		H: TreeHasher<Out = HO>,
	{
		proof::verify_consistency::<H>(self.size1, self.size2, &self.proof, root1, root2)
	}

	/// Root of the larger tree, rebuilt from the root of the smaller one.
	pub fn root2<H>(&self, root1: &HO) -> Result<HO, VerifyError<HO>>
	where
		H: TreeHasher<Out = HO>,
	{
		proof::root_from_consistency_proof::<H>(self.size1, self.size2, &self.proof, root1)
	}
}

#[cfg(feature = "serde")]
mod base64_digest {
	use base64::{engine::general_purpose::STANDARD, Engine as _};
	use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

	pub fn serialize<HO, S>(digest: &HO, serializer: S) -> Result<S::Ok, S::Error>
	where
		HO: AsRef<[u8]>,
		S: Serializer,
	{
		serializer.serialize_str(&STANDARD.encode(digest.as_ref()))
	}

	pub fn deserialize<'de, HO, D>(deserializer: D) -> Result<HO, D::Error>
	where
		HO: AsMut<[u8]> + Default,
		D: Deserializer<'de>,
	{
		let encoded = String::deserialize(deserializer)?;
		decode(&encoded).map_err(D::Error::custom)
	}

	pub(super) fn decode<HO: AsMut<[u8]> + Default>(encoded: &str) -> Result<HO, String> {
		let bytes = STANDARD.decode(encoded).map_err(|e| format!("invalid digest: {}", e))?;
		let mut digest = HO::default();
		let expected = digest.as_mut().len();
		if bytes.len() != expected {
			return Err(format!("digest of {} bytes, expected {}", bytes.len(), expected))
		}
		digest.as_mut().copy_from_slice(&bytes);
		Ok(digest)
	}
}

#[cfg(feature = "serde")]
mod base64_digests {
	use super::base64_digest::decode;
	use base64::{engine::general_purpose::STANDARD, Engine as _};
	use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

	pub fn serialize<HO, S>(digests: &Vec<HO>, serializer: S) -> Result<S::Ok, S::Error>
	where
		HO: AsRef<[u8]>,
		S: Serializer,
	{
		serializer.collect_seq(digests.iter().map(|digest| STANDARD.encode(digest.as_ref())))
	}

	pub fn deserialize<'de, HO, D>(deserializer: D) -> Result<Vec<HO>, D::Error>
	where
		HO: AsMut<[u8]> + Default,
		D: Deserializer<'de>,
	{
		Vec::<String>::deserialize(deserializer)?
			.iter()
			.map(|encoded| decode(encoded).map_err(D::Error::custom))
			.collect()
	}
}
