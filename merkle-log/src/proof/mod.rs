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

//! Generation and verification of inclusion and consistency proofs.
//!
//! An inclusion proof for leaf `index` in a tree of `size` leaves is the list
//! of digests needed to climb from the leaf digest to the root. A consistency
//! proof between sizes `size1 <= size2` is the list of digests from which both
//! roots can be rebuilt, showing that the larger tree only appends leaves to
//! the smaller one.
//!
//! Generation happens in two steps. [`inclusion`] and [`consistency`] select
//! the tree nodes whose digests form the proof, as a [`ProofNodes`] list. Most
//! of these nodes are roots of perfect subtrees and are stored by the log. At
//! most one proof digest, the ephemeral node, covers an incomplete subtree on
//! the right border of the tree; the selection lists the stored nodes it is
//! made of, and [`ProofNodes::rehash`] folds them into the single digest that
//! goes into the proof.
//!
//! Verification only needs the proof digests, the sizes and the claimed roots.

pub use self::nodes::{consistency, inclusion, nodes, ProofNodes};
pub use self::verify::{
	root_from_consistency_proof, root_from_inclusion_proof, verify_consistency,
	verify_inclusion, Error as VerifyError,
};

mod nodes;
mod verify;
