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

use std::thread;

use merkle_log::{proof::verify_consistency, SharedLog};
use reference_log::Sha256TreeHasher;

use crate::random_entries;

type S = Sha256TreeHasher;

#[test]
fn snapshots_are_independent() {
	let shared = SharedLog::<S>::new();
	shared.extend(random_entries(5, 10)).unwrap();
	let snapshot = shared.snapshot();
	shared.extend(random_entries(6, 10)).unwrap();

	assert_eq!(snapshot.size(), 10);
	assert_eq!(shared.size(), 20);
	assert_eq!(snapshot.root(), shared.root_at(10));
	let proof = shared.consistency_proof(10, 20).unwrap();
	let (size, root) = shared.checkpoint().unwrap();
	assert_eq!(verify_consistency::<S>(10, size, &proof, &snapshot.root().unwrap(), &root), Ok(()));
}

#[test]
fn checkpoints_seen_by_readers_are_consistent() {
	let shared = SharedLog::<S>::new();
	let entries = random_entries(8, 200);
	let readers: Vec<_> = (0..4)
		.map(|_| {
			let log = shared.clone();
			thread::spawn(move || {
				let mut last = (0, log.root_at(0).unwrap());
				while last.0 < 200 {
					let current = log.checkpoint().unwrap();
					let proof = log.consistency_proof(last.0, current.0).unwrap();
					assert_eq!(
						verify_consistency::<S>(last.0, current.0, &proof, &last.1, &current.1),
						Ok(()),
					);
					last = current;
					thread::yield_now();
				}
			})
		})
		.collect();
	for entry in &entries {
		shared.append(entry).unwrap();
	}
	for reader in readers {
		reader.join().unwrap();
	}
}
