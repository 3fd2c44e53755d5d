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

use std::collections::{BTreeMap, HashMap};

use merkle_log::{
	tile::{new_tiles, tile_root},
	ErrorKind, LogError, MerkleLog, NodeId, Tile, TileReader, TreeHasher,
};
use reference_log::{leaf_data, test_hashers, RangeHasher, Sha256TreeHasher};

use crate::build_log;

test_hashers!(full_tiles_hash_to_stored_nodes, full_tiles_hash_to_stored_nodes_internal);
fn full_tiles_hash_to_stored_nodes_internal<H: TreeHasher>() {
	let log = build_log::<H>(70);
	for height in 1..=3u8 {
		for tile in log.new_tiles(height, 0).unwrap() {
			let digests = log.tile(&tile).unwrap();
			assert_eq!(digests.len() as u64, tile.width);
			if tile.is_full() {
				assert_eq!(tile_root::<H>(&digests), log.node(tile.root_node()).unwrap(), "{}", tile);
			}
		}
	}
}

#[test]
fn partial_tile_covers_the_row_tail() {
	let log = build_log::<RangeHasher>(70);
	let tiles = log.new_tiles(3, 0).unwrap();
	let paths: Vec<_> = tiles.iter().map(Tile::path).collect();
	// 70 leaves: 8 full tiles and 6 leaves, then 8 digests on level 3.
	assert_eq!(paths.len(), 11);
	assert_eq!(paths[8], "tile/3/0/8.6");
	assert_eq!(paths[9], "tile/3/1/0.8");
	assert_eq!(paths[10], "tile/3/2/0.1");
	let tail = log.tile(&tiles[8]).unwrap();
	assert_eq!(RangeHasher::range(&tile_root::<RangeHasher>(&tail)), Some((64, 70)));
}

#[test]
fn incremental_publication() {
	let mut log = MerkleLog::<RangeHasher>::new();
	let mut published = BTreeMap::new();
	for step in [1u64, 3, 4, 9, 15, 16, 40] {
		let old_size = log.size();
		log.extend((old_size..step).map(leaf_data)).unwrap();
		for tile in log.new_tiles(2, old_size).unwrap() {
			// Announced tiles are readable right away.
			assert_eq!(log.tile(&tile).unwrap().len() as u64, tile.width);
			published.insert((tile.level, tile.index), tile);
		}
	}
	// Later versions of a tile replace earlier partial ones.
	let mut expected = new_tiles(2, 0, 40);
	expected.sort_by_key(|tile| (tile.level, tile.index));
	assert_eq!(published.into_values().collect::<Vec<_>>(), expected);
}

#[test]
fn old_size_above_log_fails() {
	let log = build_log::<RangeHasher>(5);
	assert!(log.new_tiles(2, 6).is_err());
	assert!(log.new_tiles(2, 5).unwrap().is_empty());
}

#[test]
fn malformed_tiles_fail() {
	let log = build_log::<RangeHasher>(16);
	let wide = Tile::new(2, 0, 0, 8);
	assert_eq!(log.tile(&wide), Err(LogError::InvalidTile(wide)));
	assert_eq!(log.tile(&Tile::new(64, 0, 0, 1)), Err(LogError::TileHeight(64)));
	assert_eq!(log.tile(&Tile::new(0, 0, 0, 1)).map_err(|e| e.kind()), Err(ErrorKind::Shape));
}

fn publish<H: TreeHasher>(log: &MerkleLog<H>, height: u8) -> HashMap<Tile, Vec<u8>> {
	log.new_tiles(height, 0)
		.unwrap()
		.into_iter()
		.map(|tile| (tile, log.tile_data(&tile).unwrap()))
		.collect()
}

test_hashers!(published_tiles_serve_proofs, published_tiles_serve_proofs_internal);
fn published_tiles_serve_proofs_internal<H: TreeHasher>() {
	let log = build_log::<H>(70);
	for height in 1..=3u8 {
		let published = publish(&log, height);
		let reader = TileReader::<H>::new(&published, height, 70, log.root().unwrap()).unwrap();
		let leaves: Vec<_> = (0..70).map(NodeId::leaf).collect();
		let expected = log.digests(leaves.iter().copied()).unwrap();
		assert_eq!(reader.read_hashes(&leaves).unwrap(), expected);
		for index in 0..70 {
			assert_eq!(reader.inclusion_proof(index), log.inclusion_proof(index, 70), "{}", index);
		}
		for size1 in 0..=70 {
			let expected = log.consistency_proof(size1, 70);
			assert_eq!(reader.consistency_proof(size1), expected, "{}", size1);
		}
	}
}

test_hashers!(tiles_of_past_trees_serve_proofs, tiles_of_past_trees_serve_proofs_internal);
fn tiles_of_past_trees_serve_proofs_internal<H: TreeHasher>() {
	let log = build_log::<H>(40);
	for size in 0..=40 {
		let reader = TileReader::<H>::new(&log, 2, size, log.root_at(size).unwrap()).unwrap();
		assert_eq!(reader.read_hashes(&[]), Ok(vec![]));
		for index in 0..size {
			assert_eq!(reader.inclusion_proof(index), log.inclusion_proof(index, size));
		}
		if size > 0 {
			let id = NodeId::leaf(size);
			assert_eq!(reader.read_hashes(&[id]), Err(LogError::MissingNode(id)));
		}
	}
}

#[test]
fn edited_tiles_are_rejected() {
	type S = Sha256TreeHasher;
	let log = build_log::<S>(70);
	let published = publish(&log, 3);
	assert_eq!(published.len(), 11);
	let root = log.root().unwrap();
	let leaves: Vec<_> = (0..70).map(NodeId::leaf).collect();

	for (tile, data) in &published {
		for at in [0, data.len() / 2, data.len() - 1] {
			let mut edited = published.clone();
			if let Some(data) = edited.get_mut(tile) {
				data[at] ^= 0x10;
			}
			let reader = TileReader::<S>::new(&edited, 3, 70, root).unwrap();
			let err = reader.read_hashes(&leaves).unwrap_err();
			assert_eq!(err.kind(), ErrorKind::RootMismatch, "{} at {}", tile, at);
		}

		let mut missing = published.clone();
		missing.remove(tile);
		let reader = TileReader::<S>::new(&missing, 3, 70, root).unwrap();
		assert_eq!(reader.read_hashes(&leaves), Err(LogError::MissingTile(*tile)));
	}

	let other_root = log.root_at(69).unwrap();
	let reader = TileReader::<S>::new(&published, 3, 70, other_root).unwrap();
	assert_eq!(reader.read_hashes(&[]), Err(LogError::InconsistentTiles { size: 70 }));
	assert_eq!(
		TileReader::<S>::new(&published, 0, 70, root).map(|_| ()),
		Err(LogError::TileHeight(0)),
	);
}
