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

use hex_literal::hex;
use merkle_log::{ConsistencyReceipt, ErrorKind, MerkleLog, Receipt};
use reference_log::Sha256TreeHasher;

use crate::random_entries;

type S = Sha256TreeHasher;
type Digest = [u8; 32];

fn sample_log() -> (MerkleLog<S>, Vec<Vec<u8>>) {
	let entries = random_entries(11, 27);
	let mut log = MerkleLog::new();
	log.extend(&entries).unwrap();
	(log, entries)
}

#[test]
fn receipts_survive_json() {
	let (log, entries) = sample_log();
	for index in [0u64, 5, 16, 26] {
		let receipt = log.receipt(index, 27).unwrap();
		let json = serde_json::to_string(&receipt).unwrap();
		let decoded: Receipt<Digest> = serde_json::from_str(&json).unwrap();
		assert_eq!(decoded, receipt);
		assert_eq!(decoded.verify_leaf::<S>(&entries[index as usize]), Ok(()));
	}

	let receipt = log.consistency_receipt(9, 27).unwrap();
	let json = serde_json::to_value(&receipt).unwrap();
	assert_eq!(json["size1"], 9);
	assert_eq!(json["proof"].as_array().map(Vec::len), Some(receipt.proof.len()));
	let decoded: ConsistencyReceipt<Digest> = serde_json::from_value(json).unwrap();
	let root1 = log.root_at(9).unwrap();
	assert_eq!(decoded.root2::<S>(&root1), Ok(log.root().unwrap()));
}

#[test]
fn edited_receipt_fails() {
	let (log, entries) = sample_log();
	let receipt = log.receipt(3, 20).unwrap();
	let mut json = serde_json::to_value(&receipt).unwrap();
	json["leaf"] = 4.into();
	let edited: Receipt<Digest> = serde_json::from_value(json).unwrap();
	let err = edited.verify_leaf::<S>(&entries[3]).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::RootMismatch);

	let err = receipt.verify_leaf::<S>(b"not in the log").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::RootMismatch);
}

#[test]
fn malformed_digests_are_rejected() {
	let short = r#"{"leaf":0,"size":1,"root":"AP8=","proof":[]}"#;
	assert!(serde_json::from_str::<Receipt<Digest>>(short).is_err());
	let hex = format!(r#"{{"size1":1,"size2":2,"proof":["{}"]}}"#, "00".repeat(32));
	assert!(serde_json::from_str::<ConsistencyReceipt<Digest>>(&hex).is_err());
	let not_base64 = format!(r#"{{"size1":1,"size2":2,"proof":["{}="]}}"#, "!".repeat(43));
	assert!(serde_json::from_str::<ConsistencyReceipt<Digest>>(&not_base64).is_err());
}

const TWO_ENTRY_RECEIPT: &str = concat!(
	r#"{"leaf":0,"size":2,"#,
	r#""root":"F5j6o+uFr/q2CKKM+IWiShOvTseU/jq+wEbyG3p5m+w=","#,
	r#""proof":["EiUNele6YWbGGwsTX8LCHwlvkYtppC1nPYEnmNnF1pM="]}"#,
);

#[test]
fn receipts_use_standard_base64() {
	let receipt: Receipt<Digest> = serde_json::from_str(TWO_ENTRY_RECEIPT).unwrap();
	assert_eq!(receipt.verify_leaf::<S>(b"L123456"), Ok(()));
	assert_eq!(
		receipt.root,
		hex!("1798faa3eb85affab608a28cf885a24a13af4ec794fe3abec046f21b7a799bec"),
	);

	let mut log = MerkleLog::<S>::new();
	log.extend(["L123456", "L789"]).unwrap();
	assert_eq!(log.receipt(0, 2).unwrap(), receipt);
	assert_eq!(serde_json::to_string(&receipt).unwrap(), TWO_ENTRY_RECEIPT);
}
