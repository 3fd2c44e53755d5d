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

//! Bit arithmetic on leaf positions.

/// Number of bits needed to represent `x`, zero for zero.
#[inline]
pub fn bit_len(x: u64) -> u32 {
	u64::BITS - x.leading_zeros()
}

/// Position of the highest set bit of `x`.
#[inline]
pub fn highest_set_bit(x: u64) -> Option<u32> {
	bit_len(x).checked_sub(1)
}

/// Highest bit position where `a` and `b` differ.
///
/// For two node indices at the same level, this is how many levels up their
/// paths to the root merge, minus one.
#[inline]
pub fn divergence(a: u64, b: u64) -> Option<u32> {
	highest_set_bit(a ^ b)
}

/// Mask of the bits strictly below position `level`.
#[inline]
pub(crate) fn low_mask(level: u32) -> u64 {
	match 1u64.checked_shl(level) {
		Some(bit) => bit - 1,
		None => u64::MAX,
	}
}

/// `x << level`, clamped to `u64::MAX`.
#[inline]
pub(crate) fn shl_clamped(x: u128, level: u32) -> u64 {
	if x == 0 {
		return 0
	}
	if level >= u64::BITS {
		return u64::MAX
	}
	u64::try_from(x << level).unwrap_or(u64::MAX)
}
