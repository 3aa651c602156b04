//! Deterministic Merkle commitment over a batch of trades.
//!
//! The digest is order- and format-sensitive: the leaf preimage is the
//! UTF-8 concatenation of seller, amount, price and weather in that exact
//! order, integers rendered in decimal with no separators. The settlement
//! contract verifies against this byte layout, so it must not change.

use crate::TradeRecord;
use ethers::utils::keccak256;

/// Hash one trade into its leaf digest.
pub fn leaf_hash(trade: &TradeRecord) -> [u8; 32] {
    let preimage = format!(
        "{}{}{}{}",
        trade.seller, trade.amount, trade.price, trade.weather
    );
    keccak256(preimage.as_bytes())
}

/// Compute the commitment digest of an ordered trade list.
///
/// Empty input returns all zeros. Adjacent digests are paired left-to-right
/// and each pair's 64-byte concatenation is hashed into a parent; an odd
/// level pairs its last digest with itself. Reduction continues until one
/// digest remains.
pub fn merkle_root(trades: &[TradeRecord]) -> [u8; 32] {
    if trades.is_empty() {
        return [0u8; 32];
    }

    let mut current: Vec<[u8; 32]> = trades.iter().map(leaf_hash).collect();

    while current.len() > 1 {
        let mut next = Vec::with_capacity(current.len().div_ceil(2));

        for chunk in current.chunks(2) {
            let left = &chunk[0];
            let right = if chunk.len() == 2 {
                &chunk[1]
            } else {
                &chunk[0] // self-pair the unpaired digest
            };
            let mut combined = [0u8; 64];
            combined[..32].copy_from_slice(left);
            combined[32..].copy_from_slice(right);
            next.push(keccak256(combined));
        }

        current = next;
    }

    current[0]
}
