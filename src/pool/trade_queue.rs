//! Pending queue for accepted trades.
//!
//! Trades are stored in intake-arrival order and detached wholesale when a
//! batch is flushed. A single lock guards every read-modify-write sequence;
//! a length observed through `len` is advisory and may be stale by the time
//! the caller acts on it.

use crate::TradeRecord;
use std::mem;
use tokio::sync::Mutex;

/// Ordered buffer of accepted trades awaiting a flush.
pub struct TradeQueue {
    trades: Mutex<Vec<TradeRecord>>,
}

impl TradeQueue {
    /// Creates a new empty queue
    pub fn new() -> Self {
        Self {
            trades: Mutex::new(Vec::new()),
        }
    }

    /// Append an accepted trade and return its 1-based queue position.
    ///
    /// Called by intake after a trade passes the fraud check. The returned
    /// position doubles as the post-append queue length, which intake
    /// compares against the batch threshold.
    pub async fn push(&self, trade: TradeRecord) -> usize {
        let mut trades = self.trades.lock().await;
        trades.push(trade);
        trades.len()
    }

    /// Atomically detach the entire queue contents, leaving it empty.
    ///
    /// The swap happens under a single lock acquisition: every trade
    /// accepted before the swap is included, every trade accepted after is
    /// excluded, and no trade can land in two batches.
    pub async fn drain_all(&self) -> Vec<TradeRecord> {
        let mut trades = self.trades.lock().await;
        mem::take(&mut *trades)
    }

    /// Current queue length, for status reporting.
    pub async fn len(&self) -> usize {
        self.trades.lock().await.len()
    }
}

impl Default for TradeQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TradeKind;

    fn record(seller: &str, amount: u64) -> TradeRecord {
        TradeRecord {
            seller: seller.to_string(),
            amount,
            price: 80,
            kind: TradeKind::Storage,
            weather: "Sunny".to_string(),
            accepted_at: 0,
        }
    }

    #[tokio::test]
    async fn push_returns_one_based_positions() {
        let queue = TradeQueue::new();
        assert_eq!(queue.push(record("alice", 10)).await, 1);
        assert_eq!(queue.push(record("bob", 20)).await, 2);
        assert_eq!(queue.len().await, 2);
    }

    #[tokio::test]
    async fn drain_all_preserves_order_and_empties() {
        let queue = TradeQueue::new();
        queue.push(record("alice", 1)).await;
        queue.push(record("bob", 2)).await;
        queue.push(record("carol", 3)).await;

        let drained = queue.drain_all().await;
        let sellers: Vec<_> = drained.iter().map(|t| t.seller.as_str()).collect();
        assert_eq!(sellers, ["alice", "bob", "carol"]);
        assert_eq!(queue.len().await, 0);

        // A drain of an already-empty queue yields nothing.
        assert!(queue.drain_all().await.is_empty());
    }
}
