//! Batch flush worker.
//!
//! A single consumer receives flush signals from intake, drains the pending
//! queue, and submits one settlement transaction per non-empty batch.
//! Funneling every flush through one worker serializes overlapping signals;
//! the empty-queue no-op is the guard that keeps a duplicate signal from
//! ever double-submitting a batch.

use crate::commitment::merkle_root;
use crate::pool::TradeQueue;
use crate::settlement::SettlementSubmitter;
use crate::Batch;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Drains the pending queue and settles each resulting batch.
pub struct BatchFlusher {
    queue: Arc<TradeQueue>,
    submitter: Arc<SettlementSubmitter>,
    flush_rx: mpsc::Receiver<()>,
}

impl BatchFlusher {
    pub fn new(
        queue: Arc<TradeQueue>,
        submitter: Arc<SettlementSubmitter>,
        flush_rx: mpsc::Receiver<()>,
    ) -> Self {
        Self {
            queue,
            submitter,
            flush_rx,
        }
    }

    /// Run the worker loop until every signal sender is dropped.
    pub async fn run(mut self) {
        info!("Batch flush worker started");
        while self.flush_rx.recv().await.is_some() {
            self.flush().await;
        }
        info!("Batch flush worker stopped");
    }

    /// Drain the queue and settle the batch, if any.
    ///
    /// The drain is atomic: trades accepted after it belong to the next
    /// batch. Settlement runs entirely off the queue lock, so intake keeps
    /// accepting trades while a batch is in flight.
    async fn flush(&self) {
        let trades = self.queue.drain_all().await;
        if trades.is_empty() {
            // Redundant signal; an earlier flush already took the batch.
            debug!("Flush signal with empty queue, nothing to do");
            return;
        }

        let batch = Batch::seal(trades);
        info!(
            "Processing batch of {} trades, total value {}",
            batch.trade_count, batch.total_value
        );

        let digest = merkle_root(&batch.trades);

        match self
            .submitter
            .submit(digest, batch.trade_count, batch.total_value)
            .await
        {
            Ok(tx_hash) => {
                info!("Batch confirmed, tx {:?}", tx_hash);
            }
            Err(e) => {
                // The batch is dropped: no retry, no persistence. Trades it
                // carried are gone from the oracle's bookkeeping.
                // TODO: journal failed batches to a dead-letter file so an
                // operator can replay them.
                error!(
                    "Settlement failed, dropping batch of {} trades: {}",
                    batch.trade_count, e
                );
            }
        }
    }
}
