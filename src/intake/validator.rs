use crate::capacity::CapacityOracle;
use crate::pool::TradeQueue;
use crate::{RejectReason, TradeKind, TradeReceipt, TradeRecord, TradeStatus};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Validates incoming trades and feeds the pending queue.
///
/// Accepting a trade never submits anything on-chain: when the queue
/// crosses the batch threshold, intake sends a fire-and-forget signal to
/// the flush worker and returns to the caller immediately.
pub struct TradeIntake {
    capacity: Arc<CapacityOracle>,
    queue: Arc<TradeQueue>,
    flush_tx: mpsc::Sender<()>,
    batch_threshold: usize,
    unit_price: u64,
}

impl TradeIntake {
    pub fn new(
        capacity: Arc<CapacityOracle>,
        queue: Arc<TradeQueue>,
        flush_tx: mpsc::Sender<()>,
        batch_threshold: usize,
        unit_price: u64,
    ) -> Self {
        Self {
            capacity,
            queue,
            flush_tx,
            batch_threshold,
            unit_price,
        }
    }

    /// Screen one trade and enqueue it if it passes.
    ///
    /// The forecast is observed exactly once per submission; its label is
    /// stamped onto the record (and echoed in the receipt) even when the
    /// trade is rejected, so callers always see the conditions their trade
    /// was judged under.
    pub async fn submit(&self, seller: String, amount: u64, kind: &str) -> TradeReceipt {
        let observation = self.capacity.observe().await;
        let weather = observation.forecast().label.clone();

        // Unknown categories are rejected rather than left uncapped: an
        // unrecognized kind has no ceiling to screen against.
        let kind: TradeKind = match kind.parse() {
            Ok(kind) => kind,
            Err(()) => {
                warn!("Rejected trade from {}: unrecognized type {:?}", seller, kind);
                return TradeReceipt {
                    status: TradeStatus::Rejected {
                        reason: RejectReason::UnknownKind {
                            kind: kind.to_string(),
                        },
                    },
                    weather,
                };
            }
        };

        let ceiling = self.capacity.ceiling(kind, &observation);
        if amount > ceiling {
            info!(
                "Rejected {} trade from {}: amount {} over ceiling {}",
                kind, seller, amount, ceiling
            );
            return TradeReceipt {
                status: TradeStatus::Rejected {
                    reason: RejectReason::OverCapacity { amount, ceiling },
                },
                weather,
            };
        }

        let record = TradeRecord {
            seller,
            amount,
            price: self.unit_price,
            kind,
            weather: weather.clone(),
            accepted_at: chrono::Utc::now().timestamp() as u64,
        };

        let position = self.queue.push(record).await;
        debug!("Trade queued at position {}", position);

        if position >= self.batch_threshold {
            // Fire-and-forget: the worker drains the whole queue per signal
            // and no-ops on an empty one, so a dropped or duplicate signal
            // is harmless.
            if let Err(e) = self.flush_tx.try_send(()) {
                debug!("Flush signal not sent (flush already pending): {}", e);
            }
        }

        TradeReceipt {
            status: TradeStatus::Queued { position },
            weather,
        }
    }
}
