use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trade category declared by the seller at submission time.
///
/// The wire strings are the ones the marketplace client sends and are kept
/// verbatim; an unrecognized string is an intake-level rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeKind {
    /// Generation-backed: capped by the current solar forecast.
    #[serde(rename = "OG (Solar)")]
    Solar,
    /// Storage-backed: capped by a fixed fraction of battery capacity.
    #[serde(rename = "ES (Battery)")]
    Storage,
}

impl FromStr for TradeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OG (Solar)" => Ok(TradeKind::Solar),
            "ES (Battery)" => Ok(TradeKind::Storage),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeKind::Solar => write!(f, "OG (Solar)"),
            TradeKind::Storage => write!(f, "ES (Battery)"),
        }
    }
}

/// One accepted trade, immutable once it enters the pending queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub seller: String,
    pub amount: u64,
    /// Fixed unit price stamped at acceptance; not caller-supplied.
    pub price: u64,
    pub kind: TradeKind,
    /// Forecast label at acceptance time, denormalized for audit.
    pub weather: String,
    /// Unix seconds at acceptance.
    pub accepted_at: u64,
}

impl TradeRecord {
    /// Economic value of this trade.
    pub fn value(&self) -> u64 {
        self.amount * self.price
    }
}

/// A sealed batch of trades drained from the pending queue in one flush.
///
/// Exists only for the duration of a single flush operation and is never
/// partially submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub trades: Vec<TradeRecord>,
    pub trade_count: usize,
    /// Sum of `amount * price` over the batch.
    pub total_value: u64,
    pub sealed_at: u64,
}

impl Batch {
    /// Seal a drained trade list into a batch, deriving its scalars.
    pub fn seal(trades: Vec<TradeRecord>) -> Self {
        let total_value = trades.iter().map(TradeRecord::value).sum();
        Self {
            trade_count: trades.len(),
            total_value,
            sealed_at: chrono::Utc::now().timestamp() as u64,
            trades,
        }
    }
}

/// Intake rejection reasons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RejectReason {
    OverCapacity { amount: u64, ceiling: u64 },
    UnknownKind { kind: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::OverCapacity { amount, ceiling } => {
                write!(f, "Fraud detected: amount {} exceeds limit {}", amount, ceiling)
            }
            RejectReason::UnknownKind { kind } => {
                write!(f, "Unrecognized trade type: {}", kind)
            }
        }
    }
}

impl std::error::Error for RejectReason {}

/// Outcome of one trade submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TradeStatus {
    Queued { position: usize },
    Rejected { reason: RejectReason },
}

/// Receipt sent back to the submitting caller.
///
/// Carries the forecast label regardless of outcome so the caller sees the
/// conditions their trade was judged under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub status: TradeStatus,
    pub weather: String,
}
