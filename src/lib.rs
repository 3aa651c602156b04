//! This crate implements a batching oracle that bridges an off-chain energy
//! marketplace to an on-chain settlement contract. Trades are screened
//! against a capacity limit, accumulated in a pending queue, and committed
//! in aggregate: one Merkle digest and one settlement transaction per batch.

pub mod types; // Defines common data structures used throughout the system.
pub mod api; // HTTP surface for trade submission and status.
pub mod capacity; // Per-kind trade ceilings and the forecast collaborator.
pub mod intake; // Trade screening and queue admission.
pub mod pool; // Pending queue of accepted trades.
pub mod commitment; // Deterministic batch commitment digests.
pub mod batch; // Flush worker draining the queue into settled batches.
pub mod settlement; // Settlement transaction construction and broadcast.
pub mod config; // Defines and loads system configuration.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use batch::BatchFlusher;
