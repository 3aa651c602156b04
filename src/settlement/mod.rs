//! Settlement Module
//!
//! This module carries a batch commitment onto the settlement chain:
//! - `ChainClient`: the narrow contract consumed from the external chain
//!   (sequence number, sign, broadcast)
//! - `SettlementSubmitter`: builds, signs and broadcasts the single
//!   settlement transaction for a batch

mod client;
mod submitter;

pub use client::{ChainClient, ChainError, HttpChainClient};
pub use submitter::{SettlementError, SettlementSubmitter};
